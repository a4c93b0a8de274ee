use std::collections::BTreeMap;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use tracing::{debug, error};

use crate::WpClient;
use crate::error::{WpError, WpResult};
use crate::models::{Category, Media, Page, Post, Tag, User};
use crate::query::{CategoryQuery, MediaQuery, PageQuery, PostQuery, TagQuery, UserQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Имя запроса внутри пакета.
pub enum BatchKey {
    /// Записи.
    Posts,
    /// Страницы.
    Pages,
    /// Рубрики.
    Categories,
    /// Метки.
    Tags,
    /// Медиафайлы.
    Media,
    /// Пользователи.
    Users,
}

impl BatchKey {
    /// Имя ключа для логов.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Posts => "posts",
            Self::Pages => "pages",
            Self::Categories => "categories",
            Self::Tags => "tags",
            Self::Media => "media",
            Self::Users => "users",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Набор именованных запросов. Выполняются только заданные (`Some`).
pub struct BatchRequest {
    /// Записи.
    pub posts: Option<PostQuery>,
    /// Страницы.
    pub pages: Option<PageQuery>,
    /// Рубрики.
    pub categories: Option<CategoryQuery>,
    /// Метки.
    pub tags: Option<TagQuery>,
    /// Медиафайлы.
    pub media: Option<MediaQuery>,
    /// Пользователи.
    pub users: Option<UserQuery>,
}

impl BatchRequest {
    /// Ключи заданных запросов.
    pub fn keys(&self) -> Vec<BatchKey> {
        [
            (BatchKey::Posts, self.posts.is_some()),
            (BatchKey::Pages, self.pages.is_some()),
            (BatchKey::Categories, self.categories.is_some()),
            (BatchKey::Tags, self.tags.is_some()),
            (BatchKey::Media, self.media.is_some()),
            (BatchKey::Users, self.users.is_some()),
        ]
        .into_iter()
        .filter_map(|(key, present)| present.then_some(key))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Данные одного успешно выполненного запроса пакета.
pub enum BatchData {
    /// Записи.
    Posts(Vec<Post>),
    /// Страницы.
    Pages(Vec<Page>),
    /// Рубрики.
    Categories(Vec<Category>),
    /// Метки.
    Tags(Vec<Tag>),
    /// Медиафайлы.
    Media(Vec<Media>),
    /// Пользователи.
    Users(Vec<User>),
}

#[derive(Debug, Default)]
/// Результаты пакета: успешные данные и ошибки по ключам.
///
/// Ключ неудавшегося запроса в данных отсутствует.
pub struct BatchResults {
    data: BTreeMap<BatchKey, BatchData>,
    failures: BTreeMap<BatchKey, WpError>,
}

impl BatchResults {
    fn record(&mut self, key: BatchKey, outcome: WpResult<BatchData>) {
        match outcome {
            Ok(data) => {
                self.data.insert(key, data);
            }
            Err(err) => {
                error!(key = key.as_str(), error = %err, "batch request failed");
                self.failures.insert(key, err);
            }
        }
    }

    /// Данные по ключу.
    pub fn get(&self, key: BatchKey) -> Option<&BatchData> {
        self.data.get(&key)
    }

    /// Ошибка по ключу.
    pub fn failure(&self, key: BatchKey) -> Option<&WpError> {
        self.failures.get(&key)
    }

    /// Ключи успешных запросов.
    pub fn keys(&self) -> impl Iterator<Item = BatchKey> + '_ {
        self.data.keys().copied()
    }

    /// Ключи неудавшихся запросов.
    pub fn failed_keys(&self) -> impl Iterator<Item = BatchKey> + '_ {
        self.failures.keys().copied()
    }

    /// Все ли запросы пакета выполнены успешно.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Записи, если запрос был и удался.
    pub fn posts(&self) -> Option<&[Post]> {
        match self.get(BatchKey::Posts)? {
            BatchData::Posts(items) => Some(items),
            _ => None,
        }
    }

    /// Страницы, если запрос был и удался.
    pub fn pages(&self) -> Option<&[Page]> {
        match self.get(BatchKey::Pages)? {
            BatchData::Pages(items) => Some(items),
            _ => None,
        }
    }

    /// Рубрики, если запрос был и удался.
    pub fn categories(&self) -> Option<&[Category]> {
        match self.get(BatchKey::Categories)? {
            BatchData::Categories(items) => Some(items),
            _ => None,
        }
    }

    /// Метки, если запрос был и удался.
    pub fn tags(&self) -> Option<&[Tag]> {
        match self.get(BatchKey::Tags)? {
            BatchData::Tags(items) => Some(items),
            _ => None,
        }
    }

    /// Медиафайлы, если запрос был и удался.
    pub fn media(&self) -> Option<&[Media]> {
        match self.get(BatchKey::Media)? {
            BatchData::Media(items) => Some(items),
            _ => None,
        }
    }

    /// Пользователи, если запрос был и удался.
    pub fn users(&self) -> Option<&[User]> {
        match self.get(BatchKey::Users)? {
            BatchData::Users(items) => Some(items),
            _ => None,
        }
    }
}

type BatchTask<'a> = BoxFuture<'a, (BatchKey, WpResult<BatchData>)>;

impl WpClient {
    /// Выполняет все заданные запросы параллельно и дожидается каждого.
    ///
    /// Ошибка одного запроса не отменяет остальные и не превращается в
    /// ошибку всего вызова: она логируется и попадает в
    /// [`BatchResults::failure`].
    pub async fn fetch_many(&self, request: &BatchRequest) -> BatchResults {
        let mut tasks: Vec<BatchTask<'_>> = Vec::new();

        if let Some(query) = &request.posts {
            tasks.push(
                async move {
                    let outcome = self.try_list_posts(query).await.map(BatchData::Posts);
                    (BatchKey::Posts, outcome)
                }
                .boxed(),
            );
        }
        if let Some(query) = &request.pages {
            tasks.push(
                async move {
                    let outcome = self.try_list_pages(query).await.map(BatchData::Pages);
                    (BatchKey::Pages, outcome)
                }
                .boxed(),
            );
        }
        if let Some(query) = &request.categories {
            tasks.push(
                async move {
                    let outcome = self
                        .try_list_categories(query)
                        .await
                        .map(BatchData::Categories);
                    (BatchKey::Categories, outcome)
                }
                .boxed(),
            );
        }
        if let Some(query) = &request.tags {
            tasks.push(
                async move {
                    let outcome = self.try_list_tags(query).await.map(BatchData::Tags);
                    (BatchKey::Tags, outcome)
                }
                .boxed(),
            );
        }
        if let Some(query) = &request.media {
            tasks.push(
                async move {
                    let outcome = self.try_list_media(query).await.map(BatchData::Media);
                    (BatchKey::Media, outcome)
                }
                .boxed(),
            );
        }
        if let Some(query) = &request.users {
            tasks.push(
                async move {
                    let outcome = self.try_list_users(query).await.map(BatchData::Users);
                    (BatchKey::Users, outcome)
                }
                .boxed(),
            );
        }

        debug!(requests = tasks.len(), "running batch");

        let mut results = BatchResults::default();
        for (key, outcome) in join_all(tasks).await {
            results.record(key, outcome);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_present_requests() {
        let request = BatchRequest {
            posts: Some(PostQuery::latest(3)),
            tags: Some(TagQuery::default()),
            ..BatchRequest::default()
        };
        assert_eq!(request.keys(), vec![BatchKey::Posts, BatchKey::Tags]);
        assert!(BatchRequest::default().keys().is_empty());
    }

    #[test]
    fn failed_key_is_absent_from_data() {
        let mut results = BatchResults::default();
        results.record(BatchKey::Posts, Ok(BatchData::Posts(Vec::new())));
        results.record(BatchKey::Tags, Err(WpError::NotFound));

        assert_eq!(results.keys().collect::<Vec<_>>(), vec![BatchKey::Posts]);
        assert_eq!(results.failed_keys().collect::<Vec<_>>(), vec![BatchKey::Tags]);
        assert!(results.tags().is_none());
        assert_eq!(results.posts().map(<[Post]>::len), Some(0));
        assert!(matches!(results.failure(BatchKey::Tags), Some(WpError::NotFound)));
        assert!(!results.is_complete());
    }
}
