//! Клиентская библиотека для чтения контента из WordPress REST API
//! (`/wp-json/wp/v2`).
//!
//! Предоставляет единый API (`WpClient`) поверх `reqwest`:
//! - построение query-строк для каждого эндпоинта ([`query`]);
//! - загрузку записей, страниц, медиа, таксономий, пользователей и
//!   комментариев;
//! - выбор URL изображения записи с цепочкой запасных вариантов ([`image`]);
//! - параллельную загрузку нескольких сущностей ([`WpClient::fetch_many`]);
//! - чистые хелперы для отображения ([`helpers`]).
//!
//! Методы `list_*`/`get_*` никогда не возвращают ошибку: сбой транспорта,
//! не-JSON ответ или статус не 2xx превращаются в пустой список или `None`
//! и логируются через `tracing`. Если нужно отличить «пусто» от «упало»,
//! используйте парные методы `try_*`.
#![warn(missing_docs)]

mod batch;
mod config;
mod error;
pub mod helpers;
mod http_client;
pub mod image;
mod models;
pub mod query;

use std::collections::BTreeMap;

use tracing::{debug, warn};

pub use batch::{BatchData, BatchKey, BatchRequest, BatchResults};
pub use config::{ClientConfig, DEFAULT_API_PATH, DEFAULT_BASE_URL, DEFAULT_REVALIDATE_SECS};
pub use error::{WpError, WpResult};
pub use image::{featured_image_alt, featured_image_url, has_featured_image, media_image_url};
pub use models::{
    AvatarUrls, Category, Comment, ContentItem, Embedded, FullPostData, ImageSize, Media,
    MediaDetails, MediaSize, NewComment, Page, Post, PostType, Rendered, RenderedContent,
    SearchResult, Settings, Tag, Taxonomy, Term, User,
};
pub use query::{
    CategoryQuery, CommentQuery, MediaQuery, Order, PageQuery, PostQuery, Query, SearchQuery,
    TagQuery, TaxonomyQuery, UserQuery,
};

use http_client::HttpClient;

#[derive(Debug, Clone)]
/// Клиент WordPress REST API.
pub struct WpClient {
    config: ClientConfig,
    http: HttpClient,
}

impl WpClient {
    /// Создаёт клиент с переданной конфигурацией.
    pub fn new(config: ClientConfig) -> WpResult<Self> {
        let http = HttpClient::new(&config)?;
        Ok(Self { config, http })
    }

    /// Создаёт клиент по переменным окружения (см. [`ClientConfig::from_env`]).
    pub fn from_env() -> WpResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Текущая конфигурация.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// URL сайта.
    pub fn site_url(&self) -> &str {
        self.config.site_url()
    }

    /// URL REST API.
    pub fn api_url(&self) -> String {
        self.config.api_url()
    }

    // --- posts ---

    /// Список записей; ошибка возвращается вызывающему.
    pub async fn try_list_posts(&self, query: &PostQuery) -> WpResult<Vec<Post>> {
        self.http.get_json(&query.to_query().with_path("posts")).await
    }

    /// Список записей; при любой ошибке пустой список.
    pub async fn list_posts(&self, query: &PostQuery) -> Vec<Post> {
        degrade_list("posts", self.try_list_posts(query).await)
    }

    /// Запись по идентификатору; ошибка возвращается вызывающему.
    pub async fn try_get_post(&self, id: u64) -> WpResult<Post> {
        let path = query::single_post_query().with_path(&format!("posts/{id}"));
        self.http.get_json(&path).await
    }

    /// Запись по идентификатору или `None`.
    pub async fn get_post(&self, id: u64) -> Option<Post> {
        degrade_item("post", self.try_get_post(id).await)
    }

    /// Опубликованная запись по slug или `None`.
    pub async fn get_post_by_slug(&self, slug: &str) -> Option<Post> {
        first_match("post", self.try_list_posts(&PostQuery::by_slug(slug)).await)
    }

    // --- pages ---

    /// Список страниц; ошибка возвращается вызывающему.
    pub async fn try_list_pages(&self, query: &PageQuery) -> WpResult<Vec<Page>> {
        self.http.get_json(&query.to_query().with_path("pages")).await
    }

    /// Список страниц; при любой ошибке пустой список.
    pub async fn list_pages(&self, query: &PageQuery) -> Vec<Page> {
        degrade_list("pages", self.try_list_pages(query).await)
    }

    /// Страница по идентификатору; ошибка возвращается вызывающему.
    pub async fn try_get_page(&self, id: u64) -> WpResult<Page> {
        let path = query::single_page_query().with_path(&format!("pages/{id}"));
        self.http.get_json(&path).await
    }

    /// Страница по идентификатору или `None`.
    pub async fn get_page(&self, id: u64) -> Option<Page> {
        degrade_item("page", self.try_get_page(id).await)
    }

    /// Опубликованная страница по slug или `None`.
    pub async fn get_page_by_slug(&self, slug: &str) -> Option<Page> {
        first_match("page", self.try_list_pages(&PageQuery::by_slug(slug)).await)
    }

    // --- media ---

    /// Список медиафайлов; ошибка возвращается вызывающему.
    pub async fn try_list_media(&self, query: &MediaQuery) -> WpResult<Vec<Media>> {
        self.http.get_json(&query.to_query().with_path("media")).await
    }

    /// Список медиафайлов; при любой ошибке пустой список.
    pub async fn list_media(&self, query: &MediaQuery) -> Vec<Media> {
        degrade_list("media", self.try_list_media(query).await)
    }

    /// Медиафайл по идентификатору; ошибка возвращается вызывающему.
    pub async fn try_get_media(&self, id: u64) -> WpResult<Media> {
        self.http.get_json(&format!("media/{id}")).await
    }

    /// Медиафайл по идентификатору или `None`. Для `id == 0` запрос не
    /// выполняется.
    pub async fn get_media(&self, id: u64) -> Option<Media> {
        if id == 0 {
            return None;
        }
        degrade_item("media", self.try_get_media(id).await)
    }

    // --- categories ---

    /// Список рубрик; ошибка возвращается вызывающему.
    pub async fn try_list_categories(&self, query: &CategoryQuery) -> WpResult<Vec<Category>> {
        self.http
            .get_json(&query.to_query().with_path("categories"))
            .await
    }

    /// Список рубрик; при любой ошибке пустой список.
    pub async fn list_categories(&self, query: &CategoryQuery) -> Vec<Category> {
        degrade_list("categories", self.try_list_categories(query).await)
    }

    /// Рубрика по идентификатору; ошибка возвращается вызывающему.
    pub async fn try_get_category(&self, id: u64) -> WpResult<Category> {
        self.http.get_json(&format!("categories/{id}")).await
    }

    /// Рубрика по идентификатору или `None`.
    pub async fn get_category(&self, id: u64) -> Option<Category> {
        degrade_item("category", self.try_get_category(id).await)
    }

    /// Рубрика по slug или `None`.
    pub async fn get_category_by_slug(&self, slug: &str) -> Option<Category> {
        let query = CategoryQuery {
            slug: vec![slug.to_string()],
            ..CategoryQuery::default()
        };
        first_match("category", self.try_list_categories(&query).await)
    }

    // --- tags ---

    /// Список меток; ошибка возвращается вызывающему.
    pub async fn try_list_tags(&self, query: &TagQuery) -> WpResult<Vec<Tag>> {
        self.http.get_json(&query.to_query().with_path("tags")).await
    }

    /// Список меток; при любой ошибке пустой список.
    pub async fn list_tags(&self, query: &TagQuery) -> Vec<Tag> {
        degrade_list("tags", self.try_list_tags(query).await)
    }

    /// Метка по идентификатору; ошибка возвращается вызывающему.
    pub async fn try_get_tag(&self, id: u64) -> WpResult<Tag> {
        self.http.get_json(&format!("tags/{id}")).await
    }

    /// Метка по идентификатору или `None`.
    pub async fn get_tag(&self, id: u64) -> Option<Tag> {
        degrade_item("tag", self.try_get_tag(id).await)
    }

    /// Метка по slug или `None`.
    pub async fn get_tag_by_slug(&self, slug: &str) -> Option<Tag> {
        let query = TagQuery {
            slug: vec![slug.to_string()],
            ..TagQuery::default()
        };
        first_match("tag", self.try_list_tags(&query).await)
    }

    // --- users ---

    /// Список пользователей; ошибка возвращается вызывающему.
    pub async fn try_list_users(&self, query: &UserQuery) -> WpResult<Vec<User>> {
        self.http.get_json(&query.to_query().with_path("users")).await
    }

    /// Список пользователей; при любой ошибке пустой список.
    pub async fn list_users(&self, query: &UserQuery) -> Vec<User> {
        degrade_list("users", self.try_list_users(query).await)
    }

    /// Пользователь по идентификатору; ошибка возвращается вызывающему.
    pub async fn try_get_user(&self, id: u64) -> WpResult<User> {
        self.http.get_json(&format!("users/{id}")).await
    }

    /// Пользователь по идентификатору или `None`.
    pub async fn get_user(&self, id: u64) -> Option<User> {
        degrade_item("user", self.try_get_user(id).await)
    }

    // --- comments ---

    /// Список комментариев; ошибка возвращается вызывающему.
    pub async fn try_list_comments(&self, query: &CommentQuery) -> WpResult<Vec<Comment>> {
        self.http
            .get_json(&query.to_query().with_path("comments"))
            .await
    }

    /// Список комментариев; при любой ошибке пустой список.
    pub async fn list_comments(&self, query: &CommentQuery) -> Vec<Comment> {
        degrade_list("comments", self.try_list_comments(query).await)
    }

    /// Комментарий по идентификатору; ошибка возвращается вызывающему.
    pub async fn try_get_comment(&self, id: u64) -> WpResult<Comment> {
        self.http.get_json(&format!("comments/{id}")).await
    }

    /// Комментарий по идентификатору или `None`.
    pub async fn get_comment(&self, id: u64) -> Option<Comment> {
        degrade_item("comment", self.try_get_comment(id).await)
    }

    /// Отправляет комментарий со статусом `hold`.
    ///
    /// Единственная операция записи; ошибка возвращается вызывающему, чтобы
    /// форма могла её показать.
    pub async fn submit_comment(&self, comment: &NewComment) -> WpResult<Comment> {
        let result = self.http.create_comment(comment).await;
        if let Err(err) = &result {
            warn!(post = comment.post, error = %err, "comment submission failed");
        }
        result
    }

    // --- taxonomies / types / search / settings ---

    /// Таксономии по slug; ошибка возвращается вызывающему.
    pub async fn try_taxonomies(
        &self,
        query: &TaxonomyQuery,
    ) -> WpResult<BTreeMap<String, Taxonomy>> {
        self.http
            .get_json(&query.to_query().with_path("taxonomies"))
            .await
    }

    /// Таксономии по slug; при любой ошибке пустая карта.
    pub async fn taxonomies(&self, query: &TaxonomyQuery) -> BTreeMap<String, Taxonomy> {
        self.try_taxonomies(query)
            .await
            .unwrap_or_else(|err| degraded("taxonomies", &err))
    }

    /// Типы записей по slug; ошибка возвращается вызывающему.
    pub async fn try_post_types(&self) -> WpResult<BTreeMap<String, PostType>> {
        self.http.get_json("types").await
    }

    /// Типы записей по slug; при любой ошибке пустая карта.
    pub async fn post_types(&self) -> BTreeMap<String, PostType> {
        self.try_post_types()
            .await
            .unwrap_or_else(|err| degraded("types", &err))
    }

    /// Поиск по всему контенту; ошибка возвращается вызывающему.
    pub async fn try_search(&self, query: &SearchQuery) -> WpResult<Vec<SearchResult>> {
        self.http.get_json(&query.to_query().with_path("search")).await
    }

    /// Поиск по всему контенту; при любой ошибке пустой список.
    pub async fn search(&self, query: &SearchQuery) -> Vec<SearchResult> {
        degrade_list("search", self.try_search(query).await)
    }

    /// Настройки сайта; ошибка возвращается вызывающему.
    pub async fn try_settings(&self) -> WpResult<Settings> {
        self.http.get_json("settings").await
    }

    /// Настройки сайта; при любой ошибке `Settings::default()`.
    pub async fn settings(&self) -> Settings {
        self.try_settings()
            .await
            .unwrap_or_else(|err| degraded("settings", &err))
    }

    /// Запись вместе с рубриками, метками, автором и одобренными
    /// комментариями.
    ///
    /// Связанные сущности загружаются параллельно, каждая часть при ошибке
    /// становится пустой независимо от остальных. `None`, если нет самой
    /// записи.
    pub async fn full_post_data(&self, id: u64) -> Option<FullPostData> {
        let post = self.get_post(id).await?;

        let categories = async {
            if post.categories.is_empty() {
                return Vec::new();
            }
            let query = CategoryQuery {
                include: post.categories.clone(),
                per_page: Some(page_size_for(post.categories.len())),
                ..CategoryQuery::default()
            };
            self.list_categories(&query).await
        };
        let tags = async {
            if post.tags.is_empty() {
                return Vec::new();
            }
            let query = TagQuery {
                include: post.tags.clone(),
                per_page: Some(page_size_for(post.tags.len())),
                ..TagQuery::default()
            };
            self.list_tags(&query).await
        };
        let author = async {
            if post.author == 0 {
                return None;
            }
            self.get_user(post.author).await
        };
        let comments_query = CommentQuery::approved_for_post(id);
        let comments = self.list_comments(&comments_query);

        let (categories, tags, author, comments) = tokio::join!(categories, tags, author, comments);

        Some(FullPostData {
            post,
            categories,
            tags,
            author,
            comments,
        })
    }
}

/// WordPress ограничивает `per_page` сотней.
fn page_size_for(count: usize) -> u32 {
    count.clamp(1, 100) as u32
}

fn degraded<T: Default>(entity: &'static str, err: &WpError) -> T {
    warn!(entity, error = %err, "request failed, using empty value");
    T::default()
}

fn degrade_list<T>(entity: &'static str, result: WpResult<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|err| degraded(entity, &err))
}

fn degrade_item<T>(entity: &'static str, result: WpResult<T>) -> Option<T> {
    match result {
        Ok(item) => Some(item),
        Err(WpError::NotFound) => {
            debug!(entity, "not found");
            None
        }
        Err(err) => {
            warn!(entity, error = %err, "request failed, returning none");
            None
        }
    }
}

fn first_match<T>(entity: &'static str, result: WpResult<Vec<T>>) -> Option<T> {
    let item = degrade_item(entity, result)?.into_iter().next();
    if item.is_none() {
        debug!(entity, "no match for slug");
    }
    item
}
