use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Поле вида `{ "rendered": "..." }`.
pub struct Rendered {
    /// HTML-представление поля.
    #[serde(default)]
    pub rendered: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Содержимое или анонс записи.
pub struct RenderedContent {
    /// HTML-представление поля.
    #[serde(default)]
    pub rendered: String,
    /// Защищено ли содержимое паролем.
    #[serde(default)]
    pub protected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Именованный размер изображения, который генерирует WordPress.
pub enum ImageSize {
    /// `thumbnail`
    Thumbnail,
    /// `medium`
    Medium,
    /// `medium_large`
    MediumLarge,
    /// `large`
    Large,
    /// `full`
    Full,
}

impl ImageSize {
    /// Порядок перебора размеров, если запрошенный размер отсутствует.
    pub const FALLBACK_ORDER: [ImageSize; 5] = [
        ImageSize::Medium,
        ImageSize::Large,
        ImageSize::MediumLarge,
        ImageSize::Thumbnail,
        ImageSize::Full,
    ];

    /// Ключ размера в `media_details.sizes`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Thumbnail => "thumbnail",
            Self::Medium => "medium",
            Self::MediumLarge => "medium_large",
            Self::Large => "large",
            Self::Full => "full",
        }
    }
}

impl std::str::FromStr for ImageSize {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "thumbnail" => Ok(Self::Thumbnail),
            "medium" => Ok(Self::Medium),
            "medium_large" => Ok(Self::MediumLarge),
            "large" => Ok(Self::Large),
            "full" => Ok(Self::Full),
            other => Err(format!("unknown image size: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// URL и габариты одного сгенерированного размера.
pub struct MediaSize {
    /// URL файла этого размера.
    pub source_url: String,
    /// Ширина в пикселях.
    #[serde(default)]
    pub width: Option<u32>,
    /// Высота в пикселях.
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Технические детали медиафайла.
pub struct MediaDetails {
    /// Ширина оригинала.
    #[serde(default)]
    pub width: Option<u32>,
    /// Высота оригинала.
    #[serde(default)]
    pub height: Option<u32>,
    /// Относительный путь файла в uploads.
    #[serde(default)]
    pub file: Option<String>,
    /// Сгенерированные размеры. Набор ключей зависит от сервера и никогда не
    /// бывает гарантированно полным.
    #[serde(default)]
    pub sizes: BTreeMap<String, MediaSize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Медиафайл (`/wp/v2/media`).
pub struct Media {
    /// Идентификатор медиафайла.
    pub id: u64,
    /// Канонический URL оригинала.
    pub source_url: String,
    /// Slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// Альтернативный текст.
    #[serde(default)]
    pub alt_text: Option<String>,
    /// Заголовок вложения.
    #[serde(default)]
    pub title: Option<Rendered>,
    /// Класс медиа: `image`, `file`.
    #[serde(default)]
    pub media_type: Option<String>,
    /// MIME-тип.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Размеры и габариты.
    #[serde(default, deserialize_with = "lenient_option")]
    pub media_details: Option<MediaDetails>,
    /// Запись, к которой прикреплён файл.
    #[serde(default)]
    pub post: Option<u64>,
}

impl Media {
    /// URL конкретного размера, если сервер его сгенерировал.
    pub fn size_url(&self, size: ImageSize) -> Option<&str> {
        self.media_details
            .as_ref()?
            .sizes
            .get(size.as_str())
            .map(|entry| entry.source_url.as_str())
            .filter(|url| !url.is_empty())
    }

    /// Канонический URL, если он не пустой.
    pub fn canonical_url(&self) -> Option<&str> {
        Some(self.source_url.as_str()).filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Аватары пользователя по размерам 24/48/96.
pub struct AvatarUrls {
    /// 24×24.
    #[serde(rename = "24", default)]
    pub small: Option<String>,
    /// 48×48.
    #[serde(rename = "48", default)]
    pub medium: Option<String>,
    /// 96×96.
    #[serde(rename = "96", default)]
    pub large: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Публичный профиль пользователя.
pub struct User {
    /// Идентификатор пользователя.
    pub id: u64,
    /// Отображаемое имя.
    #[serde(default)]
    pub name: String,
    /// Slug.
    #[serde(default)]
    pub slug: String,
    /// Сайт пользователя.
    #[serde(default)]
    pub url: Option<String>,
    /// Описание профиля.
    #[serde(default)]
    pub description: Option<String>,
    /// Ссылка на архив автора.
    #[serde(default)]
    pub link: Option<String>,
    /// Аватары.
    #[serde(default, deserialize_with = "lenient_option")]
    pub avatar_urls: Option<AvatarUrls>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Рубрика (`/wp/v2/categories`).
pub struct Category {
    /// Идентификатор.
    pub id: u64,
    /// Название.
    pub name: String,
    /// Slug.
    pub slug: String,
    /// Количество опубликованных записей.
    #[serde(default)]
    pub count: u64,
    /// Описание.
    #[serde(default)]
    pub description: Option<String>,
    /// Ссылка на архив рубрики.
    #[serde(default)]
    pub link: Option<String>,
    /// Таксономия (`category`).
    #[serde(default)]
    pub taxonomy: Option<String>,
    /// Родительская рубрика, 0 для верхнего уровня.
    #[serde(default)]
    pub parent: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Метка (`/wp/v2/tags`).
pub struct Tag {
    /// Идентификатор.
    pub id: u64,
    /// Название.
    pub name: String,
    /// Slug.
    pub slug: String,
    /// Количество опубликованных записей.
    #[serde(default)]
    pub count: u64,
    /// Описание.
    #[serde(default)]
    pub description: Option<String>,
    /// Ссылка на архив метки.
    #[serde(default)]
    pub link: Option<String>,
    /// Таксономия (`post_tag`).
    #[serde(default)]
    pub taxonomy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Термин таксономии из встроенного пакета `wp:term`.
///
/// Наличие `parent` отличает рубрику от метки.
pub struct Term {
    /// Идентификатор.
    pub id: u64,
    /// Название.
    #[serde(default)]
    pub name: String,
    /// Slug.
    #[serde(default)]
    pub slug: String,
    /// Таксономия.
    #[serde(default)]
    pub taxonomy: Option<String>,
    /// Ссылка на архив.
    #[serde(default)]
    pub link: Option<String>,
    /// Количество записей.
    #[serde(default)]
    pub count: Option<u64>,
    /// Родитель (только у рубрик).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Встроенный пакет связанных сущностей (`_embedded`).
///
/// Элементы, которые не удалось разобрать (например, объекты ошибок
/// `rest_forbidden` вместо медиафайла), отбрасываются.
pub struct Embedded {
    /// `wp:featuredmedia`
    #[serde(
        rename = "wp:featuredmedia",
        default,
        deserialize_with = "lenient_vec"
    )]
    pub featured_media: Vec<Media>,
    /// `author`
    #[serde(default, deserialize_with = "lenient_vec")]
    pub author: Vec<User>,
    /// `wp:term`: по массиву на каждую таксономию.
    #[serde(rename = "wp:term", default, deserialize_with = "lenient_nested_vec")]
    pub terms: Vec<Vec<Term>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Запись блога (`/wp/v2/posts`).
pub struct Post {
    /// Идентификатор записи.
    pub id: u64,
    /// Slug.
    #[serde(default)]
    pub slug: String,
    /// Заголовок.
    #[serde(default)]
    pub title: Rendered,
    /// Анонс.
    #[serde(default)]
    pub excerpt: Option<RenderedContent>,
    /// Содержимое.
    #[serde(default)]
    pub content: Option<RenderedContent>,
    /// Дата публикации в часовом поясе сайта (`2024-01-05T15:04:05`).
    #[serde(default)]
    pub date: String,
    /// Идентификатор автора.
    #[serde(default)]
    pub author: u64,
    /// Идентификатор миниатюры, 0 если её нет.
    #[serde(default)]
    pub featured_media: u64,
    /// Рубрики.
    #[serde(default)]
    pub categories: Vec<u64>,
    /// Метки.
    #[serde(default)]
    pub tags: Vec<u64>,
    /// Закреплена ли запись.
    #[serde(default)]
    pub sticky: Option<bool>,
    /// Формат записи (`standard`, `gallery`, ...).
    #[serde(default)]
    pub format: Option<String>,
    /// Постоянная ссылка.
    #[serde(default)]
    pub link: Option<String>,
    /// Статус публикации.
    #[serde(default)]
    pub status: Option<String>,
    /// Встроенные связанные сущности.
    #[serde(rename = "_embedded", default, skip_serializing_if = "Option::is_none")]
    pub embedded: Option<Embedded>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Страница (`/wp/v2/pages`).
pub struct Page {
    /// Идентификатор страницы.
    pub id: u64,
    /// Slug.
    #[serde(default)]
    pub slug: String,
    /// Заголовок.
    #[serde(default)]
    pub title: Rendered,
    /// Анонс.
    #[serde(default)]
    pub excerpt: Option<RenderedContent>,
    /// Содержимое.
    #[serde(default)]
    pub content: Option<RenderedContent>,
    /// Дата публикации.
    #[serde(default)]
    pub date: String,
    /// Идентификатор автора.
    #[serde(default)]
    pub author: u64,
    /// Идентификатор миниатюры, 0 если её нет.
    #[serde(default)]
    pub featured_media: u64,
    /// Родительская страница.
    #[serde(default)]
    pub parent: u64,
    /// Порядок в меню.
    #[serde(default)]
    pub menu_order: i64,
    /// Постоянная ссылка.
    #[serde(default)]
    pub link: Option<String>,
    /// Статус публикации.
    #[serde(default)]
    pub status: Option<String>,
    /// Встроенные связанные сущности.
    #[serde(rename = "_embedded", default, skip_serializing_if = "Option::is_none")]
    pub embedded: Option<Embedded>,
}

/// Общие поля записей и страниц, нужные резолверу изображений и хелперам.
pub trait ContentItem {
    /// Идентификатор.
    fn id(&self) -> u64;
    /// HTML заголовка.
    fn title(&self) -> &str;
    /// Ссылка на миниатюру, 0 если её нет.
    fn featured_media(&self) -> u64;
    /// Встроенный пакет, если сервер его прислал.
    fn embedded(&self) -> Option<&Embedded>;
    /// Дата публикации (сырая строка).
    fn date(&self) -> &str;
    /// HTML анонса.
    fn excerpt(&self) -> &str;

    /// Первый встроенный медиафайл.
    fn embedded_media(&self) -> Option<&Media> {
        self.embedded()?.featured_media.first()
    }

    /// Дата публикации, разобранная как локальное время сайта.
    fn published_at(&self) -> Option<NaiveDateTime> {
        crate::helpers::parse_wp_date(self.date())
    }
}

impl ContentItem for Post {
    fn id(&self) -> u64 {
        self.id
    }

    fn title(&self) -> &str {
        &self.title.rendered
    }

    fn featured_media(&self) -> u64 {
        self.featured_media
    }

    fn embedded(&self) -> Option<&Embedded> {
        self.embedded.as_ref()
    }

    fn date(&self) -> &str {
        &self.date
    }

    fn excerpt(&self) -> &str {
        self.excerpt
            .as_ref()
            .map(|excerpt| excerpt.rendered.as_str())
            .unwrap_or_default()
    }
}

impl ContentItem for Page {
    fn id(&self) -> u64 {
        self.id
    }

    fn title(&self) -> &str {
        &self.title.rendered
    }

    fn featured_media(&self) -> u64 {
        self.featured_media
    }

    fn embedded(&self) -> Option<&Embedded> {
        self.embedded.as_ref()
    }

    fn date(&self) -> &str {
        &self.date
    }

    fn excerpt(&self) -> &str {
        self.excerpt
            .as_ref()
            .map(|excerpt| excerpt.rendered.as_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Комментарий (`/wp/v2/comments`).
pub struct Comment {
    /// Идентификатор.
    pub id: u64,
    /// Запись, к которой относится комментарий.
    #[serde(default)]
    pub post: u64,
    /// Родительский комментарий, 0 для верхнего уровня.
    #[serde(default)]
    pub parent: u64,
    /// Идентификатор зарегистрированного автора, 0 для гостя.
    #[serde(default)]
    pub author: u64,
    /// Имя автора.
    #[serde(default)]
    pub author_name: String,
    /// Сайт автора.
    #[serde(default)]
    pub author_url: Option<String>,
    /// Дата.
    #[serde(default)]
    pub date: String,
    /// Текст комментария.
    #[serde(default)]
    pub content: Rendered,
    /// Ссылка на комментарий.
    #[serde(default)]
    pub link: Option<String>,
    /// Статус модерации (`approved`, `hold`, ...).
    #[serde(default)]
    pub status: Option<String>,
    /// Тип комментария.
    #[serde(rename = "type", default)]
    pub comment_type: Option<String>,
    /// Аватары автора.
    #[serde(default, deserialize_with = "lenient_option")]
    pub author_avatar_urls: Option<AvatarUrls>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Новый комментарий, отправляемый на модерацию.
pub struct NewComment {
    /// Запись.
    pub post: u64,
    /// Имя автора.
    pub author_name: String,
    /// Email автора.
    pub author_email: String,
    /// Сайт автора (может быть пустым).
    #[serde(default)]
    pub author_url: String,
    /// Текст.
    pub content: String,
    /// Родительский комментарий, 0 для ответа на запись.
    #[serde(default)]
    pub parent: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Облегчённый результат поиска (`/wp/v2/search`).
pub struct SearchResult {
    /// Идентификатор найденного объекта.
    pub id: u64,
    /// Заголовок.
    #[serde(default)]
    pub title: String,
    /// URL.
    #[serde(default)]
    pub url: String,
    /// Тип объекта (`post`, `term`, `post-format`).
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Подтип (`post`, `page`, `category`, ...).
    #[serde(default)]
    pub subtype: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Описание таксономии (`/wp/v2/taxonomies`).
pub struct Taxonomy {
    /// Название.
    pub name: String,
    /// Slug.
    pub slug: String,
    /// Описание.
    #[serde(default)]
    pub description: String,
    /// Типы записей, к которым применима таксономия.
    #[serde(default)]
    pub types: Vec<String>,
    /// Иерархическая ли таксономия.
    #[serde(default)]
    pub hierarchical: bool,
    /// Сегмент REST-маршрута.
    #[serde(default)]
    pub rest_base: Option<String>,
    /// Пространство имён REST.
    #[serde(default)]
    pub rest_namespace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Описание типа записей (`/wp/v2/types`).
pub struct PostType {
    /// Название.
    pub name: String,
    /// Slug.
    pub slug: String,
    /// Описание.
    #[serde(default)]
    pub description: String,
    /// Иерархический ли тип.
    #[serde(default)]
    pub hierarchical: bool,
    /// Поддерживаемые таксономии.
    #[serde(default)]
    pub taxonomies: Vec<String>,
    /// Сегмент REST-маршрута.
    #[serde(default)]
    pub rest_base: Option<String>,
    /// Пространство имён REST.
    #[serde(default)]
    pub rest_namespace: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Настройки сайта (`/wp/v2/settings`). Все поля необязательны: без
/// авторизации сервер может вернуть лишь часть из них.
pub struct Settings {
    /// Название сайта.
    #[serde(default)]
    pub title: Option<String>,
    /// Краткое описание.
    #[serde(default)]
    pub description: Option<String>,
    /// URL сайта.
    #[serde(default)]
    pub url: Option<String>,
    /// Email администратора.
    #[serde(default)]
    pub email: Option<String>,
    /// Часовой пояс.
    #[serde(default)]
    pub timezone: Option<String>,
    /// Формат даты.
    #[serde(default)]
    pub date_format: Option<String>,
    /// Формат времени.
    #[serde(default)]
    pub time_format: Option<String>,
    /// Первый день недели.
    #[serde(default)]
    pub start_of_week: Option<u8>,
    /// Язык.
    #[serde(default)]
    pub language: Option<String>,
    /// Рубрика по умолчанию.
    #[serde(default)]
    pub default_category: Option<u64>,
    /// Формат записи по умолчанию.
    #[serde(default)]
    pub default_post_format: Option<String>,
    /// Записей на странице.
    #[serde(default)]
    pub posts_per_page: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Запись вместе со связанными сущностями, загруженными отдельными запросами.
pub struct FullPostData {
    /// Сама запись.
    pub post: Post,
    /// Рубрики записи.
    pub categories: Vec<Category>,
    /// Метки записи.
    pub tags: Vec<Tag>,
    /// Автор.
    pub author: Option<User>,
    /// Одобренные комментарии.
    pub comments: Vec<Comment>,
}

fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect())
}

fn lenient_nested_vec<'de, D, T>(deserializer: D) -> Result<Vec<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|group| match group {
            serde_json::Value::Array(items) => items
                .into_iter()
                .filter_map(|value| serde_json::from_value(value).ok())
                .collect(),
            _ => Vec::new(),
        })
        .collect())
}

fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}
