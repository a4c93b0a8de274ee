//! Построение query-строк для эндпоинтов WordPress REST API.
//!
//! Каждая структура параметров отображает свои поля на фиксированные ключи.
//! `None` и пустые списки в запрос не попадают; булевы значения передаются
//! как `true`/`false` всегда, когда заданы.

use std::fmt;

/// Поля записи, которые использует клиент.
pub const POST_FIELDS: &str = "id,slug,title,excerpt,content,date,author,featured_media,categories,tags,sticky,format,link,status,_links,_embedded";
/// Связанные сущности, встраиваемые в записи.
pub const POST_EMBED: &str = "wp:featuredmedia,author,wp:term";
/// Поля страницы, которые использует клиент.
pub const PAGE_FIELDS: &str = "id,slug,title,excerpt,content,date,author,featured_media,parent,menu_order,link,status,_links,_embedded";
/// Связанные сущности, встраиваемые в страницы.
pub const PAGE_EMBED: &str = "wp:featuredmedia,author";
/// Статус по умолчанию для записей и страниц.
pub const DEFAULT_STATUS: &str = "publish";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Направление сортировки.
pub enum Order {
    /// По возрастанию.
    Asc,
    /// По убыванию.
    Desc,
}

impl Order {
    /// Значение параметра `order`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Упорядоченный набор параметров запроса.
pub struct Query {
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    /// Пустой запрос.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, key: &'static str, value: impl ToString) {
        self.pairs.push((key, value.to_string()));
    }

    fn push_opt<T: fmt::Display>(&mut self, key: &'static str, value: Option<&T>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    fn push_list<T: ToString>(&mut self, key: &'static str, values: &[T]) {
        if values.is_empty() {
            return;
        }
        let joined = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.push(key, joined);
    }

    fn push_content_defaults(&mut self, fields: &str, embed: &str, status: Option<&String>) {
        self.push("_fields", fields);
        self.push("_embed", embed);
        self.push("status", status.map(String::as_str).unwrap_or(DEFAULT_STATUS));
    }

    /// Значение параметра по ключу.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Присутствует ли ключ в запросе.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Пары ключ/значение в порядке добавления.
    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Пуст ли запрос.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Путь эндпоинта вместе с query-строкой (`posts?per_page=5`).
    pub fn with_path(&self, path: &str) -> String {
        if self.is_empty() {
            return path.to_string();
        }
        format!("{path}?{self}")
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (key, value)) in self.pairs.iter().enumerate() {
            if index > 0 {
                f.write_str("&")?;
            }
            write!(f, "{}={}", urlencoding::encode(key), urlencoding::encode(value))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Параметры `GET /posts`.
pub struct PostQuery {
    /// `per_page`
    pub per_page: Option<u32>,
    /// `page`
    pub page: Option<u32>,
    /// `search`
    pub search: Option<String>,
    /// `author`
    pub author: Option<u64>,
    /// `categories`
    pub categories: Vec<u64>,
    /// `tags`
    pub tags: Vec<u64>,
    /// `status`, по умолчанию `publish`.
    pub status: Option<String>,
    /// `orderby`
    pub orderby: Option<String>,
    /// `order`
    pub order: Option<Order>,
    /// `before` (ISO 8601).
    pub before: Option<String>,
    /// `after` (ISO 8601).
    pub after: Option<String>,
    /// `include`
    pub include: Vec<u64>,
    /// `exclude`
    pub exclude: Vec<u64>,
    /// `sticky`
    pub sticky: Option<bool>,
    /// `slug`
    pub slug: Vec<String>,
}

impl PostQuery {
    /// Последние `per_page` записей.
    pub fn latest(per_page: u32) -> Self {
        Self {
            per_page: Some(per_page),
            ..Self::default()
        }
    }

    /// Поиск опубликованной записи по slug.
    pub fn by_slug(slug: impl Into<String>) -> Self {
        Self {
            slug: vec![slug.into()],
            ..Self::default()
        }
    }

    /// Собирает query-строку.
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        query.push_content_defaults(POST_FIELDS, POST_EMBED, self.status.as_ref());
        query.push_opt("per_page", self.per_page.as_ref());
        query.push_opt("page", self.page.as_ref());
        query.push_opt("search", self.search.as_ref());
        query.push_opt("author", self.author.as_ref());
        query.push_list("categories", &self.categories);
        query.push_list("tags", &self.tags);
        query.push_list("include", &self.include);
        query.push_list("exclude", &self.exclude);
        query.push_opt("orderby", self.orderby.as_ref());
        query.push_opt("order", self.order.as_ref());
        query.push_opt("before", self.before.as_ref());
        query.push_opt("after", self.after.as_ref());
        query.push_opt("sticky", self.sticky.as_ref());
        query.push_list("slug", &self.slug);
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Параметры `GET /pages`.
pub struct PageQuery {
    /// `per_page`
    pub per_page: Option<u32>,
    /// `page`
    pub page: Option<u32>,
    /// `search`
    pub search: Option<String>,
    /// `author`
    pub author: Option<u64>,
    /// `parent`
    pub parent: Option<u64>,
    /// `status`, по умолчанию `publish`.
    pub status: Option<String>,
    /// `orderby`
    pub orderby: Option<String>,
    /// `order`
    pub order: Option<Order>,
    /// `include`
    pub include: Vec<u64>,
    /// `exclude`
    pub exclude: Vec<u64>,
    /// `slug`
    pub slug: Vec<String>,
}

impl PageQuery {
    /// Поиск опубликованной страницы по slug.
    pub fn by_slug(slug: impl Into<String>) -> Self {
        Self {
            slug: vec![slug.into()],
            ..Self::default()
        }
    }

    /// Собирает query-строку.
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        query.push_content_defaults(PAGE_FIELDS, PAGE_EMBED, self.status.as_ref());
        query.push_opt("per_page", self.per_page.as_ref());
        query.push_opt("page", self.page.as_ref());
        query.push_opt("search", self.search.as_ref());
        query.push_opt("author", self.author.as_ref());
        query.push_opt("parent", self.parent.as_ref());
        query.push_list("include", &self.include);
        query.push_list("exclude", &self.exclude);
        query.push_opt("orderby", self.orderby.as_ref());
        query.push_opt("order", self.order.as_ref());
        query.push_list("slug", &self.slug);
        query
    }
}

/// Проекция и встраивание для `GET /posts/{id}`.
pub fn single_post_query() -> Query {
    let mut query = Query::new();
    query.push("_fields", POST_FIELDS);
    query.push("_embed", POST_EMBED);
    query
}

/// Проекция и встраивание для `GET /pages/{id}`.
pub fn single_page_query() -> Query {
    let mut query = Query::new();
    query.push("_fields", PAGE_FIELDS);
    query.push("_embed", PAGE_EMBED);
    query
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Параметры `GET /media`.
pub struct MediaQuery {
    /// `per_page`
    pub per_page: Option<u32>,
    /// `page`
    pub page: Option<u32>,
    /// `search`
    pub search: Option<String>,
    /// `author`
    pub author: Option<u64>,
    /// `parent`
    pub parent: Option<u64>,
    /// `media_type`
    pub media_type: Option<String>,
    /// `mime_type`
    pub mime_type: Option<String>,
    /// `orderby`
    pub orderby: Option<String>,
    /// `order`
    pub order: Option<Order>,
    /// `include`
    pub include: Vec<u64>,
    /// `exclude`
    pub exclude: Vec<u64>,
}

impl MediaQuery {
    /// Собирает query-строку.
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        query.push_opt("per_page", self.per_page.as_ref());
        query.push_opt("page", self.page.as_ref());
        query.push_opt("search", self.search.as_ref());
        query.push_opt("author", self.author.as_ref());
        query.push_opt("parent", self.parent.as_ref());
        query.push_opt("media_type", self.media_type.as_ref());
        query.push_opt("mime_type", self.mime_type.as_ref());
        query.push_list("include", &self.include);
        query.push_list("exclude", &self.exclude);
        query.push_opt("orderby", self.orderby.as_ref());
        query.push_opt("order", self.order.as_ref());
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Параметры `GET /categories`.
pub struct CategoryQuery {
    /// `per_page`
    pub per_page: Option<u32>,
    /// `page`
    pub page: Option<u32>,
    /// `search`
    pub search: Option<String>,
    /// `parent`
    pub parent: Option<u64>,
    /// `orderby`
    pub orderby: Option<String>,
    /// `order`
    pub order: Option<Order>,
    /// `hide_empty`
    pub hide_empty: Option<bool>,
    /// `include`
    pub include: Vec<u64>,
    /// `exclude`
    pub exclude: Vec<u64>,
    /// `slug`
    pub slug: Vec<String>,
}

impl CategoryQuery {
    /// Собирает query-строку.
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        query.push_opt("per_page", self.per_page.as_ref());
        query.push_opt("page", self.page.as_ref());
        query.push_opt("search", self.search.as_ref());
        query.push_opt("parent", self.parent.as_ref());
        query.push_opt("orderby", self.orderby.as_ref());
        query.push_opt("order", self.order.as_ref());
        query.push_opt("hide_empty", self.hide_empty.as_ref());
        query.push_list("include", &self.include);
        query.push_list("exclude", &self.exclude);
        query.push_list("slug", &self.slug);
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Параметры `GET /tags`.
pub struct TagQuery {
    /// `per_page`
    pub per_page: Option<u32>,
    /// `page`
    pub page: Option<u32>,
    /// `search`
    pub search: Option<String>,
    /// `orderby`
    pub orderby: Option<String>,
    /// `order`
    pub order: Option<Order>,
    /// `hide_empty`
    pub hide_empty: Option<bool>,
    /// `include`
    pub include: Vec<u64>,
    /// `exclude`
    pub exclude: Vec<u64>,
    /// `slug`
    pub slug: Vec<String>,
}

impl TagQuery {
    /// Собирает query-строку.
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        query.push_opt("per_page", self.per_page.as_ref());
        query.push_opt("page", self.page.as_ref());
        query.push_opt("search", self.search.as_ref());
        query.push_opt("orderby", self.orderby.as_ref());
        query.push_opt("order", self.order.as_ref());
        query.push_opt("hide_empty", self.hide_empty.as_ref());
        query.push_list("include", &self.include);
        query.push_list("exclude", &self.exclude);
        query.push_list("slug", &self.slug);
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Параметры `GET /users`.
pub struct UserQuery {
    /// `per_page`
    pub per_page: Option<u32>,
    /// `page`
    pub page: Option<u32>,
    /// `search`
    pub search: Option<String>,
    /// `roles`
    pub roles: Vec<String>,
    /// `orderby`
    pub orderby: Option<String>,
    /// `order`
    pub order: Option<Order>,
    /// `include`
    pub include: Vec<u64>,
    /// `exclude`
    pub exclude: Vec<u64>,
    /// `slug`
    pub slug: Vec<String>,
}

impl UserQuery {
    /// Собирает query-строку.
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        query.push_opt("per_page", self.per_page.as_ref());
        query.push_opt("page", self.page.as_ref());
        query.push_opt("search", self.search.as_ref());
        query.push_list("roles", &self.roles);
        query.push_opt("orderby", self.orderby.as_ref());
        query.push_opt("order", self.order.as_ref());
        query.push_list("include", &self.include);
        query.push_list("exclude", &self.exclude);
        query.push_list("slug", &self.slug);
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Параметры `GET /comments`.
pub struct CommentQuery {
    /// `per_page`
    pub per_page: Option<u32>,
    /// `page`
    pub page: Option<u32>,
    /// `search`
    pub search: Option<String>,
    /// `author`
    pub author: Option<u64>,
    /// `post`
    pub post: Option<u64>,
    /// `parent`
    pub parent: Option<u64>,
    /// `status`
    pub status: Option<String>,
    /// `type`
    pub comment_type: Option<String>,
    /// `orderby`
    pub orderby: Option<String>,
    /// `order`
    pub order: Option<Order>,
    /// `include`
    pub include: Vec<u64>,
    /// `exclude`
    pub exclude: Vec<u64>,
}

impl CommentQuery {
    /// Одобренные комментарии записи в хронологическом порядке.
    pub fn approved_for_post(post_id: u64) -> Self {
        Self {
            post: Some(post_id),
            per_page: Some(100),
            order: Some(Order::Asc),
            status: Some("approve".to_string()),
            ..Self::default()
        }
    }

    /// Собирает query-строку.
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        query.push_opt("per_page", self.per_page.as_ref());
        query.push_opt("page", self.page.as_ref());
        query.push_opt("search", self.search.as_ref());
        query.push_opt("author", self.author.as_ref());
        query.push_opt("post", self.post.as_ref());
        query.push_opt("parent", self.parent.as_ref());
        query.push_opt("status", self.status.as_ref());
        query.push_opt("type", self.comment_type.as_ref());
        query.push_opt("orderby", self.orderby.as_ref());
        query.push_opt("order", self.order.as_ref());
        query.push_list("include", &self.include);
        query.push_list("exclude", &self.exclude);
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Параметры `GET /taxonomies`.
pub struct TaxonomyQuery {
    /// `type`: только таксономии этого типа записей.
    pub post_type: Option<String>,
}

impl TaxonomyQuery {
    /// Собирает query-строку.
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        query.push_opt("type", self.post_type.as_ref());
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Параметры `GET /search`.
pub struct SearchQuery {
    /// `search`; пустая строка в запрос не попадает.
    pub search: String,
    /// `type` (`post`, `term`, `post-format`).
    pub kind: Option<String>,
    /// `subtype`
    pub subtype: Option<String>,
    /// `per_page`
    pub per_page: Option<u32>,
    /// `page`
    pub page: Option<u32>,
}

impl SearchQuery {
    /// Поиск по строке без дополнительных фильтров.
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..Self::default()
        }
    }

    /// Собирает query-строку.
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        if !self.search.is_empty() {
            query.push("search", &self.search);
        }
        query.push_opt("type", self.kind.as_ref());
        query.push_opt("subtype", self.subtype.as_ref());
        query.push_opt("per_page", self.per_page.as_ref());
        query.push_opt("page", self.page.as_ref());
        query
    }
}
