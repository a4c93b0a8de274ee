//! Чистые функции над уже загруженными данными. Ничего не запрашивают и
//! никогда не падают: при отсутствии данных возвращают пустую строку,
//! пустой список или строку-заглушку.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Comment, ContentItem, Post, Term};

/// Длина анонса по умолчанию, в символах.
pub const DEFAULT_TRUNCATE_LENGTH: usize = 150;
/// Имя автора, если встроенный профиль отсутствует.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static SLUG_DISALLOWED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9 -]").expect("valid slug regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static HYPHENS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("valid hyphen regex"));

/// Удаляет HTML-теги (`<...>`). Сущности вроде `&amp;` не декодируются.
pub fn strip_html(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

/// Обрезает текст до `length` символов и добавляет `...`.
///
/// Текст не длиннее бюджета возвращается без изменений.
pub fn truncate_text(text: &str, length: usize) -> String {
    if text.chars().count() <= length {
        return text.to_string();
    }
    let prefix: String = text.chars().take(length).collect();
    format!("{}...", prefix.trim())
}

/// Анонс в виде простого текста, при необходимости обрезанный.
pub fn excerpt_text(excerpt: &str, length: Option<usize>) -> String {
    let plain = strip_html(excerpt);
    match length {
        Some(length) => truncate_text(&plain, length),
        None => plain,
    }
}

/// Разбирает дату WordPress: `2024-01-05T15:04:05`, RFC 3339 или `2024-01-05`.
pub fn parse_wp_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(date);
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.naive_local());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Дата в формате `January 5, 2024`.
pub fn format_date(raw: &str) -> String {
    parse_wp_date(raw)
        .map(|date| date.format("%B %-d, %Y").to_string())
        .unwrap_or_default()
}

/// Дата и время в формате `January 5, 2024 at 3:04 PM`.
pub fn format_date_time(raw: &str) -> String {
    parse_wp_date(raw)
        .map(|date| date.format("%B %-d, %Y at %-I:%M %p").to_string())
        .unwrap_or_default()
}

/// Относительное время («5 minutes ago») относительно `now`.
///
/// Даты из будущего считаются только что опубликованными.
pub fn relative_time(raw: &str, now: NaiveDateTime) -> String {
    let Some(date) = parse_wp_date(raw) else {
        return String::new();
    };

    let seconds = (now - date).num_seconds();
    match seconds {
        s if s < 60 => "Just now".to_string(),
        s if s < 3_600 => format!("{} minutes ago", s / 60),
        s if s < 86_400 => format!("{} hours ago", s / 3_600),
        s if s < 2_592_000 => format!("{} days ago", s / 86_400),
        s if s < 31_536_000 => format!("{} months ago", s / 2_592_000),
        s => format!("{} years ago", s / 31_536_000),
    }
}

/// Slug из произвольной строки: `"Hello, World!"` → `hello-world`.
pub fn generate_slug(text: &str) -> String {
    let lower = text.to_lowercase();
    let cleaned = SLUG_DISALLOWED_RE.replace_all(&lower, "");
    let dashed = WHITESPACE_RE.replace_all(&cleaned, "-");
    HYPHENS_RE.replace_all(&dashed, "-").trim().to_string()
}

/// Имя автора из встроенного пакета или `Unknown Author`.
pub fn author_name<T: ContentItem + ?Sized>(item: &T) -> &str {
    item.embedded()
        .and_then(|embedded| embedded.author.first())
        .map(|author| author.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_AUTHOR)
}

/// Рубрики записи: элементы первого массива `wp:term`, у которых есть `parent`.
pub fn post_categories(post: &Post) -> Vec<&Term> {
    post.embedded
        .as_ref()
        .and_then(|embedded| embedded.terms.first())
        .map(|terms| terms.iter().filter(|term| term.parent.is_some()).collect())
        .unwrap_or_default()
}

/// Метки записи: элементы всех массивов `wp:term` без `parent`.
pub fn post_tags(post: &Post) -> Vec<&Term> {
    post.embedded
        .as_ref()
        .map(|embedded| {
            embedded
                .terms
                .iter()
                .flatten()
                .filter(|term| term.parent.is_none())
                .collect()
        })
        .unwrap_or_default()
}

/// Закреплена ли запись.
pub fn is_sticky(post: &Post) -> bool {
    post.sticky.unwrap_or(false)
}

/// Совпадает ли формат записи с `format`.
pub fn has_post_format(post: &Post, format: &str) -> bool {
    post.format.as_deref() == Some(format)
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Узел дерева комментариев.
pub struct CommentNode<'a> {
    /// Комментарий.
    pub comment: &'a Comment,
    /// Ответы на него.
    pub replies: Vec<CommentNode<'a>>,
}

/// Строит дерево комментариев по ссылкам `parent` (0 = верхний уровень).
///
/// Порядок внутри уровня совпадает с порядком во входном списке.
pub fn comment_tree(comments: &[Comment]) -> Vec<CommentNode<'_>> {
    replies_to(comments, 0)
}

fn replies_to(comments: &[Comment], parent: u64) -> Vec<CommentNode<'_>> {
    comments
        .iter()
        .filter(|comment| comment.parent == parent && comment.id != comment.parent)
        .map(|comment| CommentNode {
            comment,
            replies: replies_to(comments, comment.id),
        })
        .collect()
}
