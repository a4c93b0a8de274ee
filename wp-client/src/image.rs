//! Выбор URL изображения записи или страницы.
//!
//! Порядок: запрошенный размер встроенного медиафайла, затем размеры из
//! [`ImageSize::FALLBACK_ORDER`], затем канонический `source_url`. Если
//! встроенного медиафайла нет, но у записи есть `featured_media`, асинхронный
//! путь один раз запрашивает `media/{id}` и повторяет те же шаги.

use futures::future::join_all;
use tracing::debug;

use crate::WpClient;
use crate::helpers::strip_html;
use crate::models::{ContentItem, ImageSize, Media};

/// URL изображения медиафайла с учётом цепочки запасных размеров.
pub fn media_image_url(media: &Media, size: ImageSize) -> Option<&str> {
    if let Some(url) = media.size_url(size) {
        debug!(media_id = media.id, size = size.as_str(), "using requested size");
        return Some(url);
    }

    for fallback in ImageSize::FALLBACK_ORDER {
        if let Some(url) = media.size_url(fallback) {
            debug!(media_id = media.id, size = fallback.as_str(), "using fallback size");
            return Some(url);
        }
    }

    let url = media.canonical_url();
    if url.is_some() {
        debug!(media_id = media.id, "using source_url");
    }
    url
}

/// Синхронный путь: только встроенный медиафайл, без сетевых запросов.
pub fn featured_image_url<T: ContentItem + ?Sized>(item: &T, size: ImageSize) -> Option<&str> {
    let Some(media) = item.embedded_media() else {
        debug!(
            item_id = item.id(),
            featured_media = item.featured_media(),
            "no embedded featured media"
        );
        return None;
    };
    media_image_url(media, size)
}

/// Alt-текст: alt медиафайла, затем его заголовок, затем заголовок записи
/// без разметки.
pub fn featured_image_alt<T: ContentItem + ?Sized>(item: &T) -> String {
    let media = item.embedded_media();

    let alt = media
        .and_then(|media| media.alt_text.as_deref())
        .filter(|alt| !alt.is_empty());
    if let Some(alt) = alt {
        return alt.to_string();
    }

    let title = media
        .and_then(|media| media.title.as_ref())
        .map(|title| title.rendered.as_str())
        .filter(|title| !title.is_empty());
    if let Some(title) = title {
        return title.to_string();
    }

    strip_html(item.title())
}

/// Есть ли у записи миниатюра, доступная без дополнительного запроса.
pub fn has_featured_image<T: ContentItem + ?Sized>(item: &T) -> bool {
    item.featured_media() != 0 && item.embedded_media().is_some()
}

impl WpClient {
    /// URL изображения записи или страницы.
    ///
    /// Если встроенного медиафайла нет, но `featured_media` не равен нулю,
    /// выполняет один запрос `media/{id}`.
    pub async fn resolve_image_url<T>(&self, item: &T, size: ImageSize) -> Option<String>
    where
        T: ContentItem + Sync + ?Sized,
    {
        if let Some(url) = featured_image_url(item, size) {
            return Some(url.to_string());
        }

        let media_id = item.featured_media();
        if media_id == 0 {
            return None;
        }

        debug!(item_id = item.id(), media_id, "attempting direct media fetch");
        let media = self.get_media(media_id).await?;
        media_image_url(&media, size).map(str::to_string)
    }

    /// Разрешает изображения для списка записей параллельно.
    ///
    /// Результат идёт в том же порядке, что и `items`.
    pub async fn resolve_image_urls<T>(&self, items: &[T], size: ImageSize) -> Vec<Option<String>>
    where
        T: ContentItem + Sync,
    {
        join_all(items.iter().map(|item| self.resolve_image_url(item, size))).await
    }
}
