mod logging;

use std::process;

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::debug;
use wp_client::helpers::{
    CommentNode, author_name, comment_tree, excerpt_text, format_date, post_categories, post_tags,
    relative_time, strip_html,
};
use wp_client::{
    BatchKey, BatchRequest, BatchResults, CategoryQuery, ClientConfig, FullPostData, ImageSize,
    NewComment, PageQuery, Post, PostQuery, SearchQuery, Settings, TagQuery, WpClient, WpError,
    featured_image_alt, featured_image_url,
};

const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Parser)]
#[command(name = "wp-cli", version, about = "CLI для проверки WordPress REST API")]
struct Cli {
    /// Адрес WordPress (по умолчанию WP_API_BASE или http://localhost:8884).
    #[arg(long, global = true)]
    server: Option<String>,

    /// Уровень логирования, если не задан RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Список записей.
    Posts {
        #[arg(long, default_value_t = 10)]
        per_page: u32,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        search: Option<String>,
        /// Идентификаторы рубрик через запятую.
        #[arg(long, value_delimiter = ',')]
        categories: Vec<u64>,
        /// Идентификаторы меток через запятую.
        #[arg(long, value_delimiter = ',')]
        tags: Vec<u64>,
        /// Фильтр по закреплению: true или false.
        #[arg(long)]
        sticky: Option<bool>,
    },
    /// Запись со связанными данными по slug или id.
    Post {
        #[arg(long, conflicts_with = "id", required_unless_present = "id")]
        slug: Option<String>,
        #[arg(long)]
        id: Option<u64>,
    },
    /// Список страниц.
    Pages {
        #[arg(long, default_value_t = 10)]
        per_page: u32,
        #[arg(long)]
        parent: Option<u64>,
    },
    /// Список рубрик.
    Categories {
        #[arg(long, default_value_t = 20)]
        per_page: u32,
        /// Скрыть рубрики без записей.
        #[arg(long)]
        hide_empty: bool,
    },
    /// Список меток.
    Tags {
        #[arg(long, default_value_t = 20)]
        per_page: u32,
    },
    /// Поиск по всему контенту.
    Search {
        term: String,
        /// Подтип: post, page, category, ...
        #[arg(long)]
        subtype: Option<String>,
        #[arg(long, default_value_t = 10)]
        per_page: u32,
    },
    /// Проверка миниатюр: встроенный медиафайл против прямого запроса.
    MediaCheck {
        #[arg(long, default_value_t = 5)]
        per_page: u32,
        /// thumbnail, medium, medium_large, large, full.
        #[arg(long, default_value = "medium")]
        size: ImageSize,
    },
    /// Параллельная загрузка записей, страниц, рубрик и меток.
    Batch {
        #[arg(long, default_value_t = 5)]
        per_page: u32,
    },
    /// Настройки сайта.
    Settings,
    /// Отправка комментария на модерацию.
    Comment {
        #[arg(long)]
        post: u64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        content: String,
        /// Ответ на комментарий с этим id.
        #[arg(long, default_value_t = 0)]
        parent: u64,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = resolve_log_level(cli.log_level);
    logging::init_logging(&log_level)?;

    let config = resolve_config(cli.server)?;
    let client = WpClient::new(config).map_err(map_client_error)?;
    debug!(api_url = %client.api_url(), "client ready");

    match cli.command {
        Command::Posts {
            per_page,
            page,
            search,
            categories,
            tags,
            sticky,
        } => {
            let query = PostQuery {
                per_page: Some(per_page),
                page,
                search,
                categories,
                tags,
                sticky,
                ..PostQuery::default()
            };
            let posts = client.list_posts(&query).await;
            println!("Записей: {}", posts.len());
            for post in &posts {
                print_post_line(post);
            }
        }
        Command::Post { slug, id } => {
            let id = match (id, slug) {
                (Some(id), _) => id,
                (None, Some(slug)) => {
                    client
                        .get_post_by_slug(&slug)
                        .await
                        .ok_or_else(|| anyhow!("запись со slug `{slug}` не найдена"))?
                        .id
                }
                (None, None) => return Err(anyhow!("укажите --slug или --id")),
            };
            let data = client
                .full_post_data(id)
                .await
                .ok_or_else(|| anyhow!("запись id={id} не найдена"))?;
            print_full_post(&data);
        }
        Command::Pages { per_page, parent } => {
            let query = PageQuery {
                per_page: Some(per_page),
                parent,
                ..PageQuery::default()
            };
            let pages = client.list_pages(&query).await;
            println!("Страниц: {}", pages.len());
            for page in &pages {
                println!(
                    "- [{}] {} (/{}, parent={})",
                    page.id,
                    strip_html(&page.title.rendered),
                    page.slug,
                    page.parent
                );
            }
        }
        Command::Categories {
            per_page,
            hide_empty,
        } => {
            let query = CategoryQuery {
                per_page: Some(per_page),
                hide_empty: hide_empty.then_some(true),
                ..CategoryQuery::default()
            };
            let categories = client.list_categories(&query).await;
            println!("Рубрик: {}", categories.len());
            for category in &categories {
                println!(
                    "- [{}] {} ({}, записей: {})",
                    category.id, category.name, category.slug, category.count
                );
            }
        }
        Command::Tags { per_page } => {
            let query = TagQuery {
                per_page: Some(per_page),
                ..TagQuery::default()
            };
            let tags = client.list_tags(&query).await;
            println!("Меток: {}", tags.len());
            for tag in &tags {
                println!("- [{}] {} ({}, записей: {})", tag.id, tag.name, tag.slug, tag.count);
            }
        }
        Command::Search {
            term,
            subtype,
            per_page,
        } => {
            let query = SearchQuery {
                subtype,
                per_page: Some(per_page),
                ..SearchQuery::new(term)
            };
            let results = client.search(&query).await;
            println!("Найдено: {}", results.len());
            for result in &results {
                println!(
                    "- [{}] {} ({}/{}) {}",
                    result.id,
                    strip_html(&result.title),
                    result.kind,
                    result.subtype,
                    result.url
                );
            }
        }
        Command::MediaCheck { per_page, size } => {
            let posts = client.list_posts(&PostQuery::latest(per_page)).await;
            let resolved = client.resolve_image_urls(&posts, size).await;
            println!("Проверка миниатюр ({}), записей: {}", size.as_str(), posts.len());
            for (post, url) in posts.iter().zip(&resolved) {
                print_media_check(post, size, url.as_deref());
            }
        }
        Command::Batch { per_page } => {
            let request = BatchRequest {
                posts: Some(PostQuery::latest(per_page)),
                pages: Some(PageQuery {
                    per_page: Some(per_page),
                    ..PageQuery::default()
                }),
                categories: Some(CategoryQuery::default()),
                tags: Some(TagQuery::default()),
                ..BatchRequest::default()
            };
            let results = client.fetch_many(&request).await;
            print_batch(&request, &results);
        }
        Command::Settings => {
            let settings = client.settings().await;
            print_settings(&settings);
        }
        Command::Comment {
            post,
            name,
            email,
            url,
            content,
            parent,
        } => {
            let comment = NewComment {
                post,
                author_name: name,
                author_email: email,
                author_url: url.unwrap_or_default(),
                content,
                parent,
            };
            let created = client
                .submit_comment(&comment)
                .await
                .map_err(map_client_error)?;
            println!(
                "Комментарий отправлен: id={}, статус={}",
                created.id,
                created.status.as_deref().unwrap_or("hold")
            );
        }
    }

    Ok(())
}

fn resolve_log_level(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var("LOG_LEVEL").ok())
        .filter(|level| !level.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

fn resolve_config(server: Option<String>) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env()
        .map_err(map_client_error)
        .context("не удалось прочитать настройки WP_*")?;
    if let Some(server) = server {
        config.base_url = normalize_server(server);
        config.validate().map_err(map_client_error)?;
    }
    Ok(config)
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn map_client_error(err: WpError) -> anyhow::Error {
    let message = match err {
        WpError::NotFound => "ресурс не найден".to_string(),
        WpError::Status { status, message } => {
            format!("сервер ответил {status}: {message}")
        }
        WpError::UnexpectedContentType(content_type) => {
            format!("сервер вернул не JSON (content-type: {content_type})")
        }
        WpError::Decode(err) => format!("не удалось разобрать ответ: {err}"),
        WpError::Http(err) => format!("ошибка HTTP: {err}"),
        WpError::Config(message) => format!("некорректная конфигурация: {message}"),
    };
    anyhow!(message)
}

fn print_post_line(post: &Post) {
    let sticky = if post.sticky.unwrap_or(false) { " *" } else { "" };
    println!(
        "- [{}] {}{} ({}, {})",
        post.id,
        strip_html(&post.title.rendered),
        sticky,
        format_date(&post.date),
        author_name(post)
    );
}

fn print_full_post(data: &FullPostData) {
    let post = &data.post;
    let now = Local::now().naive_local();

    println!("{}", strip_html(&post.title.rendered));
    println!("id: {}", post.id);
    println!("slug: {}", post.slug);
    println!("date: {} ({})", format_date(&post.date), relative_time(&post.date, now));
    match &data.author {
        Some(author) => println!("author: {}", author.name),
        None => println!("author: {}", author_name(post)),
    }
    if let Some(link) = &post.link {
        println!("link: {link}");
    }

    let categories = if data.categories.is_empty() {
        post_categories(post)
            .iter()
            .map(|term| term.name.clone())
            .collect::<Vec<_>>()
    } else {
        data.categories.iter().map(|category| category.name.clone()).collect()
    };
    let tags = if data.tags.is_empty() {
        post_tags(post).iter().map(|term| term.name.clone()).collect::<Vec<_>>()
    } else {
        data.tags.iter().map(|tag| tag.name.clone()).collect()
    };
    println!("categories: {}", categories.join(", "));
    println!("tags: {}", tags.join(", "));

    if let Some(url) = featured_image_url(post, ImageSize::Large) {
        println!("image: {url} (alt: {})", featured_image_alt(post));
    }

    let excerpt = post
        .excerpt
        .as_ref()
        .map(|excerpt| excerpt_text(&excerpt.rendered, None))
        .unwrap_or_default();
    if !excerpt.is_empty() {
        println!();
        println!("{excerpt}");
    }

    println!();
    println!("Комментариев: {}", data.comments.len());
    for node in comment_tree(&data.comments) {
        print_comment(&node, 0);
    }
}

fn print_comment(node: &CommentNode<'_>, depth: usize) {
    let indent = "  ".repeat(depth);
    let comment = node.comment;
    println!(
        "{indent}- {} ({}): {}",
        comment.author_name,
        format_date(&comment.date),
        excerpt_text(&comment.content.rendered, Some(80))
    );
    for reply in &node.replies {
        print_comment(reply, depth + 1);
    }
}

fn print_media_check(post: &Post, size: ImageSize, resolved: Option<&str>) {
    let source = media_source(post, size, resolved);
    println!(
        "- [{}] {} featured_media={} источник={} url={}",
        post.id,
        strip_html(&post.title.rendered),
        post.featured_media,
        source,
        resolved.unwrap_or("-")
    );
}

fn media_source(post: &Post, size: ImageSize, resolved: Option<&str>) -> &'static str {
    if post.featured_media == 0 {
        return "нет";
    }
    match (featured_image_url(post, size), resolved) {
        (Some(_), _) => "встроенный",
        (None, Some(_)) => "прямой запрос",
        (None, None) => "недоступен",
    }
}

fn print_batch(request: &BatchRequest, results: &BatchResults) {
    println!(
        "Пакет: запросов {}, успешно {}",
        request.keys().len(),
        results.keys().count()
    );
    for key in request.keys() {
        match results.failure(key) {
            Some(err) => println!("- {}: ошибка: {err}", key.as_str()),
            None => println!("- {}: {}", key.as_str(), batch_count(results, key)),
        }
    }
}

fn batch_count(results: &BatchResults, key: BatchKey) -> usize {
    match key {
        BatchKey::Posts => results.posts().map_or(0, <[_]>::len),
        BatchKey::Pages => results.pages().map_or(0, <[_]>::len),
        BatchKey::Categories => results.categories().map_or(0, <[_]>::len),
        BatchKey::Tags => results.tags().map_or(0, <[_]>::len),
        BatchKey::Media => results.media().map_or(0, <[_]>::len),
        BatchKey::Users => results.users().map_or(0, <[_]>::len),
    }
}

fn print_settings(settings: &Settings) {
    if *settings == Settings::default() {
        println!("Настройки недоступны (нужна авторизация?)");
        return;
    }
    let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    println!("title: {}", show(&settings.title));
    println!("description: {}", show(&settings.description));
    println!("url: {}", show(&settings.url));
    println!("timezone: {}", show(&settings.timezone));
    println!("language: {}", show(&settings.language));
    println!("date_format: {}", show(&settings.date_format));
    if let Some(per_page) = settings.posts_per_page {
        println!("posts_per_page: {per_page}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_server_keeps_scheme() {
        let s = normalize_server("https://example.com:8080".to_string());
        assert_eq!(s, "https://example.com:8080");
    }

    #[test]
    fn normalize_server_adds_http_scheme() {
        let s = normalize_server("localhost:8884".to_string());
        assert_eq!(s, "http://localhost:8884");
    }

    #[test]
    fn log_level_flag_wins() {
        assert_eq!(resolve_log_level(Some("debug".to_string())), "debug");
    }

    #[test]
    fn blank_log_level_flag_is_ignored() {
        let level = resolve_log_level(Some("  ".to_string()));
        assert!(!level.trim().is_empty());
    }

    #[test]
    fn post_requires_slug_or_id() {
        assert!(Cli::try_parse_from(["wp-cli", "post"]).is_err());
        assert!(Cli::try_parse_from(["wp-cli", "post", "--slug", "a", "--id", "1"]).is_err());

        let cli = Cli::try_parse_from(["wp-cli", "post", "--id", "7"]).expect("must parse");
        assert!(matches!(cli.command, Command::Post { id: Some(7), slug: None }));
    }

    #[test]
    fn posts_accepts_comma_separated_ids() {
        let cli = Cli::try_parse_from(["wp-cli", "posts", "--categories", "3,4", "--sticky", "true"])
            .expect("must parse");
        match cli.command {
            Command::Posts {
                categories, sticky, ..
            } => {
                assert_eq!(categories, vec![3, 4]);
                assert_eq!(sticky, Some(true));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn posts_sticky_filter_is_tri_state() {
        let sticky_of = |args: &[&str]| match Cli::try_parse_from(args).expect("must parse").command {
            Command::Posts { sticky, .. } => sticky,
            other => panic!("unexpected command: {other:?}"),
        };
        assert_eq!(sticky_of(&["wp-cli", "posts"]), None);
        assert_eq!(sticky_of(&["wp-cli", "posts", "--sticky", "false"]), Some(false));
        assert!(Cli::try_parse_from(["wp-cli", "posts", "--sticky", "maybe"]).is_err());
    }

    #[test]
    fn media_check_parses_image_size() {
        let cli = Cli::try_parse_from(["wp-cli", "media-check", "--size", "medium_large"])
            .expect("must parse");
        assert!(matches!(
            cli.command,
            Command::MediaCheck {
                size: ImageSize::MediumLarge,
                ..
            }
        ));
        assert!(Cli::try_parse_from(["wp-cli", "media-check", "--size", "huge"]).is_err());
    }

    #[test]
    fn global_server_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["wp-cli", "settings", "--server", "example.com"])
            .expect("must parse");
        assert_eq!(cli.server.as_deref(), Some("example.com"));
    }

    #[test]
    fn media_source_without_reference_is_none() {
        let post = Post::default();
        assert_eq!(media_source(&post, ImageSize::Medium, None), "нет");

        let referenced = Post {
            featured_media: 42,
            ..Post::default()
        };
        assert_eq!(
            media_source(&referenced, ImageSize::Medium, Some("http://x/m.jpg")),
            "прямой запрос"
        );
        assert_eq!(media_source(&referenced, ImageSize::Medium, None), "недоступен");
    }

    #[test]
    fn client_errors_are_mapped_to_messages() {
        let err = map_client_error(WpError::NotFound);
        assert_eq!(err.to_string(), "ресурс не найден");

        let err = map_client_error(WpError::Config("bad".to_string()));
        assert_eq!(err.to_string(), "некорректная конфигурация: bad");
    }
}
