use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wp_client::{
    CategoryQuery, ClientConfig, CommentQuery, MediaQuery, NewComment, PageQuery, PostQuery,
    SearchQuery, TaxonomyQuery, UserQuery, WpClient, WpError,
};

const API: &str = "/wp-json/wp/v2";

fn client_for(server: &MockServer) -> WpClient {
    WpClient::new(ClientConfig::new(server.uri())).expect("client must build")
}

fn sample_post(id: u64, slug: &str) -> Value {
    json!({
        "id": id,
        "slug": slug,
        "title": { "rendered": format!("Post {id}") },
        "excerpt": { "rendered": "<p>Excerpt</p>", "protected": false },
        "content": { "rendered": "<p>Body</p>", "protected": false },
        "date": "2024-01-05T15:04:05",
        "author": 1,
        "featured_media": 0,
        "categories": [3],
        "tags": [9],
        "sticky": false,
        "format": "standard"
    })
}

fn not_found_body() -> Value {
    json!({ "code": "rest_post_invalid_id", "message": "Invalid post ID.", "data": { "status": 404 } })
}

#[tokio::test]
async fn list_posts_sends_defaults_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/posts")))
        .and(query_param("_embed", "wp:featuredmedia,author,wp:term"))
        .and(query_param("status", "publish"))
        .and(query_param("per_page", "5"))
        .and(query_param("categories", "3,4"))
        .and(header("accept", "application/json"))
        .and(header("cache-control", "max-age=60"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([sample_post(1, "first"), sample_post(2, "second")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let posts = client
        .list_posts(&PostQuery {
            per_page: Some(5),
            categories: vec![3, 4],
            ..PostQuery::default()
        })
        .await;

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].slug, "first");
    assert_eq!(posts[1].categories, vec![3]);
}

#[tokio::test]
async fn list_returns_empty_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/posts")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "code": "boom" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.list_posts(&PostQuery::default()).await.is_empty());

    let err = client
        .try_list_posts(&PostQuery::default())
        .await
        .expect_err("strict variant must report failure");
    assert!(matches!(err, WpError::Status { status, .. } if status.as_u16() == 500));
}

#[tokio::test]
async fn every_list_returns_empty_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "code": "db_error" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.list_posts(&PostQuery::default()).await.is_empty());
    assert!(client.list_pages(&PageQuery::default()).await.is_empty());
    assert!(client.list_media(&MediaQuery::default()).await.is_empty());
    assert!(client.list_categories(&CategoryQuery::default()).await.is_empty());
    assert!(client.list_tags(&Default::default()).await.is_empty());
    assert!(client.list_users(&UserQuery::default()).await.is_empty());
    assert!(client.list_comments(&CommentQuery::default()).await.is_empty());
    assert!(client.search(&SearchQuery::new("rust")).await.is_empty());

    let requests = server.received_requests().await.expect("recording is enabled");
    assert_eq!(requests.len(), 8);
}

#[tokio::test]
async fn list_returns_empty_on_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/tags")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html>maintenance</html>", "text/html; charset=UTF-8"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.list_tags(&Default::default()).await.is_empty());

    let err = client
        .try_list_tags(&Default::default())
        .await
        .expect_err("html must be rejected");
    assert!(matches!(err, WpError::UnexpectedContentType(ct) if ct.starts_with("text/html")));
}

#[tokio::test]
async fn list_returns_empty_when_shape_does_not_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/categories")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.list_categories(&CategoryQuery::default()).await.is_empty());
    assert!(matches!(
        client.try_list_categories(&CategoryQuery::default()).await,
        Err(WpError::Decode(_))
    ));
}

#[tokio::test]
async fn list_returns_empty_when_server_is_unreachable() {
    let client = WpClient::new(ClientConfig::new("http://127.0.0.1:1")).expect("client must build");
    assert!(client.list_posts(&PostQuery::default()).await.is_empty());
    assert!(client.get_post(1).await.is_none());
    assert!(client.search(&SearchQuery::new("rust")).await.is_empty());
}

#[tokio::test]
async fn get_post_returns_none_for_missing_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/posts/999")))
        .respond_with(ResponseTemplate::new(404).set_body_json(not_found_body()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.get_post(999).await.is_none());
    assert!(matches!(client.try_get_post(999).await, Err(WpError::NotFound)));
}

#[tokio::test]
async fn get_post_uses_projection_without_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/posts/7")))
        .and(query_param("_embed", "wp:featuredmedia,author,wp:term"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_post(7, "seven")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let post = client.get_post(7).await.expect("post must exist");
    assert_eq!(post.slug, "seven");

    let requests = server.received_requests().await.expect("recording is enabled");
    let query = requests[0].url.query().unwrap_or_default().to_string();
    assert!(!query.contains("status="), "unexpected status in {query}");
}

#[tokio::test]
async fn get_post_by_slug_returns_first_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/posts")))
        .and(query_param("slug", "hello-world"))
        .and(query_param("status", "publish"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([sample_post(1, "hello-world"), sample_post(2, "hello-world")])),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let post = client
        .get_post_by_slug("hello-world")
        .await
        .expect("post must exist");
    assert_eq!(post.id, 1);
}

#[tokio::test]
async fn slug_lookups_without_match_return_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/categories")))
        .and(query_param("slug", "missing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/tags")))
        .and(query_param("slug", "missing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.get_category_by_slug("missing").await.is_none());
    assert!(client.get_tag_by_slug("missing").await.is_none());
}

#[tokio::test]
async fn get_media_with_zero_id_makes_no_request() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    assert!(client.get_media(0).await.is_none());
    let requests = server.received_requests().await.expect("recording is enabled");
    assert!(requests.is_empty());
}

#[tokio::test]
async fn taxonomies_and_types_decode_maps() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/taxonomies")))
        .and(query_param("type", "post"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "category": { "name": "Categories", "slug": "category", "description": "",
                          "types": ["post"], "hierarchical": true, "rest_base": "categories" },
            "post_tag": { "name": "Tags", "slug": "post_tag", "description": "",
                          "types": ["post"], "hierarchical": false, "rest_base": "tags" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/types")))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "code": "rest_forbidden" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let taxonomies = client
        .taxonomies(&TaxonomyQuery {
            post_type: Some("post".to_string()),
        })
        .await;
    assert_eq!(taxonomies.len(), 2);
    assert!(taxonomies["category"].hierarchical);
    assert!(client.post_types().await.is_empty());
}

#[tokio::test]
async fn settings_degrade_to_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/settings")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "code": "rest_forbidden" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let settings = client.settings().await;
    assert_eq!(settings, Default::default());
}

#[tokio::test]
async fn search_returns_lightweight_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/search")))
        .and(query_param("search", "rust async"))
        .and(query_param("subtype", "post"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "title": "Rust async", "url": "http://x/rust-async", "type": "post", "subtype": "post" }
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let results = client
        .search(&SearchQuery {
            subtype: Some("post".to_string()),
            ..SearchQuery::new("rust async")
        })
        .await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].kind, "post");
    assert_eq!(results[0].url, "http://x/rust-async");
}

#[tokio::test]
async fn submit_comment_posts_held_comment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{API}/comments")))
        .and(body_partial_json(json!({
            "post": 7,
            "author_name": "Ann",
            "author_email": "ann@example.com",
            "parent": 0,
            "status": "hold"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 55, "post": 7, "parent": 0, "author": 0, "author_name": "Ann",
            "date": "2024-01-05T15:04:05", "content": { "rendered": "<p>Nice</p>" },
            "status": "hold", "type": "comment"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let comment = client
        .submit_comment(&NewComment {
            post: 7,
            author_name: "Ann".to_string(),
            author_email: "ann@example.com".to_string(),
            author_url: String::new(),
            content: "Nice".to_string(),
            parent: 0,
        })
        .await
        .expect("comment must be accepted");
    assert_eq!(comment.id, 55);
    assert_eq!(comment.status.as_deref(), Some("hold"));
}

#[tokio::test]
async fn submit_comment_reports_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{API}/comments")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "rest_comment_login_required",
            "message": "Sorry, you must be logged in to comment."
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .submit_comment(&NewComment {
            post: 7,
            ..NewComment::default()
        })
        .await
        .expect_err("anonymous comments are disabled");
    match err {
        WpError::Status { message, .. } => {
            assert!(message.starts_with("rest_comment_login_required"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn full_post_data_collects_related_entities() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/posts/1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_post(1, "first")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/categories")))
        .and(query_param("include", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 3, "name": "News", "slug": "news", "count": 4, "parent": 0 }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/tags")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/users/1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "name": "Admin", "slug": "admin"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/comments")))
        .and(query_param("post", "1"))
        .and(query_param("status", "approve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 10, "post": 1, "parent": 0, "author_name": "Ann",
              "content": { "rendered": "<p>hi</p>" } }
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let data = client.full_post_data(1).await.expect("post must exist");
    assert_eq!(data.post.id, 1);
    assert_eq!(data.categories.len(), 1);
    assert!(data.tags.is_empty());
    assert_eq!(data.author.map(|user| user.name), Some("Admin".to_string()));
    assert_eq!(data.comments.len(), 1);
}

#[tokio::test]
async fn full_post_data_is_none_for_missing_post() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/posts/404")))
        .respond_with(ResponseTemplate::new(404).set_body_json(not_found_body()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.full_post_data(404).await.is_none());
    assert!(
        client
            .list_comments(&CommentQuery::approved_for_post(404))
            .await
            .is_empty()
    );
}
