use wp_client::{
    BatchKey, BatchRequest, CategoryQuery, ClientConfig, ImageSize, PostQuery, SearchQuery,
    WpClient, WpError,
};

fn live_client() -> WpClient {
    let base_url =
        std::env::var("WP_API_BASE").unwrap_or_else(|_| "http://localhost:8884".to_string());
    WpClient::new(ClientConfig::new(base_url)).expect("client must build")
}

#[tokio::test]
#[ignore = "requires running WordPress"]
async fn read_flow() {
    let client = live_client();

    let posts = client
        .try_list_posts(&PostQuery::latest(5))
        .await
        .expect("list_posts must succeed");
    assert!(posts.len() <= 5);

    let Some(first) = posts.first() else {
        return;
    };

    let by_id = client.get_post(first.id).await.expect("post must exist");
    assert_eq!(by_id.slug, first.slug);

    let by_slug = client
        .get_post_by_slug(&first.slug)
        .await
        .expect("post must be found by slug");
    assert_eq!(by_slug.id, first.id);

    if first.featured_media != 0 {
        let url = client.resolve_image_url(first, ImageSize::Medium).await;
        assert!(url.is_some_and(|url| url.starts_with("http")));
    }

    let full = client
        .full_post_data(first.id)
        .await
        .expect("full post data must load");
    assert_eq!(full.post.id, first.id);

    let missing = client.try_get_post(u32::MAX as u64).await;
    assert!(matches!(missing, Err(WpError::NotFound)));
}

#[tokio::test]
#[ignore = "requires running WordPress"]
async fn batch_and_search_flow() {
    let client = live_client();

    let results = client
        .fetch_many(&BatchRequest {
            posts: Some(PostQuery::latest(3)),
            categories: Some(CategoryQuery::default()),
            ..BatchRequest::default()
        })
        .await;
    assert!(results.is_complete(), "batch failures: {:?}", results.failed_keys().collect::<Vec<_>>());
    assert!(results.get(BatchKey::Posts).is_some());

    let found = client
        .try_search(&SearchQuery::new("a"))
        .await
        .expect("search must succeed");
    assert!(found.iter().all(|result| !result.url.is_empty()));
}
