use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_list_links_empty() {
    let mut app = helper::setup_test_app();

    let (status_code, links) = helper::list_links(&mut app).await;

    assert_eq!(StatusCode::OK, status_code);
    assert!(links.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_links() {
    let mut app = helper::setup_test_app();

    helper::create_link(&mut app, "https://one.example.com/", "link0001").await;
    helper::create_link(&mut app, "https://two.example.com/", "link0002").await;
    helper::create_link(&mut app, "https://three.example.com/", "link0003").await;

    let (status_code, links) = helper::list_links(&mut app).await;

    assert_eq!(StatusCode::OK, status_code);

    let links = links.unwrap();
    assert_eq!(3, links.len());

    // newest first
    for pair in links.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }

    let mut codes = links.iter().map(|link| link.code.clone()).collect::<Vec<_>>();
    codes.sort();
    assert_eq!(vec!["link0001", "link0002", "link0003"], codes);
}

#[tokio::test]
async fn test_list_links_includes_short_url() {
    let mut app = helper::setup_test_app();

    helper::create_link(&mut app, "https://www.example.com/", "abc123").await;

    let (_, links) = helper::list_links(&mut app).await;

    assert_eq!(
        format!("{}/abc123", helper::TEST_BASE_URL),
        links.unwrap()[0].short_url
    );
}
