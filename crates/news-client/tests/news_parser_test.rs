//! Tests for [`news_client::NewsParser`] against a mock front page.
//!
//! External interactions: HTTP to a local mockito server.

use news_client::{NewsError, NewsParser, NewsSource};

const PAGE: &str = r#"<html><body>
<article><h2 class="post-title"><a href="https://news.test/a">A</a></h2></article>
<article><h2 class="post-title"><a href="https://news.test/b">B</a></h2></article>
<article><h2 class="post-title"><a href="https://news.test/c">C</a></h2></article>
</body></html>"#;

async fn front_page(server: &mut mockito::ServerGuard) -> mockito::Mock {
    server
        .mock("GET", "/")
        .match_header("user-agent", mockito::Matcher::Regex("Chrome/111".to_string()))
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(PAGE)
        .create_async()
        .await
}

/// **Test: The newest link is returned when nothing was seen.**
#[tokio::test]
async fn returns_first_link() {
    let mut server = mockito::Server::new_async().await;
    let mock = front_page(&mut server).await;

    let parser = NewsParser::new(format!("{}/", server.url()));
    let link = parser.latest_link(&[]).await.unwrap();

    assert_eq!(link.as_deref(), Some("https://news.test/a"));
    mock.assert_async().await;
}

/// **Test: Seen links are skipped in page order.**
#[tokio::test]
async fn skips_excluded_links() {
    let mut server = mockito::Server::new_async().await;
    let _mock = front_page(&mut server).await;

    let parser = NewsParser::new(format!("{}/", server.url()));
    let excluded = vec!["https://news.test/a".to_string(), "https://news.test/b".to_string()];

    assert_eq!(
        parser.latest_link(&excluded).await.unwrap().as_deref(),
        Some("https://news.test/c")
    );
}

/// **Test: When every article was seen there is no link.**
#[tokio::test]
async fn all_seen_is_none() {
    let mut server = mockito::Server::new_async().await;
    let _mock = front_page(&mut server).await;

    let parser = NewsParser::new(format!("{}/", server.url()));
    let excluded: Vec<String> = ["a", "b", "c"]
        .iter()
        .map(|s| format!("https://news.test/{}", s))
        .collect();

    assert_eq!(parser.latest_link(&excluded).await.unwrap(), None);
}

/// **Test: A non-200 front page is reported as unavailable.**
#[tokio::test]
async fn non_ok_status_is_unavailable() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server.mock("GET", "/").with_status(503).create_async().await;

    let parser = NewsParser::new(format!("{}/", server.url()));
    let err = parser.latest_link(&[]).await.unwrap_err();

    assert!(matches!(err, NewsError::Unavailable { .. }));
}
