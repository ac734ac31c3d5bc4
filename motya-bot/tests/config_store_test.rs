//! SQLite configuration store.

use motya_bot::storage::{ConfigStore, SqliteConfigStore, UserConfig};
use prompt::Resolution;
use tempfile::TempDir;

async fn open(dir: &TempDir) -> SqliteConfigStore {
    let path = dir.path().join("nested").join("motya.db");
    SqliteConfigStore::new(path.to_str().unwrap()).await.unwrap()
}

/// **Test: Themes are appended without blanks or duplicates.**
#[tokio::test]
async fn test_themes() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir).await;
    assert!(store.themes().await.unwrap().is_empty());

    store
        .add_themes(&["природа".into(), " космос ".into(), "".into()])
        .await
        .unwrap();
    store
        .add_themes(&["природа".into(), "еда".into()])
        .await
        .unwrap();

    assert_eq!(
        store.themes().await.unwrap(),
        vec!["природа", "космос", "еда"]
    );
}

/// **Test: Styles and prompts are replaced on write.**
#[tokio::test]
async fn test_styles_and_prompts() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir).await;
    assert!(store.main_prompt().await.unwrap().is_none());

    store.set_image_styles(&["аниме".into()]).await.unwrap();
    store
        .set_image_styles(&["акварель".into(), "масло".into()])
        .await
        .unwrap();
    store.set_main_prompt("ты мотя").await.unwrap();
    store.set_main_prompt("ты снова мотя").await.unwrap();
    store.set_helper_prompt("идеи через запятую").await.unwrap();

    assert_eq!(store.image_styles().await.unwrap(), vec!["акварель", "масло"]);
    assert_eq!(store.main_prompt().await.unwrap().as_deref(), Some("ты снова мотя"));
    assert_eq!(
        store.helper_prompt().await.unwrap().as_deref(),
        Some("идеи через запятую")
    );
}

/// **Test: Unknown users get defaults; updates touch only their field.**
#[tokio::test]
async fn test_user_config() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir).await;
    assert_eq!(store.user_config(1).await.unwrap(), UserConfig::default());

    store.set_style(1, "пиксель-арт").await.unwrap();
    store
        .set_resolution(1, Resolution::new(512, 1024))
        .await
        .unwrap();
    store.set_last_image(1, "кот, пиксель-арт").await.unwrap();

    assert_eq!(
        store.user_config(1).await.unwrap(),
        UserConfig {
            style: "пиксель-арт".into(),
            resolution: Resolution::new(512, 1024),
            last_image: Some("кот, пиксель-арт".into()),
        }
    );
    assert_eq!(store.user_config(2).await.unwrap(), UserConfig::default());
}

/// **Test: News history survives reopening the database.**
#[tokio::test]
async fn test_news_history_persists() {
    let dir = TempDir::new().unwrap();
    {
        let store = open(&dir).await;
        store.add_article_url("https://positivnews.ru/a").await.unwrap();
        store.add_article_url("https://positivnews.ru/a").await.unwrap();
        store.add_article_url("https://positivnews.ru/b").await.unwrap();
    }

    let store = open(&dir).await;
    let mut urls = store.excluded_urls().await.unwrap();
    urls.sort();
    assert_eq!(urls, vec!["https://positivnews.ru/a", "https://positivnews.ru/b"]);
}
