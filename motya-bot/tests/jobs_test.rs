//! Channel jobs: generated posts and news.

mod common;

use common::*;
use llm_client::Persona;
use motya_bot::content::ContentError;
use motya_bot::config::{ScheduleConfig, TaskSpec};
use motya_bot::jobs::{send_news, send_post, TaskJob, NEWS_TAG};
use motya_bot::schedule_jobs;
use motya_bot::scheduler::Job;
use motya_bot::storage::ConfigStore;
use motya_bot::{BotError, Destination};
use prompt::Prompt;

fn channel() -> Destination {
    Destination::Channel("@motya_blog".to_string())
}

/// **Test: A post goes to the channel as a captioned album with lowercased text.**
#[tokio::test]
async fn test_send_post_publishes_album() {
    let mut env = TestEnvBuilder::new().build().await;
    env.store
        .add_themes(&["природа".to_string()])
        .await
        .unwrap();
    env.store
        .set_image_styles(&["акварель".to_string()])
        .await
        .unwrap();

    send_post(&env.ctx, &channel()).await.unwrap();

    let calls = drain(&mut env.rx);
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        Call::MediaGroup {
            destination,
            images,
            caption,
        } => {
            assert_eq!(*destination, channel());
            assert!(*images == 1 || *images == 3);
            let caption = caption.as_deref().unwrap();
            assert!(caption.starts_with("ответ на: напиши подробный пост про: идея"));
        }
        other => panic!("unexpected call {:?}", other),
    }

    let requests = env.images.requests();
    assert!(requests.iter().all(|p| p.style == "акварель, no text"));

    let prompts = env.model.prompts();
    assert_eq!(prompts[0], (Persona::Themes, "природа".to_string()));
    assert_eq!(prompts[2].0, Persona::Pictures);
}

/// **Test: Without image generation the post is plain text.**
#[tokio::test]
async fn test_send_post_without_images_is_text() {
    let mut env = TestEnvBuilder::new().without_images().build().await;
    env.store
        .add_themes(&["космос".to_string()])
        .await
        .unwrap();

    send_post(&env.ctx, &channel()).await.unwrap();

    let calls = drain(&mut env.rx);
    assert_eq!(calls.len(), 1);
    assert!(matches!(&calls[0], Call::Send { .. }));
}

/// **Test: No themes means no post.**
#[tokio::test]
async fn test_send_post_requires_themes() {
    let mut env = TestEnvBuilder::new().build().await;

    let err = send_post(&env.ctx, &channel()).await.unwrap_err();

    assert!(matches!(err, BotError::Content(ContentError::NoThemes)));
    assert!(drain(&mut env.rx).is_empty());
}

/// **Test: News posts are tagged and never repeat.**
///
/// Setup: the source lists two articles.
/// Action: three news runs.
/// Expected: two posts for different articles, then NoFreshNews.
#[tokio::test]
async fn test_send_news_skips_seen_articles() {
    let mut env = TestEnvBuilder::new().build().await;

    send_news(&env.ctx, &channel()).await.unwrap();
    send_news(&env.ctx, &channel()).await.unwrap();
    let err = send_news(&env.ctx, &channel()).await.unwrap_err();

    assert!(matches!(err, BotError::Content(ContentError::NoFreshNews)));
    let sent = texts(&drain(&mut env.rx));
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|t| t.ends_with(&format!("\n\n{}", NEWS_TAG))));
    assert!(sent[0].contains("https://positivnews.ru/a"));
    assert!(sent[1].contains("https://positivnews.ru/b"));
    assert_eq!(env.store.excluded_urls().await.unwrap().len(), 2);
}

/// **Test: A task job answers its instruction and attaches its pictures.**
#[tokio::test]
async fn test_task_job() {
    let mut env = TestEnvBuilder::new().build().await;
    let job = TaskJob::new(
        env.ctx.clone(),
        "greeting",
        "пожелай доброго утра",
        channel(),
    )
    .with_pictures(vec![Prompt::new("рассвет")]);

    job.run().await.unwrap();

    assert_eq!(job.name(), "greeting");
    assert_eq!(
        drain(&mut env.rx),
        vec![Call::MediaGroup {
            destination: channel(),
            images: 1,
            caption: Some("Ответ на: пожелай доброго утра".to_string()),
        }]
    );
    assert_eq!(env.images.requests()[0].text, "рассвет");
}

fn morning_task() -> TaskSpec {
    TaskSpec {
        time: "9:30".to_string(),
        what_to_do: "пожелай доброго утра".to_string(),
        pictures: vec!["рассвет".to_string(), "кофе".to_string()],
    }
}

/// **Test: A configured task becomes a named job drawing its pictures.**
#[tokio::test]
async fn test_task_job_from_spec() {
    let mut env = TestEnvBuilder::new().build().await;
    let job = TaskJob::from_spec(env.ctx.clone(), &morning_task(), channel());

    job.run().await.unwrap();

    assert_eq!(job.name(), "task@9:30");
    assert_eq!(
        drain(&mut env.rx),
        vec![Call::MediaGroup {
            destination: channel(),
            images: 2,
            caption: Some("Ответ на: пожелай доброго утра".to_string()),
        }]
    );
    let requests: Vec<String> = env.images.requests().into_iter().map(|p| p.text).collect();
    assert_eq!(requests, vec!["рассвет", "кофе"]);
}

/// **Test: Posts, configured tasks and the news job are all put on the schedule.**
#[tokio::test]
async fn test_schedule_registers_tasks() {
    let env = TestEnvBuilder::new().build().await;
    let schedule = ScheduleConfig {
        post_times: vec!["11:50".to_string(), "19:05".to_string()],
        news_time: "8:10".to_string(),
        tasks: vec![morning_task()],
    };

    let runner = schedule_jobs(&schedule, channel(), env.ctx.clone()).unwrap();

    assert_eq!(runner.len(), 4);
    assert!(runner.next_run("task@9:30").is_some());
    assert!(runner.next_run("news").is_some());
}
