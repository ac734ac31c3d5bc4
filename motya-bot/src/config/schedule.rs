//! Daily posting schedule.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

use crate::scheduler::parse_time;

pub const DEFAULT_POST_TIMES: &str = "11:50,14:05,16:45,19:05";
pub const DEFAULT_NEWS_TIME: &str = "8:10";

/// A fixed daily instruction for the channel, e.g.
/// `{"time": "9:30", "what_to_do": "пожелай всем доброго утра", "pictures": ["утренний кот"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskSpec {
    pub time: String,
    pub what_to_do: String,
    #[serde(default)]
    pub pictures: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// POST_TIMES: comma-separated `H:MM` slots for channel posts
    pub post_times: Vec<String>,
    /// NEWS_TIME: `H:MM` slot for the daily news post
    pub news_time: String,
    /// TASKS: JSON array of [`TaskSpec`]
    pub tasks: Vec<TaskSpec>,
}

impl ScheduleConfig {
    pub fn from_env() -> Result<Self> {
        let post_times = env::var("POST_TIMES")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_POST_TIMES.to_string());
        let tasks = match env::var("TASKS").ok().filter(|s| !s.trim().is_empty()) {
            Some(raw) => serde_json::from_str(&raw).context("TASKS is not a valid task list")?,
            None => Vec::new(),
        };
        Ok(Self {
            post_times: post_times
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            news_time: env::var("NEWS_TIME")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_NEWS_TIME.to_string()),
            tasks,
        })
    }

    pub fn validate(&self) -> Result<()> {
        for time in self.post_times.iter().chain(std::iter::once(&self.news_time)) {
            parse_time(time)?;
        }
        for task in &self.tasks {
            parse_time(&task.time)?;
            if task.what_to_do.trim().is_empty() {
                anyhow::bail!("Task at {} has nothing to do", task.time);
            }
        }
        Ok(())
    }
}
