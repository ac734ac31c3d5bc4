//! Runs named jobs once a day at fixed local times.
//!
//! [`JobRunner::run`] polls every second; each due job is spawned in its own task. A job whose
//! previous run has not finished skips its slot. Failures and panics are logged and never
//! retried.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime, NaiveTime};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[async_trait]
pub trait Job: Send + Sync {
    fn name(&self) -> &str;
    async fn run(&self) -> Result<()>;
}

/// Parses `H:MM` or `HH:MM` (24-hour).
pub fn parse_time(raw: &str) -> Result<NaiveTime> {
    let (hour, minute) = raw
        .trim()
        .split_once(':')
        .ok_or_else(|| anyhow!("Invalid time {:?}, expected HH:MM", raw))?;
    if minute.len() != 2 {
        anyhow::bail!("Invalid time {:?}, minutes must have two digits", raw);
    }
    let hour: u32 = hour.parse().with_context(|| format!("Invalid hour in {:?}", raw))?;
    let minute: u32 = minute
        .parse()
        .with_context(|| format!("Invalid minute in {:?}", raw))?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| anyhow!("Time out of range: {:?}", raw))
}

/// First occurrence of `at` strictly after `now`.
fn next_slot(at: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        today + chrono::Duration::days(1)
    }
}

struct ScheduledJob {
    job: Arc<dyn Job>,
    at: NaiveTime,
    next_run: NaiveDateTime,
    running: Arc<AtomicBool>,
}

/// Clears the running flag when the job task ends, even by panic.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Waits for a job task so a panic or cancellation leaves a log line.
async fn watch(name: String, task: JoinHandle<()>) {
    if let Err(e) = task.await {
        if e.is_panic() {
            error!(job = %name, error = %e, "Job panicked");
        } else {
            warn!(job = %name, error = %e, "Job task cancelled");
        }
    }
}

#[derive(Default)]
pub struct JobRunner {
    jobs: Vec<ScheduledJob>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `job` to run every day at `time` (`HH:MM`, local time).
    pub fn every_day_at(&mut self, time: &str, job: Arc<dyn Job>) -> Result<()> {
        self.every_day_at_from(time, job, Local::now().naive_local())
    }

    /// Like [`Self::every_day_at`] with an explicit current time.
    pub fn every_day_at_from(
        &mut self,
        time: &str,
        job: Arc<dyn Job>,
        now: NaiveDateTime,
    ) -> Result<()> {
        let at = parse_time(time)?;
        let next_run = next_slot(at, now);
        info!(job = job.name(), next_run = %next_run, "Job scheduled");
        self.jobs.push(ScheduledJob {
            job,
            at,
            next_run,
            running: Arc::new(AtomicBool::new(false)),
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Earliest next run of the job with this name.
    pub fn next_run(&self, name: &str) -> Option<NaiveDateTime> {
        self.jobs
            .iter()
            .filter(|j| j.job.name() == name)
            .map(|j| j.next_run)
            .min()
    }

    /// Starts every job due at `now` and moves its slot to the next day.
    pub fn run_pending(&mut self, now: NaiveDateTime) -> Vec<JoinHandle<()>> {
        let mut started = Vec::new();
        for scheduled in self.jobs.iter_mut().filter(|j| now >= j.next_run) {
            scheduled.next_run = next_slot(scheduled.at, now);
            let name = scheduled.job.name().to_string();

            if scheduled.running.swap(true, Ordering::SeqCst) {
                warn!(job = %name, "Job is still running, slot skipped");
                continue;
            }

            let job = scheduled.job.clone();
            let guard = RunningGuard(scheduled.running.clone());
            let task_name = name.clone();
            let task = tokio::spawn(async move {
                let _guard = guard;
                info!(job = %task_name, "Job started");
                match job.run().await {
                    Ok(()) => info!(job = %task_name, "Job finished"),
                    Err(e) => error!(job = %task_name, error = ?e, "Job failed"),
                }
            });
            started.push(tokio::spawn(watch(name, task)));
        }
        started
    }

    /// Polls forever.
    pub async fn run(mut self) {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        loop {
            interval.tick().await;
            self.run_pending(Local::now().naive_local());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn parses_times() {
        assert_eq!(parse_time("8:10").unwrap(), NaiveTime::from_hms_opt(8, 10, 0).unwrap());
        assert_eq!(parse_time("19:05").unwrap(), NaiveTime::from_hms_opt(19, 5, 0).unwrap());
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("8:1").is_err());
        assert!(parse_time("noon").is_err());
    }

    #[test]
    fn next_slot_is_today_or_tomorrow() {
        let t = NaiveTime::from_hms_opt(11, 50, 0).unwrap();
        assert_eq!(next_slot(t, at(1, 9, 0)), at(1, 11, 50));
        assert_eq!(next_slot(t, at(1, 11, 50)), at(2, 11, 50));
        assert_eq!(next_slot(t, at(1, 23, 0)), at(2, 11, 50));
    }
}
