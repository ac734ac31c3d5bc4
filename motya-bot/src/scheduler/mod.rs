//! Daily job scheduling.

mod runner;

pub use runner::{parse_time, Job, JobRunner};
