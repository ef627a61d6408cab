//! Custom resource types

mod job;

pub use job::{DependsOn, Job, JobSpec, JobState, JobStatus, LifecyclePolicy, TaskSpec};
