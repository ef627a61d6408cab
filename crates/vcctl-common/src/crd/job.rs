//! Volcano Job CRD types
//!
//! Typed representation of `batch.volcano.sh/v1alpha1` Job resources. Pod
//! templates and volumes pass through as raw JSON, and fields this crate
//! doesn't model are kept in `extra`, so jobs round-trip through templates
//! without losing anything.
//!
//! Collections accept an explicit `null` (a YAML key with no value) as empty.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{Unstructured, DEFAULT_QUEUE};

const SPEC: &str = "spec";

fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// Plugin arguments, where both the map and each argument list may be `null`
fn plugin_args<'de, D>(de: D) -> Result<BTreeMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let plugins = Option::<BTreeMap<String, Option<Vec<String>>>>::deserialize(de)?;
    Ok(plugins
        .unwrap_or_default()
        .into_iter()
        .map(|(name, args)| (name, args.unwrap_or_default()))
        .collect())
}

// =============================================================================
// Policies
// =============================================================================

/// Lifecycle policy: which action to take on an event or exit code
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LifecyclePolicy {
    /// Action to take (e.g., "RestartJob", "AbortJob", "CompleteJob")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Single triggering event (e.g., "PodFailed")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,

    /// Multiple triggering events
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub events: Vec<String>,

    /// Container exit code that triggers the action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,

    /// Delay before the action is taken (e.g., "10m")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

// =============================================================================
// Tasks
// =============================================================================

/// Dependencies a task waits on before starting
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DependsOn {
    /// Names of tasks this task depends on
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub name: Vec<String>,

    /// How the dependencies combine ("Any" or "All")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration: Option<String>,
}

/// A single task within a Volcano Job
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    /// Task name, unique within the job
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Number of pods for this task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    /// Minimum pods of this task that must be available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_available: Option<i32>,

    /// Pod template, passed through untouched
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub template: Value,

    /// Task-level lifecycle policies
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub policies: Vec<LifecyclePolicy>,

    /// Topology manager policy for the task's pods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology_policy: Option<String>,

    /// Retries allowed before the task is marked failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retry: Option<i32>,

    /// Tasks that must be running before this one starts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<DependsOn>,

    /// Task fields not modeled above, kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

// =============================================================================
// CRD
// =============================================================================

/// Volcano batch Job specification
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "batch.volcano.sh",
    version = "v1alpha1",
    kind = "Job",
    plural = "jobs",
    shortname = "vcjob",
    namespaced,
    status = "JobStatus",
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    /// Scheduler that places the job's pods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduler_name: Option<String>,

    /// Minimum pods that must be schedulable together
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_available: Option<i32>,

    /// Job-level volumes, passed through untouched
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub volumes: Vec<Value>,

    /// Job tasks
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tasks: Vec<TaskSpec>,

    /// Job-level lifecycle policies
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub policies: Vec<LifecyclePolicy>,

    /// Volcano plugins and their arguments (e.g., `ssh: []`, `env: []`)
    #[serde(
        default,
        deserialize_with = "plugin_args",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub plugins: BTreeMap<String, Vec<String>>,

    /// Expected running duration, used by the scheduler for backfill
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running_estimate: Option<String>,

    /// Queue the job is submitted to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,

    /// Retries allowed before the job is marked failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retry: Option<i32>,

    /// Seconds to keep the job after it finishes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_seconds_after_finished: Option<i32>,

    /// Priority class for the job's pods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_class_name: Option<String>,

    /// Minimum successful pods for the job to count as completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_success: Option<i32>,

    /// Spec fields not modeled above (e.g., `networkTopology`), kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Current state of a Volcano Job
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobState {
    /// Phase (e.g., "Pending", "Running", "Completed", "Failed")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,

    /// Machine-readable reason for the last transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human-readable message for the last transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Status of a Volcano Job
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    /// Current state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<JobState>,

    /// Minimum available pods recorded by the controller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_available: Option<i32>,

    /// Pending pod count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<i32>,

    /// Running pod count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running: Option<i32>,

    /// Succeeded pod count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub succeeded: Option<i32>,

    /// Failed pod count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed: Option<i32>,

    /// Times the job has been retried
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<i32>,

    /// Internal job version maintained by the controller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
}

impl Job {
    /// Convert a schemaless object into a typed Job.
    ///
    /// A missing or `null` spec becomes an empty one, so a manifest carrying
    /// only metadata is still a valid Job.
    pub fn from_unstructured(obj: Unstructured) -> crate::Result<Self> {
        let mut object = obj.into_object();
        if object.get(SPEC).map_or(true, Value::is_null) {
            object.insert(SPEC.to_string(), Value::Object(Map::new()));
        }
        Unstructured::from_object(object).into_resource()
    }

    /// Queue to show for this job.
    ///
    /// Volcano places jobs without a queue in `default`; this mirrors that for
    /// display without touching the job itself.
    pub fn display_queue(&self) -> &str {
        self.spec
            .queue
            .as_deref()
            .filter(|q| !q.is_empty())
            .unwrap_or(DEFAULT_QUEUE)
    }
}

// =============================================================================
// Tests
// =============================================================================
