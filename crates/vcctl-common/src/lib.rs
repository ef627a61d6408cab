//! Common types for vcctl: the Volcano Job CRD, dynamic objects, errors, and
//! kube client construction

#![deny(missing_docs)]

pub mod crd;
pub mod error;
pub mod kube_utils;
pub mod unstructured;

pub use error::Error;
pub use unstructured::Unstructured;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Namespace assigned to objects that don't carry one
pub const DEFAULT_NAMESPACE: &str = "default";

/// Queue shown for jobs the scheduler hasn't assigned one to
pub const DEFAULT_QUEUE: &str = "default";

/// Full apiVersion string for Volcano batch resources
pub const VOLCANO_BATCH_API_VERSION: &str = "batch.volcano.sh/v1alpha1";

/// Kind of a runnable Volcano job
pub const JOB_KIND: &str = "Job";

/// Kind of a reusable Volcano job template
pub const JOB_TEMPLATE_KIND: &str = "JobTemplate";

/// Annotation recording which template a job was launched from.
///
/// The value is `<template-namespace>.<template-name>`.
pub const CREATED_BY_TEMPLATE_ANNOTATION: &str = "volcano.sh/createByJobTemplate";
