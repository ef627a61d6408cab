//! Job <-> JobTemplate conversion for vcctl
//!
//! A JobTemplate is a stored, reusable copy of a Volcano Job. This crate
//! resolves the source object (local YAML file or API server), normalizes it
//! into the other kind, and creates the result through a store:
//!
//! - [`source`]: file-or-lookup resolution
//! - [`normalize`]: kind relabeling, identity stripping, provenance
//! - [`store`]: typed and dynamic API access behind mockable traits
//! - [`pipeline`]: the `generate` and `run` operations

pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod source;
pub mod store;

pub use error::TemplateError;
pub use pipeline::{generate_template, run_template, GenerateOptions, RunOptions};
pub use source::SourceRef;
pub use store::{DynamicStore, JobStore, KubeJobStore, KubeTemplateStore};
