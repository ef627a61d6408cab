//! The two template commands as store-agnostic operations
//!
//! - [`generate_template`]: Job (file or API) -> JobTemplate created on the API
//! - [`run_template`]: JobTemplate (file or API) -> Job created on the API

use tracing::info;

use vcctl_common::crd::Job;
use vcctl_common::{Unstructured, JOB_KIND, JOB_TEMPLATE_KIND};

use crate::error::TemplateError;
use crate::normalize::{job_from_template, template_from_job};
use crate::source::{resolve, SourceRef};
use crate::store::{DynamicStore, JobStore};

/// Inputs for [`generate_template`]
#[derive(Clone, Debug, Default)]
pub struct GenerateOptions {
    /// Where the source Job comes from
    pub source: SourceRef,
    /// Name for the new template; the job's name when unset
    pub generate_name: Option<String>,
}

/// Inputs for [`run_template`]
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Where the source JobTemplate comes from
    pub source: SourceRef,
    /// Name for the new job; the template's name when unset
    pub generate_name: Option<String>,
}

/// Create a JobTemplate from an existing Job.
///
/// Returns the template as stored by the server.
pub async fn generate_template(
    opts: &GenerateOptions,
    jobs: &dyn JobStore,
    templates: &dyn DynamicStore,
) -> Result<Unstructured, TemplateError> {
    let job: Job = resolve(&opts.source, JOB_KIND, |namespace, name| async move {
        jobs.get(&namespace, &name).await
    })
    .await?;

    let template = template_from_job(&job, opts.generate_name.as_deref())?;
    let namespace = template.namespace().to_string();
    let name = template.name().to_string();

    info!(%namespace, %name, "creating job template");
    templates
        .create(&namespace, &template)
        .await
        .map_err(|source| TemplateError::CreateFailed {
            kind: JOB_TEMPLATE_KIND,
            namespace,
            name,
            source,
        })
}

/// Create a Job from a JobTemplate.
///
/// The job is submitted into its own (normalized) namespace. Returns the job
/// as stored by the server.
pub async fn run_template(
    opts: &RunOptions,
    templates: &dyn DynamicStore,
    jobs: &dyn JobStore,
) -> Result<Job, TemplateError> {
    let template: Unstructured =
        resolve(&opts.source, JOB_TEMPLATE_KIND, |namespace, name| async move {
            templates.get(&namespace, &name).await
        })
        .await?;

    let job = job_from_template(template, opts.generate_name.as_deref())?;
    let namespace = job.metadata.namespace.clone().unwrap_or_default();
    let name = job.metadata.name.clone().unwrap_or_default();

    info!(%namespace, %name, "submitting job from template");
    jobs.create(&namespace, &job)
        .await
        .map_err(|source| TemplateError::CreateFailed {
            kind: JOB_KIND,
            namespace,
            name,
            source,
        })
}
