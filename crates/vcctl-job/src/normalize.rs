//! Job <-> JobTemplate normalization
//!
//! Both directions relabel the serialized object and drop the identity and
//! lifecycle metadata the API server owns, so the derived object is created as
//! if newly authored. Step order matters: the namespace default lands before
//! anything reads the namespace, and the provenance annotation is computed
//! before the job name override.

use vcctl_common::crd::Job;
use vcctl_common::{
    Unstructured, CREATED_BY_TEMPLATE_ANNOTATION, DEFAULT_NAMESPACE, JOB_KIND, JOB_TEMPLATE_KIND,
    VOLCANO_BATCH_API_VERSION,
};

use crate::error::TemplateError;

/// Derive a JobTemplate from a Job.
///
/// The template keeps every field of the job, takes `generate_name` as its
/// name when one is given, and loses all annotations.
pub fn template_from_job(
    job: &Job,
    generate_name: Option<&str>,
) -> Result<Unstructured, TemplateError> {
    let mut template =
        Unstructured::from_resource(job).map_err(|e| TemplateError::Serialization {
            namespace: job.metadata.namespace.clone().unwrap_or_default(),
            name: job.metadata.name.clone().unwrap_or_default(),
            message: e.to_string(),
        })?;

    if let Some(name) = generate_name.filter(|n| !n.is_empty()) {
        template.set_name(name);
    }
    template.set_kind(JOB_TEMPLATE_KIND);
    default_namespace(&mut template);
    template.set_api_version(VOLCANO_BATCH_API_VERSION);
    strip_identity(&mut template);
    template.set_annotations(None);

    Ok(template)
}

/// Derive a runnable Job from a JobTemplate.
///
/// The job records the template it came from in the
/// `volcano.sh/createByJobTemplate` annotation. `generate_name` renames the
/// job only; the annotation always names the template.
pub fn job_from_template(
    mut template: Unstructured,
    generate_name: Option<&str>,
) -> Result<Job, TemplateError> {
    template.set_kind(JOB_KIND);
    strip_identity(&mut template);
    default_namespace(&mut template);

    let provenance = format!("{}.{}", template.namespace(), template.name());
    let mut annotations = template.annotations().unwrap_or_default();
    annotations.insert(CREATED_BY_TEMPLATE_ANNOTATION.to_string(), provenance);
    template.set_annotations(Some(annotations));

    let namespace = template.namespace().to_string();
    let name = template.name().to_string();
    let mut job = Job::from_unstructured(template).map_err(|e| TemplateError::SchemaMismatch {
        from: JOB_TEMPLATE_KIND,
        namespace,
        name,
        message: e.to_string(),
    })?;

    if let Some(name) = generate_name.filter(|n| !n.is_empty()) {
        job.metadata.name = Some(name.to_string());
    }

    Ok(job)
}

/// Drop server-owned identity and reset the generation counter
fn strip_identity(obj: &mut Unstructured) {
    obj.set_managed_fields(None);
    obj.set_generation(1);
    obj.set_resource_version("");
    obj.set_uid("");
}

fn default_namespace(obj: &mut Unstructured) {
    if obj.namespace().is_empty() {
        obj.set_namespace(DEFAULT_NAMESPACE);
    }
}
