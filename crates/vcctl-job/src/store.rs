//! Object store access for jobs and job templates
//!
//! Jobs go through the typed API (`Api<Job>`); templates have no Rust type and
//! go through the dynamic API (`Api<DynamicObject>`). The pipeline only sees
//! the two traits so tests can swap in mocks.

use async_trait::async_trait;
use kube::api::{Api, DynamicObject, PostParams};
use kube::discovery::ApiResource;
use kube::Client;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use vcctl_common::crd::Job;
use vcctl_common::kube_utils::job_template_api_resource;
use vcctl_common::{Error, Unstructured, JOB_KIND, JOB_TEMPLATE_KIND};

/// Typed access to Volcano Jobs
#[cfg_attr(test, automock)]
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Get a Job by namespace and name
    async fn get(&self, namespace: &str, name: &str) -> Result<Job, Error>;

    /// Create a Job, returning the object as stored by the server
    async fn create(&self, namespace: &str, job: &Job) -> Result<Job, Error>;
}

/// Schema-agnostic access to JobTemplates
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DynamicStore: Send + Sync {
    /// Get an object by namespace and name
    async fn get(&self, namespace: &str, name: &str) -> Result<Unstructured, Error>;

    /// Create an object, returning it as stored by the server
    async fn create(&self, namespace: &str, object: &Unstructured) -> Result<Unstructured, Error>;
}

/// [`JobStore`] backed by the Kubernetes API
pub struct KubeJobStore {
    client: Client,
}

impl KubeJobStore {
    /// Create a store wrapping the given kube Client
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobStore for KubeJobStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Job, Error> {
        let api: Api<Job> = Api::namespaced(self.client.clone(), namespace);
        api.get(name)
            .await
            .map_err(|e| lookup_error(e, JOB_KIND, namespace, name))
    }

    async fn create(&self, namespace: &str, job: &Job) -> Result<Job, Error> {
        let api: Api<Job> = Api::namespaced(self.client.clone(), namespace);
        let created = api.create(&PostParams::default(), job).await?;
        debug!(%namespace, name = ?created.metadata.name, "job created");
        Ok(created)
    }
}

/// [`DynamicStore`] for `batch.volcano.sh/v1alpha1` JobTemplates
pub struct KubeTemplateStore {
    client: Client,
    resource: ApiResource,
}

impl KubeTemplateStore {
    /// Create a store wrapping the given kube Client
    pub fn new(client: Client) -> Self {
        Self {
            client,
            resource: job_template_api_resource(),
        }
    }

    fn api(&self, namespace: &str) -> Api<DynamicObject> {
        Api::namespaced_with(self.client.clone(), namespace, &self.resource)
    }
}

#[async_trait]
impl DynamicStore for KubeTemplateStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Unstructured, Error> {
        let obj = self
            .api(namespace)
            .get(name)
            .await
            .map_err(|e| lookup_error(e, JOB_TEMPLATE_KIND, namespace, name))?;
        Unstructured::from_resource(&obj)
    }

    async fn create(&self, namespace: &str, object: &Unstructured) -> Result<Unstructured, Error> {
        let request = to_dynamic(object)?;
        let created = self
            .api(namespace)
            .create(&PostParams::default(), &request)
            .await?;
        debug!(%namespace, name = ?created.metadata.name, "job template created");
        Unstructured::from_resource(&created)
    }
}

/// Convert an unstructured object into a kube `DynamicObject`
pub fn to_dynamic(object: &Unstructured) -> Result<DynamicObject, Error> {
    serde_json::from_value(object.clone().into())
        .map_err(|e| Error::serialization_for_kind(object.kind().unwrap_or_default(), e.to_string()))
}

fn lookup_error(e: kube::Error, kind: &str, namespace: &str, name: &str) -> Error {
    match e {
        kube::Error::Api(ae) if ae.code == 404 => Error::not_found(kind, namespace, name),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn to_dynamic_keeps_type_meta_and_data() {
        let template = Unstructured::from_value(json!({
            "apiVersion": "batch.volcano.sh/v1alpha1",
            "kind": "JobTemplate",
            "metadata": {"name": "tmpl1", "namespace": "ns1", "generation": 1},
            "spec": {"queue": "research"}
        }))
        .unwrap();

        let obj = to_dynamic(&template).unwrap();
        let types = obj.types.as_ref().expect("type meta should be set");
        assert_eq!(types.api_version, "batch.volcano.sh/v1alpha1");
        assert_eq!(types.kind, "JobTemplate");
        assert_eq!(obj.metadata.name.as_deref(), Some("tmpl1"));
        assert_eq!(obj.metadata.namespace.as_deref(), Some("ns1"));
        assert_eq!(obj.data["spec"]["queue"], "research");

        let back = Unstructured::from_resource(&obj).unwrap();
        assert_eq!(back, template);
    }

    #[test]
    fn to_dynamic_rejects_bad_metadata() {
        let template = Unstructured::from_value(json!({
            "kind": "JobTemplate",
            "metadata": {"name": 42}
        }))
        .unwrap();

        let err = to_dynamic(&template).unwrap_err();
        assert!(matches!(err, Error::Serialization { .. }));
    }

    #[test]
    fn lookup_error_maps_404_to_not_found() {
        let api_err = kube::Error::Api(kube::core::ErrorResponse {
            status: "Failure".to_string(),
            message: "jobtemplates.batch.volcano.sh \"tmpl1\" not found".to_string(),
            reason: "NotFound".to_string(),
            code: 404,
        });
        let err = lookup_error(api_err, JOB_TEMPLATE_KIND, "ns1", "tmpl1");
        assert!(matches!(err, Error::NotFound { .. }));
        assert_eq!(err.to_string(), "JobTemplate ns1/tmpl1 not found");
    }

    #[test]
    fn lookup_error_keeps_other_api_errors() {
        let api_err = kube::Error::Api(kube::core::ErrorResponse {
            status: "Failure".to_string(),
            message: "forbidden".to_string(),
            reason: "Forbidden".to_string(),
            code: 403,
        });
        let err = lookup_error(api_err, JOB_KIND, "ns1", "demo");
        assert!(matches!(err, Error::Kube { .. }));
        assert!(!err.is_not_found());
    }
}
