//! Schemaless Kubernetes objects
//!
//! [`Unstructured`] holds an arbitrary object as a JSON value tree with typed
//! accessors for the standard `apiVersion`/`kind`/`metadata` fields. Used for
//! JobTemplates, which this crate never models as a typed struct.
//!
//! Setters follow Kubernetes unstructured semantics: setting an empty string
//! or `None` removes the field rather than storing an empty value.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

const METADATA: &str = "metadata";

/// A Kubernetes object without a compile-time schema
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Unstructured {
    object: Map<String, Value>,
}

impl Unstructured {
    /// Create an empty object
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing JSON object map
    pub fn from_object(object: Map<String, Value>) -> Self {
        Self { object }
    }

    /// Wrap a JSON value, which must be an object
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(object) => Ok(Self { object }),
            other => Err(Error::serialization(format!(
                "expected an object, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Serialize a typed resource into its unstructured form, keeping every field
    pub fn from_resource<T: Serialize>(resource: &T) -> Result<Self> {
        Self::from_value(serde_json::to_value(resource)?)
    }

    /// Deserialize into a typed resource
    pub fn into_resource<T: DeserializeOwned>(self) -> Result<T> {
        let kind = self.kind().unwrap_or_default().to_string();
        serde_json::from_value(Value::Object(self.object))
            .map_err(|e| Error::serialization_for_kind(kind, e.to_string()))
    }

    /// Borrow the underlying map
    pub fn as_object(&self) -> &Map<String, Value> {
        &self.object
    }

    /// Consume into the underlying map
    pub fn into_object(self) -> Map<String, Value> {
        self.object
    }

    // =========================================================================
    // Type meta
    // =========================================================================

    /// `kind`, if set
    pub fn kind(&self) -> Option<&str> {
        self.object.get("kind").and_then(Value::as_str)
    }

    /// Set `kind`
    pub fn set_kind(&mut self, kind: &str) {
        self.object
            .insert("kind".to_string(), Value::String(kind.to_string()));
    }

    /// `apiVersion`, if set
    pub fn api_version(&self) -> Option<&str> {
        self.object.get("apiVersion").and_then(Value::as_str)
    }

    /// Set `apiVersion`
    pub fn set_api_version(&mut self, api_version: &str) {
        self.object.insert(
            "apiVersion".to_string(),
            Value::String(api_version.to_string()),
        );
    }

    // =========================================================================
    // Object meta
    // =========================================================================

    /// `metadata.name`, or `""` when absent
    pub fn name(&self) -> &str {
        self.metadata_str("name")
    }

    /// Set `metadata.name`; empty removes it
    pub fn set_name(&mut self, name: &str) {
        self.set_metadata_str("name", name);
    }

    /// `metadata.namespace`, or `""` when absent
    pub fn namespace(&self) -> &str {
        self.metadata_str("namespace")
    }

    /// Set `metadata.namespace`; empty removes it
    pub fn set_namespace(&mut self, namespace: &str) {
        self.set_metadata_str("namespace", namespace);
    }

    /// `metadata.resourceVersion`, or `""` when absent
    pub fn resource_version(&self) -> &str {
        self.metadata_str("resourceVersion")
    }

    /// Set `metadata.resourceVersion`; empty removes it
    pub fn set_resource_version(&mut self, resource_version: &str) {
        self.set_metadata_str("resourceVersion", resource_version);
    }

    /// `metadata.uid`, or `""` when absent
    pub fn uid(&self) -> &str {
        self.metadata_str("uid")
    }

    /// Set `metadata.uid`; empty removes it
    pub fn set_uid(&mut self, uid: &str) {
        self.set_metadata_str("uid", uid);
    }

    /// `metadata.generation`, or 0 when absent
    pub fn generation(&self) -> i64 {
        self.metadata()
            .and_then(|m| m.get("generation"))
            .and_then(Value::as_i64)
            .unwrap_or(0)
    }

    /// Set `metadata.generation`; 0 removes it
    pub fn set_generation(&mut self, generation: i64) {
        if generation == 0 {
            self.remove_metadata_field("generation");
        } else {
            self.update_metadata(|meta| {
                meta.insert("generation".to_string(), Value::from(generation));
            });
        }
    }

    /// `metadata.annotations`, keeping only string values
    pub fn annotations(&self) -> Option<BTreeMap<String, String>> {
        let map = self
            .metadata()
            .and_then(|m| m.get("annotations"))
            .and_then(Value::as_object)?;
        Some(
            map.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect(),
        )
    }

    /// Replace `metadata.annotations` wholesale; `None` removes them
    pub fn set_annotations(&mut self, annotations: Option<BTreeMap<String, String>>) {
        match annotations {
            Some(annotations) => {
                let map = annotations
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect();
                self.update_metadata(|meta| {
                    meta.insert("annotations".to_string(), Value::Object(map));
                });
            }
            None => self.remove_metadata_field("annotations"),
        }
    }

    /// `metadata.managedFields` entries, if present
    pub fn managed_fields(&self) -> Option<&Vec<Value>> {
        self.metadata()
            .and_then(|m| m.get("managedFields"))
            .and_then(Value::as_array)
    }

    /// Replace `metadata.managedFields`; `None` removes them
    pub fn set_managed_fields(&mut self, managed_fields: Option<Vec<Value>>) {
        match managed_fields {
            Some(entries) => {
                self.update_metadata(|meta| {
                    meta.insert("managedFields".to_string(), Value::Array(entries));
                });
            }
            None => self.remove_metadata_field("managedFields"),
        }
    }

    fn metadata(&self) -> Option<&Map<String, Value>> {
        self.object.get(METADATA).and_then(Value::as_object)
    }

    /// Edit the metadata map, creating it (or replacing a non-map value) first
    fn update_metadata(&mut self, edit: impl FnOnce(&mut Map<String, Value>)) {
        let mut meta = match self.object.remove(METADATA) {
            Some(Value::Object(meta)) => meta,
            _ => Map::new(),
        };
        edit(&mut meta);
        self.object.insert(METADATA.to_string(), Value::Object(meta));
    }

    fn metadata_str(&self, field: &str) -> &str {
        self.metadata()
            .and_then(|m| m.get(field))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    fn set_metadata_str(&mut self, field: &str, value: &str) {
        if value.is_empty() {
            self.remove_metadata_field(field);
        } else {
            self.update_metadata(|meta| {
                meta.insert(field.to_string(), Value::String(value.to_string()));
            });
        }
    }

    fn remove_metadata_field(&mut self, field: &str) {
        if let Some(Value::Object(meta)) = self.object.get_mut(METADATA) {
            meta.remove(field);
        }
    }
}

impl From<Unstructured> for Value {
    fn from(u: Unstructured) -> Self {
        Value::Object(u.object)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template() -> Unstructured {
        Unstructured::from_value(json!({
            "apiVersion": "batch.volcano.sh/v1alpha1",
            "kind": "JobTemplate",
            "metadata": {
                "name": "tmpl1",
                "namespace": "ns1",
                "resourceVersion": "4821",
                "uid": "6f1c2d1e-1111-2222-3333-444455556666",
                "generation": 7,
                "annotations": {"team": "ml", "replicas": 3},
                "managedFields": [{"manager": "kubectl", "operation": "Apply"}]
            },
            "spec": {"queue": "research"}
        }))
        .unwrap()
    }

    #[test]
    fn reads_standard_fields() {
        let t = template();
        assert_eq!(t.kind(), Some("JobTemplate"));
        assert_eq!(t.api_version(), Some("batch.volcano.sh/v1alpha1"));
        assert_eq!(t.name(), "tmpl1");
        assert_eq!(t.namespace(), "ns1");
        assert_eq!(t.resource_version(), "4821");
        assert_eq!(t.uid(), "6f1c2d1e-1111-2222-3333-444455556666");
        assert_eq!(t.generation(), 7);
        assert_eq!(t.managed_fields().map(Vec::len), Some(1));
    }

    #[test]
    fn annotations_skip_non_string_values() {
        let annotations = template().annotations().unwrap();
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations.get("team").map(String::as_str), Some("ml"));
    }

    #[test]
    fn empty_values_remove_fields() {
        let mut t = template();
        t.set_resource_version("");
        t.set_uid("");
        t.set_annotations(None);
        t.set_managed_fields(None);
        t.set_generation(0);

        let meta = t.as_object()["metadata"].as_object().unwrap();
        assert!(!meta.contains_key("resourceVersion"));
        assert!(!meta.contains_key("uid"));
        assert!(!meta.contains_key("annotations"));
        assert!(!meta.contains_key("managedFields"));
        assert!(!meta.contains_key("generation"));
        assert_eq!(meta["name"], "tmpl1");
    }

    #[test]
    fn setters_create_metadata_on_demand() {
        let mut t = Unstructured::new();
        assert_eq!(t.name(), "");
        assert_eq!(t.namespace(), "");
        assert!(t.annotations().is_none());

        t.set_name("demo");
        t.set_namespace("default");
        t.set_generation(1);
        t.set_annotations(Some(BTreeMap::from([(
            "k".to_string(),
            "v".to_string(),
        )])));

        assert_eq!(
            Value::from(t),
            json!({
                "metadata": {
                    "name": "demo",
                    "namespace": "default",
                    "generation": 1,
                    "annotations": {"k": "v"}
                }
            })
        );
    }

    #[test]
    fn non_map_metadata_is_replaced() {
        let mut t = Unstructured::from_value(json!({"metadata": "bogus"})).unwrap();
        assert_eq!(t.name(), "");
        t.set_name("fixed");
        assert_eq!(t.name(), "fixed");
    }

    #[test]
    fn from_value_rejects_non_objects() {
        let err = Unstructured::from_value(json!(["a", "b"])).unwrap_err();
        assert!(err.to_string().contains("expected an object, got an array"));
    }

    #[test]
    fn into_resource_reports_kind_on_mismatch() {
        let t = Unstructured::from_value(json!({
            "kind": "Job",
            "metadata": {"name": "x"},
            "spec": {"tasks": "not-a-list"}
        }))
        .unwrap();

        let err = t.into_resource::<crate::crd::Job>().unwrap_err();
        match err {
            Error::Serialization { kind, .. } => assert_eq!(kind.as_deref(), Some("Job")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
