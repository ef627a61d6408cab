//! Source resolution: load an object from a YAML file or from the API server
//!
//! A file always wins over a lookup; with neither, resolution fails before
//! any I/O happens.

use std::ffi::OsStr;
use std::future::Future;
use std::path::{Path, PathBuf};

use tracing::debug;

use vcctl_common::crd::Job;
use vcctl_common::{Unstructured, DEFAULT_NAMESPACE};

use crate::error::TemplateError;

const YAML_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Where to load an object from
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceRef {
    /// Local YAML file; takes precedence over `name`
    pub file: Option<PathBuf>,
    /// Name to look up on the API server
    pub name: Option<String>,
    /// Namespace for the lookup
    pub namespace: String,
}

impl SourceRef {
    /// Build from raw flag values, treating empty strings as unset
    pub fn from_flags(file: &str, name: &str, namespace: &str) -> Self {
        Self {
            file: non_empty(file).map(PathBuf::from),
            name: non_empty(name).map(str::to_string),
            namespace: non_empty(namespace)
                .unwrap_or(DEFAULT_NAMESPACE)
                .to_string(),
        }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

/// Objects that can be built from a parsed YAML manifest
pub trait Manifest: Sized {
    /// Convert the parsed manifest into `Self`
    fn from_manifest(obj: Unstructured) -> vcctl_common::Result<Self>;
}

impl Manifest for Unstructured {
    fn from_manifest(obj: Unstructured) -> vcctl_common::Result<Self> {
        Ok(obj)
    }
}

impl Manifest for Job {
    fn from_manifest(obj: Unstructured) -> vcctl_common::Result<Self> {
        Job::from_unstructured(obj)
    }
}

/// Resolve exactly one object of kind `kind`.
///
/// `lookup` receives `(namespace, name)` and is only called when no file is
/// given. Its error is reported as [`TemplateError::RemoteLookupFailed`] with
/// the target identity.
pub async fn resolve<T, L, Fut>(
    source: &SourceRef,
    kind: &'static str,
    lookup: L,
) -> Result<T, TemplateError>
where
    T: Manifest,
    L: FnOnce(String, String) -> Fut,
    Fut: Future<Output = Result<T, vcctl_common::Error>>,
{
    if let Some(path) = source.file.as_deref().filter(|p| !p.as_os_str().is_empty()) {
        debug!(kind, file = %path.display(), "loading from file");
        return read_yaml_file(path, kind);
    }

    match source.name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => {
            let namespace = if source.namespace.is_empty() {
                DEFAULT_NAMESPACE
            } else {
                source.namespace.as_str()
            };
            debug!(kind, %namespace, %name, "looking up on API server");
            lookup(namespace.to_string(), name.to_string())
                .await
                .map_err(|e| TemplateError::RemoteLookupFailed {
                    kind,
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                    source: e,
                })
        }
        None => Err(TemplateError::MissingSource { kind }),
    }
}

/// Read and parse a YAML file into `T`.
///
/// The extension is checked before the file is opened. The content must be a
/// mapping; [`Manifest::from_manifest`] then shapes it into `T`.
pub fn read_yaml_file<T: Manifest>(
    path: &Path,
    kind: &'static str,
) -> Result<T, TemplateError> {
    if !is_yaml_path(path) {
        return Err(TemplateError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| TemplateError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let malformed = |message: String| TemplateError::MalformedInput {
        kind,
        path: path.to_path_buf(),
        message,
    };
    let obj: Unstructured = serde_yaml::from_str(&content).map_err(|e| malformed(e.to_string()))?;
    T::from_manifest(obj).map_err(|e| malformed(e.to_string()))
}

fn is_yaml_path(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| YAML_EXTENSIONS.iter().any(|y| ext.eq_ignore_ascii_case(y)))
}
