//! Shared Kubernetes utilities using kube-rs
//!
//! Client construction from vcctl's connection flags and `ApiResource`
//! building for resources that are accessed through the dynamic API.

use std::path::Path;
use std::time::Duration;

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::discovery::ApiResource;
use kube::{Client, Config};
use tracing::debug;

use crate::{Error, Result, JOB_TEMPLATE_KIND, VOLCANO_BATCH_API_VERSION};

/// Default connection timeout for kube clients
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default read timeout for kube clients
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings taken from the command line
#[derive(Clone, Debug, Default)]
pub struct ConnectionOptions<'a> {
    /// API server address; overrides the server in the kubeconfig
    pub master: Option<&'a str>,
    /// Kubeconfig path; kube defaults are used when absent
    pub kubeconfig: Option<&'a Path>,
}

/// Create a kube client with default timeouts
pub async fn create_client(opts: &ConnectionOptions<'_>) -> Result<Client> {
    create_client_with_timeout(opts, DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT).await
}

/// Create a kube client with custom timeouts
///
/// Resolution mirrors `kubectl`:
/// - kubeconfig path given: load it, pointing every cluster at `master` if set
/// - only `master` given: talk to that server with no credentials
/// - neither: infer (`KUBECONFIG`, `~/.kube/config`, then in-cluster)
pub async fn create_client_with_timeout(
    opts: &ConnectionOptions<'_>,
    connect_timeout: Duration,
    read_timeout: Duration,
) -> Result<Client> {
    let mut config = match (opts.kubeconfig, opts.master) {
        (Some(path), master) => {
            let mut kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                Error::config(
                    "create_client",
                    format!("failed to read kubeconfig {}: {}", path.display(), e),
                )
            })?;
            if let Some(master) = master {
                override_server(&mut kubeconfig, master);
            }
            config_from_kubeconfig(kubeconfig).await?
        }
        (None, Some(master)) => config_from_kubeconfig(master_kubeconfig(master)?).await?,
        (None, None) => Config::infer().await.map_err(|e| {
            Error::config("create_client", format!("failed to infer config: {}", e))
        })?,
    };

    debug!(server = %config.cluster_url, "building kube client");
    config.connect_timeout = Some(connect_timeout);
    config.read_timeout = Some(read_timeout);
    Client::try_from(config).map_err(|e| {
        Error::config("create_client", format!("failed to create client: {}", e))
    })
}

async fn config_from_kubeconfig(kubeconfig: Kubeconfig) -> Result<Config> {
    Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(|e| Error::config("create_client", format!("failed to load kubeconfig: {}", e)))
}

/// Point every cluster entry at `master`
fn override_server(kubeconfig: &mut Kubeconfig, master: &str) {
    for named in kubeconfig.clusters.iter_mut() {
        if let Some(cluster) = named.cluster.as_mut() {
            cluster.server = Some(master.to_string());
        }
    }
}

/// Minimal kubeconfig with a single context for a bare server address
fn master_kubeconfig(master: &str) -> Result<Kubeconfig> {
    let doc = serde_json::json!({
        "apiVersion": "v1",
        "kind": "Config",
        "clusters": [{"name": "master", "cluster": {"server": master}}],
        "contexts": [{"name": "master", "context": {"cluster": "master"}}],
        "current-context": "master",
    });
    Kubeconfig::from_yaml(&doc.to_string()).map_err(|e| {
        Error::config(
            "create_client",
            format!("invalid master address {}: {}", master, e),
        )
    })
}

/// Build an ApiResource from a known apiVersion and kind.
///
/// Use for resources accessed as `DynamicObject`, where no Rust type carries
/// the group/version/plural.
///
/// # Example
/// ```ignore
/// let ar = build_api_resource("batch.volcano.sh/v1alpha1", "JobTemplate");
/// let api: Api<DynamicObject> = Api::namespaced_with(client, "default", &ar);
/// ```
pub fn build_api_resource(api_version: &str, kind: &str) -> ApiResource {
    let (group, version) = parse_api_version(api_version);
    ApiResource {
        group,
        version,
        kind: kind.to_string(),
        api_version: api_version.to_string(),
        plural: pluralize_kind(kind),
    }
}

/// ApiResource for `batch.volcano.sh/v1alpha1` JobTemplates
pub fn job_template_api_resource() -> ApiResource {
    build_api_resource(VOLCANO_BATCH_API_VERSION, JOB_TEMPLATE_KIND)
}

/// Parse apiVersion into (group, version)
///
/// # Examples
/// ```
/// use vcctl_common::kube_utils::parse_api_version;
///
/// let (group, version) = parse_api_version("batch.volcano.sh/v1alpha1");
/// assert_eq!(group, "batch.volcano.sh");
/// assert_eq!(version, "v1alpha1");
///
/// let (group, version) = parse_api_version("v1");
/// assert_eq!(group, "");
/// assert_eq!(version, "v1");
/// ```
pub fn parse_api_version(api_version: &str) -> (String, String) {
    match api_version.split_once('/') {
        Some((group, version)) => (group.to_string(), version.to_string()),
        None => (String::new(), api_version.to_string()),
    }
}

/// Pluralize a Kubernetes resource kind with the usual English rules
pub fn pluralize_kind(kind: &str) -> String {
    let lower = kind.to_lowercase();
    if lower.ends_with('s') || lower.ends_with("ch") || lower.ends_with("sh") {
        format!("{}es", lower)
    } else if lower.ends_with('y') && !lower.ends_with("ay") && !lower.ends_with("ey") {
        format!("{}ies", &lower[..lower.len() - 1])
    } else {
        format!("{}s", lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
clusters:
- name: prod
  cluster:
    server: https://10.0.0.1:6443
- name: staging
  cluster:
    server: https://10.0.0.2:6443
contexts:
- name: prod
  context:
    cluster: prod
current-context: prod
"#;

    #[test]
    fn test_pluralize_kind() {
        assert_eq!(pluralize_kind("Job"), "jobs");
        assert_eq!(pluralize_kind("JobTemplate"), "jobtemplates");
        assert_eq!(pluralize_kind("PodGroup"), "podgroups");
        assert_eq!(pluralize_kind("Policy"), "policies");
        assert_eq!(pluralize_kind("Ingress"), "ingresses");
        assert_eq!(pluralize_kind("Gateway"), "gateways");
    }

    #[test]
    fn test_parse_api_version_with_group() {
        let (group, version) = parse_api_version("batch.volcano.sh/v1alpha1");
        assert_eq!(group, "batch.volcano.sh");
        assert_eq!(version, "v1alpha1");
    }

    #[test]
    fn test_parse_api_version_core() {
        let (group, version) = parse_api_version("v1");
        assert_eq!(group, "");
        assert_eq!(version, "v1");
    }

    #[test]
    fn job_template_resource_targets_volcano_group() {
        let ar = job_template_api_resource();
        assert_eq!(ar.group, "batch.volcano.sh");
        assert_eq!(ar.version, "v1alpha1");
        assert_eq!(ar.api_version, "batch.volcano.sh/v1alpha1");
        assert_eq!(ar.kind, "JobTemplate");
        assert_eq!(ar.plural, "jobtemplates");
    }

    #[test]
    fn override_server_rewrites_every_cluster() {
        let mut kc = Kubeconfig::from_yaml(KUBECONFIG).unwrap();
        override_server(&mut kc, "https://127.0.0.1:8443");

        let servers: Vec<_> = kc
            .clusters
            .iter()
            .filter_map(|c| c.cluster.as_ref().and_then(|c| c.server.clone()))
            .collect();
        assert_eq!(servers, vec!["https://127.0.0.1:8443"; 2]);
    }

    #[test]
    fn master_kubeconfig_has_single_context() {
        let kc = master_kubeconfig("http://localhost:8080").unwrap();
        assert_eq!(kc.current_context.as_deref(), Some("master"));
        assert_eq!(kc.clusters.len(), 1);
        assert_eq!(
            kc.clusters[0].cluster.as_ref().and_then(|c| c.server.as_deref()),
            Some("http://localhost:8080")
        );
    }

    #[tokio::test]
    async fn master_only_client_builds_without_kubeconfig() {
        let opts = ConnectionOptions {
            master: Some("http://localhost:8080"),
            kubeconfig: None,
        };
        assert!(create_client(&opts).await.is_ok());
    }

    #[tokio::test]
    async fn missing_kubeconfig_file_is_config_error() {
        let path = Path::new("/nonexistent/vcctl/kubeconfig");
        let opts = ConnectionOptions {
            master: None,
            kubeconfig: Some(path),
        };
        let err = create_client(&opts).await.err().expect("expected error");
        assert!(matches!(err, Error::Config { .. }));
    }
}
