//! CLI commands

use clap::Args;
use kube::Client;
use tracing::debug;

use vcctl_common::kube_utils::{create_client, ConnectionOptions};

use crate::Result;

pub mod template;

/// API server connection flags shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// The address of the Kubernetes API server (overrides the kubeconfig)
    #[arg(long, short = 's')]
    pub master: Option<String>,

    /// Path to kubeconfig file (overrides VCCTL_KUBECONFIG)
    #[arg(long, short = 'k')]
    pub kubeconfig: Option<String>,
}

impl ConnectionArgs {
    /// Build a kube [`Client`] using the vcctl kubeconfig resolution chain.
    pub async fn client(&self) -> Result<Client> {
        let kubeconfig = crate::config::resolve_kubeconfig(self.kubeconfig.as_deref());
        if let Some(path) = kubeconfig.as_deref() {
            crate::config::ensure_exists(path)?;
        }
        debug!(kubeconfig = ?kubeconfig, master = ?self.master, "connecting");

        let opts = ConnectionOptions {
            master: self.master.as_deref().filter(|m| !m.is_empty()),
            kubeconfig: kubeconfig.as_deref(),
        };
        Ok(create_client(&opts).await?)
    }
}
