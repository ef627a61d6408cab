//! Kubeconfig resolution for vcctl commands.
//!
//! The resolution chain (highest priority first):
//! 1. Explicit `--kubeconfig` flag
//! 2. `VCCTL_KUBECONFIG` environment variable
//! 3. Fall back to kube default (`KUBECONFIG` env / `~/.kube/config` / in-cluster)

use std::path::{Path, PathBuf};

use crate::{Error, Result};

const VCCTL_KUBECONFIG_ENV: &str = "VCCTL_KUBECONFIG";

/// Resolve a kubeconfig path using the priority chain.
///
/// Returns `Some(path)` if a kubeconfig was named, `None` to use kube defaults.
pub fn resolve_kubeconfig(explicit: Option<&str>) -> Option<PathBuf> {
    resolve_with_env(explicit, std::env::var(VCCTL_KUBECONFIG_ENV).ok())
}

fn resolve_with_env(explicit: Option<&str>, env: Option<String>) -> Option<PathBuf> {
    if let Some(path) = explicit.filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }

    env.filter(|p| !p.is_empty()).map(PathBuf::from)
}

/// Fail early with a readable message when a named kubeconfig is missing
pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::command_failed(format!(
            "kubeconfig {} does not exist",
            path.display()
        )))
    }
}
