//! Preferences directory resolution
//!
//! Directories come from two path templates, one for per-user preferences
//! and one for shared (network) preferences. Templates are read from
//! environment variables and may contain a `{core}` placeholder that is
//! replaced by the name of the application core being configured.

use std::path::PathBuf;

use directories::ProjectDirs;

use super::error::{PrefsError, Result};

/// Environment variable holding the local preferences template
pub const LOCAL_ENV: &str = "PREFS_LOCAL_PATH";
/// Environment variable holding the shared preferences template
pub const NETWORK_ENV: &str = "PREFS_NETWORK_PATH";
/// Placeholder substituted with the core name
pub const CORE_PLACEHOLDER: &str = "{core}";

/// Path templates for locating preferences directories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefsDirs {
    /// Per-user template; the platform config dir is used when unset
    pub local_template: Option<String>,
    /// Shared template; no fallback
    pub network_template: Option<String>,
}

impl PrefsDirs {
    /// Read templates from [`LOCAL_ENV`] and [`NETWORK_ENV`]
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|value| !value.trim().is_empty());
        Self {
            local_template: read(LOCAL_ENV),
            network_template: read(NETWORK_ENV),
        }
    }

    pub fn with_local(mut self, template: impl Into<String>) -> Self {
        self.local_template = Some(template.into());
        self
    }

    pub fn with_network(mut self, template: impl Into<String>) -> Self {
        self.network_template = Some(template.into());
        self
    }

    /// Directory for `core` (or the base directory when `None`).
    ///
    /// Nothing is created on disk.
    pub fn resolve(&self, core: Option<&str>, network: bool) -> Result<PathBuf> {
        let dir = if network {
            let template = self.network_template.as_deref().ok_or_else(|| PrefsError::Unresolved {
                reason: format!("{NETWORK_ENV} is not set"),
            })?;
            expand(template, core)
        } else {
            match self.local_template.as_deref() {
                Some(template) => expand(template, core),
                None => {
                    let base = default_local_dir().ok_or_else(|| PrefsError::Unresolved {
                        reason: "no home directory for the current user".to_string(),
                    })?;
                    match core {
                        Some(core) => base.join(core),
                        None => base,
                    }
                }
            }
        };

        tracing::debug!(
            "Resolved {} preferences directory for {:?}: {}",
            if network { "network" } else { "local" },
            core,
            dir.display()
        );
        Ok(dir)
    }
}

fn expand(template: &str, core: Option<&str>) -> PathBuf {
    if template.contains(CORE_PLACEHOLDER) {
        let expanded = template.replace(CORE_PLACEHOLDER, core.unwrap_or(""));
        // Drop empty components left by a missing core name
        PathBuf::from(expanded).components().collect()
    } else {
        let base = PathBuf::from(template);
        match core {
            Some(core) => base.join(core),
            None => base,
        }
    }
}

fn default_local_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "prefs").map(|dirs| dirs.config_dir().to_path_buf())
}
