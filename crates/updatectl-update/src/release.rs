//! Target version resolution

use tracing::{debug, info};
use updatectl_core::{render_url, TemplateVars};

use crate::client::RepositoryClient;
use crate::error::{Result, UpdateError};

/// Which version to install
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    /// Use this exact version string, no lookup
    Explicit(String),
    /// Read the pinned stable release file
    LatestStable,
}

impl VersionSelector {
    /// `--target` value, blank meaning latest stable
    pub fn from_target(target: Option<&str>) -> Self {
        match target.map(str::trim) {
            Some(version) if !version.is_empty() => Self::Explicit(version.to_string()),
            _ => Self::LatestStable,
        }
    }
}

/// Reads the pinned stable release from the repository
pub struct ReleaseLocator<'a> {
    client: &'a RepositoryClient,
    template: &'a str,
    vars: &'a TemplateVars,
}

impl<'a> ReleaseLocator<'a> {
    pub fn new(client: &'a RepositoryClient, template: &'a str, vars: &'a TemplateVars) -> Self {
        Self {
            client,
            template,
            vars,
        }
    }

    /// Resolve `selector` to a concrete version string
    pub async fn resolve(&self, selector: &VersionSelector) -> Result<String> {
        match selector {
            VersionSelector::Explicit(version) => {
                debug!("Using requested version {}", version);
                Ok(version.clone())
            }
            VersionSelector::LatestStable => self.latest_stable().await,
        }
    }

    async fn latest_stable(&self) -> Result<String> {
        let url = render_url(self.template, self.vars)?;
        info!("Fetching stable release from {}", url);

        let body = self
            .client
            .get(&url)
            .await?
            .text()
            .await
            .map_err(|e| UpdateError::http(&url, e))?;

        let version = body.trim();
        if version.is_empty() {
            return Err(UpdateError::EmptyVersion { url });
        }

        debug!("Stable release is {}", version);
        Ok(version.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_from_target() {
        assert_eq!(
            VersionSelector::from_target(Some("v1.2.3")),
            VersionSelector::Explicit("v1.2.3".into())
        );
        assert_eq!(
            VersionSelector::from_target(Some("  v1.2.3\n")),
            VersionSelector::Explicit("v1.2.3".into())
        );
        assert_eq!(
            VersionSelector::from_target(Some("   ")),
            VersionSelector::LatestStable
        );
        assert_eq!(VersionSelector::from_target(None), VersionSelector::LatestStable);
    }
}
