//! Project type and language detection from `package.json`.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// Name of the manifest inspected for dependencies.
pub const MANIFEST_FILE: &str = "package.json";

/// Framework flavor of the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectKind {
    /// Plain React; also the fallback when detection fails.
    #[default]
    React,

    /// React Native: styles live in the component via `StyleSheet`.
    ReactNative,

    /// Next.js.
    Next,
}

/// What the detector learned about the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectProfile {
    /// Framework flavor.
    pub kind: ProjectKind,

    /// Whether TypeScript is a dependency.
    pub typescript: bool,
}

#[derive(Debug, Default, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    dependencies: HashMap<String, serde_json::Value>,

    #[serde(default, rename = "devDependencies")]
    dev_dependencies: HashMap<String, serde_json::Value>,
}

impl PackageManifest {
    fn depends_on(&self, name: &str) -> bool {
        self.dependencies.contains_key(name) || self.dev_dependencies.contains_key(name)
    }
}

impl ProjectProfile {
    /// Profile for a known project.
    pub fn new(kind: ProjectKind, typescript: bool) -> Self {
        Self { kind, typescript }
    }

    /// Parse a manifest's dependency tables.
    pub fn from_manifest(json: &str) -> Result<Self> {
        let manifest: PackageManifest = serde_json::from_str(json)?;

        let kind = if manifest.depends_on("react-native") {
            ProjectKind::ReactNative
        } else if manifest.depends_on("next") {
            ProjectKind::Next
        } else {
            ProjectKind::React
        };

        Ok(Self {
            kind,
            typescript: manifest.depends_on("typescript"),
        })
    }

    /// Detect the profile of the project rooted at `root`.
    ///
    /// A missing or unreadable manifest falls back to an untyped React project.
    pub async fn detect(root: &Path) -> Self {
        let manifest_path = root.join(MANIFEST_FILE);

        let content = match tokio::fs::read_to_string(&manifest_path).await {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    "Failed to read {}: {e}; assuming a React project",
                    manifest_path.display()
                );
                return Self::default();
            }
        };

        match Self::from_manifest(&content) {
            Ok(profile) => {
                debug!("Detected project profile: {profile:?}");
                profile
            }
            Err(e) => {
                warn!(
                    "Failed to parse {}: {e}; assuming a React project",
                    manifest_path.display()
                );
                Self::default()
            }
        }
    }

    /// Extension given to index files when none is configured.
    pub fn default_index_extension(self) -> &'static str {
        if self.typescript { ".ts" } else { ".js" }
    }
}
