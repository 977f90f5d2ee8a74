//! Paired style files and style imports.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ComponentError, Result};
use crate::fs;
use crate::naming::file_stem;
use crate::project::ProjectKind;
use crate::registry::KnownFiles;

/// Library that provides `StyleSheet` in React Native projects.
const NATIVE_STYLE_LIBRARY: &str = "react-native";

/// Placeholder appended when a native component has no stylesheet yet.
const NATIVE_STYLESHEET: &str = "const styles = StyleSheet.create({ /* Add your styles here */ });";

/// A named import line from the native library.
static NATIVE_LIBRARY_IMPORT: LazyLock<std::result::Result<Regex, regex_lite::Error>> =
    LazyLock::new(|| {
        Regex::new(&format!(
            r#"^\s*import\s+\{{[^}}]*\}}\s+from\s+['"]{NATIVE_STYLE_LIBRARY}['"];?\s*$"#
        ))
    });

/// Supported styling languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleKind {
    #[default]
    Css,
    Scss,
    Sass,
    Less,
    Styl,
    ModuleCss,
    ModuleScss,
    ModuleSass,
    ModuleLess,
    ModuleStyl,
}

impl StyleKind {
    pub const ALL: [Self; 10] = [
        Self::Css,
        Self::Scss,
        Self::Sass,
        Self::Less,
        Self::Styl,
        Self::ModuleCss,
        Self::ModuleScss,
        Self::ModuleSass,
        Self::ModuleLess,
        Self::ModuleStyl,
    ];

    /// Name accepted on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Scss => "scss",
            Self::Sass => "sass",
            Self::Less => "less",
            Self::Styl => "styl",
            Self::ModuleCss => "module-css",
            Self::ModuleScss => "module-scss",
            Self::ModuleSass => "module-sass",
            Self::ModuleLess => "module-less",
            Self::ModuleStyl => "module-styl",
        }
    }

    /// File extension, including the leading dot: `module-scss` is `.module.scss`.
    pub fn extension(self) -> String {
        format!(".{}", self.as_str().replacen('-', ".", 1))
    }

    /// Module kinds are imported as a named `styles` object.
    pub fn is_module(self) -> bool {
        matches!(
            self,
            Self::ModuleCss | Self::ModuleScss | Self::ModuleSass | Self::ModuleLess | Self::ModuleStyl
        )
    }
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleKind {
    type Err = ComponentError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ComponentError::InvalidStyle {
                given: s.to_string(),
                valid: Self::ALL.map(Self::as_str).join(", "),
            })
    }
}

/// Path of the style file paired with a component.
pub fn style_path(component: &Path, kind: StyleKind) -> PathBuf {
    let name = format!("{}{}", file_stem(component), kind.extension());
    component.with_file_name(name)
}

/// Creates and removes style files and wires their imports into snippets.
#[derive(Debug, Clone, Copy)]
pub struct StyleManager {
    kind: StyleKind,
    project: ProjectKind,
}

impl StyleManager {
    pub fn new(kind: StyleKind, project: ProjectKind) -> Self {
        Self { kind, project }
    }

    pub fn kind(self) -> StyleKind {
        self.kind
    }

    /// Style file for a component.
    pub fn style_path(self, component: &Path) -> PathBuf {
        style_path(component, self.kind)
    }

    /// Create an empty sibling style file and register it.
    ///
    /// A style file that already exists is left untouched and stays
    /// unregistered, so it is never deleted with the component. Its path is
    /// still returned so the import gets wired up. React Native keeps styles
    /// inside the component, so nothing is created and `None` is returned.
    pub async fn create_paired(
        self,
        component: &Path,
        registry: &mut KnownFiles,
    ) -> Result<Option<PathBuf>> {
        if self.project == ProjectKind::ReactNative {
            return Ok(None);
        }

        let path = self.style_path(component);
        if fs::create_new(&path).await? {
            registry.insert(&path);
            info!("Created style file for {}", component.display());
        } else {
            info!("Keeping existing style file {}", path.display());
        }
        Ok(Some(path))
    }

    /// Delete a tool-created style file and forget it.
    pub async fn remove_paired(self, style: &Path, registry: &mut KnownFiles) -> Result<()> {
        match fs::remove(style).await {
            Ok(()) => info!("Removed style file {}", style.display()),
            Err(e) if e.is_not_found() => {
                debug!("Style file {} was already gone", style.display());
            }
            Err(e) => return Err(e),
        }
        registry.remove(style);
        Ok(())
    }

    /// Add the style import to generated content.
    pub fn inject_import(self, content: &str, style: Option<&Path>) -> Result<String> {
        if self.project == ProjectKind::ReactNative {
            return inject_native_stylesheet(content);
        }

        let Some(style) = style else {
            return Ok(content.to_string());
        };
        let file_name = style
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let import = if self.kind.is_module() {
            format!("import styles from './{file_name}';")
        } else {
            format!("import './{file_name}';")
        };

        let mut lines: Vec<&str> = content.split('\n').collect();
        let position = lines
            .iter()
            .rposition(|line| line.trim_start().starts_with("import "))
            .map_or(0, |last| last + 1);
        lines.insert(position, &import);
        Ok(lines.join("\n"))
    }

    /// Create the paired file and add its import in one step.
    pub async fn attach(
        self,
        component: &Path,
        content: &str,
        registry: &mut KnownFiles,
    ) -> Result<String> {
        let style = self.create_paired(component, registry).await?;
        self.inject_import(content, style.as_deref())
    }
}

/// Make sure content imports `StyleSheet` and constructs a stylesheet.
fn inject_native_stylesheet(content: &str) -> Result<String> {
    let library_import = NATIVE_LIBRARY_IMPORT.as_ref().map_err(Clone::clone)?;

    let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();

    match lines.iter().position(|line| library_import.is_match(line)) {
        Some(index) => {
            let line = &lines[index];
            let extended = match line.find('}') {
                Some(close) if !line.contains("StyleSheet") => {
                    let names = line[..close].trim_end();
                    Some(format!("{names}, StyleSheet {}", &line[close..]))
                }
                _ => None,
            };
            if let Some(extended) = extended {
                lines[index] = extended;
            }
        }
        None => {
            lines.insert(0, format!("import {{ StyleSheet }} from '{NATIVE_STYLE_LIBRARY}';"));
        }
    }

    if !lines.iter().any(|line| line.contains("StyleSheet.create")) {
        lines.push(String::new());
        lines.push(NATIVE_STYLESHEET.to_string());
    }

    Ok(lines.join("\n"))
}
