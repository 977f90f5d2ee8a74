//! Snippet templates.
//!
//! Bundled templates are embedded from `templates/` at build time and looked
//! up by a short case-insensitive key such as `TRAFC`. Anything that is not a
//! key is treated as a path to a user `.tmpl` file. Without an identifier the
//! template is chosen per component from the project conventions.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use include_dir::{Dir, include_dir};
use regex_lite::{Captures, Regex};
use tracing::debug;

use crate::error::{ComponentError, Result};
use crate::fs;
use crate::naming::file_stem;
use crate::project::{ProjectKind, ProjectProfile};

static BUNDLED_TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// `{{ word }}` placeholder.
static PLACEHOLDER: LazyLock<std::result::Result<Regex, regex_lite::Error>> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}"));

/// Extension required for user template files.
pub const TEMPLATE_EXTENSION: &str = "tmpl";

/// Identifier of a bundled template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    /// TypeScript React arrow function component.
    Trafc,
    /// TypeScript React function component.
    Trfc,
    /// TypeScript React Native arrow function component.
    Tnafc,
    /// TypeScript React Native function component.
    Tnfc,
    /// TypeScript Next.js layout.
    Txl,
    /// JavaScript React arrow function component.
    Jrafc,
    /// JavaScript React function component.
    Jrfc,
    /// JavaScript React Native arrow function component.
    Jnafc,
    /// JavaScript React Native function component.
    Jnfc,
    /// JavaScript Next.js layout.
    Jxl,
}

impl TemplateKey {
    pub const ALL: [Self; 10] = [
        Self::Trafc,
        Self::Trfc,
        Self::Tnafc,
        Self::Tnfc,
        Self::Txl,
        Self::Jrafc,
        Self::Jrfc,
        Self::Jnafc,
        Self::Jnfc,
        Self::Jxl,
    ];

    /// Identifier accepted on the command line.
    pub fn id(self) -> &'static str {
        match self {
            Self::Trafc => "TRAFC",
            Self::Trfc => "TRFC",
            Self::Tnafc => "TNAFC",
            Self::Tnfc => "TNFC",
            Self::Txl => "TXL",
            Self::Jrafc => "JRAFC",
            Self::Jrfc => "JRFC",
            Self::Jnafc => "JNAFC",
            Self::Jnfc => "JNFC",
            Self::Jxl => "JXL",
        }
    }

    /// Location of the template inside the bundled directory.
    fn resource(self) -> &'static str {
        match self {
            Self::Trafc => "ts/react/arrowFunctionComponent.tmpl",
            Self::Trfc => "ts/react/functionComponent.tmpl",
            Self::Tnafc => "ts/native/arrowFunctionComponent.tmpl",
            Self::Tnfc => "ts/native/functionComponent.tmpl",
            Self::Txl => "ts/next/layout.tmpl",
            Self::Jrafc => "js/react/arrowFunctionComponent.tmpl",
            Self::Jrfc => "js/react/functionComponent.tmpl",
            Self::Jnafc => "js/native/arrowFunctionComponent.tmpl",
            Self::Jnfc => "js/native/functionComponent.tmpl",
            Self::Jxl => "js/next/layout.tmpl",
        }
    }

    /// Look up a key, ignoring case.
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.id().eq_ignore_ascii_case(id))
    }

    /// Default template for a component file in a project.
    pub fn for_component(path: &Path, project: ProjectKind) -> Self {
        let typescript = path.extension().is_some_and(|ext| ext == "tsx");

        if project == ProjectKind::Next && file_stem(path) == "layout" {
            return if typescript { Self::Txl } else { Self::Jxl };
        }

        match (project, typescript) {
            (ProjectKind::ReactNative, true) => Self::Tnafc,
            (ProjectKind::ReactNative, false) => Self::Jnafc,
            (ProjectKind::React | ProjectKind::Next, true) => Self::Trafc,
            (ProjectKind::React | ProjectKind::Next, false) => Self::Jrafc,
        }
    }

    /// Comma separated list of every key.
    pub fn list() -> String {
        Self::ALL
            .into_iter()
            .map(Self::id)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Template text by key, loaded once from the bundled resources.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: HashMap<TemplateKey, String>,
}

impl TemplateCatalog {
    /// Load every bundled template.
    pub fn bundled() -> Result<Self> {
        let mut templates = HashMap::with_capacity(TemplateKey::ALL.len());
        for key in TemplateKey::ALL {
            let text = BUNDLED_TEMPLATES
                .get_file(key.resource())
                .and_then(include_dir::File::contents_utf8)
                .ok_or_else(|| {
                    ComponentError::Template(format!(
                        "bundled template {} is missing ({})",
                        key.id(),
                        key.resource()
                    ))
                })?;
            templates.insert(key, text.to_string());
        }
        Ok(Self { templates })
    }

    /// Text of a bundled template.
    pub fn get(&self, key: TemplateKey) -> Result<&str> {
        self.templates
            .get(&key)
            .map(String::as_str)
            .ok_or_else(|| ComponentError::Template(format!("unknown template {}", key.id())))
    }
}

/// Where snippet content comes from.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// The same text for every component.
    Fixed(String),

    /// Chosen per component from project conventions.
    Conventional {
        catalog: TemplateCatalog,
        project: ProjectProfile,
    },
}

impl TemplateSource {
    /// Resolve an optional template identifier: a bundled key, a path to a
    /// `.tmpl` file, or nothing for per-component defaults.
    pub async fn resolve(identifier: Option<&str>, project: ProjectProfile) -> Result<Self> {
        let catalog = TemplateCatalog::bundled()?;

        let Some(identifier) = identifier else {
            return Ok(Self::Conventional { catalog, project });
        };

        if let Some(key) = TemplateKey::parse(identifier) {
            debug!("Using bundled template {}", key.id());
            return Ok(Self::Fixed(catalog.get(key)?.to_string()));
        }

        Self::load(Path::new(identifier)).await.map(Self::Fixed)
    }

    /// Load a user template file.
    async fn load(path: &Path) -> Result<String> {
        if !fs::exists(path).await? {
            return Err(ComponentError::Template(format!(
                "template file does not exist: {} (bundled templates: {})",
                path.display(),
                TemplateKey::list()
            )));
        }
        if path.extension().is_none_or(|ext| ext != TEMPLATE_EXTENSION) {
            return Err(ComponentError::Template(format!(
                "template file must be a .{TEMPLATE_EXTENSION} file: {}",
                path.display()
            )));
        }

        debug!("Loading template {}", path.display());
        fs::read(path).await
    }

    /// Raw template text for a component file.
    pub fn content_for(&self, component: &Path) -> Result<&str> {
        match self {
            Self::Fixed(text) => Ok(text),
            Self::Conventional { catalog, project } => {
                catalog.get(TemplateKey::for_component(component, project.kind))
            }
        }
    }
}

/// Replace `{{ name }}` placeholders. Other placeholders are left as written.
pub fn compile(template: &str, name: &str) -> Result<String> {
    let placeholder = PLACEHOLDER.as_ref().map_err(Clone::clone)?;
    let compiled = placeholder.replace_all(template, |caps: &Captures<'_>| {
        if &caps[1] == "name" {
            name.to_string()
        } else {
            caps[0].to_string()
        }
    });
    Ok(compiled.into_owned())
}
