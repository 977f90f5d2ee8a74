//! Command line arguments.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use autosnip_components::{
    HandlerSettings, ProjectProfile, StyleKind, TemplateKey, resolve_index_file_name,
};
use autosnip_directory_watcher::{DEFAULT_DEPTH, WatchTarget};
use clap::Parser;
use path_absolutize::Absolutize;

/// Fill new React component files from templates and keep index files in sync.
#[derive(Debug, Parser)]
#[command(name = "autosnip", version, after_help = template_help())]
pub struct Cli {
    /// Directories to watch for components
    #[arg(short = 'd', long = "directory", value_name = "DIR", num_args = 1.., required = true)]
    pub directories: Vec<PathBuf>,

    /// Bundled template key or path to a .tmpl file
    #[arg(short, long, value_name = "TEMPLATE")]
    pub template: Option<String>,

    /// Keep watching after existing files are handled
    #[arg(short, long)]
    pub watch: bool,

    /// Index file name, `index.ts` or `index.js` by default
    #[arg(short, long, value_name = "NAME")]
    pub index: Option<String>,

    /// How deep to watch each directory, paired with --directory by position
    #[arg(long, value_name = "N", num_args = 1.., value_parser = parse_snippet_depth)]
    pub snippet_depth: Vec<usize>,

    /// How deep to keep index files in each directory, paired with --directory by position
    #[arg(long, value_name = "N", num_args = 1..)]
    pub index_depth: Vec<usize>,

    /// Create a style file next to new components (css when no kind is given)
    #[arg(
        long,
        value_name = "KIND",
        num_args = 0..=1,
        default_missing_value = "css",
        value_parser = StyleKind::from_str
    )]
    pub style: Option<StyleKind>,

    /// Delete tool-created style files together with their component
    #[arg(long)]
    pub remove_style: bool,

    /// Directory containing package.json, the working directory by default
    #[arg(long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

fn template_help() -> String {
    format!("Bundled templates: {}", TemplateKey::list())
}

fn parse_snippet_depth(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("snippet depth must be at least 1".to_string()),
        Ok(depth) => Ok(depth),
        Err(e) => Err(e.to_string()),
    }
}

impl Cli {
    /// Watch targets with depths paired by position and paths made absolute.
    pub fn targets(&self, cwd: &Path) -> std::io::Result<Vec<WatchTarget>> {
        self.directories
            .iter()
            .enumerate()
            .map(|(position, dir)| {
                let path = dir.absolutize_from(cwd)?.into_owned();
                Ok(WatchTarget::new(path)
                    .with_snippet_depth(depth_at(&self.snippet_depth, position))
                    .with_index_depth(depth_at(&self.index_depth, position)))
            })
            .collect()
    }

    /// Project root used for detection.
    pub fn project_root(&self, cwd: &Path) -> std::io::Result<PathBuf> {
        match &self.project_root {
            Some(root) => Ok(root.absolutize_from(cwd)?.into_owned()),
            None => Ok(cwd.to_path_buf()),
        }
    }

    pub fn handler_settings(&self, project: ProjectProfile) -> HandlerSettings {
        HandlerSettings::default()
            .with_index_file_name(resolve_index_file_name(self.index.as_deref(), project))
            .with_style(self.style)
            .with_remove_style(self.remove_style)
    }
}

fn depth_at(depths: &[usize], position: usize) -> usize {
    depths.get(position).copied().unwrap_or(DEFAULT_DEPTH)
}
