//! End-to-end runs of the engine over a run-once watch session.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use autosnip_components::{
    ComponentHandler, Engine, HandlerSettings, ProjectKind, ProjectProfile, StyleKind,
    TemplateSource, resolve_index_file_name,
};
use autosnip_directory_watcher::{ComponentEvent, TargetEvent, WatchCoordinator, WatchMode, WatchTarget};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const BUTTON_EXPORT: &str = "export { default as button } from './Button';\n";

fn typescript_react() -> ProjectProfile {
    ProjectProfile::new(ProjectKind::React, true)
}

async fn engine(style: Option<StyleKind>, remove_style: bool) -> Engine {
    let project = typescript_react();
    let settings = HandlerSettings::default()
        .with_index_file_name(resolve_index_file_name(None, project))
        .with_style(style)
        .with_remove_style(remove_style);
    let templates = TemplateSource::resolve(None, project).await.unwrap();
    Engine::new(ComponentHandler::new(settings, templates, project))
}

async fn run_once(engine: &mut Engine, targets: Vec<WatchTarget>) -> usize {
    let mut session = WatchCoordinator::new(targets)
        .establish(WatchMode::Once)
        .unwrap();
    engine.run(&mut session).await.unwrap().events_handled
}

fn components_dir(temp_dir: &TempDir) -> PathBuf {
    let dir = temp_dir.path().join("app").join("components");
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

fn deleted(target: &WatchTarget, path: &Path) -> TargetEvent {
    TargetEvent {
        target: Arc::new(target.clone()),
        event: ComponentEvent::deleted(path),
    }
}

#[tokio::test]
async fn test_new_component_is_filled_and_exported() {
    let temp_dir = TempDir::new().unwrap();
    let dir = components_dir(&temp_dir);
    touch(&dir.join("Button.tsx"));
    let target = WatchTarget::new(&dir)
        .with_snippet_depth(2)
        .with_index_depth(1);
    let mut engine = engine(None, false).await;

    let handled = run_once(&mut engine, vec![target]).await;

    assert_eq!(handled, 1);
    let content = fs::read_to_string(dir.join("Button.tsx")).unwrap();
    assert!(content.contains("const button = ({}: Props) => {"));
    assert!(content.contains("export default button;"));
    assert_eq!(fs::read_to_string(dir.join("index.ts")).unwrap(), BUTTON_EXPORT);
}

#[tokio::test]
async fn test_deleting_components_shrinks_then_removes_index() {
    let temp_dir = TempDir::new().unwrap();
    let dir = components_dir(&temp_dir);
    touch(&dir.join("Button.tsx"));
    touch(&dir.join("Card.tsx"));
    let target = WatchTarget::new(&dir).with_index_depth(1);
    let mut engine = engine(None, false).await;

    run_once(&mut engine, vec![target.clone()]).await;
    assert_eq!(
        fs::read_to_string(dir.join("index.ts")).unwrap(),
        format!("{BUTTON_EXPORT}export {{ default as card }} from './Card';\n")
    );

    fs::remove_file(dir.join("Card.tsx")).unwrap();
    engine
        .dispatch(&deleted(&target, &dir.join("Card.tsx")))
        .await
        .unwrap();
    assert_eq!(fs::read_to_string(dir.join("index.ts")).unwrap(), BUTTON_EXPORT);

    fs::remove_file(dir.join("Button.tsx")).unwrap();
    engine
        .dispatch(&deleted(&target, &dir.join("Button.tsx")))
        .await
        .unwrap();
    assert!(!dir.join("index.ts").exists());
    assert!(engine.registry().is_empty());
}

#[tokio::test]
async fn test_module_style_file_and_import() {
    let temp_dir = TempDir::new().unwrap();
    let dir = components_dir(&temp_dir);
    touch(&dir.join("Card.tsx"));
    let mut engine = engine(Some(StyleKind::ModuleScss), true).await;

    run_once(&mut engine, vec![WatchTarget::new(&dir)]).await;

    assert!(dir.join("Card.module.scss").exists());
    let content = fs::read_to_string(dir.join("Card.tsx")).unwrap();
    assert!(content.starts_with(
        "import React from 'react';\nimport styles from './Card.module.scss';\n"
    ));
}

#[tokio::test]
async fn test_user_files_are_never_cleaned_up() {
    let temp_dir = TempDir::new().unwrap();
    let dir = components_dir(&temp_dir);
    let nav = dir.join("Nav.tsx");
    fs::write(&nav, "export default function Nav() {}\n").unwrap();
    let barrel = "export { default as nav } from './Nav';\n";
    fs::write(dir.join("index.ts"), barrel).unwrap();
    fs::write(dir.join("Nav.css"), "nav {}").unwrap();
    let target = WatchTarget::new(&dir).with_index_depth(0);
    let mut engine = engine(Some(StyleKind::Css), true).await;

    run_once(&mut engine, vec![target.clone()]).await;
    assert_eq!(
        fs::read_to_string(&nav).unwrap(),
        "export default function Nav() {}\n"
    );

    fs::remove_file(&nav).unwrap();
    engine.dispatch(&deleted(&target, &nav)).await.unwrap();

    assert_eq!(fs::read_to_string(dir.join("index.ts")).unwrap(), barrel);
    assert!(dir.join("Nav.css").exists());
}

#[tokio::test]
async fn test_nested_target_uses_its_own_depths() {
    let temp_dir = TempDir::new().unwrap();
    let dir = components_dir(&temp_dir);
    let forms = dir.join("forms");
    touch(&dir.join("Button.tsx"));
    touch(&forms.join("Input.tsx"));
    let mut engine = engine(None, false).await;

    // The outer target alone would leave forms/ without an index file.
    run_once(
        &mut engine,
        vec![
            WatchTarget::new(&dir).with_index_depth(1),
            WatchTarget::new(&forms).with_index_depth(1),
        ],
    )
    .await;

    assert_eq!(fs::read_to_string(dir.join("index.ts")).unwrap(), BUTTON_EXPORT);
    assert_eq!(
        fs::read_to_string(forms.join("index.ts")).unwrap(),
        "export { default as input } from './Input';\n"
    );
}

#[tokio::test]
async fn test_second_run_changes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let dir = components_dir(&temp_dir);
    touch(&dir.join("Button.tsx"));
    let target = WatchTarget::new(&dir);

    let mut first = engine(None, false).await;
    run_once(&mut first, vec![target.clone()]).await;
    let component = fs::read_to_string(dir.join("Button.tsx")).unwrap();

    let mut second = engine(None, false).await;
    run_once(&mut second, vec![target]).await;

    assert_eq!(fs::read_to_string(dir.join("Button.tsx")).unwrap(), component);
    assert_eq!(fs::read_to_string(dir.join("index.ts")).unwrap(), BUTTON_EXPORT);
}
