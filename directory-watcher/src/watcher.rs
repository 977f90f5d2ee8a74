//! Watch coordination across multiple targets.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::{WatchMode, WatchTarget, exclusions_for, is_excluded, order_targets};
use crate::error::{Result, WatcherError};
use crate::event::{ComponentEvent, DirectoryChanges, TargetEvent};
use crate::scanner::InitialScan;

/// Capacity of the shared event channel.
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Starts one watcher per target and funnels their events into one channel.
///
/// Targets are ordered ancestors first. The watcher for a target ignores
/// everything under the targets that follow it, so a nested, explicitly
/// configured directory is handled only by its own watcher and with its own
/// depths.
pub struct WatchCoordinator {
    /// Ordered targets.
    targets: Vec<Arc<WatchTarget>>,
}

impl WatchCoordinator {
    /// Create a coordinator, ordering the targets.
    pub fn new(targets: Vec<WatchTarget>) -> Self {
        Self {
            targets: order_targets(targets).into_iter().map(Arc::new).collect(),
        }
    }

    /// Validate targets and create a coordinator over their canonical paths.
    ///
    /// Backends report resolved paths, so a root given through a symlink or
    /// `..` must be resolved before depths and exclusions are compared.
    pub fn resolve(targets: Vec<WatchTarget>) -> Result<Self> {
        if targets.is_empty() {
            return Err(WatcherError::NoTargets);
        }
        let targets = targets
            .into_iter()
            .map(WatchTarget::canonicalize)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(targets))
    }

    /// Targets in processing order.
    pub fn targets(&self) -> &[Arc<WatchTarget>] {
        &self.targets
    }

    /// Validate every target. The first invalid one aborts.
    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(WatcherError::NoTargets);
        }
        for target in &self.targets {
            target.validate()?;
        }
        Ok(())
    }

    /// Start watching.
    ///
    /// Every target is validated before anything starts. Existing files are
    /// reported as created events first. In [`WatchMode::Once`] the session
    /// ends once every initial scan has been delivered; in
    /// [`WatchMode::Continuous`] live watchers stay registered until the
    /// session is closed or dropped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn establish(&self, mode: WatchMode) -> Result<WatchSession> {
        self.validate()?;

        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let plain: Vec<WatchTarget> = self.targets.iter().map(|t| (**t).clone()).collect();
        let mut watchers = Vec::new();
        let mut scans = Vec::with_capacity(self.targets.len());

        for (index, target) in self.targets.iter().enumerate() {
            let excludes = exclusions_for(&plain, index);

            // Register the live watcher before scanning so nothing created
            // during startup slips between the two.
            if mode == WatchMode::Continuous {
                let watcher = Self::watch_target(target.clone(), excludes.clone(), event_tx.clone())?;
                debug!("Started watching: {}", target.path.display());
                watchers.push(watcher);
            }

            scans.push(Self::spawn_scan(target.clone(), excludes, event_tx.clone()));
        }

        info!(
            "Directory watcher started for {} target(s) ({mode:?})",
            self.targets.len()
        );

        Ok(WatchSession {
            events: event_rx,
            watchers,
            scans,
            mode,
        })
    }

    /// Report existing files of one target.
    fn spawn_scan(
        target: Arc<WatchTarget>,
        excludes: Vec<PathBuf>,
        event_tx: mpsc::Sender<TargetEvent>,
    ) -> JoinHandle<()> {
        tokio::task::spawn_blocking(move || {
            let components = InitialScan::new(&target, &excludes).components();
            for path in components {
                let event = TargetEvent {
                    target: target.clone(),
                    event: ComponentEvent::created(path),
                };
                if event_tx.blocking_send(event).is_err() {
                    debug!("Event receiver closed during scan of {}", target.path.display());
                    break;
                }
            }
        })
    }

    /// Register a recursive notify watcher for one target.
    fn watch_target(
        target: Arc<WatchTarget>,
        excludes: Vec<PathBuf>,
        event_tx: mpsc::Sender<TargetEvent>,
    ) -> Result<RecommendedWatcher> {
        let root = target.path.clone();
        let mode = if target.snippet_depth <= 1 {
            RecursiveMode::NonRecursive
        } else {
            RecursiveMode::Recursive
        };

        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    for component in Self::translate(&target, &excludes, &event) {
                        let tagged = TargetEvent {
                            target: target.clone(),
                            event: component,
                        };
                        if let Err(e) = event_tx.blocking_send(tagged) {
                            error!("Failed to send component event: {e}");
                        }
                    }
                }
                Err(e) => {
                    warn!("Watch error: {e}");
                }
            },
        )?;

        watcher.watch(&root, mode)?;
        Ok(watcher)
    }

    /// Component events a target's watcher reports for one notify event.
    ///
    /// A directory that appears is walked for the components it brings
    /// along. A path that vanishes without being a component file is passed
    /// on as a deletion so the consumer can drop what it knew beneath it.
    fn translate(
        target: &WatchTarget,
        excludes: &[PathBuf],
        event: &notify::Event,
    ) -> Vec<ComponentEvent> {
        let mut components = ComponentEvent::from_notify(event);

        let directories = DirectoryChanges::from_notify(event);
        if !directories.is_empty() {
            let scan = InitialScan::new(target, excludes);
            components.extend(directories.vanished.into_iter().map(ComponentEvent::deleted));
            for dir in &directories.appeared {
                let found = scan.components_under(dir);
                debug!("{} appeared with {} component(s)", dir.display(), found.len());
                components.extend(found.into_iter().map(ComponentEvent::created));
            }
        }

        components.retain(|component| Self::owns(target, excludes, &component.path));
        components
    }

    /// Whether an event path belongs to this target's watcher.
    fn owns(target: &WatchTarget, excludes: &[PathBuf], path: &Path) -> bool {
        target.watches(path) && !is_excluded(path, excludes)
    }
}

/// A running set of watchers.
pub struct WatchSession {
    /// Events from every target.
    events: mpsc::Receiver<TargetEvent>,

    /// Live watchers; dropping them stops notification.
    watchers: Vec<RecommendedWatcher>,

    /// Initial scan tasks.
    scans: Vec<JoinHandle<()>>,

    mode: WatchMode,
}

impl WatchSession {
    /// Receive the next event.
    ///
    /// Returns `None` once every source is finished: in run-once mode after
    /// the initial scans, in continuous mode only after [`close`](Self::close).
    pub async fn next_event(&mut self) -> Option<TargetEvent> {
        self.events.recv().await
    }

    /// The mode the session was started in.
    pub fn mode(&self) -> WatchMode {
        self.mode
    }

    /// Whether all initial scans have finished delivering events.
    pub fn scans_finished(&self) -> bool {
        self.scans.iter().all(JoinHandle::is_finished)
    }

    /// Stop live watchers. Already queued events can still be received.
    pub fn close(&mut self) {
        if !self.watchers.is_empty() {
            info!("Stopping {} directory watcher(s)", self.watchers.len());
        }
        self.watchers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ComponentEventKind;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    async fn drain(session: &mut WatchSession) -> Vec<TargetEvent> {
        let mut events = Vec::new();
        while let Some(event) = session.next_event().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_establish_rejects_invalid_root_before_starting() {
        let temp_dir = TempDir::new().unwrap();
        let coordinator = WatchCoordinator::new(vec![
            WatchTarget::new(temp_dir.path()),
            WatchTarget::new(temp_dir.path().join("missing")),
        ]);

        let result = coordinator.establish(WatchMode::Once);
        assert!(matches!(result, Err(WatcherError::DirectoryNotFound(_))));
    }

    #[tokio::test]
    async fn test_empty_target_list_is_rejected() {
        let coordinator = WatchCoordinator::new(Vec::new());
        assert!(matches!(coordinator.validate(), Err(WatcherError::NoTargets)));
    }

    #[tokio::test]
    async fn test_run_once_routes_nested_files_to_nested_target() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();
        let nested = root.join("ui");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.join("App.tsx"), "").unwrap();
        fs::write(nested.join("Button.tsx"), "").unwrap();

        // Configured inner-first; the coordinator reorders.
        let coordinator = WatchCoordinator::new(vec![
            WatchTarget::new(&nested).with_index_depth(3),
            WatchTarget::new(&root).with_index_depth(1),
        ]);
        assert_eq!(coordinator.targets()[0].path, root);

        let mut session = coordinator.establish(WatchMode::Once).unwrap();
        assert_eq!(session.mode(), WatchMode::Once);
        let mut events = drain(&mut session).await;
        events.sort_by(|a, b| a.event.path.cmp(&b.event.path));

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event.path, root.join("App.tsx"));
        assert_eq!(events[0].target.index_depth, 1);
        assert_eq!(events[1].event.path, nested.join("Button.tsx"));
        assert_eq!(events[1].target.path, nested);
        assert_eq!(events[1].target.index_depth, 3);
        assert!(
            events
                .iter()
                .all(|e| e.event.kind == ComponentEventKind::Created)
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_root_is_resolved_before_exclusion() {
        let temp_dir = TempDir::new().unwrap();
        let real = temp_dir.path().join("real");
        let nested = real.join("ui");
        fs::create_dir_all(&nested).unwrap();
        fs::write(real.join("App.tsx"), "").unwrap();
        fs::write(nested.join("Button.tsx"), "").unwrap();
        let link = temp_dir.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let coordinator =
            WatchCoordinator::resolve(vec![WatchTarget::new(&link), WatchTarget::new(&nested)])
                .unwrap();
        let canonical = fs::canonicalize(&real).unwrap();
        assert_eq!(coordinator.targets()[0].path, canonical);

        let mut session = coordinator.establish(WatchMode::Once).unwrap();
        let mut events = drain(&mut session).await;
        events.sort_by(|a, b| a.event.path.cmp(&b.event.path));

        // Button.tsx is reported once, by the nested target only.
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event.path, canonical.join("App.tsx"));
        assert_eq!(events[0].target.path, canonical);
        assert_eq!(events[1].event.path, canonical.join("ui").join("Button.tsx"));
        assert_eq!(events[1].target.path, canonical.join("ui"));
    }

    #[tokio::test]
    async fn test_resolve_rejects_empty_and_missing_targets() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            WatchCoordinator::resolve(Vec::new()),
            Err(WatcherError::NoTargets)
        ));
        assert!(matches!(
            WatchCoordinator::resolve(vec![WatchTarget::new(temp_dir.path().join("missing"))]),
            Err(WatcherError::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn test_directory_moves_expand_to_component_events() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();
        let forms = root.join("forms");
        fs::create_dir_all(forms.join("fields")).unwrap();
        fs::write(forms.join("Input.tsx"), "").unwrap();
        fs::write(forms.join("fields").join("Select.tsx"), "").unwrap();
        fs::write(forms.join("index.ts"), "").unwrap();
        let target = WatchTarget::new(&root).with_snippet_depth(2);

        let moved_in = notify::Event::new(notify::EventKind::Modify(
            notify::event::ModifyKind::Name(notify::event::RenameMode::To),
        ))
        .add_path(forms.clone());
        assert_eq!(
            WatchCoordinator::translate(&target, &[], &moved_in),
            vec![ComponentEvent::created(forms.join("Input.tsx"))]
        );

        let moved_away = notify::Event::new(notify::EventKind::Modify(
            notify::event::ModifyKind::Name(notify::event::RenameMode::From),
        ))
        .add_path(root.join("cards"));
        assert_eq!(
            WatchCoordinator::translate(&target, &[], &moved_away),
            vec![ComponentEvent::deleted(root.join("cards"))]
        );

        // A directory owned by a nested target is left to that target.
        assert!(WatchCoordinator::translate(&target, &[forms], &moved_in).is_empty());
    }

    #[tokio::test]
    async fn test_continuous_mode_reports_moved_in_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("components");
        let staging = temp_dir.path().join("staging").join("forms");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&staging).unwrap();
        fs::write(staging.join("Input.tsx"), "").unwrap();

        let coordinator = WatchCoordinator::resolve(vec![WatchTarget::new(&root)]).unwrap();
        let root = coordinator.targets()[0].path.clone();
        let mut session = coordinator.establish(WatchMode::Continuous).unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        fs::rename(&staging, root.join("forms")).unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                match session.next_event().await {
                    Some(event) if event.event.kind == ComponentEventKind::Created => {
                        return Some(event);
                    }
                    Some(_) => continue,
                    None => return None,
                }
            }
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(event.event.path, root.join("forms").join("Input.tsx"));
        session.close();
    }

    #[tokio::test]
    async fn test_continuous_mode_reports_deleted_files() {
        let temp_dir = TempDir::new().unwrap();
        let coordinator = WatchCoordinator::resolve(vec![WatchTarget::new(temp_dir.path())]).unwrap();
        let card = coordinator.targets()[0].path.join("Card.tsx");
        fs::write(&card, "").unwrap();
        let mut session = coordinator.establish(WatchMode::Continuous).unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        fs::remove_file(&card).unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                match session.next_event().await {
                    Some(event) if event.event.kind == ComponentEventKind::Deleted => {
                        return Some(event);
                    }
                    Some(_) => continue,
                    None => return None,
                }
            }
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(event.event, ComponentEvent::deleted(&card));
        session.close();
    }

    #[tokio::test]
    async fn test_continuous_mode_reports_new_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();

        let coordinator = WatchCoordinator::new(vec![WatchTarget::new(&root)]);
        let mut session = coordinator.establish(WatchMode::Continuous).unwrap();

        // Give the backend a moment to register before touching the tree.
        tokio::time::sleep(Duration::from_millis(200)).await;
        fs::write(root.join("Card.tsx"), "").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                match session.next_event().await {
                    Some(event) if event.event.kind == ComponentEventKind::Created => {
                        return Some(event);
                    }
                    Some(_) => continue,
                    None => return None,
                }
            }
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(
            event.event.path.file_name().unwrap(),
            std::ffi::OsStr::new("Card.tsx")
        );
        session.close();
    }
}
