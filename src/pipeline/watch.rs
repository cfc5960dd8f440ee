//! Watch mode: rebuild when the icon directory changes.
//!
//! notify events are bridged into a crossbeam channel and fed through a
//! [`Debouncer`]. A rebuild runs once events settle for [`DEBOUNCE_MS`] and
//! at least [`REBUILD_COOLDOWN_MS`] after the previous one.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossbeam::channel::{self, Receiver};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashMap;

use super::{BuildReport, BuildSession};
use crate::core::is_shutdown;
use crate::logger::{status_error, status_success, status_unchanged, status_warning};
use crate::utils::path::normalize_path;
use crate::utils::plural::plural_count;
use crate::{debug, log};

pub const DEBOUNCE_MS: u64 = 300;
pub const REBUILD_COOLDOWN_MS: u64 = 800;

/// What happened to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// Timing and deduplication of raw events under one source root.
pub struct Debouncer {
    source: PathBuf,
    /// Generated files and directories, never a reason to rebuild.
    ignored: Vec<PathBuf>,
    changes: FxHashMap<PathBuf, ChangeKind>,
    last_event: Option<Instant>,
    last_build: Option<Instant>,
}

impl Debouncer {
    pub fn new(source: PathBuf, ignored: Vec<PathBuf>) -> Self {
        Self {
            source,
            ignored,
            changes: FxHashMap::default(),
            last_event: None,
            last_build: None,
        }
    }

    pub fn add_event(&mut self, event: &notify::Event) {
        use notify::EventKind;

        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Removed,
            EventKind::Modify(modify) => {
                // mtime/chmod noise
                if matches!(modify, notify::event::ModifyKind::Metadata(_)) {
                    return;
                }
                ChangeKind::Modified
            }
            _ => return,
        };

        for path in &event.paths {
            self.add_path(path, kind);
        }
    }

    /// Record one change, folding it into any pending change for the same path:
    /// removed then created is a restore, modified then removed is a removal,
    /// created then removed cancels out. Otherwise the first event wins.
    pub fn add_path(&mut self, path: &Path, kind: ChangeKind) {
        if is_temp_file(path) {
            return;
        }
        let path = normalize_event_path(path);
        if !path.starts_with(&self.source) || self.ignored.iter().any(|p| path.starts_with(p)) {
            return;
        }

        match self.changes.get(&path).copied() {
            None => {
                debug!("watch"; "{}: {}", kind.label(), path.display());
                self.changes.insert(path, kind);
            }
            Some(ChangeKind::Removed)
                if matches!(kind, ChangeKind::Created | ChangeKind::Modified) =>
            {
                self.changes.insert(path, kind);
            }
            Some(ChangeKind::Modified) if kind == ChangeKind::Removed => {
                self.changes.insert(path, ChangeKind::Removed);
            }
            Some(ChangeKind::Created) if kind == ChangeKind::Removed => {
                self.changes.remove(&path);
            }
            Some(_) => return,
        }
        self.last_event = Some(Instant::now());
    }

    /// Pending changes, once debounce and cooldown have both elapsed.
    pub fn take_if_ready(&mut self) -> Option<FxHashMap<PathBuf, ChangeKind>> {
        if !self.is_ready() {
            return None;
        }
        let changes = std::mem::take(&mut self.changes);
        self.last_event = None;
        self.last_build = Some(Instant::now());
        Some(changes)
    }

    pub fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };
        if last_event.elapsed() < Duration::from_millis(DEBOUNCE_MS) {
            return false;
        }
        if let Some(last_build) = self.last_build
            && last_build.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS)
        {
            return false;
        }
        !self.changes.is_empty()
    }

    /// Time until the pending changes could become ready.
    pub fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86400);
        };

        let debounce_remaining =
            Duration::from_millis(DEBOUNCE_MS).saturating_sub(last_event.elapsed());
        let cooldown_remaining = self
            .last_build
            .map(|t| Duration::from_millis(REBUILD_COOLDOWN_MS).saturating_sub(t.elapsed()))
            .unwrap_or(Duration::ZERO);

        debounce_remaining
            .max(cooldown_remaining)
            .max(Duration::from_millis(1))
    }

    pub fn pending(&self) -> usize {
        self.changes.len()
    }
}

/// Editor artifacts and hidden files.
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// Removed paths no longer canonicalize, so resolve their parent instead.
fn normalize_event_path(path: &Path) -> PathBuf {
    if path.exists() {
        return normalize_path(path);
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => normalize_path(parent).join(name),
        _ => normalize_path(path),
    }
}

/// Where the watcher is attached.
///
/// A missing source directory is watched through its closest existing
/// ancestor until it appears.
fn watch_target(source: &Path) -> (PathBuf, RecursiveMode) {
    if source.is_dir() {
        return (source.to_path_buf(), RecursiveMode::Recursive);
    }
    let ancestor = source
        .ancestors()
        .skip(1)
        .find(|dir| dir.is_dir())
        .unwrap_or(source);
    (ancestor.to_path_buf(), RecursiveMode::NonRecursive)
}

/// Watch the session's source directory and rebuild until shutdown.
///
/// Blocks the calling thread. `shutdown` ends the loop when it receives or
/// disconnects.
pub fn run(session: &BuildSession, shutdown: Option<Receiver<()>>) -> Result<()> {
    session.register_watcher()?;

    let config = session.config();
    let source = config.build.source.clone();
    let mut ignored = vec![config.build.types.clone()];
    ignored.extend(config.build.manifest.clone());
    let (event_tx, event_rx) = channel::unbounded();
    let mut watcher: RecommendedWatcher = notify::recommended_watcher(move |res| {
        let _ = event_tx.send(res);
    })
    .context("failed to create file watcher")?;

    let (mut target, mode) = watch_target(&source);
    watcher
        .watch(&target, mode)
        .with_context(|| format!("failed to watch `{}`", target.display()))?;
    let mut waiting_for_source = mode == RecursiveMode::NonRecursive;

    // Sprites written inside the source tree
    if !source.starts_with(&config.build.output) {
        ignored.push(config.build.output.clone());
    }
    let mut debouncer = Debouncer::new(source.clone(), ignored);
    if waiting_for_source {
        log!("watch"; "waiting for `{}`", config.root_relative(&source));
    } else {
        log!("watch"; "watching `{}`", config.root_relative(&source));
    }

    let shutdown = shutdown.unwrap_or_else(channel::never);
    loop {
        if is_shutdown() {
            break;
        }

        channel::select! {
            recv(event_rx) -> msg => match msg {
                Ok(Ok(event)) => debouncer.add_event(&event),
                Ok(Err(e)) => status_warning(&format!("watch error: {e}")),
                Err(_) => break,
            },
            recv(shutdown) -> _ => break,
            default(debouncer.sleep_duration()) => {}
        }

        let Some(changes) = debouncer.take_if_ready() else {
            continue;
        };

        if waiting_for_source && source.is_dir() {
            let _ = watcher.unwatch(&target);
            target = source.clone();
            watcher
                .watch(&target, RecursiveMode::Recursive)
                .with_context(|| format!("failed to watch `{}`", target.display()))?;
            waiting_for_source = false;
            log!("watch"; "watching `{}`", config.root_relative(&source));
        }

        rebuild(session, &changes);
    }

    debug!("watch"; "stopped");
    Ok(())
}

fn rebuild(session: &BuildSession, changes: &FxHashMap<PathBuf, ChangeKind>) {
    let config = session.config();
    if changes.len() == 1
        && let Some((path, kind)) = changes.iter().next()
    {
        log!("watch"; "{} {}", kind.label(), config.root_relative(path));
    } else {
        log!("watch"; "{} changed", plural_count(changes.len(), "file"));
    }

    match session.run() {
        Ok(report) => report_status(&report),
        Err(e) => status_error("build failed", &format!("{e:#}")),
    }
}

fn report_status(report: &BuildReport) {
    if !report.is_success() {
        let detail = report
            .write_errors
            .iter()
            .map(|e| format!("{e}: {}", e.1))
            .collect::<Vec<_>>()
            .join("\n");
        status_error("failed to write sprites", &detail);
        return;
    }

    let summary = format!(
        "{} in {}",
        plural_count(report.names.len(), "icon"),
        plural_count(report.namespace_count(), "namespace")
    );
    if report.changed() {
        status_success(&format!("rebuilt {summary}"));
    } else {
        status_unchanged(&format!("no changes, {summary}"));
    }
}
