// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::WatchSection;
use crate::engine::Orchestrator;
use crate::errors::{PoulError, Result};
use crate::exec::StepExecutor;
use crate::pattern::clean_path;
use crate::watch::debounce::Debouncer;
use crate::watch::dispatch::{DispatchReport, dispatch_path};
use crate::watch::hash::ContentHashes;
use crate::watch::path_utils::{is_excluded, relative_str};

/// Everything the watch loop needs besides the orchestrator.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Directory observed recursively.
    pub root: PathBuf,
    /// Event paths are made relative to this before dispatch; rule patterns
    /// are written relative to it (the working directory).
    pub base: PathBuf,
    /// Relative paths ignored together with everything below them.
    pub excludes: Vec<String>,
    pub settle: Duration,
    pub tick: Duration,
    pub use_hash: bool,
}

impl WatchOptions {
    /// Watch `root` with the `[watch]` settings, relative to the current
    /// working directory.
    pub fn new(root: impl Into<PathBuf>, section: &WatchSection) -> Result<Self> {
        let base = std::env::current_dir()?;
        let base = base.canonicalize().unwrap_or(base);
        let root = root.into();

        Ok(Self {
            root: root.canonicalize().unwrap_or(root),
            base,
            excludes: section.exclude.clone(),
            settle: section.settle(),
            tick: section.tick(),
            use_hash: section.use_hash,
        })
    }
}

/// Watch `options.root` and dispatch every settled change to `orch`.
///
/// Runs until the watcher reports an error, which is returned.
pub async fn watch<E>(orch: Arc<Orchestrator<E>>, options: WatchOptions) -> Result<()>
where
    E: StepExecutor + 'static,
{
    let (event_tx, event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

    // notify calls this on its own thread.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if event_tx.send(res).is_err() {
                eprintln!("poul: watch loop is gone; dropping file event");
            }
        },
        Config::default(),
    )?;
    watcher.watch(&options.root, RecursiveMode::Recursive)?;
    info!(root = ?options.root, "watching for changes");

    let result = run_event_loop(orch, &options, event_rx).await;
    drop(watcher);
    result
}

/// The loop behind [`watch`], fed from any channel of notify events.
///
/// This task is the only owner of the pending-changes map. It interleaves
/// receiving events with a periodic tick that hands settled paths to
/// concurrently running dispatches. When the channel closes, every pending
/// path is dispatched and the loop waits for all dispatches before
/// returning.
pub async fn run_event_loop<E>(
    orch: Arc<Orchestrator<E>>,
    options: &WatchOptions,
    mut events: mpsc::UnboundedReceiver<notify::Result<Event>>,
) -> Result<()>
where
    E: StepExecutor + 'static,
{
    let mut debouncer = Debouncer::new(options.settle);
    let hashes = Arc::new(Mutex::new(ContentHashes::new()));
    let mut dispatches: JoinSet<Option<DispatchReport>> = JoinSet::new();

    let mut ticker = tokio::time::interval(options.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            received = events.recv() => match received {
                Some(Ok(event)) => record_event(&mut debouncer, options, &event, Instant::now()),
                Some(Err(err)) => {
                    error!(error = %err, "file watcher failed");
                    return Err(PoulError::Watch(err));
                }
                None => {
                    debug!(pending = debouncer.len(), "event stream closed; flushing pending paths");
                    for path in debouncer.drain_all() {
                        spawn_dispatch(&mut dispatches, &orch, &hashes, options.use_hash, path);
                    }
                    break;
                }
            },
            _ = ticker.tick() => {
                for path in debouncer.drain_settled(Instant::now()) {
                    spawn_dispatch(&mut dispatches, &orch, &hashes, options.use_hash, path);
                }
            }
            Some(joined) = dispatches.join_next(), if !dispatches.is_empty() => {
                log_joined(joined);
            }
        }
    }

    while let Some(joined) = dispatches.join_next().await {
        log_joined(joined);
    }
    Ok(())
}

/// Content-changing kinds: creation, data writes and renames.
fn is_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        _ => false,
    }
}

fn record_event(debouncer: &mut Debouncer, options: &WatchOptions, event: &Event, now: Instant) {
    if !is_change(&event.kind) {
        return;
    }

    for path in &event.paths {
        let rel = event_path(&options.base, path);
        if is_excluded(&rel, &options.excludes) {
            debug!(path = %rel, "excluded; ignoring event");
            continue;
        }
        debug!(path = %rel, kind = ?event.kind, "change recorded");
        debouncer.record(rel, now);
    }
}

fn event_path(base: &Path, path: &Path) -> String {
    relative_str(base, path).unwrap_or_else(|| clean_path(path))
}

fn spawn_dispatch<E>(
    dispatches: &mut JoinSet<Option<DispatchReport>>,
    orch: &Arc<Orchestrator<E>>,
    hashes: &Arc<Mutex<ContentHashes>>,
    use_hash: bool,
    path: String,
) where
    E: StepExecutor + 'static,
{
    info!(%path, "settled; dispatching");
    let orch = Arc::clone(orch);
    let hashes = Arc::clone(hashes);

    dispatches.spawn(async move {
        if use_hash && !content_changed(&orch, hashes, &path).await {
            info!(%path, "content unchanged; skipping");
            return None;
        }
        Some(dispatch_path(&orch, &path).await)
    });
}

async fn content_changed<E: StepExecutor>(
    orch: &Orchestrator<E>,
    hashes: Arc<Mutex<ContentHashes>>,
    path: &str,
) -> bool {
    let fs = orch.filesystem();
    let path = PathBuf::from(path);
    tokio::task::spawn_blocking(move || {
        hashes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .changed(fs.as_ref(), &path)
    })
    .await
    .unwrap_or(true)
}

fn log_joined(joined: std::result::Result<Option<DispatchReport>, tokio::task::JoinError>) {
    match joined {
        Ok(Some(report)) => debug!(?report, "dispatch finished"),
        Ok(None) => {}
        Err(err) => warn!(error = %err, "dispatch task panicked or was cancelled"),
    }
}
