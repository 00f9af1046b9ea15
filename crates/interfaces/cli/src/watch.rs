//! The watch loop: editor launch plus change notifications fed to the
//! session one at a time.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info, warn};

use notekeeper_config::AppConfig;
use notekeeper_runtime::{Flow, LocalFiles, Session};

pub fn run(config: AppConfig, open_editor: bool) -> Result<()> {
    let debounce = Duration::from_millis(config.watch.debounce_ms);
    let editor = config.editor.clone();
    let mut session = Session::start(LocalFiles, config)?;

    let interface = session.interface_path().to_path_buf();
    let dir = interface
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let file_name = interface
        .file_name()
        .map(|name| name.to_os_string())
        .with_context(|| format!("interface path {} has no file name", interface.display()))?;

    // The parent directory is watched so atomic saves (write + rename) by
    // the editor or by us are still seen.
    let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = tx.send(res);
        },
        Config::default(),
    )
    .context("failed to create filesystem watcher")?;
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", dir.display()))?;

    if open_editor && editor.open_on_start {
        launch_editor(&editor.command, &interface)?;
    }
    info!(
        interface = %interface.display(),
        debounce_ms = debounce.as_millis() as u64,
        "watching the interface file"
    );
    println!("Edit and save {} to run a command.", interface.display());

    loop {
        wait_for_change(&rx, &file_name)?;
        settle(&rx, debounce)?;

        match session.handle_change() {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(err) => error!(error = %format!("{err:#}"), "failed to handle interface change"),
        }
    }

    println!("Tot ziens!");
    Ok(())
}

/// Blocks until an event touches the interface file.
fn wait_for_change(rx: &Receiver<notify::Result<Event>>, file_name: &OsString) -> Result<()> {
    loop {
        match rx.recv().context("watcher channel closed")? {
            Ok(event) if is_relevant(&event, file_name) => {
                debug!(kind = ?event.kind, "interface changed");
                return Ok(());
            }
            Ok(_) => {}
            Err(err) => warn!(error = %err, "watcher error"),
        }
    }
}

/// Swallows the burst of events a single save produces.
fn settle(rx: &Receiver<notify::Result<Event>>, debounce: Duration) -> Result<()> {
    let deadline = Instant::now() + debounce;
    loop {
        let now = Instant::now();
        if now >= deadline {
            return Ok(());
        }
        match rx.recv_timeout(deadline - now) {
            Ok(_) | Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                return Err(anyhow!("watcher channel disconnected"));
            }
        }
    }
}

fn is_relevant(event: &Event, file_name: &OsString) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    event
        .paths
        .iter()
        .any(|path| path.file_name() == Some(file_name.as_os_str()))
}

/// Starts the editor without blocking the loop.  The path is handed to the
/// shell as `$1`, never spliced into the command line.
fn launch_editor(command: &str, path: &Path) -> Result<()> {
    info!(command = %command, path = %path.display(), "opening editor");

    match editor_command(command, path).spawn() {
        Ok(mut child) => {
            // Reap editors that fork and exit right away.
            thread::spawn(move || {
                if let Err(err) = child.wait() {
                    debug!(error = %err, "failed to wait for the editor");
                }
            });
            Ok(())
        }
        Err(err) => {
            warn!(error = %err, command = %command, "could not start the editor; open the file yourself");
            Ok(())
        }
    }
}

#[cfg(not(windows))]
fn editor_command(command: &str, path: &Path) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(format!("{command} \"$1\""))
        .arg("notekeeper-editor")
        .arg(path);
    cmd
}

#[cfg(windows)]
fn editor_command(command: &str, path: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(format!("{} \"{}\"", command, path.display()));
    cmd
}
