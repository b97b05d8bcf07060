//! Best-effort removal of extracted libraries at process exit
//!
//! Directories registered here are removed by a `libc::atexit` hook, so they
//! disappear on a normal exit (returning from `main`, `std::process::exit`).
//! Nothing runs when the process is killed by a signal or aborts.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};
use tracing::warn;

/// Directories to remove when the process exits.
static PENDING: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());

static HOOK: Once = Once::new();

/// Exit hook; must not panic.
extern "C" fn remove_pending() {
    let mut pending = PENDING.lock().unwrap_or_else(|e| e.into_inner());
    for dir in pending.drain(..) {
        let _ = fs::remove_dir_all(&dir);
    }
}

/// Schedule `path` (and everything below it) for removal at process exit.
pub fn delete_on_exit(path: &Path) {
    HOOK.call_once(|| {
        let rc = unsafe { libc::atexit(remove_pending) };
        if rc != 0 {
            warn!("Could not register exit cleanup hook; extracted libraries will be left behind");
        }
    });

    let mut pending = PENDING.lock().unwrap_or_else(|e| e.into_inner());
    pending.push(path.to_path_buf());
}

/// Returns `true` if `path` is scheduled for removal at exit.
pub fn is_scheduled(path: &Path) -> bool {
    let pending = PENDING.lock().unwrap_or_else(|e| e.into_inner());
    pending.iter().any(|p| p == path)
}
