//! Global state for the dev-mode flag and the photos directory override

use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Flag indicating whether the app was launched with --dev
pub static DEV_MODE: AtomicBool = AtomicBool::new(false);

/// Photos directory override (dev builds point this at a scratch folder)
pub static PHOTOS_DIR_OVERRIDE: Lazy<Mutex<Option<PathBuf>>> = Lazy::new(|| Mutex::new(None));

/// Check if dev mode is active
pub fn is_dev_mode() -> bool {
    DEV_MODE.load(Ordering::SeqCst)
}

/// Set the dev mode flag
pub fn set_dev_mode(value: bool) {
    DEV_MODE.store(value, Ordering::SeqCst);
}

/// Resolve the photos directory: the override when one is set, otherwise
/// the default local photos folder
pub fn photos_dir() -> PathBuf {
    if let Ok(guard) = PHOTOS_DIR_OVERRIDE.lock() {
        if let Some(dir) = guard.as_ref() {
            return dir.clone();
        }
    }
    crate::library::scanner::default_photos_dir()
}

/// Override the photos directory
pub fn set_photos_dir(dir: Option<PathBuf>) -> Result<(), String> {
    let mut guard = PHOTOS_DIR_OVERRIDE
        .lock()
        .map_err(|e| format!("Lock error: {}", e))?;
    *guard = dir;
    Ok(())
}
