mod store;

pub use store::{SessionSnapshot, SessionStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/studyclock[-dev]/` based on STUDYCLOCK_ENV.
///
/// Set STUDYCLOCK_ENV=dev to use the development data directory, or
/// STUDYCLOCK_DATA_DIR to override the location entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    if let Ok(dir) = std::env::var("STUDYCLOCK_DATA_DIR") {
        let dir = PathBuf::from(dir);
        std::fs::create_dir_all(&dir)?;
        return Ok(dir);
    }

    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STUDYCLOCK_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("studyclock-dev")
    } else {
        base_dir.join("studyclock")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
