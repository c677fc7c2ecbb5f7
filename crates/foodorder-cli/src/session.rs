//! Opt-in cache of the last view state, so render commands keep working
//! while the gateway is down. Read and write failures only log a warning.

use anyhow::Result;
use foodorder_core::session::ViewState;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct SessionCache {
    path: Option<PathBuf>,
}

impl SessionCache {
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    pub fn load(&self) -> ViewState {
        let Some(path) = &self.path else {
            return ViewState::default();
        };
        match read_state(path) {
            Ok(Some(state)) => {
                debug!(path = %path.display(), orders = state.orders.len(), "session loaded");
                state
            }
            Ok(None) => ViewState::default(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable session cache");
                ViewState::default()
            }
        }
    }

    pub fn save(&self, state: &ViewState) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(err) = write_state(path, state) {
            warn!(path = %path.display(), error = %err, "failed to save session cache");
        }
    }
}

fn read_state(path: &Path) -> Result<Option<ViewState>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(serde_json::from_str(&raw)?))
}

fn write_state(path: &Path, state: &ViewState) -> Result<()> {
    let json = serde_json::to_vec_pretty(state)?;
    fs::write(path, json)?;
    restrict_file_permissions(path)
}

#[cfg(unix)]
fn restrict_file_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_file_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
