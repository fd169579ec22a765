//! Smoke-test support.
//!
//! The non-interactive run profiles substitute a named FIFO for a
//! physical serial device so the stack can be exercised on hosts with no
//! POS hardware attached.

use crate::profile::{default_camera_name, DeviceProfile};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use log::info;
use std::path::Path;
use std::process::Command;

/// Fixed path of the FIFO standing in for a serial device
pub const SMOKE_FIFO_PATH: &str = "/tmp/micromanager-pos.fifo";

/// Selected run profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Full interactive install
    Install,
    /// App-only smoke test: FIFO device, no companion services
    SmokeTest,
    /// Full-stack smoke test: FIFO device, all services
    FullSmokeTest,
}

/// Create a named FIFO at `path` if one does not already exist
pub fn create_fifo(path: &Path) -> Result<()> {
    if path.exists() {
        info!("FIFO {:?} already exists", path);
        return Ok(());
    }
    let status = Command::new("mkfifo")
        .arg(path)
        .status()
        .wrap_err("Failed to run mkfifo")?;
    if !status.success() {
        return Err(eyre!("mkfifo {:?} exited with {}", path, status));
    }
    info!("Created FIFO {:?}", path);
    Ok(())
}

/// Synthesize the single-register profile used by smoke-test runs
pub fn smoke_profile(fifo_path: &Path) -> DeviceProfile {
    DeviceProfile::from_pairs(vec![(
        fifo_path.to_string_lossy().to_string(),
        default_camera_name(0),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoke_profile_binds_fifo() {
        let profile = smoke_profile(Path::new(SMOKE_FIFO_PATH));
        assert!(profile.validate().is_ok());
        assert_eq!(profile.registers.len(), 1);
        assert_eq!(profile.registers[0].serial_port, SMOKE_FIFO_PATH);
        assert_eq!(profile.registers[0].camera_name, "POS1");
    }

    #[test]
    fn test_create_fifo_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pos.fifo");
        create_fifo(&path).unwrap();
        assert!(path.exists());
        // Second call finds the existing FIFO and does nothing
        create_fifo(&path).unwrap();
    }
}
