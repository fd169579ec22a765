//! Container runtime boundary.
//!
//! The installer drives Docker through subprocesses: presence probe,
//! installation via the upstream convenience script, and compose
//! pull/up against the generated manifest. Failures propagate to the
//! operator as terminal run failures; there is no retry.

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use log::{info, warn};
use std::path::Path;
use std::process::Command;

/// Fail unless running as root; installing packages and writing under
/// the installation directory require it
pub fn check_root() -> Result<()> {
    let output = Command::new("id")
        .arg("-u")
        .output()
        .wrap_err("Failed to run 'id -u'")?;
    let uid = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if uid != "0" {
        return Err(eyre!("This installer must run as root (current uid: {})", uid));
    }
    Ok(())
}

/// Whether the docker CLI is present on the host
pub fn docker_available() -> bool {
    Command::new("docker")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Install Docker via the upstream convenience script
pub fn install_docker() -> Result<()> {
    info!("Docker not found, installing via get.docker.com");
    run_checked(
        Command::new("sh").arg("-c").arg("curl -fsSL https://get.docker.com | sh"),
        "Docker installation",
    )
}

/// Make sure Docker is available, installing it if necessary
pub fn ensure_docker() -> Result<()> {
    if docker_available() {
        info!("Docker is already installed");
        return Ok(());
    }
    warn!("Docker is not installed");
    install_docker()?;
    if !docker_available() {
        return Err(eyre!("Docker is still unavailable after installation"));
    }
    Ok(())
}

/// Pull the images referenced by the generated manifest
pub fn compose_pull(install_dir: &Path) -> Result<()> {
    info!("Pulling container images");
    run_checked(
        Command::new("docker")
            .args(["compose", "pull"])
            .current_dir(install_dir),
        "docker compose pull",
    )
}

/// Start the container set from the generated manifest
pub fn compose_up(install_dir: &Path) -> Result<()> {
    info!("Starting container set");
    run_checked(
        Command::new("docker")
            .args(["compose", "up", "-d"])
            .current_dir(install_dir),
        "docker compose up",
    )
}

fn run_checked(command: &mut Command, what: &str) -> Result<()> {
    let status = command
        .status()
        .wrap_err_with(|| format!("Failed to run {}", what))?;
    if !status.success() {
        return Err(eyre!("{} exited with {}", what, status));
    }
    Ok(())
}
