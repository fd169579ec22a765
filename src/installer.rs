//! Installer orchestration.
//!
//! Coordinates the linear installation flow: environment checks, Docker
//! installation, host probing, interactive collection (or synthetic
//! smoke-test profile), rendering, persistence with identity
//! preservation, and finally compose pull/up. Every step is idempotent;
//! an interrupted run leaves partial files and is safely re-run from
//! scratch.

use crate::collector::{collect_extras, collect_profile, Prompt, TermPrompt};
use crate::docker;
use crate::env_doc::EnvDocument;
use crate::probe::{probe_host, HostProbe};
use crate::renderer::render;
use crate::smoke::{create_fifo, smoke_profile, RunMode, SMOKE_FIFO_PATH};
use crate::writer::{persist, TargetPaths};
use color_eyre::Result;
use log::info;
use std::fs;
use std::path::Path;

/// Generate and persist all configuration artifacts for `mode`.
///
/// Probing and prompting are injected so the flow can run without a
/// terminal; Docker is not touched here.
pub fn generate(
    mode: RunMode,
    install_dir: &Path,
    prompt: &mut dyn Prompt,
    probe: &HostProbe,
) -> Result<()> {
    let paths = TargetPaths::under(install_dir);
    // A missing prior install is not an error
    let prior_env = fs::read_to_string(&paths.env).ok();

    let (profile, with_companions) = match mode {
        RunMode::Install => (collect_profile(prompt, probe)?, true),
        RunMode::SmokeTest => {
            create_fifo(Path::new(SMOKE_FIFO_PATH))?;
            (smoke_profile(Path::new(SMOKE_FIFO_PATH)), false)
        }
        RunMode::FullSmokeTest => {
            create_fifo(Path::new(SMOKE_FIFO_PATH))?;
            (smoke_profile(Path::new(SMOKE_FIFO_PATH)), true)
        }
    };

    let mut docs = render(&profile, prior_env.as_deref(), with_companions)?;

    if mode == RunMode::Install {
        let extras = collect_extras(prompt)?;
        let mut env = EnvDocument::parse(&docs.env_doc);
        if !extras.webhook_url.is_empty() {
            env.set("WEBHOOK_URL", &extras.webhook_url);
        }
        if !extras.tunnel_token.is_empty() {
            env.set("TUNNEL_TOKEN", &extras.tunnel_token);
        }
        docs.env_doc = env.to_string();
    }

    persist(&docs, &paths)?;
    info!(
        "Generated configuration for {} register(s) in {:?}",
        profile.registers.len(),
        install_dir
    );
    Ok(())
}

/// Run the full installation flow
pub fn run(mode: RunMode, install_dir: &Path) -> Result<()> {
    docker::check_root()?;
    docker::ensure_docker()?;

    let probe = probe_host();
    let mut prompt = TermPrompt::new();
    generate(mode, install_dir, &mut prompt, &probe)?;

    docker::compose_pull(install_dir)?;
    docker::compose_up(install_dir)?;

    info!("Installation complete");
    Ok(())
}
