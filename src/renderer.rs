//! Configuration renderer.
//!
//! Turns a confirmed device profile into the three installation artifacts:
//! the environment document, the NVR configuration and the orchestration
//! manifest. Pure: no filesystem access, no prompts, deterministic output
//! for identical inputs.

use crate::compose::build_compose;
use crate::env_doc::EnvDocument;
use crate::frigate::build_nvr_config;
use crate::profile::DeviceProfile;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;

/// The three rendered installation artifacts
#[derive(Debug, Clone)]
pub struct RenderedDocs {
    /// Flat key-value environment document
    pub env_doc: String,
    /// Hierarchical NVR configuration (YAML)
    pub nvr_doc: String,
    /// Service orchestration manifest (YAML)
    pub compose_doc: String,
}

/// Render all artifacts for `profile`.
///
/// `prior_env` is the textual content of any pre-existing environment
/// document; its operator-added keys and comments are preserved, while any
/// previously generated register block is replaced. `with_companions`
/// selects whether the manifest includes the recording and tunnel
/// services.
pub fn render(
    profile: &DeviceProfile,
    prior_env: Option<&str>,
    with_companions: bool,
) -> Result<RenderedDocs> {
    profile
        .validate()
        .wrap_err("Device profile failed validation")?;

    let mut env = match prior_env {
        Some(content) => EnvDocument::parse(content),
        None => EnvDocument::new(),
    };
    env.strip_register_block();
    env.append_register_block(profile);

    let nvr_doc = serde_yaml::to_string(&build_nvr_config(profile))
        .wrap_err("Failed to serialize NVR configuration")?;
    let compose_doc = serde_yaml::to_string(&build_compose(profile, with_companions))
        .wrap_err("Failed to serialize orchestration manifest")?;

    Ok(RenderedDocs {
        env_doc: env.to_string(),
        nvr_doc,
        compose_doc,
    })
}
