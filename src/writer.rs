//! Persistence writer.
//!
//! Writes the rendered artifacts to their target paths. Each file is
//! written independently with full content; a failure propagates to the
//! caller without cleaning up siblings already written. The stable device
//! identity is read back out of any pre-existing environment document and
//! re-injected before the new document overwrites it.

use crate::env_doc::{EnvDocument, IDENTITY_KEY};
use crate::renderer::RenderedDocs;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Destination paths for the three rendered artifacts
#[derive(Debug, Clone)]
pub struct TargetPaths {
    pub env: PathBuf,
    pub nvr: PathBuf,
    pub compose: PathBuf,
}

impl TargetPaths {
    /// Conventional layout under the installation directory
    pub fn under(install_dir: &Path) -> Self {
        Self {
            env: install_dir.join(".env"),
            nvr: install_dir.join("frigate").join("config.yml"),
            compose: install_dir.join("docker-compose.yml"),
        }
    }
}

/// Ensure the environment document carries a stable device identity.
///
/// Priority: the identity found in the pre-existing document, then one
/// already present in the rendered document, then a freshly generated
/// UUID.
pub fn ensure_identity(env_doc: &str, existing: Option<&str>) -> String {
    let mut doc = EnvDocument::parse(env_doc);

    let existing_id = existing.and_then(|content| {
        EnvDocument::parse(content)
            .get(IDENTITY_KEY)
            .map(|v| v.to_string())
    });
    let rendered_id = doc.get(IDENTITY_KEY).map(|v| v.to_string());

    let id = existing_id
        .or(rendered_id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    doc.set(IDENTITY_KEY, &id);
    doc.to_string()
}

/// Write all rendered artifacts to their target paths
pub fn persist(docs: &RenderedDocs, paths: &TargetPaths) -> Result<()> {
    // Absence of a prior install is not an error
    let prior_env = fs::read_to_string(&paths.env).ok();
    let env_doc = ensure_identity(&docs.env_doc, prior_env.as_deref());

    write_file(&paths.env, &env_doc)?;
    write_file(&paths.nvr, &docs.nvr_doc)?;
    write_file(&paths.compose, &docs.compose_doc)?;

    info!("Wrote configuration to {:?}", paths.env.parent().unwrap_or(Path::new(".")));
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("Failed to create directory '{}'", parent.display()))?;
    }
    fs::write(path, content)
        .wrap_err_with(|| format!("Failed to write '{}'", path.display()))?;
    info!("Wrote {:?}", path);
    Ok(())
}
