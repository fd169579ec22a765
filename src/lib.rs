//! # Micromanager Setup - Installer for the Micromanager POS camera edge stack
//!
//! This library generates the configuration set for an edge device that
//! watches point-of-sale registers with cameras: an environment document,
//! a Frigate NVR configuration and a Docker Compose manifest, all derived
//! from a small interactively collected device profile.
//!
//! ## Overview
//!
//! An installation binds 1-4 POS registers, each a (serial port, camera
//! name) pair. The installer probes the host for attached serial devices,
//! runs a wizard to collect and confirm the bindings, renders the three
//! artifacts deterministically and persists them under the installation
//! directory, preserving the stable device identity across re-runs. It
//! then drives `docker compose pull` / `up` against the result.
//!
//! ## Architecture
//!
//! - `probe`: host inspection for serial devices and fast storage
//! - `profile`: register and device-profile data model with validation
//! - `collector`: interactive wizard behind a `Prompt` seam
//! - `env_doc`: ordered, comment-preserving environment document model
//! - `frigate`: typed NVR configuration builder
//! - `compose`: typed orchestration manifest builder
//! - `renderer`: pure rendering of all three artifacts
//! - `writer`: persistence with identity preservation
//! - `smoke`: non-interactive smoke-test run profiles
//! - `docker`: container runtime boundary
//! - `installer`: high-level orchestration of the install flow
//!
//! ## Error Handling
//!
//! Application seams return `Result<T, color_eyre::eyre::Error>`;
//! profile validation failures are a dedicated `thiserror` enum.
//! Interactive input errors are never surfaced as failures; the wizard
//! re-prompts instead.

pub mod collector;
pub mod compose;
pub mod docker;
pub mod env_doc;
pub mod frigate;
pub mod installer;
pub mod probe;
pub mod profile;
pub mod renderer;
pub mod smoke;
pub mod writer;
