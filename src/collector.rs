//! Interactive configuration collector.
//!
//! Prompts the operator for the register count and per-register bindings,
//! renders a summary table and asks for confirmation. Rejection discards
//! all collected state and restarts from the count prompt; the restart is
//! an iterative loop so pathological repeated rejection cannot grow the
//! call stack.

use crate::probe::HostProbe;
use crate::profile::{default_camera_name, DeviceProfile, MAX_REGISTERS};
use color_eyre::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use log::info;

/// Prompt seam between the collector and the terminal.
///
/// Implementations return the supplied default when the operator accepts
/// it with empty input.
pub trait Prompt {
    fn input(&mut self, prompt: &str, default: &str) -> Result<String>;
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;
}

/// Terminal-backed prompt implementation
pub struct TermPrompt {
    theme: ColorfulTheme,
}

impl TermPrompt {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TermPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for TermPrompt {
    fn input(&mut self, prompt: &str, default: &str) -> Result<String> {
        let value = if default.is_empty() {
            Input::<String>::with_theme(&self.theme)
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()?
        } else {
            Input::<String>::with_theme(&self.theme)
                .with_prompt(prompt)
                .default(default.to_string())
                .interact_text()?
        };
        Ok(value)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }
}

/// Installation settings collected alongside the register bindings
#[derive(Debug, Clone, Default)]
pub struct InstallExtras {
    /// Webhook URL the app posts register events to (may be empty)
    pub webhook_url: String,
    /// Tunnel client token (may be empty)
    pub tunnel_token: String,
}

/// Collect a confirmed device profile from the operator
pub fn collect_profile(prompt: &mut dyn Prompt, probe: &HostProbe) -> Result<DeviceProfile> {
    loop {
        let count = prompt_register_count(prompt)?;

        let mut pairs = Vec::with_capacity(count);
        for i in 0..count {
            let port = non_empty_or(
                prompt.input(
                    &format!("Serial port for register {}", i + 1),
                    &probe.port_for(i),
                )?,
                &probe.port_for(i),
            );
            let camera = non_empty_or(
                prompt.input(
                    &format!("Camera name for register {}", i + 1),
                    &default_camera_name(i),
                )?,
                &default_camera_name(i),
            );
            pairs.push((port, camera));
        }

        let profile = DeviceProfile::from_pairs(pairs);
        if let Err(e) = profile.validate() {
            println!("Invalid configuration: {}. Starting over.", e);
            continue;
        }

        print_summary(&profile);
        if prompt.confirm("Apply this configuration?", true)? {
            info!("Device profile confirmed: {} register(s)", profile.registers.len());
            return Ok(profile);
        }
        info!("Configuration rejected by operator, restarting collection");
    }
}

/// Collect webhook URL and tunnel token, both optional
pub fn collect_extras(prompt: &mut dyn Prompt) -> Result<InstallExtras> {
    let webhook_url = prompt.input("Webhook URL (empty to skip)", "")?;
    let tunnel_token = prompt.input("Tunnel token (empty to skip)", "")?;
    Ok(InstallExtras {
        webhook_url: webhook_url.trim().to_string(),
        tunnel_token: tunnel_token.trim().to_string(),
    })
}

fn prompt_register_count(prompt: &mut dyn Prompt) -> Result<usize> {
    loop {
        let raw = prompt.input("Number of POS registers (1-4)", "1")?;
        match raw.trim().parse::<usize>() {
            Ok(n) if (1..=MAX_REGISTERS).contains(&n) => return Ok(n),
            _ => println!("Please enter a number between 1 and 4."),
        }
    }
}

fn non_empty_or(value: String, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

fn print_summary(profile: &DeviceProfile) {
    println!();
    println!("  {:<3} {:<24} {}", "#", "Serial port", "Camera");
    for register in &profile.registers {
        println!(
            "  {:<3} {:<24} {}",
            register.index + 1,
            register.serial_port,
            register.camera_name
        );
    }
    println!();
}
