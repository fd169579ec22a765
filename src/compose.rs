//! Orchestration manifest builder.
//!
//! Builds the Docker Compose document as a typed object model. The device
//! binding list of the application service is the only part parameterized
//! by the register count; serial port strings are passed through verbatim.

use crate::profile::DeviceProfile;
use serde::Serialize;
use std::collections::BTreeMap;

/// Name of the application service in the manifest
pub const APP_SERVICE: &str = "micromanager";
/// Name of the recording service
pub const NVR_SERVICE: &str = "frigate";
/// Name of the tunnel client service
pub const TUNNEL_SERVICE: &str = "cloudflared";

/// Root Compose document
#[derive(Serialize, Debug)]
pub struct ComposeManifest {
    pub services: BTreeMap<String, Service>,
}

/// A single Compose service definition
#[derive(Serialize, Debug, Default)]
pub struct Service {
    pub image: String,
    pub restart: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_file: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devices: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shm_size: Option<String>,
}

/// Build the orchestration manifest for a device profile.
///
/// `with_companions` controls whether the recording and tunnel services
/// are included; the app-only smoke-test profile omits them.
pub fn build_compose(profile: &DeviceProfile, with_companions: bool) -> ComposeManifest {
    let mut services = BTreeMap::new();

    // One device binding per register, port mapped to itself inside the
    // container's device namespace
    let devices: Vec<String> = profile
        .registers
        .iter()
        .map(|r| format!("{}:{}", r.serial_port, r.serial_port))
        .collect();

    services.insert(
        APP_SERVICE.to_string(),
        Service {
            image: "micromanager/agent:latest".to_string(),
            restart: "unless-stopped".to_string(),
            env_file: Some(vec![".env".to_string()]),
            devices: Some(devices),
            ..Default::default()
        },
    );

    if with_companions {
        services.insert(
            NVR_SERVICE.to_string(),
            Service {
                image: "ghcr.io/blakeblackshear/frigate:stable".to_string(),
                restart: "unless-stopped".to_string(),
                volumes: Some(vec![
                    "./frigate:/config".to_string(),
                    "./media:/media/frigate".to_string(),
                ]),
                shm_size: Some("128mb".to_string()),
                ..Default::default()
            },
        );

        let mut environment = BTreeMap::new();
        environment.insert(
            "TUNNEL_TOKEN".to_string(),
            "${TUNNEL_TOKEN}".to_string(),
        );
        services.insert(
            TUNNEL_SERVICE.to_string(),
            Service {
                image: "cloudflare/cloudflared:latest".to_string(),
                restart: "unless-stopped".to_string(),
                env_file: Some(vec![".env".to_string()]),
                environment: Some(environment),
                command: Some("tunnel --no-autoupdate run".to_string()),
                ..Default::default()
            },
        );
    }

    ComposeManifest { services }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::DeviceProfile;

    fn profile(n: usize) -> DeviceProfile {
        DeviceProfile::from_pairs(
            (0..n)
                .map(|i| (format!("/dev/ttyUSB{}", i), format!("POS{}", i + 1)))
                .collect(),
        )
    }

    #[test]
    fn test_one_device_binding_per_register() {
        for n in 1..=4 {
            let manifest = build_compose(&profile(n), true);
            let devices = manifest.services[APP_SERVICE].devices.as_ref().unwrap();
            assert_eq!(devices.len(), n);
        }
        let manifest = build_compose(&profile(2), true);
        let devices = manifest.services[APP_SERVICE].devices.as_ref().unwrap();
        assert_eq!(devices[1], "/dev/ttyUSB1:/dev/ttyUSB1");
    }

    #[test]
    fn test_companion_services_toggle() {
        let full = build_compose(&profile(1), true);
        assert!(full.services.contains_key(NVR_SERVICE));
        assert!(full.services.contains_key(TUNNEL_SERVICE));

        let app_only = build_compose(&profile(1), false);
        assert_eq!(app_only.services.len(), 1);
        assert!(app_only.services.contains_key(APP_SERVICE));
    }

    #[test]
    fn test_tunnel_reads_token_from_environment() {
        let manifest = build_compose(&profile(1), true);
        let tunnel = &manifest.services[TUNNEL_SERVICE];
        assert_eq!(
            tunnel.environment.as_ref().unwrap()["TUNNEL_TOKEN"],
            "${TUNNEL_TOKEN}"
        );
        assert_eq!(tunnel.env_file.as_ref().unwrap(), &vec![".env".to_string()]);
    }

    #[test]
    fn test_nvr_service_mounts_config_directory() {
        let manifest = build_compose(&profile(1), true);
        let volumes = manifest.services[NVR_SERVICE].volumes.as_ref().unwrap();
        assert!(volumes.iter().any(|v| v == "./frigate:/config"));
    }

    #[test]
    fn test_serializes_to_yaml() {
        let manifest = build_compose(&profile(2), true);
        let yaml = serde_yaml::to_string(&manifest).unwrap();
        assert!(yaml.contains("services:"));
        assert!(yaml.contains("- /dev/ttyUSB0:/dev/ttyUSB0"));
        assert!(!yaml.contains("volumes: null"));
    }
}
