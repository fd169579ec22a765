//! Host environment probing.
//!
//! Inspects the host for attached USB-serial devices and a secondary
//! high-speed storage device. Probing never fails: an empty result means
//! the collector falls back to synthesized defaults.

use log::{debug, info};
use regex::Regex;
use std::path::{Path, PathBuf};

/// Result of probing the host environment
#[derive(Debug, Clone, Default)]
pub struct HostProbe {
    /// Serial device paths that currently exist, ordered by naming scheme
    /// then numeric suffix
    pub serial_ports: Vec<PathBuf>,
    /// Whether a secondary high-speed storage device is present
    pub has_fast_storage: bool,
}

impl HostProbe {
    /// Serial port for register `index`: the index-th probed port if
    /// available, else the conventional fallback path
    pub fn port_for(&self, index: usize) -> String {
        self.serial_ports
            .get(index)
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| crate::profile::default_serial_port(index))
    }
}

/// Probe the host for serial devices and fast storage
pub fn probe_host() -> HostProbe {
    let serial_ports = scan_serial_ports(Path::new("/dev"));
    let has_fast_storage =
        Path::new("/dev/nvme0n1").exists() || Path::new("/mnt/frigate-storage").exists();

    info!(
        "Host probe: {} serial port(s), fast storage: {}",
        serial_ports.len(),
        has_fast_storage
    );

    HostProbe {
        serial_ports,
        has_fast_storage,
    }
}

/// Scan a device directory for the two conventional USB-serial naming
/// schemes (ttyUSBn, ttyACMn)
pub fn scan_serial_ports(dev_dir: &Path) -> Vec<PathBuf> {
    // Unwrap is fine: the patterns are literals
    let patterns = [
        Regex::new(r"^ttyUSB(\d+)$").unwrap(),
        Regex::new(r"^ttyACM(\d+)$").unwrap(),
    ];

    let entries = match std::fs::read_dir(dev_dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Could not read {:?}: {}", dev_dir, e);
            return Vec::new();
        }
    };

    let names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();

    let mut ports = Vec::new();
    for pattern in &patterns {
        let mut matched: Vec<(u32, String)> = names
            .iter()
            .filter_map(|name| {
                pattern.captures(name).and_then(|caps| {
                    caps[1].parse::<u32>().ok().map(|n| (n, name.clone()))
                })
            })
            .collect();
        matched.sort();
        ports.extend(matched.into_iter().map(|(_, name)| dev_dir.join(name)));
    }

    debug!("Detected serial ports: {:?}", ports);
    ports
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_scan_orders_usb_before_acm_and_by_suffix() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["ttyACM0", "ttyUSB1", "ttyUSB0", "ttyS0", "random"] {
            File::create(dir.path().join(name)).unwrap();
        }

        let ports = scan_serial_ports(dir.path());
        let names: Vec<_> = ports
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["ttyUSB0", "ttyUSB1", "ttyACM0"]);
    }

    #[test]
    fn test_scan_missing_directory_is_empty() {
        let ports = scan_serial_ports(Path::new("/nonexistent/dev"));
        assert!(ports.is_empty());
    }

    #[test]
    fn test_port_for_falls_back_to_synthesized_path() {
        let probe = HostProbe {
            serial_ports: vec![PathBuf::from("/dev/ttyUSB5")],
            has_fast_storage: false,
        };
        assert_eq!(probe.port_for(0), "/dev/ttyUSB5");
        assert_eq!(probe.port_for(1), "/dev/ttyUSB1");
        assert_eq!(probe.port_for(3), "/dev/ttyUSB3");
    }
}
