use serde::{Deserialize, Serialize};

/// One physical POS register's binding: the serial port the register's
/// receipt stream arrives on and the logical camera name used to key the
/// NVR configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterConfig {
    /// Zero-based register index, contiguous within a profile
    pub index: usize,
    /// Device path of the register's serial port (e.g. "/dev/ttyUSB0")
    pub serial_port: String,
    /// Logical camera name, used as an identifier in the NVR document
    pub camera_name: String,
}

/// The full set of registers for one installation.
///
/// Built by the interactive collector and immutable once confirmed.
/// Only its rendered projections (env document, NVR document, compose
/// manifest) are persisted; the profile itself lives for one wizard run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceProfile {
    /// Register configurations, ordered by index
    pub registers: Vec<RegisterConfig>,
}

/// Maximum number of registers a single device supports
pub const MAX_REGISTERS: usize = 4;

/// Default camera name for a register index (0 -> "POS1", ..., 3 -> "POS4")
pub fn default_camera_name(index: usize) -> String {
    format!("POS{}", index + 1)
}

/// Default serial port for a register index when no probed port is available
pub fn default_serial_port(index: usize) -> String {
    format!("/dev/ttyUSB{}", index)
}

impl DeviceProfile {
    /// Build a profile from (port, camera) pairs, assigning contiguous indices
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let registers = pairs
            .into_iter()
            .enumerate()
            .map(|(index, (serial_port, camera_name))| RegisterConfig {
                index,
                serial_port,
                camera_name,
            })
            .collect();
        Self { registers }
    }

    /// Validate the profile's structural invariants
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.registers.is_empty() || self.registers.len() > MAX_REGISTERS {
            return Err(ValidationError::RegisterCount(self.registers.len()));
        }

        for (position, register) in self.registers.iter().enumerate() {
            if register.index != position {
                return Err(ValidationError::NonContiguousIndex {
                    expected: position,
                    found: register.index,
                });
            }

            if register.serial_port.is_empty()
                || register.serial_port.chars().any(|c| c.is_whitespace() || c.is_control())
            {
                return Err(ValidationError::InvalidSerialPort(
                    register.serial_port.clone(),
                ));
            }

            if register.camera_name.is_empty()
                || !register
                    .camera_name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                return Err(ValidationError::InvalidCameraName(
                    register.camera_name.clone(),
                ));
            }
        }

        // Duplicate camera names would collide in the NVR document, which
        // keys streams and cameras by name.
        for (i, register) in self.registers.iter().enumerate() {
            if self.registers[..i]
                .iter()
                .any(|other| other.camera_name == register.camera_name)
            {
                return Err(ValidationError::DuplicateCameraName(
                    register.camera_name.clone(),
                ));
            }
        }

        Ok(())
    }
}

/// Profile validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("register count must be between 1 and 4, got {0}")]
    RegisterCount(usize),
    #[error("register indices must be contiguous from 0: expected {expected}, found {found}")]
    NonContiguousIndex { expected: usize, found: usize },
    #[error("invalid serial port '{0}': must be non-empty without whitespace")]
    InvalidSerialPort(String),
    #[error("invalid camera name '{0}': use letters, digits, '-' and '_' only")]
    InvalidCameraName(String),
    #[error("duplicate camera name '{0}': camera names must be unique")]
    DuplicateCameraName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(pairs: &[(&str, &str)]) -> DeviceProfile {
        DeviceProfile::from_pairs(
            pairs
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_valid_profile() {
        let profile = profile(&[("/dev/ttyUSB0", "POS1"), ("/dev/ttyUSB1", "POS2")]);
        assert!(profile.validate().is_ok());
        assert_eq!(profile.registers[1].index, 1);
    }

    #[test]
    fn test_register_count_bounds() {
        let empty = DeviceProfile { registers: vec![] };
        assert!(matches!(
            empty.validate(),
            Err(ValidationError::RegisterCount(0))
        ));

        let five = profile(&[
            ("/dev/ttyUSB0", "POS1"),
            ("/dev/ttyUSB1", "POS2"),
            ("/dev/ttyUSB2", "POS3"),
            ("/dev/ttyUSB3", "POS4"),
            ("/dev/ttyUSB4", "POS5"),
        ]);
        assert!(matches!(
            five.validate(),
            Err(ValidationError::RegisterCount(5))
        ));
    }

    #[test]
    fn test_rejects_duplicate_camera_names() {
        let dup = profile(&[("/dev/ttyUSB0", "POS1"), ("/dev/ttyUSB1", "POS1")]);
        assert!(matches!(
            dup.validate(),
            Err(ValidationError::DuplicateCameraName(_))
        ));
    }

    #[test]
    fn test_rejects_structural_characters_in_camera_name() {
        let bad = profile(&[("/dev/ttyUSB0", "POS1:\n  oops")]);
        assert!(matches!(
            bad.validate(),
            Err(ValidationError::InvalidCameraName(_))
        ));
    }

    #[test]
    fn test_rejects_whitespace_in_serial_port() {
        let bad = profile(&[("/dev/tty USB0", "POS1")]);
        assert!(matches!(
            bad.validate(),
            Err(ValidationError::InvalidSerialPort(_))
        ));
    }

    #[test]
    fn test_rejects_non_contiguous_indices() {
        let mut profile = profile(&[("/dev/ttyUSB0", "POS1"), ("/dev/ttyUSB1", "POS2")]);
        profile.registers[1].index = 3;
        assert!(matches!(
            profile.validate(),
            Err(ValidationError::NonContiguousIndex { expected: 1, found: 3 })
        ));
    }

    #[test]
    fn test_default_synthesis() {
        assert_eq!(default_camera_name(0), "POS1");
        assert_eq!(default_camera_name(3), "POS4");
        assert_eq!(default_serial_port(0), "/dev/ttyUSB0");
        assert_eq!(default_serial_port(2), "/dev/ttyUSB2");
    }
}
