//! NVR configuration builder.
//!
//! Builds the Frigate recording/detection service's declarative
//! configuration as a typed object model serialized to YAML, so field
//! values are quoted correctly regardless of content. One dual-stream
//! source and one camera entry are emitted per register, keyed by the
//! register's camera name.

use crate::profile::DeviceProfile;
use serde::Serialize;
use std::collections::BTreeMap;

/// Detector thread count for the CPU detector
const DETECTOR_THREADS: u32 = 2;
/// Recording retention in days
const RECORD_RETAIN_DAYS: u32 = 7;
/// Snapshot retention in days
const SNAPSHOT_RETAIN_DAYS: u32 = 7;
/// Hardware acceleration preset passed to ffmpeg
const HWACCEL_PRESET: &str = "preset-vaapi";
/// Base host-address suffix for synthesized camera addresses
const CAMERA_HOST_SUFFIX_BASE: u32 = 101;

/// Root NVR configuration document
#[derive(Serialize, Debug)]
pub struct NvrConfig {
    pub detectors: BTreeMap<String, Detector>,
    pub ffmpeg: FfmpegDefaults,
    pub record: RecordConfig,
    pub snapshots: SnapshotConfig,
    pub go2rtc: Go2RtcConfig,
    pub cameras: BTreeMap<String, CameraConfig>,
}

#[derive(Serialize, Debug)]
pub struct Detector {
    #[serde(rename = "type")]
    pub detector_type: String,
    pub num_threads: u32,
}

#[derive(Serialize, Debug)]
pub struct FfmpegDefaults {
    pub hwaccel_args: String,
}

#[derive(Serialize, Debug)]
pub struct RecordConfig {
    pub enabled: bool,
    pub retain: RecordRetain,
}

#[derive(Serialize, Debug)]
pub struct RecordRetain {
    pub days: u32,
    pub mode: String,
}

#[derive(Serialize, Debug)]
pub struct SnapshotConfig {
    pub enabled: bool,
    pub retain: SnapshotRetain,
}

#[derive(Serialize, Debug)]
pub struct SnapshotRetain {
    pub default: u32,
}

/// Restreamer section: stream name to source URL list
#[derive(Serialize, Debug)]
pub struct Go2RtcConfig {
    pub streams: BTreeMap<String, Vec<String>>,
}

#[derive(Serialize, Debug)]
pub struct CameraConfig {
    pub ffmpeg: CameraFfmpeg,
    pub detect: DetectConfig,
    pub motion: MotionConfig,
}

#[derive(Serialize, Debug)]
pub struct CameraFfmpeg {
    pub inputs: Vec<StreamInput>,
}

#[derive(Serialize, Debug)]
pub struct StreamInput {
    pub path: String,
    pub roles: Vec<String>,
}

#[derive(Serialize, Debug)]
pub struct DetectConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

#[derive(Serialize, Debug)]
pub struct MotionConfig {
    pub enabled: bool,
}

/// Placeholder host-address suffix for a register index
pub fn camera_host_suffix(index: usize) -> u32 {
    CAMERA_HOST_SUFFIX_BASE + index as u32
}

/// Placeholder camera address for a register index. The operator replaces
/// this with the camera's real address after installation.
pub fn camera_host(index: usize) -> String {
    format!("192.168.1.{}", camera_host_suffix(index))
}

/// Build the NVR configuration document for a device profile
pub fn build_nvr_config(profile: &DeviceProfile) -> NvrConfig {
    let mut detectors = BTreeMap::new();
    detectors.insert(
        "cpu0".to_string(),
        Detector {
            detector_type: "cpu".to_string(),
            num_threads: DETECTOR_THREADS,
        },
    );

    let mut streams = BTreeMap::new();
    let mut cameras = BTreeMap::new();

    for register in &profile.registers {
        let host = camera_host(register.index);
        let name = register.camera_name.clone();
        let sub_name = format!("{}_sub", name);

        // High-resolution stream for recording, sub-stream for detection
        streams.insert(
            name.clone(),
            vec![format!(
                "rtsp://admin:admin@{}:554/h264Preview_01_main",
                host
            )],
        );
        streams.insert(
            sub_name.clone(),
            vec![format!("rtsp://admin:admin@{}:554/h264Preview_01_sub", host)],
        );

        cameras.insert(
            name.clone(),
            CameraConfig {
                ffmpeg: CameraFfmpeg {
                    inputs: vec![
                        StreamInput {
                            path: format!("rtsp://127.0.0.1:8554/{}", name),
                            roles: vec!["record".to_string()],
                        },
                        StreamInput {
                            path: format!("rtsp://127.0.0.1:8554/{}", sub_name),
                            roles: vec!["detect".to_string()],
                        },
                    ],
                },
                detect: DetectConfig {
                    width: 704,
                    height: 480,
                    fps: 5,
                },
                motion: MotionConfig { enabled: true },
            },
        );
    }

    NvrConfig {
        detectors,
        ffmpeg: FfmpegDefaults {
            hwaccel_args: HWACCEL_PRESET.to_string(),
        },
        record: RecordConfig {
            enabled: true,
            retain: RecordRetain {
                days: RECORD_RETAIN_DAYS,
                mode: "motion".to_string(),
            },
        },
        snapshots: SnapshotConfig {
            enabled: true,
            retain: SnapshotRetain {
                default: SNAPSHOT_RETAIN_DAYS,
            },
        },
        go2rtc: Go2RtcConfig { streams },
        cameras,
    }
}
