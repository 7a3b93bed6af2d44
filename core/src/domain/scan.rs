//! Scan session domain models.

use serde::{Deserialize, Serialize};

/// Default capture rate, in frames per second.
pub const DEFAULT_FRAME_RATE: u32 = 10;

/// Highest capture rate the engine accepts.
pub const MAX_FRAME_RATE: u32 = 1000;

/// Default side of the square detection region, in logical units.
pub const DEFAULT_QR_BOX: u32 = 250;

// ============================================================================
// CameraFacing
// ============================================================================

/// Which camera the engine should open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum CameraFacing {
    /// Rear camera, pointing away from the user.
    #[default]
    Environment,
    /// Front camera.
    User,
}

impl CameraFacing {
    /// Name used by camera constraint APIs (`facingMode`).
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraFacing::Environment => "environment",
            CameraFacing::User => "user",
        }
    }
}

impl std::fmt::Display for CameraFacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CameraFacing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "environment" | "rear" | "back" => Ok(CameraFacing::Environment),
            "user" | "front" => Ok(CameraFacing::User),
            other => Err(format!("unknown camera facing mode: {}", other)),
        }
    }
}

// ============================================================================
// ScanConfig
// ============================================================================

/// Capture parameters handed to the decoding engine on start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanConfig {
    /// Target frames per second.
    pub fps: u32,
    /// Side of the square detection region.
    pub qr_box: u32,
    /// Preferred camera.
    pub facing: CameraFacing,
}

impl ScanConfig {
    /// Interval between two captured frames. Rates outside
    /// `1..=MAX_FRAME_RATE` are clamped, so the interval is never zero.
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(1) / self.fps.clamp(1, MAX_FRAME_RATE)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FRAME_RATE,
            qr_box: DEFAULT_QR_BOX,
            facing: CameraFacing::Environment,
        }
    }
}

// ============================================================================
// ScanState / StopOutcome
// ============================================================================

/// Whether a session is currently capturing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScanState {
    /// No capture running.
    #[default]
    Idle,
    /// Capture running, callbacks may fire.
    Scanning,
}

/// Result of a successful `stop` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// Capture was halted.
    Stopped,
    /// Nothing was running; state left untouched.
    NotScanning,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert_eq!(config.fps, 10);
        assert_eq!(config.qr_box, 250);
        assert_eq!(config.facing, CameraFacing::Environment);
        assert_eq!(config.frame_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_zero_fps_interval() {
        let config = ScanConfig {
            fps: 0,
            ..ScanConfig::default()
        };
        assert_eq!(config.frame_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_fast_fps_interval_is_never_zero() {
        for fps in [MAX_FRAME_RATE, 2000, u32::MAX] {
            let config = ScanConfig {
                fps,
                ..ScanConfig::default()
            };
            assert_eq!(config.frame_interval(), Duration::from_millis(1), "fps {}", fps);
        }
    }

    #[test]
    fn test_facing_parse() {
        assert_eq!("environment".parse::<CameraFacing>(), Ok(CameraFacing::Environment));
        assert_eq!("Front".parse::<CameraFacing>(), Ok(CameraFacing::User));
        assert!("sideways".parse::<CameraFacing>().is_err());
    }

    #[test]
    fn test_facing_serde() {
        let json = serde_json::to_string(&CameraFacing::Environment).unwrap();
        assert_eq!(json, "\"environment\"");
    }
}
