use std::path::PathBuf;

use tracing::warn;

pub const DEFAULT_BED_COUNT: u32 = 10;
pub const DEFAULT_STATE_DIR: &str = ".wards";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WardsConfig {
    /// Size of the roster created when no beds have been persisted yet.
    pub bed_count: u32,
    /// Directory holding `patients.json` and `beds.json`.
    pub state_dir: PathBuf,
}

impl Default for WardsConfig {
    fn default() -> Self {
        Self {
            bed_count: DEFAULT_BED_COUNT,
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
        }
    }
}

/// Read `WARDS_BED_COUNT` and `WARDS_STATE_DIR`, falling back to defaults.
pub fn load_from_env() -> WardsConfig {
    let bed_count = match std::env::var("WARDS_BED_COUNT") {
        Ok(s) if s.trim().is_empty() => DEFAULT_BED_COUNT,
        Ok(s) => parse_bed_count(&s).unwrap_or_else(|| {
            warn!(
                "WARDS_BED_COUNT '{}' is not a positive integer, using {}",
                s, DEFAULT_BED_COUNT
            );
            DEFAULT_BED_COUNT
        }),
        Err(_) => DEFAULT_BED_COUNT,
    };
    let state_dir = std::env::var("WARDS_STATE_DIR")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR));
    WardsConfig {
        bed_count,
        state_dir,
    }
}

fn parse_bed_count(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok().filter(|n| *n > 0)
}
