// ── Spanning tree domain types ──

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum StpMode {
    Stp,
    Rstp,
    Mstp,
}

impl StpMode {
    pub const ALL: [StpMode; 3] = [Self::Stp, Self::Rstp, Self::Mstp];
}

/// Per-port STP priority: 0–240 in steps of 16.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StpPortPriority(u8);

impl StpPortPriority {
    pub fn new(value: u8) -> Result<Self, CoreError> {
        if value <= 240 && value % 16 == 0 {
            Ok(Self(value))
        } else {
            Err(CoreError::validation(
                "Port priority must be a multiple of 16 between 0 and 240",
            ))
        }
    }

    pub fn parse(text: &str) -> Result<Self, CoreError> {
        text.trim()
            .parse::<u8>()
            .map_err(|_| {
                CoreError::validation(
                    "Port priority must be a multiple of 16 between 0 and 240",
                )
            })
            .and_then(Self::new)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for StpPortPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Switch-global STP state. Bridge priority stays free text; vendors
/// differ on the accepted range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StpSettings {
    pub enabled: bool,
    pub mode: StpMode,
    pub bridge_priority: String,
}

impl Default for StpSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: StpMode::Mstp,
            bridge_priority: "32768".to_string(),
        }
    }
}

/// Per-port STP tuning row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StpPortEntry {
    pub port: String,
    pub priority: StpPortPriority,
    pub edge_port: bool,
    pub enabled: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn port_priority_must_be_multiple_of_16() {
        assert!(StpPortPriority::new(0).is_ok());
        assert!(StpPortPriority::new(128).is_ok());
        assert!(StpPortPriority::new(240).is_ok());
        assert!(StpPortPriority::new(17).is_err());
        assert!(StpPortPriority::parse("241").is_err());
    }
}
