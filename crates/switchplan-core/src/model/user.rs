// ── Local user domain types ──

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Login privilege level. The vendor grammar accepts 1, 2, 3 and 15 only.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PrivilegeLevel(u8);

impl PrivilegeLevel {
    pub const ALLOWED: [u8; 4] = [1, 2, 3, 15];

    pub fn new(value: u8) -> Result<Self, CoreError> {
        if Self::ALLOWED.contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::validation(
                "Privilege level must be 1, 2, 3 or 15",
            ))
        }
    }

    pub fn parse(text: &str) -> Result<Self, CoreError> {
        text.trim()
            .parse::<u8>()
            .map_err(|_| CoreError::validation("Privilege level must be 1, 2, 3 or 15"))
            .and_then(Self::new)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for PrivilegeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A device login account. The password stays plaintext in memory and
/// is rendered into the irreversible-cipher line of the script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalUser {
    pub username: String,
    pub privilege: PrivilegeLevel,
    pub password: String,
    pub note: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn only_allowed_levels_construct() {
        assert!(PrivilegeLevel::new(15).is_ok());
        assert!(PrivilegeLevel::new(4).is_err());
        assert!(PrivilegeLevel::parse("0").is_err());
        assert_eq!(PrivilegeLevel::parse("3").unwrap().get(), 3);
    }
}
