//! Global settings for SwitchPlan.
//!
//! Four flat string fields (login type, CLI timeout, SNMP version and
//! community) are the only state that survives a restart. Export writes
//! the JSON shape downstream tooling already consumes
//! (`{"loginType": …, "timeout": …, "snmpVer": …, "snmpComm": …}`);
//! import is deliberately tolerant, extracting each key independently so
//! a partial or hand-edited file still applies what it has.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file content does not look like JSON at all.
    #[error("not a JSON settings file")]
    UnsupportedFormat,

    #[error("failed to serialize settings: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ── Settings ────────────────────────────────────────────────────────

/// The four global fields, serialized with their historical key names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    /// Preferred management protocol, `SSH` or `Telnet`.
    pub login_type: String,
    /// CLI idle timeout in minutes, kept as free text so an empty value
    /// means "leave the device default alone".
    pub timeout: String,
    pub snmp_ver: String,
    pub snmp_comm: String,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            login_type: "SSH".to_string(),
            timeout: "30".to_string(),
            snmp_ver: "v2c".to_string(),
            snmp_comm: "public".to_string(),
        }
    }
}

impl GlobalSettings {
    /// Default on-disk location, e.g. `~/.config/switchplan/settings.json`.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "switchplan")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Write the settings as pretty-printed JSON, creating parent
    /// directories as needed.
    pub fn export(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read a settings file and apply every key it carries. On any
    /// failure the settings are left untouched.
    pub fn import(&mut self, path: &Path) -> Result<(), SettingsError> {
        let content = fs::read_to_string(path)?;
        self.apply_json(&content)
    }

    /// Per-key tolerant application: each present key updates its field,
    /// missing keys leave the current value alone. Content without a `{`
    /// is rejected as not-JSON before anything is applied.
    pub fn apply_json(&mut self, content: &str) -> Result<(), SettingsError> {
        if !content.contains('{') {
            return Err(SettingsError::UnsupportedFormat);
        }
        let mut updated = self.clone();
        if let Some(value) = extract_key(content, "loginType") {
            updated.login_type = value;
        }
        if let Some(value) = extract_key(content, "timeout") {
            updated.timeout = value;
        }
        if let Some(value) = extract_key(content, "snmpVer") {
            updated.snmp_ver = value;
        }
        if let Some(value) = extract_key(content, "snmpComm") {
            updated.snmp_comm = value;
        }
        *self = updated;
        Ok(())
    }
}

/// Find `"key"` and return the quoted string value after its colon.
fn extract_key(content: &str, key: &str) -> Option<String> {
    let needle = format!("\"{key}\"");
    let after_key = &content[content.find(&needle)? + needle.len()..];
    let after_colon = &after_key[after_key.find(':')? + 1..];
    let start = after_colon.find('"')? + 1;
    let rest = &after_colon[start..];
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_match_the_shipped_form() {
        let settings = GlobalSettings::default();
        assert_eq!(settings.login_type, "SSH");
        assert_eq!(settings.timeout, "30");
        assert_eq!(settings.snmp_ver, "v2c");
        assert_eq!(settings.snmp_comm, "public");
    }

    #[test]
    fn export_then_import_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = GlobalSettings::default();
        settings.login_type = "Telnet".to_string();
        settings.snmp_comm = "netops".to_string();
        settings.export(&path).unwrap();

        let mut loaded = GlobalSettings::default();
        loaded.import(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn import_applies_only_present_keys() {
        let mut settings = GlobalSettings::default();
        settings
            .apply_json(r#"{"timeout": "60", "snmpVer": "v3"}"#)
            .unwrap();
        assert_eq!(settings.timeout, "60");
        assert_eq!(settings.snmp_ver, "v3");
        // Untouched fields keep their values.
        assert_eq!(settings.login_type, "SSH");
        assert_eq!(settings.snmp_comm, "public");
    }

    #[test]
    fn non_json_content_is_rejected_unchanged() {
        let mut settings = GlobalSettings::default();
        let err = settings.apply_json("loginType=Telnet").unwrap_err();
        assert!(matches!(err, SettingsError::UnsupportedFormat));
        assert_eq!(settings, GlobalSettings::default());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = GlobalSettings::default();
        let err = settings.import(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
