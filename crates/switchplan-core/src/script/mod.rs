//! Command-script generation.
//!
//! A [`Script`] is an ordered buffer of vendor CLI lines. Templates in
//! [`templates`] are pure functions from records to a `Script`; rendering
//! the same records twice yields byte-identical text.

mod templates;

pub use templates::{
    acl, dhcp, ip, lacp, mirror, nat, port_security, qos, route, snmp, stp, user, vlan,
};

/// Ordered command lines, one per entry, joined with `\n` on display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    lines: Vec<String>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Emit `label value` only when the value is non-empty.
    pub fn push_optional(&mut self, label: &str, value: &str) {
        if !value.is_empty() {
            self.lines.push(format!("{label} {value}"));
        }
    }

    /// Emit `label value` unless the value is empty or the wildcard.
    pub fn push_unless(&mut self, label: &str, value: &str, wildcard: &str) {
        if !value.is_empty() && value != wildcard {
            self.lines.push(format!("{label} {value}"));
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// In-line variant of [`Script::push_unless`] for clauses appended to a
/// single command line: returns ` label value` or nothing.
pub(crate) fn clause_unless(label: &str, value: &str, wildcard: &str) -> String {
    if value.is_empty() || value == wildcard {
        String::new()
    } else {
        format!(" {label} {value}")
    }
}

/// The field text, or `any` when the operator left it blank.
pub(crate) fn or_any(value: &str) -> &str {
    if value.is_empty() { "any" } else { value }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn display_joins_with_newlines() {
        let mut script = Script::new();
        script.push("vlan 10");
        script.push("quit");
        assert_eq!(script.to_string(), "vlan 10\nquit");
    }

    #[test]
    fn push_optional_skips_empty() {
        let mut script = Script::new();
        script.push_optional("description", "");
        script.push_optional("description", "uplink");
        assert_eq!(script.lines(), &["description uplink".to_string()]);
    }

    #[test]
    fn push_unless_skips_wildcard() {
        let mut script = Script::new();
        script.push_unless("source", "any", "any");
        script.push_unless("source", "10.0.0.0 0.0.0.255", "any");
        assert_eq!(script.lines(), &["source 10.0.0.0 0.0.0.255".to_string()]);
    }

    #[test]
    fn clause_unless_prepends_space() {
        assert_eq!(clause_unless("source-port eq", "80", "any"), " source-port eq 80");
        assert_eq!(clause_unless("source-port eq", "any", "any"), "");
        assert_eq!(clause_unless("source-port eq", "", "any"), "");
    }
}
