//! Environment document model.
//!
//! A flat key-value document (dotenv-style) modeled as an ordered list of
//! lines so that comments and operator-added keys survive regeneration.
//! The generated multi-POS register block is delimited by a marker comment
//! and is fully replaced on every render, which keeps regeneration
//! idempotent and leaves no orphaned keys when the register count shrinks.

use crate::profile::DeviceProfile;
use regex::Regex;
use std::fmt;

/// Marker comment preceding the generated register block
pub const REGISTER_BLOCK_MARKER: &str = "# --- multi-POS registers (generated) ---";

/// Key holding the stable device identity
pub const IDENTITY_KEY: &str = "MICROMANAGER_ID";

/// One line of an environment document
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// Comment, blank line, or anything else we pass through untouched
    Raw(String),
    /// `KEY=value` pair
    Pair(String, String),
}

/// An ordered, comment-preserving environment document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvDocument {
    lines: Vec<Line>,
}

impl EnvDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from its textual form.
    ///
    /// Lines without a `=` separator (comments, blanks) are preserved
    /// verbatim. Values may be double-quoted; quotes are stripped on parse
    /// and re-added on serialization when the value requires them.
    pub fn parse(content: &str) -> Self {
        let mut lines = Vec::new();
        for raw in content.lines() {
            let trimmed = raw.trim_start();
            if trimmed.starts_with('#') || trimmed.is_empty() {
                lines.push(Line::Raw(raw.to_string()));
                continue;
            }
            match raw.split_once('=') {
                Some((key, value)) => lines.push(Line::Pair(
                    key.trim().to_string(),
                    unquote(value.trim()),
                )),
                None => lines.push(Line::Raw(raw.to_string())),
            }
        }
        Self { lines }
    }

    /// Look up the first value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            Line::Pair(k, v) if k == key => Some(v.as_str()),
            _ => None,
        })
    }

    /// Set `key` to `value`, replacing the first existing pair or
    /// appending a new one
    pub fn set(&mut self, key: &str, value: &str) {
        for line in &mut self.lines {
            if let Line::Pair(k, v) = line {
                if k == key {
                    *v = value.to_string();
                    return;
                }
            }
        }
        self.lines.push(Line::Pair(key.to_string(), value.to_string()));
    }

    /// Remove any previously generated register block: the marker comment
    /// and every `SERIAL_PORT_<n>` / `FRIGATE_CAMERA_<n>` key, regardless
    /// of how many registers the prior run configured
    pub fn strip_register_block(&mut self) {
        // Literal pattern, cannot fail to compile
        let register_key = Regex::new(r"^(SERIAL_PORT|FRIGATE_CAMERA)_\d+$").unwrap();
        self.lines.retain(|line| match line {
            Line::Raw(raw) => raw.trim() != REGISTER_BLOCK_MARKER,
            Line::Pair(key, _) => !register_key.is_match(key),
        });
        // Drop a trailing blank left behind by a removed block
        while matches!(self.lines.last(), Some(Line::Raw(raw)) if raw.trim().is_empty()) {
            self.lines.pop();
        }
    }

    /// Append a freshly rendered register block for `profile`
    pub fn append_register_block(&mut self, profile: &DeviceProfile) {
        if !self.lines.is_empty() {
            self.lines.push(Line::Raw(String::new()));
        }
        self.lines.push(Line::Raw(REGISTER_BLOCK_MARKER.to_string()));
        for register in &profile.registers {
            self.lines.push(Line::Pair(
                format!("SERIAL_PORT_{}", register.index),
                register.serial_port.clone(),
            ));
            self.lines.push(Line::Pair(
                format!("FRIGATE_CAMERA_{}", register.index),
                register.camera_name.clone(),
            ));
        }
    }
}

impl fmt::Display for EnvDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            match line {
                Line::Raw(raw) => writeln!(f, "{}", raw)?,
                Line::Pair(key, value) => writeln!(f, "{}={}", key, quote(value))?,
            }
        }
        Ok(())
    }
}

/// Quote a value if it contains characters the document format would
/// otherwise misinterpret
fn quote(value: &str) -> String {
    if value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '#' || c == '"')
    {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

/// Strip surrounding double quotes from a parsed value
fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        value[1..value.len() - 1]
            .replace("\\\"", "\"")
            .replace("\\\\", "\\")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::DeviceProfile;

    fn two_register_profile() -> DeviceProfile {
        DeviceProfile::from_pairs(vec![
            ("/dev/ttyUSB0".to_string(), "POS1".to_string()),
            ("/dev/ttyUSB1".to_string(), "POS2".to_string()),
        ])
    }

    #[test]
    fn test_roundtrip_preserves_comments_and_order() {
        let content = "# device settings\nWEBHOOK_URL=https://example.com/hook\n\nTZ=UTC\n";
        let doc = EnvDocument::parse(content);
        assert_eq!(doc.get("WEBHOOK_URL"), Some("https://example.com/hook"));
        assert_eq!(doc.to_string(), content);
    }

    #[test]
    fn test_append_register_block() {
        let mut doc = EnvDocument::parse("MICROMANAGER_ID=abc123\n");
        doc.append_register_block(&two_register_profile());
        let text = doc.to_string();
        assert!(text.contains(REGISTER_BLOCK_MARKER));
        assert!(text.contains("SERIAL_PORT_0=/dev/ttyUSB0"));
        assert!(text.contains("FRIGATE_CAMERA_1=POS2"));
    }

    #[test]
    fn test_strip_removes_all_prior_register_keys() {
        let mut doc = EnvDocument::new();
        doc.set("MICROMANAGER_ID", "abc123");
        let four = DeviceProfile::from_pairs(
            (0..4)
                .map(|i| (format!("/dev/ttyUSB{}", i), format!("POS{}", i + 1)))
                .collect(),
        );
        doc.append_register_block(&four);

        // Re-render with a smaller count: no orphans from indices >= 1
        let mut doc = EnvDocument::parse(&doc.to_string());
        doc.strip_register_block();
        let one = DeviceProfile::from_pairs(vec![(
            "/dev/ttyUSB0".to_string(),
            "POS1".to_string(),
        )]);
        doc.append_register_block(&one);

        let text = doc.to_string();
        assert!(text.contains("SERIAL_PORT_0="));
        for i in 1..4 {
            assert!(!text.contains(&format!("SERIAL_PORT_{}=", i)));
            assert!(!text.contains(&format!("FRIGATE_CAMERA_{}=", i)));
        }
        assert_eq!(text.matches(REGISTER_BLOCK_MARKER).count(), 1);
        assert_eq!(doc.get("MICROMANAGER_ID"), Some("abc123"));
    }

    #[test]
    fn test_rerender_is_idempotent() {
        let mut doc = EnvDocument::new();
        doc.set("MICROMANAGER_ID", "abc123");
        doc.append_register_block(&two_register_profile());
        let first = doc.to_string();

        let mut doc = EnvDocument::parse(&first);
        doc.strip_register_block();
        doc.append_register_block(&two_register_profile());
        assert_eq!(doc.to_string(), first);
    }

    #[test]
    fn test_values_with_spaces_are_quoted() {
        let mut doc = EnvDocument::new();
        doc.set("TUNNEL_TOKEN", "tok with spaces # not a comment");
        let text = doc.to_string();
        assert_eq!(
            text,
            "TUNNEL_TOKEN=\"tok with spaces # not a comment\"\n"
        );
        let parsed = EnvDocument::parse(&text);
        assert_eq!(
            parsed.get("TUNNEL_TOKEN"),
            Some("tok with spaces # not a comment")
        );
    }

    #[test]
    fn test_set_replaces_existing_key() {
        let mut doc = EnvDocument::parse("WEBHOOK_URL=old\n");
        doc.set("WEBHOOK_URL", "new");
        assert_eq!(doc.get("WEBHOOK_URL"), Some("new"));
        assert_eq!(doc.to_string(), "WEBHOOK_URL=new\n");
    }
}
