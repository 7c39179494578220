//! Document shapes for export/import and bulk loads.

use bubblepop_store::{PlayerProfile, SettingsAggregate};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ImportError;

/// Export document.
///
/// ```text
/// { "version": "1.0.0", "timestamp": "<RFC 3339>",
///   "player": { ... }, "settings": { ... } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub player: PlayerProfile,
    pub settings: SettingsAggregate,
}

/// Sections recovered from an import document. Either may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportDocument {
    pub version: Option<String>,
    pub player: Option<PlayerProfile>,
    pub settings: Option<SettingsAggregate>,
}

impl ImportDocument {
    /// Parse `text` into its optional sections.
    ///
    /// Unknown top-level fields are ignored. A section that is absent or
    /// `null` is treated as missing; a present section must decode fully.
    pub fn parse(text: &str) -> Result<Self, ImportError> {
        let value: Value = serde_json::from_str(text).map_err(ImportError::Parse)?;
        let Value::Object(mut object) = value else {
            return Err(ImportError::NotAnObject);
        };

        Ok(Self {
            version: object
                .get("version")
                .and_then(Value::as_str)
                .map(str::to_string),
            player: take_section(&mut object, "player")?,
            settings: take_section(&mut object, "settings")?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.player.is_none() && self.settings.is_none()
    }
}

fn take_section<T: DeserializeOwned>(
    object: &mut Map<String, Value>,
    section: &'static str,
) -> Result<Option<T>, ImportError> {
    match object.remove(section) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| ImportError::InvalidSection { section, source }),
    }
}

/// Both persisted aggregates as read back from storage in one go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistentData {
    pub version: String,
    pub player: PlayerProfile,
    pub settings: SettingsAggregate,
    pub loaded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_accepts_partial_documents() {
        let settings = serde_json::to_string(&json!({
            "settings": SettingsAggregate::default()
        }))
        .unwrap();

        let doc = ImportDocument::parse(&settings).unwrap();
        assert!(doc.player.is_none());
        assert_eq!(doc.settings, Some(SettingsAggregate::default()));

        let empty = ImportDocument::parse("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn parse_treats_null_sections_as_missing() {
        let doc = ImportDocument::parse(r#"{"player": null, "settings": null}"#).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn parse_rejects_non_objects() {
        assert!(matches!(
            ImportDocument::parse("[1, 2]"),
            Err(ImportError::NotAnObject)
        ));
        assert!(matches!(
            ImportDocument::parse("not json"),
            Err(ImportError::Parse(_))
        ));
    }

    #[test]
    fn parse_rejects_unusable_sections() {
        let result = ImportDocument::parse(r#"{"player": {"username": 5}}"#);
        assert!(matches!(
            result,
            Err(ImportError::InvalidSection {
                section: "player",
                ..
            })
        ));
    }

    #[test]
    fn parse_reads_version() {
        let doc = ImportDocument::parse(r#"{"version": "1.0.0"}"#).unwrap();
        assert_eq!(doc.version.as_deref(), Some("1.0.0"));
    }
}
