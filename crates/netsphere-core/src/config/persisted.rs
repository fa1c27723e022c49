//! The JSON settings file kept next to the game.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{Error, Result};

/// Keyed settings document.
///
/// Missing keys take their defaults, and so does a key holding a value of the
/// wrong type. Keys this type does not know are kept in `extra` and written
/// back untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersistedConfig {
    pub max_framerate: i32,
    pub field_of_view: i32,
    pub center_field_of_view: i32,
    pub sprint_field_of_view: i32,

    /// 0 windowed, 1 fullscreen, 2 borderless.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_mode: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphic_quality: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<i32>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for PersistedConfig {
    fn default() -> Self {
        Self {
            max_framerate: 300,
            field_of_view: 60,
            center_field_of_view: 66,
            sprint_field_of_view: 80,
            display_mode: None,
            graphic_quality: None,
            aspect_ratio: None,
            extra: Map::new(),
        }
    }
}

impl PersistedConfig {
    /// Parse a settings document.
    ///
    /// Only malformed JSON or a root that is not an object is an error.
    pub fn from_json(content: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| Error::ConfigParseError(e.to_string()))?;
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(Error::ConfigParseError(format!(
                "expected a JSON object, found {}",
                json_type(&other)
            ))),
        }
    }

    fn from_map(mut map: Map<String, Value>) -> Self {
        let defaults = Self::default();
        Self {
            max_framerate: take_int(&mut map, "max_framerate").unwrap_or(defaults.max_framerate),
            field_of_view: take_int(&mut map, "field_of_view").unwrap_or(defaults.field_of_view),
            center_field_of_view: take_int(&mut map, "center_field_of_view")
                .unwrap_or(defaults.center_field_of_view),
            sprint_field_of_view: take_int(&mut map, "sprint_field_of_view")
                .unwrap_or(defaults.sprint_field_of_view),
            display_mode: take_int(&mut map, "display_mode"),
            graphic_quality: take_int(&mut map, "graphic_quality"),
            aspect_ratio: take_int(&mut map, "aspect_ratio"),
            extra: map,
        }
    }

    /// Pretty-printed with four-space indentation.
    pub fn to_json(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;
        // serde_json only ever emits valid UTF-8
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Remove `key` and read it as an `i32`.
///
/// Integral floats such as `144.0` are accepted. Anything else is dropped with
/// a warning so the key falls back to its default.
fn take_int(map: &mut Map<String, Value>, key: &str) -> Option<i32> {
    let value = map.remove(key)?;
    let parsed = match &value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .and_then(|i| i32::try_from(i).ok()),
        _ => None,
    };
    if parsed.is_none() {
        warn!("Ignoring settings key {} with value {}", key, value);
    }
    parsed
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Fixed-path storage for [`PersistedConfig`].
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file.
    ///
    /// A missing file is `ConfigNotFound`, malformed content `ConfigParseError`.
    pub fn load(&self) -> Result<PersistedConfig> {
        let content = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::ConfigNotFound(self.path.display().to_string()),
            _ => Error::Io(e),
        })?;
        PersistedConfig::from_json(&content)
    }

    pub fn save(&self, config: &PersistedConfig) -> Result<()> {
        fs::write(&self.path, config.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_keys_default() {
        let config = PersistedConfig::from_json(r#"{"max_framerate": 144}"#).unwrap();
        assert_eq!(config.max_framerate, 144);
        assert_eq!(config.field_of_view, 60);
        assert_eq!(config.center_field_of_view, 66);
        assert_eq!(config.sprint_field_of_view, 80);
        assert_eq!(config.display_mode, None);
    }

    #[test]
    fn test_integral_floats_accepted() {
        let config =
            PersistedConfig::from_json(r#"{"max_framerate": 144.0, "field_of_view": 90}"#).unwrap();
        assert_eq!(config.max_framerate, 144);
        assert_eq!(config.field_of_view, 90);
    }

    #[test]
    fn test_wrongly_typed_key_defaults_alone() {
        let config = PersistedConfig::from_json(
            r#"{"max_framerate": "fast", "field_of_view": 72.5, "center_field_of_view": 95,
                "graphic_quality": true, "aspect_ratio": 4}"#,
        )
        .unwrap();

        assert_eq!(config.max_framerate, 300);
        assert_eq!(config.field_of_view, 60);
        assert_eq!(config.center_field_of_view, 95);
        assert_eq!(config.graphic_quality, None);
        assert_eq!(config.aspect_ratio, Some(4));
        // dropped keys do not come back through `extra`
        assert!(config.extra.is_empty());
    }

    #[test]
    fn test_live_keys_use_game_names() {
        let config = PersistedConfig::from_json(
            r#"{"display_mode": 2, "graphic_quality": 1, "aspect_ratio": 3}"#,
        )
        .unwrap();
        assert_eq!(config.display_mode, Some(2));
        assert_eq!(config.graphic_quality, Some(1));
        assert_eq!(config.aspect_ratio, Some(3));

        let json = config.to_json().unwrap();
        assert!(json.contains("\"graphic_quality\": 1"));
        assert!(!json.contains("graphics_quality"));
    }

    #[test]
    fn test_unknown_keys_preserved() {
        let config =
            PersistedConfig::from_json(r#"{"max_framerate": 144, "theme": "dark"}"#).unwrap();
        assert_eq!(config.extra.get("theme"), Some(&Value::from("dark")));

        let reparsed = PersistedConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, config);
    }

    #[test]
    fn test_default_document_has_four_keys() {
        let json = PersistedConfig::default().to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 4);
        assert_eq!(object["max_framerate"], 300);
        assert_eq!(object["field_of_view"], 60);
        assert_eq!(object["center_field_of_view"], 66);
        assert_eq!(object["sprint_field_of_view"], 80);
    }

    #[test]
    fn test_four_space_indentation() {
        let json = PersistedConfig::default().to_json().unwrap();
        assert!(json.starts_with("{\n    \"max_framerate\": 300,"));
    }

    #[test]
    fn test_malformed_is_parse_error() {
        assert!(matches!(
            PersistedConfig::from_json("{ not json"),
            Err(Error::ConfigParseError(_))
        ));
        assert!(matches!(
            PersistedConfig::from_json(""),
            Err(Error::ConfigParseError(_))
        ));
        assert!(matches!(
            PersistedConfig::from_json("[300, 60]"),
            Err(Error::ConfigParseError(_))
        ));
    }

    #[test]
    fn test_store_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("netsphere.json"));

        assert!(matches!(store.load(), Err(Error::ConfigNotFound(_))));
    }

    #[test]
    fn test_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("netsphere.json"));
        let config = PersistedConfig {
            max_framerate: 240,
            graphic_quality: Some(1),
            ..PersistedConfig::default()
        };

        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn test_store_unwritable_path() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("missing").join("netsphere.json"));

        assert!(matches!(
            store.save(&PersistedConfig::default()),
            Err(Error::Io(_))
        ));
    }
}
