use figment::providers::{Format, Json, Toml, Yaml};
use figment::value::{Dict, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::SourceError;

/// Structured-data format of a configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    Json,
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// Decode a document into a map with lower-cased keys.
    ///
    /// Keys are case-insensitive throughout the resolved store, so every map
    /// level is normalized here rather than at lookup time.
    pub fn decode(self, content: &str) -> Result<Dict, String> {
        let dict: Dict = match self {
            Self::Json => Json::from_str(content).map_err(|e| e.to_string())?,
            Self::Yaml => Yaml::from_str(content).map_err(|e| e.to_string())?,
            Self::Toml => Toml::from_str(content).map_err(|e| e.to_string())?,
        };
        Ok(lowercase_keys(dict))
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
            Self::Toml => write!(f, "toml"),
        }
    }
}

impl FromStr for ConfigFormat {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            _ => Err(SourceError::UnsupportedFormat(s.to_string())),
        }
    }
}

fn lowercase_keys(dict: Dict) -> Dict {
    dict.into_iter()
        .map(|(key, value)| (key.to_lowercase(), lowercase_value(value)))
        .collect()
}

fn lowercase_value(value: Value) -> Value {
    match value {
        Value::Dict(tag, dict) => Value::Dict(tag, lowercase_keys(dict)),
        Value::Array(tag, items) => {
            Value::Array(tag, items.into_iter().map(lowercase_value).collect())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format_names() {
        assert_eq!("json".parse::<ConfigFormat>().unwrap(), ConfigFormat::Json);
        assert_eq!("YML".parse::<ConfigFormat>().unwrap(), ConfigFormat::Yaml);
        assert_eq!("toml".parse::<ConfigFormat>().unwrap(), ConfigFormat::Toml);

        match "ini".parse::<ConfigFormat>() {
            Err(SourceError::UnsupportedFormat(name)) => assert_eq!(name, "ini"),
            other => panic!("Expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_lowercases_nested_keys() {
        let dict = ConfigFormat::Json
            .decode(r#"{"DB": {"Host": "localhost", "Ports": [{"Primary": 1}]}}"#)
            .unwrap();

        let db = dict.get("db").and_then(Value::as_dict).unwrap();
        assert_eq!(db.get("host").and_then(Value::as_str), Some("localhost"));

        let ports = db.get("ports").and_then(Value::as_array).unwrap();
        assert!(ports[0].as_dict().unwrap().contains_key("primary"));
    }

    #[test]
    fn test_decode_yaml_and_toml() {
        let yaml = ConfigFormat::Yaml.decode("server:\n  port: 9000\n").unwrap();
        assert!(yaml.get("server").and_then(Value::as_dict).is_some());

        let toml = ConfigFormat::Toml.decode("[server]\nport = 9000\n").unwrap();
        assert!(toml.get("server").and_then(Value::as_dict).is_some());
    }

    #[test]
    fn test_decode_rejects_non_map_root() {
        assert!(ConfigFormat::Json.decode("[1, 2, 3]").is_err());
        assert!(ConfigFormat::Json.decode("{not json").is_err());
    }
}
