//! Resolved configuration store
//!
//! Read side of a bootstrap: every lookup first checks the live process
//! environment for a matching variable, then falls back to the merged
//! sources. Typed getters never fail; an absent or unconvertible value
//! yields the type's zero value.

use figment::value::{Num, Value};
use serde::Serialize;
use std::env;

use super::merge_engine::MergeEngine;
use crate::domain::models::{MergePolicy, Source};

/// Where the value visible at a key comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Provenance {
    /// Overlaid from a process environment variable
    Environment { variable: String },
    /// Supplied by a loaded source
    Loaded { source: Source },
}

/// Queryable configuration produced by one bootstrap
#[derive(Debug)]
pub struct ResolvedConfig {
    engine: MergeEngine,
    env_prefix: Option<String>,
}

impl ResolvedConfig {
    pub const fn new(engine: MergeEngine, env_prefix: Option<String>) -> Self {
        Self { engine, env_prefix }
    }

    /// Store with no sources and no prefix; every read is absent
    pub fn empty() -> Self {
        Self::new(MergeEngine::new(MergePolicy::default()), None)
    }

    pub const fn engine(&self) -> &MergeEngine {
        &self.engine
    }

    /// Environment variable overlaid on `key`
    ///
    /// `db.host` with prefix `app` maps to `APP_DB_HOST`; without a prefix it
    /// maps to `DB_HOST`.
    pub fn env_var_name(&self, key: &str) -> String {
        let key = key.replace(['.', '-'], "_");
        match self.env_prefix.as_deref().filter(|prefix| !prefix.is_empty()) {
            Some(prefix) => format!("{prefix}_{key}").to_uppercase(),
            None => key.to_uppercase(),
        }
    }

    fn env_value(&self, key: &str) -> Option<(String, String)> {
        let variable = self.env_var_name(key);
        env::var(&variable)
            .ok()
            .filter(|value| !value.is_empty())
            .map(|value| (variable, value))
    }

    /// Raw value at `key`, environment first
    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some((_, value)) = self.env_value(key) {
            return Some(Value::from(value));
        }
        self.engine
            .find(key)
            .filter(|value| !matches!(value, Value::Empty(..)))
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// String form of the value; `""` when absent or not a scalar
    pub fn get_string(&self, key: &str) -> String {
        self.get(key)
            .as_ref()
            .and_then(value_to_string)
            .unwrap_or_default()
    }

    /// Integer form of the value; `0` when absent or not convertible
    pub fn get_int(&self, key: &str) -> i64 {
        self.get(key)
            .as_ref()
            .and_then(value_to_i64)
            .unwrap_or_default()
    }

    /// Float form of the value; `0.0` when absent or not convertible
    pub fn get_float(&self, key: &str) -> f64 {
        self.get(key)
            .as_ref()
            .and_then(value_to_f64)
            .unwrap_or_default()
    }

    /// Boolean form of the value; `false` when absent or not convertible
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .as_ref()
            .and_then(value_to_bool)
            .unwrap_or_default()
    }

    /// Sequence form of the value; a string is split on whitespace
    pub fn get_string_slice(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Array(_, items)) => items.iter().filter_map(value_to_string).collect(),
            Some(Value::String(_, text)) => text.split_whitespace().map(String::from).collect(),
            _ => Vec::new(),
        }
    }

    /// Where the value visible at `key` comes from
    pub fn provenance(&self, key: &str) -> Option<Provenance> {
        if let Some((variable, _)) = self.env_value(key) {
            return Some(Provenance::Environment { variable });
        }
        if !self.is_set(key) {
            return None;
        }
        self.engine
            .origin(key)
            .map(|source| Provenance::Loaded { source })
    }

    /// Dotted leaf keys of the merged sources
    ///
    /// Environment-only keys are not listed; the overlay has no key space of
    /// its own.
    pub fn keys(&self) -> Vec<String> {
        self.engine.keys()
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self::empty()
    }
}

pub(crate) fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(_, text) => Some(text.clone()),
        Value::Char(_, c) => Some(c.to_string()),
        Value::Bool(_, b) => Some(b.to_string()),
        Value::Num(_, num) => Some(num_to_string(num)),
        _ => None,
    }
}

pub(crate) fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Num(_, num) => num_to_i64(num),
        Value::String(_, text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(float_to_i64))
        }
        Value::Bool(_, b) => Some(i64::from(*b)),
        _ => None,
    }
}

pub(crate) fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Num(_, num) => Some(num_to_f64(num)),
        Value::String(_, text) => text.trim().parse::<f64>().ok(),
        Value::Bool(_, b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

pub(crate) fn value_to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(_, b) => Some(*b),
        Value::String(_, text) => match text.trim().to_lowercase().as_str() {
            "1" | "t" | "true" => Some(true),
            "0" | "f" | "false" => Some(false),
            _ => None,
        },
        Value::Num(_, num) => Some(num_to_f64(num) != 0.0),
        _ => None,
    }
}

fn num_to_string(num: &Num) -> String {
    match *num {
        Num::U8(v) => v.to_string(),
        Num::U16(v) => v.to_string(),
        Num::U32(v) => v.to_string(),
        Num::U64(v) => v.to_string(),
        Num::U128(v) => v.to_string(),
        Num::USize(v) => v.to_string(),
        Num::I8(v) => v.to_string(),
        Num::I16(v) => v.to_string(),
        Num::I32(v) => v.to_string(),
        Num::I64(v) => v.to_string(),
        Num::I128(v) => v.to_string(),
        Num::ISize(v) => v.to_string(),
        Num::F32(v) => v.to_string(),
        Num::F64(v) => v.to_string(),
    }
}

fn num_to_i64(num: &Num) -> Option<i64> {
    match *num {
        Num::U8(v) => Some(i64::from(v)),
        Num::U16(v) => Some(i64::from(v)),
        Num::U32(v) => Some(i64::from(v)),
        Num::U64(v) => i64::try_from(v).ok(),
        Num::U128(v) => i64::try_from(v).ok(),
        Num::USize(v) => i64::try_from(v).ok(),
        Num::I8(v) => Some(i64::from(v)),
        Num::I16(v) => Some(i64::from(v)),
        Num::I32(v) => Some(i64::from(v)),
        Num::I64(v) => Some(v),
        Num::I128(v) => i64::try_from(v).ok(),
        Num::ISize(v) => i64::try_from(v).ok(),
        Num::F32(v) => float_to_i64(f64::from(v)),
        Num::F64(v) => float_to_i64(v),
    }
}

#[allow(clippy::cast_precision_loss)]
fn num_to_f64(num: &Num) -> f64 {
    match *num {
        Num::U8(v) => f64::from(v),
        Num::U16(v) => f64::from(v),
        Num::U32(v) => f64::from(v),
        Num::U64(v) => v as f64,
        Num::U128(v) => v as f64,
        Num::USize(v) => v as f64,
        Num::I8(v) => f64::from(v),
        Num::I16(v) => f64::from(v),
        Num::I32(v) => f64::from(v),
        Num::I64(v) => v as f64,
        Num::I128(v) => v as f64,
        Num::ISize(v) => v as f64,
        Num::F32(v) => f64::from(v),
        Num::F64(v) => v,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn float_to_i64(v: f64) -> Option<i64> {
    // `as` saturates out-of-range values
    v.is_finite().then(|| v.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ConfigFormat;
    use crate::services::merge_engine::SourceLayer;

    fn store(json: &str, prefix: Option<&str>) -> ResolvedConfig {
        let mut engine = MergeEngine::new(MergePolicy::default());
        engine.load(SourceLayer {
            source: Source::File,
            location: "config.json".to_string(),
            data: ConfigFormat::Json.decode(json).unwrap(),
        });
        ResolvedConfig::new(engine, prefix.map(String::from))
    }

    const DOC: &str = r#"{
        "port": 8080,
        "ratio": 0.75,
        "name": "billing",
        "debug": true,
        "nothing": null,
        "hosts": ["a", "b"],
        "words": "alpha beta  gamma",
        "numeric": " 42 ",
        "db": {"host": "localhost", "timeout": 2.9}
    }"#;

    #[test]
    fn test_typed_reads() {
        temp_env::with_vars_unset(["PORT", "RATIO", "NAME", "DEBUG", "HOSTS", "DB_HOST"], || {
            let config = store(DOC, None);

            assert_eq!(config.get_int("port"), 8080);
            assert_eq!(config.get_string("port"), "8080");
            assert!((config.get_float("ratio") - 0.75).abs() < f64::EPSILON);
            assert_eq!(config.get_string("name"), "billing");
            assert!(config.get_bool("debug"));
            assert_eq!(config.get_string_slice("hosts"), vec!["a", "b"]);
            assert_eq!(config.get_string("db.host"), "localhost");
        });
    }

    #[test]
    fn test_conversions_between_types() {
        temp_env::with_vars_unset(["NUMERIC", "DB_TIMEOUT", "WORDS", "DEBUG"], || {
            let config = store(DOC, None);

            assert_eq!(config.get_int("numeric"), 42);
            assert_eq!(config.get_int("db.timeout"), 2, "Floats truncate");
            assert_eq!(
                config.get_string_slice("words"),
                vec!["alpha", "beta", "gamma"]
            );
            assert_eq!(config.get_int("debug"), 1);
        });
    }

    #[test]
    fn test_absent_or_unconvertible_yield_zero_values() {
        temp_env::with_vars_unset(["MISSING", "NAME", "DB", "NOTHING"], || {
            let config = store(DOC, None);

            assert!(config.get("missing").is_none());
            assert_eq!(config.get_string("missing"), "");
            assert_eq!(config.get_int("name"), 0);
            assert!(config.get_float("name").abs() < f64::EPSILON);
            assert!(!config.get_bool("name"));
            assert!(config.get_string_slice("missing").is_empty());
            assert_eq!(config.get_string("db"), "", "Maps have no string form");
            assert!(!config.is_set("nothing"), "Null counts as absent");
        });
    }

    #[test]
    fn test_empty_store_reads_nothing() {
        temp_env::with_var_unset("PORT", || {
            let config = ResolvedConfig::empty();
            assert!(config.get("port").is_none());
            assert_eq!(config.get_int("port"), 0);
            assert!(config.keys().is_empty());
        });
    }

    #[test]
    fn test_env_var_names() {
        let prefixed = store("{}", Some("app"));
        assert_eq!(prefixed.env_var_name("db.host"), "APP_DB_HOST");
        assert_eq!(prefixed.env_var_name("log-level"), "APP_LOG_LEVEL");

        let bare = store("{}", None);
        assert_eq!(bare.env_var_name("port"), "PORT");
    }

    #[test]
    fn test_environment_overlays_loaded_values_at_read_time() {
        let config = store(DOC, Some("SVC"));

        temp_env::with_var_unset("SVC_PORT", || {
            assert_eq!(config.get_int("port"), 8080);
            assert_eq!(
                config.provenance("port"),
                Some(Provenance::Loaded {
                    source: Source::File
                })
            );
        });

        temp_env::with_var("SVC_PORT", Some("9090"), || {
            assert_eq!(config.get_int("port"), 9090);
            assert_eq!(
                config.provenance("port"),
                Some(Provenance::Environment {
                    variable: "SVC_PORT".to_string()
                })
            );
        });

        temp_env::with_var("SVC_DB_USER", Some("svc"), || {
            assert_eq!(config.get_string("db.user"), "svc");
            assert!(config.is_set("db.user"));
        });
    }

    #[test]
    fn test_empty_environment_value_is_ignored() {
        let config = store(DOC, Some("SVC"));

        temp_env::with_var("SVC_NAME", Some(""), || {
            assert_eq!(config.get_string("name"), "billing");
        });
    }

    #[test]
    fn test_bool_parsing() {
        assert_eq!(value_to_bool(&Value::from("T")), Some(true));
        assert_eq!(value_to_bool(&Value::from("0")), Some(false));
        assert_eq!(value_to_bool(&Value::from("maybe")), None);
    }
}
