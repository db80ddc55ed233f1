//! `bootconf get`

use anyhow::Result;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::process::ExitCode;

use crate::cli::output::{output, CommandOutput};
use crate::cli::types::ValueKind;
use crate::services::{ConfigContext, Provenance};

/// Exit status when the key resolves to nothing
pub const EXIT_KEY_ABSENT: u8 = 2;

#[derive(Debug, Serialize)]
pub struct GetOutput {
    pub key: String,
    pub value: JsonValue,
    pub provenance: Option<Provenance>,
}

impl GetOutput {
    pub fn read(ctx: &ConfigContext, key: &str, kind: ValueKind) -> Self {
        let value = match kind {
            ValueKind::String => JsonValue::from(ctx.get_string(key)),
            ValueKind::Int => JsonValue::from(ctx.get_int(key)),
            ValueKind::Float => JsonValue::from(ctx.get_float(key)),
            ValueKind::Bool => JsonValue::from(ctx.get_bool(key)),
            ValueKind::Slice => JsonValue::from(ctx.get_string_slice(key)),
        };
        Self {
            key: key.to_string(),
            value,
            provenance: ctx.config().provenance(key),
        }
    }
}

impl CommandOutput for GetOutput {
    fn to_human(&self) -> String {
        match &self.value {
            JsonValue::String(text) => text.clone(),
            JsonValue::Array(items) => items
                .iter()
                .map(|item| item.as_str().unwrap_or_default())
                .collect::<Vec<_>>()
                .join("\n"),
            other => other.to_string(),
        }
    }
}

pub fn execute(ctx: &ConfigContext, key: &str, kind: ValueKind, json: bool) -> Result<ExitCode> {
    if !ctx.is_set(key) {
        eprintln!("Key {key} is not set");
        return Ok(ExitCode::from(EXIT_KEY_ABSENT));
    }

    output(&GetOutput::read(ctx, key, kind), json)?;
    Ok(ExitCode::SUCCESS)
}
