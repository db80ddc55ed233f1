//! `bootconf dump`

use anyhow::Result;
use figment::value::Value;
use serde::Serialize;

use crate::cli::output::{output, table_with_header, truncate, CommandOutput};
use crate::services::{ConfigContext, Provenance};

#[derive(Debug, Serialize)]
pub struct DumpEntry {
    pub key: String,
    pub value: String,
    pub provenance: Option<Provenance>,
}

#[derive(Debug, Serialize)]
pub struct DumpOutput {
    pub entries: Vec<DumpEntry>,
}

impl From<&ConfigContext> for DumpOutput {
    fn from(ctx: &ConfigContext) -> Self {
        let config = ctx.config();
        let entries = config
            .keys()
            .into_iter()
            .map(|key| {
                let value = match config.get(&key) {
                    Some(Value::Array(..)) => config.get_string_slice(&key).join(", "),
                    _ => config.get_string(&key),
                };
                DumpEntry {
                    provenance: config.provenance(&key),
                    value,
                    key,
                }
            })
            .collect();
        Self { entries }
    }
}

fn describe(provenance: Option<&Provenance>) -> String {
    match provenance {
        Some(Provenance::Environment { variable }) => format!("env ({variable})"),
        Some(Provenance::Loaded { source }) => source.to_string(),
        None => "-".to_string(),
    }
}

impl CommandOutput for DumpOutput {
    fn to_human(&self) -> String {
        if self.entries.is_empty() {
            return "No configuration loaded.".to_string();
        }

        let mut table = table_with_header(&["Key", "Value", "Source"]);
        for entry in &self.entries {
            table.add_row(vec![
                entry.key.clone(),
                truncate(&entry.value, 60),
                describe(entry.provenance.as_ref()),
            ]);
        }
        table.to_string()
    }
}

pub fn execute(ctx: &ConfigContext, json: bool) -> Result<()> {
    output(&DumpOutput::from(ctx), json)
}
