//! `bootconf check`
//!
//! Runs the terminating checks: mandatory keys first, then sources. Either
//! failure logs and exits the process with status 1.

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Source;
use crate::services::ConfigContext;

#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub keys: Vec<String>,
    pub sources: Vec<Source>,
    pub passed: bool,
}

impl CommandOutput for CheckOutput {
    fn to_human(&self) -> String {
        format!(
            "All checks passed ({} keys, {} sources)",
            self.keys.len(),
            self.sources.len()
        )
    }
}

pub fn execute(ctx: &ConfigContext, keys: &[String], sources: &[Source], json: bool) -> Result<()> {
    ctx.must_load(keys);
    ctx.must_source(sources);

    output(
        &CheckOutput {
            keys: keys.to_vec(),
            sources: sources.to_vec(),
            passed: true,
        },
        json,
    )
}
