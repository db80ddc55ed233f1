//! `bootconf sources`

use anyhow::Result;
use comfy_table::{Cell, Color};
use serde::Serialize;

use crate::cli::output::{output, table_with_header, truncate, CommandOutput};
use crate::domain::models::{SourceReport, SourceStatus};
use crate::services::ConfigContext;

#[derive(Debug, Serialize)]
pub struct SourcesOutput {
    pub sources: Vec<SourceReport>,
    pub loaded: usize,
}

impl From<&ConfigContext> for SourcesOutput {
    fn from(ctx: &ConfigContext) -> Self {
        let sources = ctx.reports().to_vec();
        let loaded = sources.iter().filter(|report| report.is_loaded()).count();
        Self { sources, loaded }
    }
}

impl CommandOutput for SourcesOutput {
    fn to_human(&self) -> String {
        let mut table = table_with_header(&["Source", "Status", "Location", "Attempts", "Error"]);

        for report in &self.sources {
            let color = match report.status {
                SourceStatus::Loaded => Color::Green,
                SourceStatus::Unavailable => Color::Yellow,
                SourceStatus::Failed => Color::Red,
            };
            table.add_row(vec![
                Cell::new(report.source),
                Cell::new(report.status).fg(color),
                Cell::new(report.location.as_deref().unwrap_or("-")),
                Cell::new(report.attempts),
                Cell::new(
                    report
                        .error
                        .as_deref()
                        .map_or_else(|| "-".to_string(), |err| truncate(err, 80)),
                ),
            ]);
        }

        format!(
            "{table}\n{} of {} sources loaded",
            self.loaded,
            self.sources.len()
        )
    }
}

pub fn execute(ctx: &ConfigContext, json: bool) -> Result<()> {
    output(&SourcesOutput::from(ctx), json)
}
