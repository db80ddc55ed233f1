//! Output helpers shared by the commands

use anyhow::{Context, Result};
use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use serde::Serialize;

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
}

/// Print `result` as pretty JSON or in its human form
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) -> Result<()> {
    if json_mode {
        let rendered =
            serde_json::to_string_pretty(result).context("Failed to serialize command output")?;
        println!("{rendered}");
    } else {
        println!("{}", result.to_human());
    }
    Ok(())
}

/// Table with the shared border preset and a bold header row
pub fn table_with_header(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|header| Cell::new(header).add_attribute(Attribute::Bold)),
        );
    table
}

/// Truncate a string to a maximum length, appending "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
