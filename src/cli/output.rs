//! Output formatting for CLI commands.

use serde::Serialize;

use crate::cli::args::{OutputFormat, SynmergeArgs};
use crate::error::Result;

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &SynmergeArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &SynmergeArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    for line in human_lines(&value) {
        println!("{line}");
    }
    Ok(())
}

/// Render a JSON object as `label: value` lines.
///
/// `sample_clusters` lists are rendered one cluster per line.
fn human_lines(value: &serde_json::Value) -> Vec<String> {
    let mut lines = Vec::new();
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                if key == "sample_clusters"
                    && let Some(clusters) = val.as_array()
                {
                    if clusters.is_empty() {
                        continue;
                    }
                    lines.push(String::new());
                    lines.push("Largest clusters:".to_string());
                    lines.push("─────────────────".to_string());
                    for cluster in clusters {
                        let root = cluster.get("root").map(format_value).unwrap_or_default();
                        let members = cluster
                            .get("members")
                            .map(format_value)
                            .unwrap_or_default();
                        lines.push(format!("root {root}: {members}"));
                    }
                } else {
                    lines.push(format!("{}: {}", humanize_key(key), format_value(val)));
                }
            }
        }
        _ => lines.push(format_value(value)),
    }
    lines
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &SynmergeArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// `rows_read` -> `Rows read`
fn humanize_key(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(_) => "[object]".to_string(),
        serde_json::Value::Null => "null".to_string(),
    }
}
