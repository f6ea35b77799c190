//! Table rendering for error listings.

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::domain::models::{FailureMatch, TextLogError};

/// Render a job's error lines with their match evidence.
pub fn format_error_table(errors: &[(TextLogError, Vec<FailureMatch>)]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Line #", "Error", "Best", "Matches"]);

    for (error, matches) in errors {
        let best = error
            .best_classification
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        let evidence = if matches.is_empty() {
            "-".to_string()
        } else {
            matches
                .iter()
                .map(|m| {
                    format!(
                        "{} -> cf {} ({:.2})",
                        m.matcher_name, m.classified_failure_id, m.score
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        table.add_row(vec![
            Cell::new(error.line_number),
            Cell::new(truncate_line(&error.line)),
            Cell::new(best),
            Cell::new(evidence),
        ]);
    }

    table.to_string()
}

fn truncate_line(line: &str) -> String {
    const MAX: usize = 80;
    if line.chars().count() <= MAX {
        line.to_string()
    } else {
        let prefix: String = line.chars().take(MAX - 1).collect();
        format!("{prefix}\u{2026}")
    }
}
