/// Output formatter for frequency reports
///
/// This module renders ranked reports as console tables and exports them as a
/// plain text report, JSON, CSV or HTML.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use handlebars::Handlebars;
use serde_json::{json, Value};
use tabled::settings::{object::Columns, Alignment};
use tabled::{Table, Tabled};

use crate::core::aggregator::RankedReport;
use crate::core::analyzer::AnalysisStats;

/// Format a count with thousands separators (1234567 -> "1,234,567")
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut output = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            output.push(',');
        }
        output.push(c);
    }

    output
}

/// Heading line for a report
pub fn report_title(report: &RankedReport) -> String {
    format!("Character count for '{}':", report.bucket.label())
}

/// One row of a rendered report
#[derive(Debug, Clone, Tabled)]
struct CharacterRow {
    #[tabled(rename = "Character")]
    character: char,
    /// Count with thousands separators
    #[tabled(rename = "Count")]
    count: String,
}

/// Render one report as a two-column ASCII table using the [`tabled`] crate.
///
/// Column widths follow the display width of their cells, so wide (CJK)
/// characters keep the frame aligned.
///
/// # Arguments
///
/// * `report` - Report to render
///
/// # Returns
///
/// The table, one row per entry, counts right-aligned
pub fn format_table(report: &RankedReport) -> String {
    let rows: Vec<CharacterRow> = report
        .entries
        .iter()
        .map(|e| CharacterRow {
            character: e.character,
            count: format_count(e.count),
        })
        .collect();

    let mut table = Table::new(rows);
    table.modify(Columns::new(1..), Alignment::right());

    format!("{}\n", table)
}

/// Format every non-empty report for console output
///
/// # Arguments
///
/// * `reports` - Reports in display order
/// * `use_markdown` - Whether to wrap each table in markdown triple backticks
///
/// # Returns
///
/// Formatted string for console output
pub fn format_reports(reports: &[RankedReport], use_markdown: bool) -> String {
    let mut output = String::new();

    for report in reports.iter().filter(|r| !r.is_empty()) {
        output.push_str(&format!("\n{}\n", report_title(report).yellow().bold()));
        if use_markdown {
            output.push_str("```\n");
        }
        output.push_str(&format_table(report));
        if use_markdown {
            output.push_str("```\n");
        }
    }

    if output.is_empty() {
        output.push_str("No characters counted.\n");
    }

    output
}

/// Plain text report, the layout of the console output without color
pub fn format_text_report(reports: &[RankedReport]) -> String {
    let mut output = String::new();

    for report in reports.iter().filter(|r| !r.is_empty()) {
        output.push_str(&format!("\n\n{}\n", report_title(report)));
        output.push_str(&format_table(report));
    }

    output
}

/// Write the plain text report to a file
pub fn write_text_report(reports: &[RankedReport], output_path: &Path) -> Result<()> {
    let mut file = File::create(output_path)
        .context(format!("Failed to create text report: {}", output_path.display()))?;

    file.write_all(format_text_report(reports).as_bytes())
        .context("Failed to write text report")?;

    Ok(())
}

/// Export reports to a JSON file
///
/// # Arguments
///
/// * `reports` - Reports to export, empty ones included
/// * `output_path` - Path where the JSON file will be written
///
/// # Returns
///
/// Result indicating success or failure
pub fn export_reports_json(reports: &[RankedReport], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create JSON output file: {}", output_path.display()))?;

    serde_json::to_writer_pretty(file, reports)
        .context("Failed to write JSON data")?;

    Ok(())
}

/// Create a CSV report, one row per ranked entry
pub fn create_csv_report(reports: &[RankedReport], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create CSV output file: {}", output_path.display()))?;

    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(["Bucket", "Rank", "Character", "Count"])
        .context("Failed to write CSV header")?;

    for report in reports {
        let label = report.bucket.label();
        for (rank, entry) in report.entries.iter().enumerate() {
            writer
                .write_record([
                    label.clone(),
                    (rank + 1).to_string(),
                    entry.character.to_string(),
                    entry.count.to_string(),
                ])
                .context("Failed to write CSV record")?;
        }
    }

    writer.flush().context("Failed to flush CSV writer")?;

    Ok(())
}

const HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Character Frequency Report</title>
    <style>
        body {
            font-family: Arial, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
        }
        h1 {
            color: #2c3e50;
            border-bottom: 2px solid #3498db;
            padding-bottom: 10px;
        }
        h2 {
            color: #2980b9;
            margin-top: 30px;
        }
        table {
            border-collapse: collapse;
            min-width: 300px;
        }
        th, td {
            border-bottom: 1px solid #eee;
            padding: 5px 12px;
        }
        td.count {
            text-align: right;
        }
        .timestamp {
            color: #7f8c8d;
            font-size: 0.9em;
            margin-bottom: 30px;
        }
    </style>
</head>
<body>
    <h1>Character Frequency Report</h1>
    <div class="timestamp">Generated on: {{timestamp}}</div>

    {{#each buckets}}
    <h2>Character count for '{{label}}'</h2>
    <table>
        <tr><th>Character</th><th>Count</th></tr>
        {{#each entries}}
        <tr><td>{{character}}</td><td class="count">{{count}}</td></tr>
        {{/each}}
    </table>
    {{/each}}
</body>
</html>
"#;

/// Create an HTML report of every non-empty report
pub fn create_html_report(reports: &[RankedReport], output_path: &Path) -> Result<()> {
    let mut handlebars = Handlebars::new();
    handlebars
        .register_template_string("report", HTML_TEMPLATE)
        .context("Failed to register HTML template")?;

    let buckets: Vec<Value> = reports
        .iter()
        .filter(|r| !r.is_empty())
        .map(|report| {
            let entries: Vec<Value> = report
                .entries
                .iter()
                .map(|e| json!({ "character": e.character.to_string(), "count": format_count(e.count) }))
                .collect();
            json!({ "label": report.bucket.label(), "entries": entries })
        })
        .collect();

    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let template_data = json!({ "timestamp": timestamp, "buckets": buckets });

    let html = handlebars
        .render("report", &template_data)
        .context("Failed to render HTML template")?;

    let mut file = File::create(output_path)
        .context(format!("Failed to create HTML output file: {}", output_path.display()))?;

    file.write_all(html.as_bytes())
        .context("Failed to write HTML data")?;

    Ok(())
}

/// Create a summary of an analysis pass
pub fn create_summary(stats: &AnalysisStats, languages: usize, total_characters: u64) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", "Analysis Summary".yellow().bold()));
    output.push_str(&format!("{} {}\n", "Documents counted:".green(), stats.counted));
    output.push_str(&format!("{} {}\n", "Documents without body:".green(), stats.no_body));
    output.push_str(&format!("{} {}\n", "Documents failed:".green(), stats.failed));
    output.push_str(&format!("{} {}\n", "Languages:".green(), languages));
    output.push_str(&format!(
        "{} {}\n",
        "Characters counted:".green(),
        format_count(total_characters)
    ));

    output
}
