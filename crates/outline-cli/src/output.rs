//! Output formatting and writing utilities
//!
//! Machine formats (JSON, YAML) serialize the API payload as-is. The human
//! format renders tables and trees for the common record types.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use outline_core::{AuthInfo, Collection, CollectionDocument, Document, DocumentSearchResult};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use tracing::trace;

/// Width limit for free-text cells in human tables
const CELL_WIDTH: usize = 48;

/// Trait for formatting output in machine-readable formats
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            // Records without a dedicated renderer fall back to pretty JSON
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: !quiet && format == OutputFormat::Human && io::stderr().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    #[cfg(test)]
    pub fn with_writer(format: OutputFormat, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color: false,
            show_progress: false,
            quiet,
            writer,
        }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        if tracing::enabled!(tracing::Level::TRACE) {
            let mut redacted = serde_json::to_value(value)?;
            redaction::redact_json_value(&mut redacted);
            trace!(data = %redacted, "Writing output");
        }

        let formatted = self.format.format(value)?;
        if self.format == OutputFormat::Yaml {
            self.write(&formatted)
        } else {
            self.writeln(&formatted)
        }
    }

    /// Write data, using `human` to render it in the human format
    pub fn render<T, F>(&mut self, value: &T, human: F) -> Result<()>
    where
        T: Serialize,
        F: FnOnce(&T) -> String,
    {
        if self.is_human() {
            let rendered = human(value);
            self.write(&rendered)
        } else {
            self.data(value)
        }
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        let rendered = render_table(headers, &rows);
        let mut lines = rendered.lines();

        if let Some(header) = lines.next() {
            if self.use_color {
                self.writeln(&header.bold().to_string())?;
            } else {
                self.writeln(header)?;
            }
        }
        for line in lines {
            self.writeln(line)?;
        }
        Ok(())
    }

    /// Create a spinner for indeterminate progress
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(default_spinner_style());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

/// Helper function to create a spinner style
pub fn default_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Lay out rows under headers with padded columns
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let pad = |cell: &str, width: usize| {
        let fill = width.saturating_sub(cell.chars().count());
        format!("{}{}", cell, " ".repeat(fill))
    };

    let mut output = String::new();
    let header = headers
        .iter()
        .enumerate()
        .map(|(i, h)| pad(h, widths[i]))
        .collect::<Vec<_>>()
        .join(" │ ");
    output.push_str(header.trim_end());
    output.push('\n');

    let separator = widths
        .iter()
        .map(|w| "─".repeat(*w))
        .collect::<Vec<_>>()
        .join("─┼─");
    output.push_str(&separator);
    output.push('\n');

    for row in rows {
        let line = row
            .iter()
            .enumerate()
            .map(|(i, cell)| match widths.get(i) {
                Some(width) => pad(cell, *width),
                None => cell.clone(),
            })
            .collect::<Vec<_>>()
            .join(" │ ");
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output
}

/// Shorten text to `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    let single_line = text.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= max {
        return single_line;
    }
    let kept: String = single_line.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

fn document_status(document: &Document) -> &'static str {
    if document.deleted_at.is_some() {
        "deleted"
    } else if document.archived_at.is_some() {
        "archived"
    } else if document.is_published() {
        "published"
    } else {
        "draft"
    }
}

/// Table rows for a document list
pub fn document_rows(documents: &[Document]) -> Vec<Vec<String>> {
    documents
        .iter()
        .map(|doc| {
            vec![
                doc.url_id.clone(),
                truncate(&doc.title, CELL_WIDTH),
                doc.updated_at.format("%Y-%m-%d %H:%M").to_string(),
                document_status(doc).to_string(),
            ]
        })
        .collect()
}

pub const DOCUMENT_HEADERS: &[&str] = &["ID", "TITLE", "UPDATED", "STATUS"];

/// Table rows for a collection list
pub fn collection_rows(collections: &[Collection]) -> Vec<Vec<String>> {
    collections
        .iter()
        .map(|col| {
            vec![
                col.id.clone(),
                truncate(&col.name, CELL_WIDTH),
                truncate(col.description.as_deref().unwrap_or(""), CELL_WIDTH),
            ]
        })
        .collect()
}

pub const COLLECTION_HEADERS: &[&str] = &["ID", "NAME", "DESCRIPTION"];

/// Full view of a single document
pub fn document_detail(document: &Document) -> String {
    let mut output = String::new();
    output.push_str(&format!("# {}\n\n", document.title));
    output.push_str(&format!("ID:        {}\n", document.id));
    output.push_str(&format!("URL:       {}\n", document.url));
    if let Some(collection) = &document.collection_id {
        output.push_str(&format!("Collection: {}\n", collection));
    }
    output.push_str(&format!("Status:    {}\n", document_status(document)));
    output.push_str(&format!("Revision:  {}\n", document.revision));
    output.push_str(&format!(
        "Updated:   {}\n",
        document.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    if let Some(author) = &document.created_by {
        output.push_str(&format!("Author:    {}\n", author.name));
    }

    if !document.text.is_empty() {
        output.push('\n');
        output.push_str(&document.text);
        if !document.text.ends_with('\n') {
            output.push('\n');
        }
    }
    output
}

/// Ranked search hits with their context snippets
pub fn search_results(results: &[DocumentSearchResult]) -> String {
    if results.is_empty() {
        return "No documents matched\n".to_string();
    }

    let mut output = String::new();
    for (i, result) in results.iter().enumerate() {
        output.push_str(&format!(
            "{}. {} ({})\n",
            i + 1,
            result.document.title,
            result.document.url_id
        ));
        if let Some(context) = &result.context {
            output.push_str(&format!("   {}\n", truncate(context, 100)));
        }
    }
    output
}

/// Indented document tree of a collection
pub fn collection_tree(nodes: &[CollectionDocument]) -> String {
    fn walk(nodes: &[CollectionDocument], depth: usize, output: &mut String) {
        for node in nodes {
            output.push_str(&format!("{}- {} ({})\n", "  ".repeat(depth), node.title, node.id));
            walk(&node.children, depth + 1, output);
        }
    }

    if nodes.is_empty() {
        return "Collection has no documents\n".to_string();
    }

    let mut output = String::new();
    walk(nodes, 0, &mut output);
    output
}

/// Full view of a single collection
pub fn collection_detail(collection: &Collection) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n\n", collection.name));
    output.push_str(&format!("ID:      {}\n", collection.id));
    output.push_str(&format!("URL:     {}\n", collection.url));
    if let Some(description) = collection.description.as_deref().filter(|d| !d.is_empty()) {
        output.push_str(&format!("About:   {}\n", truncate(description, 80)));
    }
    if let Some(permission) = collection.permission {
        output.push_str(&format!("Access:  {:?}\n", permission));
    }
    output.push_str(&format!(
        "Created: {}\n",
        collection.created_at.format("%Y-%m-%d")
    ));
    output
}

/// Summary of the authenticated user and team
pub fn auth_summary(info: &AuthInfo) -> String {
    let mut output = String::new();
    output.push_str(&format!("User:  {} <{}>\n", info.user.name, info.user.email));
    output.push_str(&format!("ID:    {}\n", info.user.id));
    output.push_str(&format!(
        "Team:  {}{}\n",
        info.team.name,
        info.team
            .url
            .as_deref()
            .map(|url| format!(" ({})", url))
            .unwrap_or_default()
    ));
    if info.user.is_admin {
        output.push_str("Role:  admin\n");
    }
    output
}

#[cfg(test)]
mod tests {
    include!("output/tests.rs");
}
