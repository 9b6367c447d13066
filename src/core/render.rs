//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md, raw

use crate::core::model::{Kind, ResultItem, ResultSet};
use std::io::Write;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "raw" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    #[allow(dead_code)]
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    #[allow(dead_code)]
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
            OutputFormat::Raw => self.render_raw(result_set),
        }
    }

    /// Render to a writer, skipping empty output entirely
    pub fn render_to<W: Write>(&self, result_set: &ResultSet, mut writer: W) -> std::io::Result<()> {
        let output = self.render(result_set);
        if output.is_empty() {
            return Ok(());
        }
        writeln!(writer, "{}", output)
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown, one section per kind
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let sections = [
            (Kind::Error, "Errors"),
            (Kind::Residue, "Residue"),
            (Kind::Edit, "Edits"),
            (Kind::Rename, "Renames"),
            (Kind::Skip, "Skipped"),
            (Kind::Index, "Staging Index"),
        ];

        for (kind, title) in sections {
            let items: Vec<_> = result_set.items.iter().filter(|i| i.kind == kind).collect();
            if items.is_empty() {
                continue;
            }
            output.push_str(&format!("## {}\n\n", title));
            for item in items {
                Self::render_item_md(&mut output, item);
            }
            output.push('\n');
        }

        output
    }

    fn render_item_md(output: &mut String, item: &ResultItem) {
        match item.kind {
            Kind::Error => {
                for error in &item.errors {
                    output.push_str(&format!("- **{}**: {}\n", error.code, error.message));
                }
                return;
            }
            Kind::Rename => {
                output.push_str(&format!(
                    "- `{}` → `{}`",
                    item.path.as_deref().unwrap_or(""),
                    item.target.as_deref().unwrap_or("")
                ));
            }
            _ => {
                output.push_str("- ");
                if let Some(path) = &item.path {
                    output.push_str(&format!("`{}`", path));
                    if let Some(line) = item.line {
                        output.push_str(&format!(":{}", line));
                    }
                }
            }
        }

        if let Some(count) = item.replacements {
            let noun = if count == 1 { "replacement" } else { "replacements" };
            output.push_str(&format!(" ({} {})", count, noun));
        }
        if let Some(excerpt) = &item.excerpt {
            if item.path.is_some() {
                output.push_str(": ");
            }
            output.push_str(excerpt.trim());
        }
        if !item.applied && matches!(item.kind, Kind::Edit | Kind::Rename) {
            output.push_str(" _(planned)_");
        }
        output.push('\n');
    }

    /// Render as raw output: one affected path per line
    fn render_raw(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| match (&item.path, &item.target) {
                (Some(from), Some(to)) => Some(format!("{} -> {}", from, to)),
                (Some(path), None) => Some(match item.line {
                    Some(line) => format!("{}:{}", path, line),
                    None => path.clone(),
                }),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
