//! Output formatting for CLI

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable report (default)
    #[default]
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Output writer that handles different formats
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format }
    }

    /// Write a single item
    pub fn write<T: Serialize + TextDisplay>(&self, item: &T) -> Result<()> {
        match self.format {
            OutputFormat::Text => item.display_text(),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(item)?;
                println!("{}", json);
            }
            OutputFormat::Yaml => {
                let yaml = serde_yaml::to_string(item)?;
                print!("{}", yaml);
            }
        }
        Ok(())
    }

    /// Write a success message
    pub fn success(&self, message: &str) {
        if self.format == OutputFormat::Text {
            println!("{} {}", "✓".green(), message);
        }
    }

    /// Write an error message
    pub fn error(&self, message: &str) {
        if self.format == OutputFormat::Text {
            eprintln!("{} {}", "✗".red(), message);
        } else {
            eprintln!("Error: {}", message);
        }
    }

    /// Write a warning message
    pub fn warning(&self, message: &str) {
        if self.format == OutputFormat::Text {
            eprintln!("{} {}", "⚠".yellow(), message);
        } else {
            eprintln!("Warning: {}", message);
        }
    }

    /// Start a spinner for long operations
    pub fn spinner(&self, message: &str) -> Option<indicatif::ProgressBar> {
        if self.format != OutputFormat::Text {
            return None;
        }

        let pb = indicatif::ProgressBar::new_spinner();
        if let Ok(style) = indicatif::ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(pb)
    }
}

/// Trait for rendering an item as a human readable report
pub trait TextDisplay {
    /// Print the item in detail
    fn display_text(&self);
}

/// Print a key-value pair in detail format
pub fn print_field(key: &str, value: &str) {
    println!("  {}: {}", key.cyan(), value);
}

/// Print an optional key-value pair
pub fn print_optional_field(key: &str, value: Option<&str>) {
    if let Some(v) = value {
        print_field(key, v);
    }
}

/// Print a list field
pub fn print_list_field(key: &str, values: &[String]) {
    if values.is_empty() {
        println!("  {}: {}", key.cyan(), "-".dimmed());
    } else {
        println!("  {}:", key.cyan());
        for v in values {
            println!("    - {}", v);
        }
    }
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// Impact or relevance badge with color
pub fn level_badge(level: &str) -> String {
    match level.to_lowercase().as_str() {
        "high" | "alto" | "alta" => level.to_string().red().bold().to_string(),
        "medium" | "medio" | "media" => level.to_string().yellow().to_string(),
        "low" | "bajo" | "baja" => level.to_string().green().to_string(),
        _ => level.to_string().dimmed().to_string(),
    }
}

/// Format a processing time in seconds for display
pub fn format_seconds(seconds: f64) -> String {
    if seconds < 60.0 {
        format!("{:.1} s", seconds)
    } else {
        let minutes = (seconds / 60.0).floor();
        format!("{} min {:.0} s", minutes, seconds - minutes * 60.0)
    }
}
