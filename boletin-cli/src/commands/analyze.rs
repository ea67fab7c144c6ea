//! Analyze command

use anyhow::Result;
use boletin_sdk::{AnalysisReport, AnalysisRequest, ExpertOpinion, NormativeChange};
use chrono::{Local, NaiveDate};
use clap::Args;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};

use super::call_failed;
use crate::context::Context;
use crate::output::{
    format_seconds, level_badge, print_field, print_list_field, print_optional_field,
    print_section, TextDisplay,
};

/// Analyze the bulletin of one day
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Bulletin date (YYYY-MM-DD); defaults to today
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Run a fresh analysis even if one is stored
    #[arg(short, long)]
    pub force: bool,
}

/// Execute the analyze command
pub async fn execute(ctx: &Context, args: AnalyzeArgs) -> Result<()> {
    let today = Local::now().date_naive();
    let request = AnalysisRequest::new(args.date.unwrap_or(today)).with_force_reanalysis(args.force);
    request.validate(today)?;

    let client = ctx.create_client()?;
    tracing::debug!(date = %request.date, force = request.force_reanalysis, "Requesting analysis");

    let spinner = ctx
        .output
        .spinner(&format!("Analyzing bulletin of {}...", request.date));
    let result = client.analysis().analyze(&request).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let report = result.map_err(call_failed)?;
    ctx.output.write(&report)?;
    Ok(())
}

impl TextDisplay for AnalysisReport {
    fn display_text(&self) {
        println!(
            "{} {}",
            "Official bulletin analysis".bold(),
            self.date.as_str().cyan()
        );
        print_optional_field("Section", self.section.as_deref());
        if self.from_cache() {
            print_field("Source", &"stored analysis".dimmed().to_string());
        }
        if let Some(seconds) = self.metadata.processing_time {
            print_field("Processing time", &format_seconds(seconds));
        }

        print_section("Summary");
        println!("{}", self.analysis.summary);

        print_section("Key changes");
        if self.analysis.key_changes.is_empty() {
            println!("{}", "No relevant changes found.".dimmed());
        } else {
            println!("{}", changes_table(&self.analysis.key_changes));
            for change in &self.analysis.key_changes {
                display_change(change);
            }
        }

        print_section("Affected areas");
        print_list_field("Areas", &self.analysis.affected_areas);

        print_section("Estimated impact");
        println!("{}", self.analysis.estimated_impact);

        print_section("Expert opinions");
        if self.expert_opinions.is_empty() {
            println!("{}", "No opinions found.".dimmed());
        }
        for opinion in &self.expert_opinions {
            display_opinion(opinion);
        }
    }
}

fn changes_table(changes: &[NormativeChange]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);
    table.set_header(
        ["Type", "Number", "Title", "Impact"]
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );

    for change in changes {
        table.add_row(vec![
            Cell::new(&change.kind),
            Cell::new(&change.number),
            Cell::new(&change.title),
            Cell::new(level_badge(change.impact.as_str())),
        ]);
    }
    table
}

fn display_change(change: &NormativeChange) {
    let heading = if change.heading.is_empty() {
        &change.title
    } else {
        &change.heading
    };
    println!("\n  {}", heading.bold());
    if !change.description.is_empty() {
        println!("  {}", change.description);
    }
    if !change.impact_rationale.is_empty() {
        print_field("Why", &change.impact_rationale);
    }
}

fn display_opinion(opinion: &ExpertOpinion) {
    let relevance = opinion
        .relevance
        .as_deref()
        .map(|r| format!(" [{}]", level_badge(r)))
        .unwrap_or_default();
    println!("\n  {}{}", opinion.title.bold(), relevance);
    print_field("Outlet", &opinion.outlet);
    print_optional_field("Author", opinion.author.as_deref());
    print_optional_field("Published", opinion.published_on.as_deref());
    if !opinion.summary.is_empty() {
        println!("  {}", opinion.summary);
    }
    print_optional_field("Link", opinion.url.as_deref());
}
