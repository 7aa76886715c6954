//! CT Insight - Brain CT Patient Dashboard data core
//!
//! Runs one full load / filter / clean / aggregate pass over the configured
//! dataset and prints each section as a console table. Rendering proper is
//! someone else's job; this preview exists so the core can be exercised and
//! eyeballed without a chart layer.

use anyhow::Context;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, Table};
use tracing_subscriber::EnvFilter;

use ct_insight::agg::AggregationResult;
use ct_insight::config;
use ct_insight::dashboard::{AgeDistribution, Dashboard, DashboardPass, Section};
use ct_insight::data::{DataLoader, FilterSelection};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let source = config::source_from_env();
    tracing::info!(?source, "loading dataset");

    let df = DataLoader::load(&source).context("dataset load failed")?;
    let dashboard = Dashboard::new(df).context("column normalization failed")?;

    tracing::info!(options = ?dashboard.gender_options(), "gender filter ready");

    let pass = dashboard
        .render_pass(&FilterSelection::All)
        .context("dashboard pass failed")?;
    print_pass(&pass);

    Ok(())
}

fn print_pass(pass: &DashboardPass) {
    print_age("Age Distribution", &pass.age);
    print_counts("Gender Distribution", &pass.gender_counts);
    print_counts("Slice Thickness Count", &pass.slice_thickness);
    print_counts("Data Source Distribution", &pass.data_sources);
    print_counts("Pathology Summary", &pass.pathology);
    print_gcs(pass);
    print_counts("Side of Injury", &pass.injury_side);
    print_series("Injury Volume Distribution", &pass.injury_volume);
    print_counts("Midline Shift", &pass.midline_shift);
    print_counts("Bleed Subcategory", &pass.bleed_subcategory);
    print_counts("Top Bleed Locations", &pass.top_locations);
    print_counts("Top Extracted Pathologies", &pass.top_pathologies);

    println!(
        "\nRaw data (filtered): {} rows x {} columns",
        pass.filtered.height(),
        pass.filtered.width()
    );
}

fn print_counts(title: &str, section: &Section<AggregationResult>) {
    println!("\n{title}");
    let Some(result) = available(title, section) else {
        return;
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Category", "Count"]);
    for (label, value) in &result.entries {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(format!("{value:.0}")).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
}

fn print_age(title: &str, section: &Section<AgeDistribution>) {
    println!("\n{title}");
    let Some(age) = available(title, section) else {
        return;
    };

    let n = age.years.len();
    if n == 0 {
        println!("  no parseable ages");
        return;
    }
    let mean = age.years.iter().sum::<f64>() / n as f64;
    let min = age.years.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = age.years.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    println!("  n={n}  mean={mean:.1}  min={min:.1}  max={max:.1}  unparseable={unparseable}",
        unparseable = age.unparseable);
}

fn print_series(title: &str, section: &Section<Vec<f64>>) {
    println!("\n{title}");
    let Some(values) = available(title, section) else {
        return;
    };

    if values.is_empty() {
        println!("  no numeric values");
        return;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    println!("  n={}  mean={mean:.1}", values.len());
}

fn print_gcs(pass: &DashboardPass) {
    println!("\nGCS Score Comparison");
    let Some(gcs) = available("GCS Score Comparison", &pass.gcs) else {
        return;
    };
    println!("  {} scored stage rows", gcs.long.height());
}

/// Unwrap a section, printing the skip notice the page would show.
fn available<'a, T>(title: &str, section: &'a Section<T>) -> Option<&'a T> {
    match section {
        Section::Ready(value) => Some(value),
        Section::Unavailable { missing } => {
            println!("  [skipped] missing columns: {}", missing.join(", "));
            tracing::warn!(section = title, ?missing, "section unavailable");
            None
        }
    }
}
