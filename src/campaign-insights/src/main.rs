//! Campaign Insights: computes demographic, device, and regional breakdowns
//! plus chart geometry for a marketing dataset and prints them as JSON.

use anyhow::Context;
use campaign_charts::CoordinateTable;
use campaign_core::config::{AppConfig, ColorScheme};
use campaign_core::types::Dataset;
use campaign_dashboard::{CampaignDashboard, DashboardSnapshot};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum View {
    All,
    Demographic,
    Device,
    Region,
}

#[derive(Parser, Debug)]
#[command(name = "campaign-insights")]
#[command(about = "Marketing breakdowns and chart geometry from a campaign dataset")]
#[command(version)]
struct Cli {
    /// Dataset JSON file with a top-level `campaigns` array
    dataset: PathBuf,

    /// Optional TOML config file
    #[arg(long, env = "CAMPAIGN_INSIGHTS_CONFIG")]
    config: Option<String>,

    /// Which view to print
    #[arg(long, value_enum, default_value_t = View::All)]
    view: View,

    /// Number of recent weeks in the trend (overrides config)
    #[arg(long, env = "CAMPAIGN_INSIGHTS__WEEKLY__WINDOW")]
    weeks: Option<usize>,

    /// Bubble map colour scheme (overrides config)
    #[arg(long)]
    color_scheme: Option<ColorScheme>,

    /// Pretty-print the JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campaign_insights=info,campaign_dashboard=info".into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(weeks) = cli.weeks {
        config.weekly.window = weeks;
    }
    if let Some(scheme) = cli.color_scheme {
        config.bubble.color_scheme = scheme;
    }
    config.validate()?;

    info!(
        dataset = %cli.dataset.display(),
        weekly_window = config.weekly.window,
        color_scheme = ?config.bubble.color_scheme,
        "Configuration loaded"
    );

    let dataset = Arc::new(load_dataset(&cli.dataset)?);
    let mut dashboard = CampaignDashboard::new(config, CoordinateTable::world());
    let snapshot = dashboard.snapshot(&dataset);

    if snapshot.bubble_map.unplaced_count() > 0 {
        warn!(
            unplaced = snapshot.bubble_map.unplaced_count(),
            "some regions could not be placed on the map"
        );
    }

    let output = render(&snapshot, cli.view)?;
    let text = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{text}");
    Ok(())
}

fn load_dataset(path: &Path) -> anyhow::Result<Dataset> {
    let dataset = Dataset::load(path).with_context(|| format!("loading dataset {}", path.display()))?;
    info!(campaigns = dataset.campaigns.len(), "Dataset loaded");
    Ok(dataset)
}

fn render(snapshot: &DashboardSnapshot, view: View) -> serde_json::Result<serde_json::Value> {
    match view {
        View::All => serde_json::to_value(snapshot),
        View::Demographic => serde_json::to_value(&snapshot.demographic),
        View::Device => serde_json::to_value(&snapshot.device),
        View::Region => Ok(serde_json::json!({
            "regional": serde_json::to_value(&snapshot.regional)?,
            "bubble_map": serde_json::to_value(&snapshot.bubble_map)?,
            "weekly_spend_chart": serde_json::to_value(&snapshot.weekly_spend_chart)?,
            "weekly_revenue_chart": serde_json::to_value(&snapshot.weekly_revenue_chart)?,
        })),
    }
}
