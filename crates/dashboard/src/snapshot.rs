//! Dashboard snapshot: every breakdown view plus its chart geometry,
//! memoized against the identity of the dataset it was built from.

use campaign_charts::{layout_bubbles, layout_line, BubbleMap, CoordinateTable, LineChart};
use campaign_core::config::AppConfig;
use campaign_core::types::Dataset;
use campaign_reporting::{DemographicView, DeviceView, RegionalView};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub demographic: DemographicView,
    pub device: DeviceView,
    pub regional: RegionalView,
    pub bubble_map: BubbleMap,
    pub weekly_spend_chart: LineChart,
    pub weekly_revenue_chart: LineChart,
}

impl DashboardSnapshot {
    pub fn build(dataset: &Dataset, config: &AppConfig, coordinates: &CoordinateTable) -> Self {
        let campaigns = &dataset.campaigns;
        let regional = RegionalView::build(campaigns, config.weekly.window);
        let bubble_map = layout_bubbles(&regional.map_points, coordinates, &config.bubble);
        let weekly_spend_chart = layout_line(&regional.weekly_spend, &config.line);
        let weekly_revenue_chart = layout_line(&regional.weekly_revenue, &config.line);

        Self {
            demographic: DemographicView::build(campaigns),
            device: DeviceView::build(campaigns),
            regional,
            bubble_map,
            weekly_spend_chart,
            weekly_revenue_chart,
        }
    }
}

/// Holds the last snapshot and rebuilds only when handed a different dataset.
pub struct CampaignDashboard {
    config: AppConfig,
    coordinates: CoordinateTable,
    cached: Option<(Arc<Dataset>, Arc<DashboardSnapshot>)>,
}

impl CampaignDashboard {
    pub fn new(config: AppConfig, coordinates: CoordinateTable) -> Self {
        Self {
            config,
            coordinates,
            cached: None,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn coordinates(&self) -> &CoordinateTable {
        &self.coordinates
    }

    /// Returns the snapshot for `dataset`, reusing the cached one when the
    /// same `Arc` was seen last.
    pub fn snapshot(&mut self, dataset: &Arc<Dataset>) -> Arc<DashboardSnapshot> {
        if let Some((source, snapshot)) = &self.cached {
            if Arc::ptr_eq(source, dataset) {
                return Arc::clone(snapshot);
            }
        }

        let snapshot = Arc::new(DashboardSnapshot::build(dataset, &self.config, &self.coordinates));
        metrics::counter!("dashboard.snapshot.rebuilt").increment(1);
        info!(
            campaigns = dataset.campaigns.len(),
            regions = snapshot.regional.summary.total_regions,
            devices = snapshot.device.summary.total_devices,
            unplaced_regions = snapshot.bubble_map.unplaced_count(),
            "dashboard snapshot rebuilt"
        );
        self.cached = Some((Arc::clone(dataset), Arc::clone(&snapshot)));
        snapshot
    }

    /// Drops the cached snapshot so the next call rebuilds.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

impl Default for CampaignDashboard {
    fn default() -> Self {
        Self::new(AppConfig::default(), CoordinateTable::world())
    }
}
