//! Device breakdown: per-device performance with allocated spend and revenue.

use campaign_core::types::{Campaign, DeviceClass, DeviceLabel, DeviceSegment, LabeledValue};
use serde::Serialize;
use tracing::debug;

use crate::aggregator::{aggregate, AggregateSet};
use crate::filter::Selection;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSummary {
    pub total_devices: usize,
    pub total_spend: f64,
    pub total_revenue: f64,
    pub total_clicks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceView {
    /// Highest revenue first. `share_sum` holds the summed traffic percentage.
    pub devices: AggregateSet<DeviceLabel>,
    /// Chart series in first-seen device order.
    pub clicks: Vec<LabeledValue>,
    pub revenue: Vec<LabeledValue>,
    pub summary: DeviceSummary,
}

impl DeviceView {
    pub fn build(campaigns: &[Campaign]) -> Self {
        Self::build_filtered(campaigns, &Selection::new())
    }

    /// Builds the view over the devices picked in `selection` only.
    pub fn build_filtered(campaigns: &[Campaign], selection: &Selection) -> Self {
        let selected = |d: &DeviceSegment| selection.matches(d.device.as_str());
        let devices = aggregate(campaigns, |d: &DeviceSegment| d.device.clone(), Some(&selected));

        let clicks = devices
            .iter()
            .map(|b| LabeledValue::new(b.key.as_str(), b.totals.clicks as f64))
            .collect();
        let revenue = devices
            .iter()
            .map(|b| LabeledValue::new(b.key.as_str(), b.totals.revenue))
            .collect();

        let summary = DeviceSummary {
            total_devices: devices.len(),
            total_spend: devices.iter().map(|b| b.totals.spend).sum(),
            total_revenue: devices.iter().map(|b| b.totals.revenue).sum(),
            total_clicks: devices.iter().map(|b| b.totals.clicks).sum(),
        };
        debug!(devices = summary.total_devices, "device view built");

        Self {
            devices: devices.sorted_by_revenue_desc(),
            clicks,
            revenue,
            summary,
        }
    }

    pub fn class_of(label: &DeviceLabel) -> DeviceClass {
        label.class()
    }
}
