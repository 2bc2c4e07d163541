//! Regional breakdown: per-region performance and weekly trend.
//!
//! Regions are merged by name alone. Regional rows carry their own absolute
//! spend and revenue, so no allocation step applies here.

use campaign_core::types::{Campaign, LabeledValue, MapPoint, RegionKey, RegionalSegment};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::aggregator::{aggregate, AggregateBucket, AggregateSet};
use crate::weekly::{reduce_weekly, revenue_series, spend_series, WeeklyTotal};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalSummary {
    pub total_regions: usize,
    pub total_spend: f64,
    pub total_revenue: f64,
    pub total_impressions: u64,
    pub total_clicks: u64,
    /// Unweighted mean of the per-region ROAS.
    pub average_roas: f64,
    pub top_region: Option<RegionKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalView {
    /// Highest revenue first.
    pub regions: AggregateSet<RegionKey>,
    /// Country first reported for each region.
    pub countries: BTreeMap<RegionKey, String>,
    pub summary: RegionalSummary,
    /// Regions with revenue, valued by revenue.
    pub map_points: Vec<MapPoint>,
    pub weeks: Vec<WeeklyTotal>,
    pub weekly_spend: Vec<LabeledValue>,
    pub weekly_revenue: Vec<LabeledValue>,
}

#[derive(Debug, Clone, Copy)]
struct Location {
    latitude: f64,
    longitude: f64,
}

impl RegionalView {
    pub fn build(campaigns: &[Campaign], weekly_window: usize) -> Self {
        let regions = aggregate(campaigns, |r: &RegionalSegment| r.region.clone(), None)
            .sorted_by_revenue_desc();

        let mut countries: BTreeMap<RegionKey, String> = BTreeMap::new();
        let mut locations: HashMap<RegionKey, Location> = HashMap::new();
        for segment in campaigns.iter().flat_map(|c| c.regions.iter()) {
            countries
                .entry(segment.region.clone())
                .or_insert_with(|| segment.country.clone());
            if let (Some(latitude), Some(longitude)) = (segment.latitude, segment.longitude) {
                locations
                    .entry(segment.region.clone())
                    .or_insert(Location { latitude, longitude });
            }
        }

        let summary = summarize(&regions);
        let map_points = regions
            .iter()
            .filter(|b| b.totals.revenue > 0.0)
            .map(|b| map_point(b, &countries, &locations))
            .collect();

        let weeks = reduce_weekly(campaigns, weekly_window);
        let weekly_spend = spend_series(&weeks);
        let weekly_revenue = revenue_series(&weeks);

        debug!(
            regions = summary.total_regions,
            weeks = weeks.len(),
            "regional view built"
        );

        Self {
            regions,
            countries,
            summary,
            map_points,
            weeks,
            weekly_spend,
            weekly_revenue,
        }
    }

    pub fn country_of(&self, region: &RegionKey) -> Option<&str> {
        self.countries.get(region).map(String::as_str)
    }

    pub fn top_region(&self) -> Option<&AggregateBucket<RegionKey>> {
        self.regions.first()
    }
}

fn summarize(regions: &AggregateSet<RegionKey>) -> RegionalSummary {
    let total_regions = regions.len();
    let average_roas = if total_regions > 0 {
        regions.iter().map(|b| b.rates.roas).sum::<f64>() / total_regions as f64
    } else {
        0.0
    };
    RegionalSummary {
        total_regions,
        total_spend: regions.iter().map(|b| b.totals.spend).sum(),
        total_revenue: regions.iter().map(|b| b.totals.revenue).sum(),
        total_impressions: regions.iter().map(|b| b.totals.impressions).sum(),
        total_clicks: regions.iter().map(|b| b.totals.clicks).sum(),
        average_roas,
        top_region: regions.first().map(|b| b.key.clone()),
    }
}

fn map_point(
    bucket: &AggregateBucket<RegionKey>,
    countries: &BTreeMap<RegionKey, String>,
    locations: &HashMap<RegionKey, Location>,
) -> MapPoint {
    let location = locations.get(&bucket.key);
    MapPoint {
        region: bucket.key.clone(),
        country: countries.get(&bucket.key).cloned().unwrap_or_default(),
        value: bucket.totals.revenue,
        spend: bucket.totals.spend,
        revenue: bucket.totals.revenue,
        latitude: location.map(|l| l.latitude),
        longitude: location.map(|l| l.longitude),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::types::{SegmentPerformance, WeeklySegment};

    fn region(name: &str, country: &str, spend: f64, revenue: f64, imp: u64, clicks: u64) -> RegionalSegment {
        RegionalSegment {
            region: RegionKey::new(name),
            country: country.into(),
            spend,
            revenue,
            performance: SegmentPerformance {
                impressions: imp,
                clicks,
                conversions: clicks / 10,
            },
            latitude: None,
            longitude: None,
        }
    }

    fn campaigns() -> Vec<Campaign> {
        vec![
            Campaign {
                id: "a".into(),
                spend: 99_999.0,
                revenue: 99_999.0,
                regions: vec![
                    region("Dubai", "UAE", 100.0, 400.0, 1000, 50),
                    region("Cairo", "Egypt", 50.0, 0.0, 500, 10),
                ],
                weeks: vec![WeeklySegment {
                    week_start: "2024-01-01".into(),
                    spend: 10.0,
                    revenue: 20.0,
                }],
                ..Default::default()
            },
            Campaign {
                id: "b".into(),
                regions: vec![region("Dubai", "United Arab Emirates", 100.0, 200.0, 1000, 30)],
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_regions_merge_without_allocation() {
        let view = RegionalView::build(&campaigns(), 12);
        let dubai = view.regions.get(&RegionKey::new("Dubai")).unwrap();
        assert_eq!(dubai.totals.spend, 200.0);
        assert_eq!(dubai.totals.revenue, 600.0);
        assert_eq!(dubai.totals.impressions, 2000);
        assert_eq!(dubai.rates.roas, 3.0);
        assert_eq!(view.country_of(&RegionKey::new("Dubai")), Some("UAE"));
    }

    #[test]
    fn test_summary() {
        let view = RegionalView::build(&campaigns(), 12);
        let summary = &view.summary;
        assert_eq!(summary.total_regions, 2);
        assert_eq!(summary.total_spend, 250.0);
        assert_eq!(summary.total_revenue, 600.0);
        assert_eq!(summary.total_clicks, 90);
        // mean of 3.0 (Dubai) and 0.0 (Cairo)
        assert_eq!(summary.average_roas, 1.5);
        assert_eq!(summary.top_region, Some(RegionKey::new("Dubai")));
        assert_eq!(view.top_region().unwrap().key.as_str(), "Dubai");
    }

    #[test]
    fn test_map_points_skip_zero_revenue() {
        let view = RegionalView::build(&campaigns(), 12);
        assert_eq!(view.map_points.len(), 1);
        assert_eq!(view.map_points[0].value, 600.0);
        assert_eq!(view.map_points[0].country, "UAE");
    }

    #[test]
    fn test_weekly_series_attached() {
        let view = RegionalView::build(&campaigns(), 12);
        assert_eq!(view.weekly_spend, vec![LabeledValue::new("2024-01-01", 10.0)]);
        assert_eq!(view.weekly_revenue[0].value, 20.0);
    }

    #[test]
    fn test_empty_summary() {
        let view = RegionalView::build(&[], 12);
        assert_eq!(view.summary.average_roas, 0.0);
        assert!(view.summary.top_region.is_none());
        assert!(view.map_points.is_empty());
    }

    #[test]
    fn test_location_carried_to_map_point() {
        let mut data = campaigns();
        data[0].regions[0].latitude = Some(25.2);
        data[0].regions[0].longitude = Some(55.3);
        let view = RegionalView::build(&data, 12);
        assert_eq!(view.map_points[0].latitude, Some(25.2));
        assert_eq!(view.map_points[0].longitude, Some(55.3));
    }
}
