//! Bubble map layout: places valued regions on the plane and sizes and
//! colours them by min–max normalized value.
//!
//! Placement is table driven and lossy: regions missing from the coordinate
//! table (and without a usable lat/lon) are left off the map and reported in
//! [`BubbleMap::unplaced`]. They still count toward totals computed elsewhere.

use campaign_core::config::BubbleConfig;
use campaign_core::types::{MapPoint, RegionKey};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::coordinates::{project, CoordinateTable};
use crate::palette::{ramp, ramp_index};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Found in the coordinate table.
    Table,
    /// Projected from the aggregate's own latitude/longitude.
    Projected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub region: RegionKey,
    pub country: String,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Normalized value, 0..=1.
    pub intensity: f64,
    pub color_index: usize,
    pub color: String,
    pub placement: Placement,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BubbleMap {
    pub bubbles: Vec<Bubble>,
    /// Regions that could not be placed, in input order.
    pub unplaced: Vec<RegionKey>,
    /// Highest value over the whole input, placed or not.
    pub highest_value: f64,
    /// Sum of the placed bubbles' values.
    pub total_value: f64,
}

impl BubbleMap {
    pub fn mapped_regions(&self) -> usize {
        self.bubbles.len()
    }

    pub fn unplaced_count(&self) -> usize {
        self.unplaced.len()
    }
}

/// Min–max scale of the values being laid out.
#[derive(Debug, Clone, Copy)]
struct ValueRange {
    min: f64,
    max: f64,
}

impl ValueRange {
    fn of(points: &[&MapPoint]) -> Option<Self> {
        let mut values = points.iter().map(|p| p.value);
        let first = values.next()?;
        Some(values.fold(Self { min: first, max: first }, |range, v| Self {
            min: range.min.min(v),
            max: range.max.max(v),
        }))
    }

    fn span(&self) -> f64 {
        self.max - self.min
    }
}

pub fn layout_bubbles(points: &[MapPoint], table: &CoordinateTable, config: &BubbleConfig) -> BubbleMap {
    let valued: Vec<&MapPoint> = points.iter().filter(|p| p.value != 0.0).collect();
    let Some(range) = ValueRange::of(&valued) else {
        return BubbleMap::default();
    };
    let colors = ramp(config.color_scheme);
    let span = range.span();

    let mut map = BubbleMap {
        highest_value: range.max,
        ..Default::default()
    };

    for point in valued {
        let Some((x, y, placement)) = place(point, table, config) else {
            warn!(region = %point.region, "no coordinates found for region");
            map.unplaced.push(point.region.clone());
            continue;
        };

        let (radius, intensity) = if span > 0.0 {
            let fraction = ((point.value - range.min) / span).clamp(0.0, 1.0);
            let radius = config.min_radius + (config.max_radius - config.min_radius) * fraction;
            (radius.clamp(config.min_radius, config.max_radius), fraction)
        } else {
            (config.flat_radius, config.flat_intensity)
        };
        let color_index = ramp_index(intensity, colors.len());

        map.total_value += point.value;
        map.bubbles.push(Bubble {
            region: point.region.clone(),
            country: point.country.clone(),
            value: point.value,
            x,
            y,
            radius,
            intensity,
            color_index,
            color: colors.get(color_index).copied().unwrap_or_default().to_string(),
            placement,
        });
    }

    if !map.unplaced.is_empty() {
        metrics::counter!("charts.bubble.unplaced").increment(map.unplaced.len() as u64);
    }
    debug!(
        placed = map.bubbles.len(),
        unplaced = map.unplaced.len(),
        "bubble layout computed"
    );
    map
}

fn place(point: &MapPoint, table: &CoordinateTable, config: &BubbleConfig) -> Option<(f64, f64, Placement)> {
    if let Some(coordinate) = table.lookup(point.region.as_str()) {
        return Some((coordinate.x, coordinate.y, Placement::Table));
    }
    if !config.project_lat_lon {
        return None;
    }
    let (latitude, longitude) = (point.latitude?, point.longitude?);
    let (x, y) = project(latitude, longitude, config.plane_width, config.plane_height);
    Some((x, y, Placement::Projected))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(region: &str, value: f64) -> MapPoint {
        MapPoint {
            region: RegionKey::new(region),
            country: String::new(),
            value,
            spend: 0.0,
            revenue: value,
            latitude: None,
            longitude: None,
        }
    }

    fn layout(points: &[MapPoint]) -> BubbleMap {
        layout_bubbles(points, &CoordinateTable::world(), &BubbleConfig::default())
    }

    #[test]
    fn test_min_max_scaling() {
        let map = layout(&[point("Dubai", 100.0), point("London", 400.0), point("Tokyo", 250.0)]);
        assert_eq!(map.mapped_regions(), 3);

        let dubai = &map.bubbles[0];
        assert_eq!((dubai.x, dubai.y), (72.0, 28.0));
        assert_eq!(dubai.radius, 2.0);
        assert_eq!(dubai.color_index, 0);

        let london = &map.bubbles[1];
        assert_eq!(london.radius, 8.0);
        assert_eq!(london.intensity, 1.0);
        assert_eq!(london.color_index, 5);
        assert_eq!(london.color, "#16A34A");

        let tokyo = &map.bubbles[2];
        assert_eq!(tokyo.radius, 5.0);
        assert_eq!(tokyo.color_index, 2);
        assert_eq!(map.total_value, 750.0);
        assert_eq!(map.highest_value, 400.0);
    }

    #[test]
    fn test_zero_range_gets_flat_size() {
        let map = layout(&[point("Dubai", 10.0), point("Cairo", 10.0), point("Lima", 10.0)]);
        assert_eq!(map.bubbles.len(), 3);
        assert!(map.bubbles.iter().all(|b| b.radius == 4.0));
        assert!(map.bubbles.iter().all(|b| b.color_index == 2));
    }

    #[test]
    fn test_unmapped_regions_reported() {
        let map = layout(&[point("Dubai", 10.0), point("Atlantis", 50.0)]);
        assert_eq!(map.mapped_regions(), 1);
        assert_eq!(map.unplaced, vec![RegionKey::new("Atlantis")]);
        assert_eq!(map.unplaced_count(), 1);
        // the unplaced maximum still anchors the scale
        assert_eq!(map.highest_value, 50.0);
        assert_eq!(map.bubbles[0].radius, 2.0);
        assert_eq!(map.total_value, 10.0);
    }

    #[test]
    fn test_zero_values_skipped() {
        let map = layout(&[point("Dubai", 0.0), point("Cairo", 5.0)]);
        assert_eq!(map.bubbles.len(), 1);
        assert!(map.unplaced.is_empty());
        assert!(layout(&[point("Dubai", 0.0)]).bubbles.is_empty());
        assert!(layout(&[]).bubbles.is_empty());
    }

    #[test]
    fn test_projected_fallback() {
        let mut atlantis = point("Atlantis", 20.0);
        atlantis.latitude = Some(0.0);
        atlantis.longitude = Some(0.0);
        let map = layout(&[point("Dubai", 10.0), atlantis.clone()]);
        let projected = &map.bubbles[1];
        assert_eq!(projected.placement, Placement::Projected);
        assert_eq!((projected.x, projected.y), (50.0, 30.0));

        let config = BubbleConfig {
            project_lat_lon: false,
            ..Default::default()
        };
        let map = layout_bubbles(&[atlantis], &CoordinateTable::world(), &config);
        assert_eq!(map.unplaced_count(), 1);
    }

    #[test]
    fn test_radius_and_color_bounds() {
        let points: Vec<_> = ["Dubai", "Cairo", "Lima", "Tokyo", "Paris", "Seoul", "Doha"]
            .iter()
            .enumerate()
            .map(|(i, name)| point(name, (i as f64 * 37.3).powi(2) + 1.0))
            .collect();
        let map = layout(&points);
        assert_eq!(map.bubbles.len(), points.len());
        for bubble in &map.bubbles {
            assert!((2.0..=8.0).contains(&bubble.radius));
            assert!(bubble.color_index <= 5);
        }
    }
}
