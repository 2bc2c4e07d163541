//! Weekly time-series reduction across campaigns.

use campaign_core::types::{Campaign, LabeledValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTotal {
    /// The source key, unchanged.
    pub week_start: String,
    pub date: NaiveDate,
    pub spend: f64,
    pub revenue: f64,
}

/// Parses a week key as a plain date, an RFC 3339 timestamp, or an ISO
/// datetime without an offset.
pub fn parse_week_start(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Sums spend and revenue per `week_start` across all campaigns, sorts the
/// weeks chronologically and keeps the most recent `last_n`.
///
/// Weeks are grouped by exact key. Keys that are not dates are skipped.
/// Distinct keys on the same date stay separate and are ordered by key.
pub fn reduce_weekly(campaigns: &[Campaign], last_n: usize) -> Vec<WeeklyTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut weeks: Vec<WeeklyTotal> = Vec::new();

    for campaign in campaigns {
        for week in &campaign.weeks {
            let slot = match index.get(week.week_start.as_str()) {
                Some(&slot) => slot,
                None => {
                    let Some(date) = parse_week_start(&week.week_start) else {
                        warn!(
                            campaign_id = %campaign.id,
                            week_start = %week.week_start,
                            "skipping week with unparseable start date"
                        );
                        continue;
                    };
                    index.insert(week.week_start.as_str(), weeks.len());
                    weeks.push(WeeklyTotal {
                        week_start: week.week_start.clone(),
                        date,
                        spend: 0.0,
                        revenue: 0.0,
                    });
                    weeks.len() - 1
                }
            };
            weeks[slot].spend += week.spend;
            weeks[slot].revenue += week.revenue;
        }
    }

    weeks.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.week_start.cmp(&b.week_start)));
    let skip = weeks.len().saturating_sub(last_n);
    weeks.split_off(skip)
}

pub fn spend_series(weeks: &[WeeklyTotal]) -> Vec<LabeledValue> {
    weeks
        .iter()
        .map(|w| LabeledValue::new(w.week_start.clone(), w.spend))
        .collect()
}

pub fn revenue_series(weeks: &[WeeklyTotal]) -> Vec<LabeledValue> {
    weeks
        .iter()
        .map(|w| LabeledValue::new(w.week_start.clone(), w.revenue))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::types::WeeklySegment;

    fn week(start: &str, spend: f64, revenue: f64) -> WeeklySegment {
        WeeklySegment {
            week_start: start.into(),
            spend,
            revenue,
        }
    }

    fn campaign(weeks: Vec<WeeklySegment>) -> Campaign {
        Campaign {
            id: "c".into(),
            weeks,
            ..Default::default()
        }
    }

    #[test]
    fn test_keeps_last_n_in_order() {
        let campaigns = vec![campaign(vec![
            week("2024-01-15", 5.0, 0.0),
            week("2024-01-01", 10.0, 0.0),
            week("2024-01-22", 40.0, 0.0),
            week("2024-01-08", 20.0, 0.0),
        ])];
        let weeks = reduce_weekly(&campaigns, 2);
        let spend: Vec<f64> = weeks.iter().map(|w| w.spend).collect();
        assert_eq!(spend, vec![5.0, 40.0]);
        assert_eq!(weeks[0].week_start, "2024-01-15");
    }

    #[test]
    fn test_sums_across_campaigns() {
        let campaigns = vec![
            campaign(vec![week("2024-02-05", 100.0, 300.0)]),
            campaign(vec![week("2024-02-05", 50.0, 25.0), week("2024-02-12", 1.0, 2.0)]),
        ];
        let weeks = reduce_weekly(&campaigns, 12);
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].spend, 150.0);
        assert_eq!(weeks[0].revenue, 325.0);
    }

    #[test]
    fn test_fewer_weeks_than_window() {
        let campaigns = vec![campaign(vec![week("2024-03-04", 1.0, 1.0)])];
        assert_eq!(reduce_weekly(&campaigns, 12).len(), 1);
        assert!(reduce_weekly(&[], 12).is_empty());
    }

    #[test]
    fn test_strictly_ascending_and_bounded() {
        let weeks: Vec<_> = (1..=20)
            .rev()
            .map(|d| week(&format!("2024-05-{d:02}"), d as f64, 0.0))
            .collect();
        let reduced = reduce_weekly(&[campaign(weeks)], 12);
        assert_eq!(reduced.len(), 12);
        assert!(reduced.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(reduced.last().unwrap().week_start, "2024-05-20");
    }

    #[test]
    fn test_skips_unparseable_and_accepts_timestamps() {
        let campaigns = vec![campaign(vec![
            week("not-a-date", 9.0, 9.0),
            week("2024-06-03T00:00:00Z", 3.0, 4.0),
        ])];
        let weeks = reduce_weekly(&campaigns, 12);
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(revenue_series(&weeks)[0].value, 4.0);
        assert_eq!(spend_series(&weeks)[0].label, "2024-06-03T00:00:00Z");
    }

    #[test]
    fn test_accepts_datetimes_without_offset() {
        let campaigns = vec![campaign(vec![
            week("2024-01-08T00:00:00.000", 2.0, 0.0),
            week("2024-01-01T00:00:00", 1.0, 0.0),
        ])];
        let weeks = reduce_weekly(&campaigns, 12);
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(weeks[1].week_start, "2024-01-08T00:00:00.000");
    }

    #[test]
    fn test_same_date_keys_stay_separate_ordered_by_key() {
        let campaigns = vec![campaign(vec![
            week("2024-01-01T00:00:00Z", 5.0, 0.0),
            week("2024-01-01", 3.0, 0.0),
            week("2023-12-25", 1.0, 0.0),
        ])];
        let weeks = reduce_weekly(&campaigns, 12);
        let keys: Vec<&str> = weeks.iter().map(|w| w.week_start.as_str()).collect();
        assert_eq!(keys, vec!["2023-12-25", "2024-01-01", "2024-01-01T00:00:00Z"]);
        assert_eq!(weeks[1].date, weeks[2].date);
        assert_eq!(weeks[2].spend, 5.0);

        let last_two = reduce_weekly(&campaigns, 2);
        assert_eq!(last_two[0].week_start, "2024-01-01");
    }
}
