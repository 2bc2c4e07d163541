//! Demographic breakdown: gender summaries and per-gender age groups.

use campaign_core::types::{Campaign, DemographicSegment, Gender, LabeledValue};
use serde::Serialize;
use tracing::debug;

use crate::aggregator::{aggregate, AggregateBucket, AggregateSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderBreakdown {
    pub summary: AggregateBucket<Gender>,
    /// Age groups of this gender only, highest revenue first.
    pub age_groups: AggregateSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicView {
    /// One entry per gender, in first-seen order.
    pub genders: Vec<GenderBreakdown>,
    /// Allocated spend per age group over every gender, in first-seen order.
    pub age_group_spend: Vec<LabeledValue>,
    pub age_group_revenue: Vec<LabeledValue>,
}

impl DemographicView {
    pub fn build(campaigns: &[Campaign]) -> Self {
        let by_gender = aggregate(campaigns, |d: &DemographicSegment| d.gender.clone(), None);

        let genders: Vec<_> = by_gender
            .into_vec()
            .into_iter()
            .map(|summary| {
                let gender = summary.key.clone();
                let same_gender = move |d: &DemographicSegment| d.gender == gender;
                let age_groups = aggregate(
                    campaigns,
                    |d: &DemographicSegment| d.age_group.clone(),
                    Some(&same_gender),
                )
                .sorted_by_revenue_desc();
                GenderBreakdown {
                    summary,
                    age_groups,
                }
            })
            .collect();

        let all_ages = aggregate(campaigns, |d: &DemographicSegment| d.age_group.clone(), None);
        let age_group_spend = all_ages
            .iter()
            .map(|b| LabeledValue::new(b.key.clone(), b.totals.spend))
            .collect();
        let age_group_revenue = all_ages
            .iter()
            .map(|b| LabeledValue::new(b.key.clone(), b.totals.revenue))
            .collect();

        debug!(
            genders = genders.len(),
            age_groups = all_ages.len(),
            "demographic view built"
        );

        Self {
            genders,
            age_group_spend,
            age_group_revenue,
        }
    }

    pub fn gender(&self, gender: &Gender) -> Option<&GenderBreakdown> {
        self.genders.iter().find(|g| &g.summary.key == gender)
    }

    pub fn male(&self) -> Option<&GenderBreakdown> {
        self.gender(&Gender::Male)
    }

    pub fn female(&self) -> Option<&GenderBreakdown> {
        self.gender(&Gender::Female)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::types::SegmentPerformance;

    fn demo(gender: &str, age: &str, pct: f64, imp: u64, clicks: u64, conv: u64) -> DemographicSegment {
        DemographicSegment {
            gender: gender.into(),
            age_group: age.into(),
            percentage_of_audience: pct,
            performance: SegmentPerformance {
                impressions: imp,
                clicks,
                conversions: conv,
            },
        }
    }

    fn campaigns() -> Vec<Campaign> {
        vec![
            Campaign {
                id: "a".into(),
                spend: 100.0,
                revenue: 200.0,
                demographics: vec![
                    demo("Male", "25-34", 50.0, 1000, 50, 5),
                    demo("Female", "25-34", 30.0, 600, 30, 3),
                    demo("Female", "35-44", 20.0, 400, 8, 0),
                ],
                ..Default::default()
            },
            Campaign {
                id: "b".into(),
                spend: 50.0,
                revenue: 50.0,
                demographics: vec![demo("male", "25-34", 100.0, 500, 25, 1)],
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_male_age_group_merge() {
        let view = DemographicView::build(&campaigns());
        let male = view.male().unwrap();
        let group = male.age_groups.get(&"25-34".to_string()).unwrap();
        assert_eq!(group.totals.impressions, 1500);
        assert_eq!(group.totals.clicks, 75);
        assert_eq!(group.totals.conversions, 6);
        assert_eq!(group.totals.spend, 100.0);
        assert_eq!(group.totals.revenue, 150.0);
        assert_eq!(group.rates.ctr, 5.0);
        assert_eq!(group.rates.conversion_rate, 8.0);
        assert_eq!(male.age_groups.len(), 1);
    }

    #[test]
    fn test_genders_addressed_independently() {
        let view = DemographicView::build(&campaigns());
        let female = view.female().unwrap();
        assert_eq!(female.summary.totals.impressions, 1000);
        assert_eq!(female.age_groups.len(), 2);
        // 30% of 200 beats 20% of 200
        assert_eq!(female.age_groups.first().unwrap().key, "25-34");
        assert_eq!(female.age_groups.get(&"35-44".to_string()).unwrap().rates.conversion_rate, 0.0);
        assert!(view.gender(&Gender::Other("unknown".into())).is_none());
    }

    #[test]
    fn test_age_group_series_span_genders() {
        let view = DemographicView::build(&campaigns());
        assert_eq!(view.age_group_spend[0], LabeledValue::new("25-34", 50.0 + 30.0 + 50.0));
        assert_eq!(view.age_group_revenue[1], LabeledValue::new("35-44", 40.0));
    }

    #[test]
    fn test_empty_dataset() {
        let view = DemographicView::build(&[]);
        assert!(view.genders.is_empty());
        assert!(view.male().is_none());
        assert!(view.age_group_spend.is_empty());
    }
}
