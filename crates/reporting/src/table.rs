//! Column sorting for breakdown tables.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::aggregator::{AggregateBucket, AggregateSet, BucketKey};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// A sortable column of a breakdown table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketMetric {
    Label,
    Impressions,
    Clicks,
    Conversions,
    Spend,
    Revenue,
    Ctr,
    ConversionRate,
    Roas,
    Share,
}

impl BucketMetric {
    fn value<K>(self, bucket: &AggregateBucket<K>) -> f64 {
        match self {
            Self::Label => 0.0,
            Self::Impressions => bucket.totals.impressions as f64,
            Self::Clicks => bucket.totals.clicks as f64,
            Self::Conversions => bucket.totals.conversions as f64,
            Self::Spend => bucket.totals.spend,
            Self::Revenue => bucket.totals.revenue,
            Self::Ctr => bucket.rates.ctr,
            Self::ConversionRate => bucket.rates.conversion_rate,
            Self::Roas => bucket.rates.roas,
            Self::Share => bucket.totals.share_sum,
        }
    }

    fn compare<K: BucketKey>(self, a: &AggregateBucket<K>, b: &AggregateBucket<K>) -> Ordering {
        match self {
            Self::Label => a.key.label().cmp(b.key.label()),
            numeric => numeric.value(a).total_cmp(&numeric.value(b)),
        }
    }
}

impl<K: BucketKey> AggregateSet<K> {
    /// Re-sorts the set by one column. Ties keep their current order.
    pub fn sorted_by(mut self, metric: BucketMetric, order: SortOrder) -> Self {
        self.reorder_by(|a, b| {
            let ordering = metric.compare(a, b);
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
        self
    }
}
