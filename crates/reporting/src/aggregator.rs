//! Grouping aggregator: folds per-campaign segment records into buckets
//! keyed by a categorical dimension.
//!
//! A pass has two stages. [`BucketAccumulator`] is the mutable stage: buckets
//! are created on first sight of their key and summed into afterwards.
//! [`BucketAccumulator::finalize`] consumes it and yields a read-only
//! [`AggregateSet`] whose rates were computed exactly once.

use campaign_core::types::{
    Campaign, DemographicSegment, DeviceLabel, DeviceSegment, Gender, RegionKey, RegionalSegment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;

use crate::allocation::AllocatedShare;
use crate::rates::RateMetrics;

// ─── Keys and records ───────────────────────────────────────────────────────

/// A categorical grouping key with a display label.
pub trait BucketKey: Eq + Hash + Clone {
    fn label(&self) -> &str;
}

impl BucketKey for String {
    fn label(&self) -> &str {
        self
    }
}

impl BucketKey for Gender {
    fn label(&self) -> &str {
        self.as_str()
    }
}

impl BucketKey for DeviceLabel {
    fn label(&self) -> &str {
        self.as_str()
    }
}

impl BucketKey for RegionKey {
    fn label(&self) -> &str {
        self.as_str()
    }
}

/// A breakdown row that can be folded into a bucket.
pub trait SegmentRecord: Sized {
    /// The breakdown collection of this kind on a campaign.
    fn segments(campaign: &Campaign) -> &[Self];

    /// Totals this row adds to its bucket.
    fn contribution(&self, campaign: &Campaign) -> BucketTotals;
}

impl SegmentRecord for DemographicSegment {
    fn segments(campaign: &Campaign) -> &[Self] {
        &campaign.demographics
    }

    fn contribution(&self, campaign: &Campaign) -> BucketTotals {
        let share = AllocatedShare::for_campaign(campaign, self.percentage_of_audience);
        BucketTotals {
            impressions: self.performance.impressions,
            clicks: self.performance.clicks,
            conversions: self.performance.conversions,
            spend: share.spend,
            revenue: share.revenue,
            share_sum: self.percentage_of_audience,
        }
    }
}

impl SegmentRecord for DeviceSegment {
    fn segments(campaign: &Campaign) -> &[Self] {
        &campaign.devices
    }

    fn contribution(&self, campaign: &Campaign) -> BucketTotals {
        let share = AllocatedShare::for_campaign(campaign, self.percentage_of_traffic);
        BucketTotals {
            impressions: self.performance.impressions,
            clicks: self.performance.clicks,
            conversions: self.performance.conversions,
            spend: share.spend,
            revenue: share.revenue,
            share_sum: self.percentage_of_traffic,
        }
    }
}

impl SegmentRecord for RegionalSegment {
    fn segments(campaign: &Campaign) -> &[Self] {
        &campaign.regions
    }

    // Regional rows already carry absolute spend and revenue.
    fn contribution(&self, _campaign: &Campaign) -> BucketTotals {
        BucketTotals {
            impressions: self.performance.impressions,
            clicks: self.performance.clicks,
            conversions: self.performance.conversions,
            spend: self.spend,
            revenue: self.revenue,
            share_sum: 0.0,
        }
    }
}

// ─── Buckets ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketTotals {
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub spend: f64,
    pub revenue: f64,
    /// Sum of the declared percentage shares folded into the bucket.
    pub share_sum: f64,
}

impl BucketTotals {
    pub fn add(&mut self, other: &BucketTotals) {
        self.impressions += other.impressions;
        self.clicks += other.clicks;
        self.conversions += other.conversions;
        self.spend += other.spend;
        self.revenue += other.revenue;
        self.share_sum += other.share_sum;
    }
}

/// A finalized bucket: summed totals plus the rates derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateBucket<K> {
    pub key: K,
    #[serde(flatten)]
    pub totals: BucketTotals,
    #[serde(flatten)]
    pub rates: RateMetrics,
}

/// Mutable accumulation stage of one aggregation pass.
#[derive(Debug, Clone)]
pub struct BucketAccumulator<K> {
    index: HashMap<K, usize>,
    buckets: Vec<(K, BucketTotals)>,
}

impl<K: BucketKey> BucketAccumulator<K> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            buckets: Vec::new(),
        }
    }

    /// Adds `totals` to the bucket for `key`, creating it on first sight.
    pub fn add(&mut self, key: K, totals: &BucketTotals) {
        match self.index.get(&key) {
            Some(&slot) => self.buckets[slot].1.add(totals),
            None => {
                self.index.insert(key.clone(), self.buckets.len());
                self.buckets.push((key, *totals));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Closes the pass and computes rates once per bucket.
    pub fn finalize(self) -> AggregateSet<K> {
        let buckets: Vec<_> = self
            .buckets
            .into_iter()
            .map(|(key, totals)| AggregateBucket {
                rates: RateMetrics::compute(
                    totals.impressions,
                    totals.clicks,
                    totals.conversions,
                    totals.spend,
                    totals.revenue,
                ),
                key,
                totals,
            })
            .collect();
        debug!(buckets = buckets.len(), "aggregation pass finalized");
        AggregateSet::from_buckets(buckets)
    }
}

impl<K: BucketKey> Default for BucketAccumulator<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only result of a pass, in first-seen key order until re-sorted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregateSet<K: BucketKey> {
    buckets: Vec<AggregateBucket<K>>,
    #[serde(skip)]
    index: HashMap<K, usize>,
}

impl<K: BucketKey> AggregateSet<K> {
    pub(crate) fn from_buckets(buckets: Vec<AggregateBucket<K>>) -> Self {
        let index = buckets
            .iter()
            .enumerate()
            .map(|(i, b)| (b.key.clone(), i))
            .collect();
        Self { buckets, index }
    }

    pub fn get(&self, key: &K) -> Option<&AggregateBucket<K>> {
        self.index.get(key).map(|&i| &self.buckets[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AggregateBucket<K>> {
        self.buckets.iter()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn first(&self) -> Option<&AggregateBucket<K>> {
        self.buckets.first()
    }

    pub fn as_slice(&self) -> &[AggregateBucket<K>] {
        &self.buckets
    }

    pub fn into_vec(self) -> Vec<AggregateBucket<K>> {
        self.buckets
    }

    /// Reorders the buckets in place with `compare`. The sort is stable.
    pub(crate) fn reorder_by<F>(&mut self, compare: F)
    where
        F: FnMut(&AggregateBucket<K>, &AggregateBucket<K>) -> std::cmp::Ordering,
    {
        self.buckets.sort_by(compare);
        for (i, bucket) in self.buckets.iter().enumerate() {
            self.index.insert(bucket.key.clone(), i);
        }
    }

    /// The tabular order used by every breakdown view.
    pub fn sorted_by_revenue_desc(mut self) -> Self {
        self.reorder_by(|a, b| b.totals.revenue.total_cmp(&a.totals.revenue));
        self
    }
}

impl<'a, K: BucketKey> IntoIterator for &'a AggregateSet<K> {
    type Item = &'a AggregateBucket<K>;
    type IntoIter = std::slice::Iter<'a, AggregateBucket<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.iter()
    }
}

// ─── Aggregation ────────────────────────────────────────────────────────────

/// Folds one breakdown kind across `campaigns` into buckets keyed by `key_fn`.
/// Rows rejected by `is_match` are skipped.
pub fn aggregate<S, K>(
    campaigns: &[Campaign],
    key_fn: impl Fn(&S) -> K,
    is_match: Option<&dyn Fn(&S) -> bool>,
) -> AggregateSet<K>
where
    S: SegmentRecord,
    K: BucketKey,
{
    let mut acc = BucketAccumulator::new();
    for campaign in campaigns {
        for segment in S::segments(campaign) {
            if is_match.is_some_and(|matches| !matches(segment)) {
                continue;
            }
            acc.add(key_fn(segment), &segment.contribution(campaign));
        }
    }
    acc.finalize()
}
