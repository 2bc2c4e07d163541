//! Campaign breakdown reporting: proportional allocation, grouped
//! aggregation, rate metrics, and weekly trends over a marketing dataset.

pub mod aggregator;
pub mod allocation;
pub mod demographic;
pub mod device;
pub mod filter;
pub mod rates;
pub mod regional;
pub mod table;
pub mod weekly;

pub use aggregator::{aggregate, AggregateBucket, AggregateSet, BucketAccumulator, BucketTotals};
pub use demographic::DemographicView;
pub use device::DeviceView;
pub use filter::Selection;
pub use rates::{safe_divide_as_percent, safe_divide_as_ratio, RateMetrics};
pub use regional::RegionalView;
pub use table::{BucketMetric, SortOrder};
pub use weekly::{reduce_weekly, WeeklyTotal};
