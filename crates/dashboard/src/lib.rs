//! Composes the reporting views and chart geometry into one dashboard snapshot.

pub mod snapshot;

pub use snapshot::{CampaignDashboard, DashboardSnapshot};
