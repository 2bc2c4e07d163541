//! Proportional allocation of campaign-level spend and revenue onto segments.
//!
//! Shares are projected directly without renormalization, so the allocated
//! totals across one campaign's segments may fall short of or exceed the
//! campaign's reported totals when the source percentages are incomplete or
//! overlapping.

use campaign_core::types::Campaign;
use serde::{Deserialize, Serialize};

/// `campaign_total * (percentage_share / 100)`. A zero share yields exactly 0.
pub fn allocate(campaign_total: f64, percentage_share: f64) -> f64 {
    if percentage_share == 0.0 {
        return 0.0;
    }
    campaign_total * (percentage_share / 100.0)
}

/// Spend and revenue attributed to one segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocatedShare {
    pub spend: f64,
    pub revenue: f64,
}

impl AllocatedShare {
    pub fn for_campaign(campaign: &Campaign, percentage_share: f64) -> Self {
        Self {
            spend: allocate(campaign.spend, percentage_share),
            revenue: allocate(campaign.revenue, percentage_share),
        }
    }
}
