use crate::error::{CampaignError, CampaignResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;

/// The full marketing dataset handed over by the data-fetch collaborator.
/// Treated as an immutable snapshot for the duration of one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
}

impl Dataset {
    pub fn from_json(raw: &str) -> CampaignResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads and parses a dataset document from disk.
    pub fn load(path: &Path) -> CampaignResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
            .map_err(|e| CampaignError::Dataset(format!("{}: {e}", path.display())))
    }
}

/// One marketing campaign with its four parallel breakdowns.
///
/// Percentage shares across a breakdown are not guaranteed to sum to 100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default, rename = "demographic_breakdown")]
    pub demographics: Vec<DemographicSegment>,
    #[serde(default, rename = "device_performance")]
    pub devices: Vec<DeviceSegment>,
    #[serde(default, rename = "regional_performance")]
    pub regions: Vec<RegionalSegment>,
    #[serde(default, rename = "weekly_performance")]
    pub weeks: Vec<WeeklySegment>,
}

/// Absolute counters already scoped to one segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentPerformance {
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub conversions: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicSegment {
    pub gender: Gender,
    pub age_group: String,
    /// Share of the campaign audience, 0..=100.
    #[serde(default)]
    pub percentage_of_audience: f64,
    #[serde(default)]
    pub performance: SegmentPerformance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSegment {
    pub device: DeviceLabel,
    /// Share of the campaign traffic, 0..=100.
    #[serde(default)]
    pub percentage_of_traffic: f64,
    #[serde(flatten)]
    pub performance: SegmentPerformance,
}

/// Regional rows carry their own absolute spend and revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalSegment {
    pub region: RegionKey,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(flatten)]
    pub performance: SegmentPerformance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySegment {
    /// Date key of the week, e.g. `2024-03-04`. Grouped by exact match.
    pub week_start: String,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub revenue: f64,
}

// ─── Categorical keys ───────────────────────────────────────────────────────

/// Audience gender, normalized case-insensitively at ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Female,
    /// Any other value, lower-cased.
    Other(String),
}

impl Gender {
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        match normalized.as_str() {
            "male" => Self::Male,
            "female" => Self::Female,
            _ => Self::Other(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Gender {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for Gender {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<Gender> for String {
    fn from(gender: Gender) -> Self {
        gender.as_str().to_string()
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device label exactly as reported; grouping does not fold case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceLabel(pub String);

impl DeviceLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn class(&self) -> DeviceClass {
        DeviceClass::classify(&self.0)
    }
}

impl fmt::Display for DeviceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coarse device family, used by presentation to pick an icon.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Desktop,
    Mobile,
    Tablet,
}

impl DeviceClass {
    pub fn classify(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("mobile") || label.contains("phone") {
            Self::Mobile
        } else if label.contains("tablet") {
            Self::Tablet
        } else {
            Self::Desktop
        }
    }
}

/// Region name, treated as globally unique across campaigns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionKey(pub String);

impl RegionKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A labelled number, the hand-off shape for chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: f64,
}

impl LabeledValue {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// A valued region handed to the bubble map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub region: RegionKey,
    pub country: String,
    /// The comparison value bubbles are sized and coloured by.
    pub value: f64,
    pub spend: f64,
    pub revenue: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "campaign id must be a string or number, got {other}"
        ))),
    }
}
