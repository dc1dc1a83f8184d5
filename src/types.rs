use serde::{Deserialize, Serialize};

/// UI language. Drives prompt wording, schema field descriptions, the locale
/// table, and CSV headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Fr,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free,
    Premium,
}

/// How adventurous the model should be. Maps to sampling temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    Reliable,
    Creative,
}

/// Optional user-editable free-text filters. Present values are interpolated
/// into the report prompt verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportFilters {
    pub regions: Option<String>,
    pub keywords: Option<String>,
    pub excluded_keywords: Option<String>,
    pub industries: Option<String>,
}

/// A trending product inside a sector, as returned by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTrend {
    pub name: String,
    /// Estimated demand rate as a percentage. 0-100 expected, not enforced.
    pub demand_rate: f64,
    pub regions: String,
    pub reasons: String,
    /// 0-10. Optional: the free-tier report schema omits it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profitability_score: Option<u8>,
    #[serde(default)]
    pub suppliers: Vec<String>,
}

/// A market category grouping trending products. Identified by name; the
/// model's list order is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    pub sector_name: String,
    pub products: Vec<ProductTrend>,
}

/// Top-level report. Replaced whole on regeneration, never merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub sectors: Vec<Sector>,
    pub global_analysis: String,
}

/// A product idea from the in-depth sector analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedProductSuggestion {
    pub name: String,
    pub description: String,
    pub target_audience: String,
    pub selling_points: Vec<String>,
    pub price_range: String,
    #[serde(default)]
    pub suppliers: Vec<String>,
    pub profitability_score: u8,
    /// Low/medium/high in the locale's surface form; kept as the model wrote it.
    pub market_entry_difficulty: String,
}

/// On-demand expansion of one sector. Not merged back into the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedSectorAnalysis {
    pub sector_name: String,
    pub in_depth_analysis: String,
    pub product_suggestions: Vec<DetailedProductSuggestion>,
}

/// Deepest drill-down level: one product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAnalysis {
    pub product_name: String,
    pub market_analysis: String,
    pub key_regions: Vec<String>,
    pub target_audience: String,
    pub selling_points: Vec<String>,
    pub price_range: String,
    #[serde(default)]
    pub suppliers: Vec<String>,
    pub risks: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub picture: String,
    pub subscription_tier: SubscriptionTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications_enabled: Option<bool>,
}

/// A deferred request queued behind a gating prompt, consumed exactly once
/// when the gate condition is satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingAction {
    AnalyzeSector { sector_name: String },
}
