//! Per-advertiser analytics report.
//!
//! The analytics screen loads one report document instead of a row list.
//! All sections default to empty so a partial report from the server still
//! deserializes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregates across all campaigns of an advertiser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsSummary {
    /// Number of campaigns.
    pub total_campaigns: u64,
    /// Sum of campaign budgets.
    pub total_budget: f64,
    /// Sum of spent budget.
    pub total_spent: f64,
    /// Installs across campaigns.
    pub total_installs: u64,
    /// Reviews across campaigns.
    pub total_reviews: u64,
    /// Clicks across campaigns.
    pub total_clicks: u64,
    /// Campaigns in the `approved` state.
    pub active_campaigns: u64,
    /// Campaigns in the `completed` state.
    pub completed_campaigns: u64,
    /// Campaigns in the `paused` state.
    pub paused_campaigns: u64,
    /// Campaigns in the `pending` state.
    pub pending_campaigns: u64,
    /// Mean click-through rate, as a ratio.
    #[serde(rename = "averageCTR")]
    pub average_ctr: f64,
    /// Mean cost per click.
    #[serde(rename = "averageCPC")]
    pub average_cpc: f64,
    /// Spent / budget, as a ratio.
    pub budget_utilization: f64,
}

/// Campaign logo reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppLogo {
    /// Storage key.
    pub filename: String,
    /// Public URL.
    pub url: String,
}

/// Per-campaign performance row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignPerformance {
    /// Campaign identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Campaign name.
    pub name: String,
    /// Campaign type (`cpi`, `review`).
    #[serde(rename = "type")]
    pub campaign_type: String,
    /// Total budget.
    pub budget_total: f64,
    /// Spent budget.
    pub budget_spent: f64,
    /// Logo.
    pub app_logo: Option<AppLogo>,
    /// Price per install.
    pub cost_per_install: f64,
    /// Installs delivered.
    pub installs_count: u64,
    /// Reviews delivered.
    pub review_count: u64,
    /// Clicks recorded.
    pub click_count: u64,
    /// Campaign status.
    pub status: String,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Start of the campaign window.
    pub start_date: Option<DateTime<Utc>>,
    /// End of the campaign window.
    pub end_date: Option<DateTime<Utc>>,
    /// Store link of the promoted app.
    pub package_name: String,
    /// Budget left.
    pub remaining_budget: f64,
    /// Spent / budget, as a ratio.
    pub budget_utilization: f64,
    /// Click-through rate, as a ratio.
    pub ctr: f64,
    /// Cost per click.
    pub cpc: f64,
}

/// Aggregates per campaign type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypePerformance {
    /// Campaign type.
    #[serde(rename = "type")]
    pub campaign_type: String,
    /// Campaigns of this type.
    pub count: u64,
    /// Budget of this type.
    pub total_budget: f64,
    /// Spent budget of this type.
    pub total_spent: f64,
    /// Installs of this type.
    pub total_installs: u64,
    /// Reviews of this type.
    pub total_reviews: u64,
    /// Clicks of this type.
    pub total_clicks: u64,
    /// Mean click-through rate.
    #[serde(rename = "avgCTR")]
    pub avg_ctr: f64,
    /// Mean cost per click.
    #[serde(rename = "avgCPC")]
    pub avg_cpc: f64,
}

/// Aggregates per calendar month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonthlyPerformance {
    /// Month as `YYYY-MM`.
    pub month: String,
    /// Campaigns active in the month.
    pub total_campaigns: u64,
    /// Spend in the month.
    pub total_spent: f64,
    /// Installs in the month.
    pub total_installs: u64,
    /// Reviews in the month.
    pub total_reviews: u64,
    /// Clicks in the month.
    pub total_clicks: u64,
}

/// Campaign count and budget per status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusShare {
    /// Campaign status.
    pub status: String,
    /// Campaigns in this status.
    pub count: u64,
    /// Budget in this status.
    pub total_budget: f64,
}

/// Full analytics document for one advertiser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsReport {
    /// Totals.
    pub summary: AnalyticsSummary,
    /// Campaign rows, in the requested sort order.
    pub campaigns: Vec<CampaignPerformance>,
    /// Breakdown by campaign type.
    pub performance_by_type: Vec<TypePerformance>,
    /// Breakdown by month.
    pub monthly_performance: Vec<MonthlyPerformance>,
    /// Breakdown by status.
    pub status_distribution: Vec<StatusShare>,
}

impl AnalyticsReport {
    /// Demonstration report shown when the analytics endpoint is
    /// unreachable.
    #[must_use]
    pub fn sample() -> Self {
        let parse = |s: &str| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|d| d.with_timezone(&Utc))
        };
        Self {
            summary: AnalyticsSummary {
                total_campaigns: 1,
                total_budget: 500.0,
                total_spent: 2.5,
                total_installs: 1,
                total_reviews: 0,
                total_clicks: 28,
                active_campaigns: 1,
                completed_campaigns: 0,
                paused_campaigns: 0,
                pending_campaigns: 0,
                average_ctr: 0.0357,
                average_cpc: 0.0893,
                budget_utilization: 0.005,
            },
            campaigns: vec![CampaignPerformance {
                id: "6890bc04af109e2aa1b78080".to_string(),
                name: "NotaAI - Ask AI Chat to Write".to_string(),
                campaign_type: "cpi".to_string(),
                budget_total: 500.0,
                budget_spent: 2.5,
                app_logo: Some(AppLogo {
                    filename: "applogoAdv/hn0fwex8m7i9obigxnha".to_string(),
                    url: "https://res.cloudinary.com/ddy5sbdtr/image/upload/v1754315780/applogoAdv/hn0fwex8m7i9obigxnha.webp".to_string(),
                }),
                cost_per_install: 2.5,
                installs_count: 1,
                review_count: 0,
                click_count: 28,
                status: "approved".to_string(),
                created_at: parse("2025-08-04T13:56:20.151Z"),
                start_date: parse("2025-08-04T19:27:26.366Z"),
                end_date: parse("2025-08-09T19:27:26.366Z"),
                package_name: "https://play.google.com/store/apps/details?id=com.notaAINotesAIChatOCR&pcampaignid=web_share".to_string(),
                remaining_budget: 497.5,
                budget_utilization: 0.005,
                ctr: 0.0357,
                cpc: 0.0893,
            }],
            performance_by_type: vec![TypePerformance {
                campaign_type: "cpi".to_string(),
                count: 1,
                total_budget: 500.0,
                total_spent: 2.5,
                total_installs: 1,
                total_reviews: 0,
                total_clicks: 28,
                avg_ctr: 0.0357,
                avg_cpc: 0.0893,
            }],
            monthly_performance: vec![MonthlyPerformance {
                month: "2025-08".to_string(),
                total_campaigns: 1,
                total_spent: 2.5,
                total_installs: 1,
                total_reviews: 0,
                total_clicks: 28,
            }],
            status_distribution: vec![StatusShare {
                status: "approved".to_string(),
                count: 1,
                total_budget: 500.0,
            }],
        }
    }
}
