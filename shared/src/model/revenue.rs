use crate::{Query, ToQuery};
use serde::{Deserialize, Serialize};

wire_enum! {
    pub enum TimeRange {
        Last30Days => "30days",
        Last3Months => "3months",
        Last6Months => "6months",
        LastYear => "1year",
        Custom => "custom",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevenueOverview {
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub avg_monthly_revenue: f64,
    pub revenue_growth: f64,
    pub expense_growth: f64,
    pub profit_growth: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueByPlan {
    pub name: String,
    pub value: f64,
    pub subscribers: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopTenant {
    pub id: String,
    pub name: String,
    pub plan: String,
    pub revenue: f64,
    pub growth: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueBreakdown {
    pub category: String,
    pub amount: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevenueAnalytics {
    pub overview: RevenueOverview,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub revenue_by_plan: Vec<RevenueByPlan>,
    pub top_tenants: Vec<TopTenant>,
    pub breakdown: Vec<RevenueBreakdown>,
}

/// MRR (Monthly Recurring Revenue) 指标
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MrrMetrics {
    #[serde(rename = "currentMRR")]
    pub current_mrr: f64,
    #[serde(rename = "previousMRR")]
    pub previous_mrr: f64,
    pub growth: f64,
    #[serde(rename = "newMRR")]
    pub new_mrr: f64,
    #[serde(rename = "churnedMRR")]
    pub churned_mrr: f64,
    #[serde(rename = "expansionMRR")]
    pub expansion_mrr: f64,
    pub arr: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevenueFilters {
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub time_range: Option<TimeRange>,
}

impl ToQuery for RevenueFilters {
    fn to_query(&self) -> Query {
        Query::new()
            .param("startDate", self.start_date)
            .param("endDate", self.end_date)
            .param("timeRange", self.time_range)
    }
}
