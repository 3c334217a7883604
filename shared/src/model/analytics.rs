use serde::{Deserialize, Serialize};

/// 仪表盘首页计数 `GET /admin/analytics/overview`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverviewData {
    pub total_tenants: u64,
    pub active_tenants: u64,
    pub suspended_tenants: u64,
    pub pending_tenants: u64,
    pub trial_tenants: u64,
    pub new_tenants_this_month: u64,
    pub tenants_growth: f64,
    pub total_users: u64,
    pub active_users: u64,
    pub new_users_this_month: u64,
    pub users_growth: f64,
    pub total_revenue: f64,
    pub monthly_revenue: f64,
    pub revenue_growth: f64,
    pub whatsapp_messages: u64,
    pub whatsapp_delivered: u64,
    pub whatsapp_read: u64,
    pub whatsapp_failed: u64,
    pub delivery_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenuePoint {
    pub month: String,
    pub year: i32,
    pub revenue: f64,
    pub tenants: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevenueSummary {
    pub total_revenue: f64,
    pub average_monthly: f64,
    pub current_tenants: u64,
}

/// `GET /admin/analytics/revenue?months=N`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevenueSeries {
    pub revenue_data: Vec<RevenuePoint>,
    pub summary: Option<RevenueSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthPoint {
    pub month: String,
    pub year: i32,
    pub new: u64,
    pub churned: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GrowthSummary {
    pub total_new: u64,
    pub total_churned: u64,
    pub net_growth: i64,
    pub average_new_per_month: f64,
    pub churn_rate: f64,
}

/// `GET /admin/analytics/tenant-growth?months=N`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TenantGrowth {
    pub growth_data: Vec<GrowthPoint>,
    pub summary: Option<GrowthSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_series_without_summary() {
        let s: RevenueSeries = serde_json::from_value(json!({
            "revenueData": [{ "month": "Jan", "year": 2025, "revenue": 1200.5, "tenants": 14 }]
        }))
        .unwrap();
        assert_eq!(s.revenue_data.len(), 1);
        assert!(s.summary.is_none());
    }

    #[test]
    fn test_growth_net_can_be_negative() {
        let g: TenantGrowth = serde_json::from_value(json!({
            "growthData": [],
            "summary": { "totalNew": 2, "totalChurned": 5, "netGrowth": -3 }
        }))
        .unwrap();
        assert_eq!(g.summary.unwrap().net_growth, -3);
    }
}
