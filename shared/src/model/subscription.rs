use super::Limit;
use crate::{Query, SortOrder, ToQuery};
use serde::{Deserialize, Serialize};

wire_enum! {
    pub enum BillingCycle {
        Monthly => "monthly",
        Yearly => "yearly",
    }
}

wire_enum! {
    pub enum InvoiceStatus {
        Paid => "paid",
        Pending => "pending",
        Overdue => "overdue",
        Trial => "trial",
        Cancelled => "cancelled",
        Refunded => "refunded",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFeatures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Limit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Limit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoices: Option<Limit>,
    /// 每月 WhatsApp 消息配额
    #[serde(default, alias = "whatsapp", skip_serializing_if = "Option::is_none")]
    pub messages: Option<Limit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_locations: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_reports: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_access: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_support: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_branding: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_locations: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub billing: Option<BillingCycle>,
    #[serde(default)]
    pub features: Option<PlanFeatures>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub active_subscribers: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

fn default_true() -> bool {
    true
}

/// 创建或更新套餐；更新时未设置的字段不会被序列化
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing: Option<BillingCycle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<PlanFeatures>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_popular: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(alias = "_id")]
    pub id: String,
    pub tenant_id: String,
    pub amount: f64,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub invoice_number: Option<String>,
    /// 租户名称（列表展示用）
    #[serde(default)]
    pub tenant: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub paid_date: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanRevenue {
    pub plan: String,
    pub count: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStats {
    pub total_revenue: f64,
    pub monthly_revenue: f64,
    pub active_subscriptions: u64,
    pub trial_subscriptions: u64,
    pub overdue_invoices: u64,
    #[serde(default)]
    pub by_plan: Vec<PlanRevenue>,
}

// =========================================================
// Request Definitions
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceFilters {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<InvoiceStatus>,
    pub tenant_id: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl ToQuery for InvoiceFilters {
    fn to_query(&self) -> Query {
        Query::new()
            .param("page", self.page)
            .param("limit", self.limit)
            .param("status", self.status)
            .param("tenantId", self.tenant_id.as_deref())
            .param("search", self.search.as_deref())
            .param("startDate", self.start_date)
            .param("endDate", self.end_date)
            .param("sortBy", self.sort_by.as_deref())
            .param("sortOrder", self.sort_order)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plan_features_mixed_limits() {
        let plan: SubscriptionPlan = serde_json::from_value(json!({
            "id": "pro",
            "name": "Pro",
            "price": 999.0,
            "billing": "monthly",
            "features": { "users": "Unlimited", "products": 500, "whatsapp": 2000 }
        }))
        .unwrap();
        let features = plan.features.unwrap();
        assert_eq!(features.users, Some(Limit::Unlimited));
        assert_eq!(features.messages, Some(Limit::Count(2000)));
        assert!(plan.is_active);
    }

    #[test]
    fn test_plan_draft_serializes_only_set_fields() {
        let draft = PlanDraft {
            price: Some(1299.0),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(draft).unwrap(), json!({ "price": 1299.0 }));
    }
}
