use crate::{Query, SortOrder, ToQuery};
use serde::{Deserialize, Serialize};

wire_enum! {
    /// 租户生命周期状态
    pub enum TenantStatus {
        Active => "active",
        Suspended => "suspended",
        Pending => "pending",
        Trial => "trial",
        Cancelled => "cancelled",
    }
}

/// 租户订阅摘要
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSubscription {
    #[serde(default, alias = "plan_id")]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "valid_until")]
    pub valid_until: Option<String>,
    #[serde(default, alias = "start_date")]
    pub start_date: Option<String>,
    #[serde(default, alias = "end_date")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_tax_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_stock_threshold: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_prefix: Option<String>,
}

/// 租户：平台上的客户业务账号，计费与隔离的基本单位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    #[serde(default)]
    pub id: String,
    /// Mongo 风格的 `_id`，部分接口只返回它
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    pub name: String,
    pub status: TenantStatus,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, alias = "business_email")]
    pub email: Option<String>,
    #[serde(default, alias = "business_phone")]
    pub phone: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub owner_phone: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default, alias = "plan_id")]
    pub plan_id: Option<String>,
    #[serde(default, alias = "business_type")]
    pub business_type: Option<String>,
    #[serde(default, alias = "gst_number")]
    pub gst_number: Option<String>,
    #[serde(default)]
    pub subscription: Option<TenantSubscription>,
    #[serde(default)]
    pub settings: Option<TenantSettings>,

    // 用量计数
    #[serde(default)]
    pub users: u64,
    #[serde(default)]
    pub products: u64,
    #[serde(default)]
    pub messages_used: u64,
    #[serde(default)]
    pub messages_limit: u64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub integrations: Vec<String>,

    #[serde(default)]
    pub last_active: Option<String>,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<String>,
    #[serde(default, alias = "updated_at")]
    pub updated_at: Option<String>,
}

impl Tenant {
    /// 实际可用的标识：优先 `id`，缺失时回退到 `_id`
    pub fn key(&self) -> &str {
        match &self.object_id {
            Some(oid) if self.id.is_empty() => oid,
            _ => &self.id,
        }
    }
}

/// `GET /admin/tenants/:id` 的返回
///
/// 后端可能直接返回租户，也可能返回 `{tenant, stats}`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TenantDetail {
    WithStats {
        tenant: Tenant,
        #[serde(default)]
        stats: Option<TenantUsage>,
    },
    Bare(Tenant),
}

impl TenantDetail {
    pub fn tenant(&self) -> &Tenant {
        match self {
            TenantDetail::WithStats { tenant, .. } => tenant,
            TenantDetail::Bare(tenant) => tenant,
        }
    }

    pub fn into_tenant(self) -> Tenant {
        match self {
            TenantDetail::WithStats { tenant, .. } => tenant,
            TenantDetail::Bare(tenant) => tenant,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantUsage {
    #[serde(default)]
    pub users_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantStats {
    pub total: u64,
    pub active: u64,
    pub suspended: u64,
    pub pending: u64,
    pub trial: u64,
    pub new_this_month: u64,
    pub churned_this_month: u64,
}

// =========================================================
// Request Definitions
// =========================================================

/// 租户列表过滤条件，字段缺省即不过滤
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TenantFilters {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<TenantStatus>,
    pub plan: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl ToQuery for TenantFilters {
    fn to_query(&self) -> Query {
        Query::new()
            .param("page", self.page)
            .param("limit", self.limit)
            .param("status", self.status)
            .param("plan", self.plan.as_deref())
            .param("search", self.search.as_deref())
            .param("sortBy", self.sort_by.as_deref())
            .param("sortOrder", self.sort_order)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantStatusUpdate {
    pub status: TenantStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantPlanUpdate {
    pub plan_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantCreate {
    pub name: String,
    pub email: String,
    pub owner_name: String,
    pub owner_phone: String,
    pub plan_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gst_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gst_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<TenantSettings>,
}
