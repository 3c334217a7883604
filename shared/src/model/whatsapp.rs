use crate::{Query, ToQuery};
use serde::{Deserialize, Serialize};

wire_enum! {
    /// 模板审核状态：pending -> approved | rejected
    pub enum TemplateStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

wire_enum! {
    pub enum TemplateCategory {
        Transactional => "Transactional",
        Marketing => "Marketing",
        Otp => "OTP",
    }
}

wire_enum! {
    pub enum ProviderKind {
        Twilio => "twilio",
        Gupshup => "gupshup",
        Meta => "meta",
    }
}

wire_enum! {
    pub enum ProviderStatus {
        Operational => "operational",
        Standby => "standby",
        Degraded => "degraded",
        Down => "down",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WhatsAppStats {
    pub sent: u64,
    pub delivered: u64,
    pub read: u64,
    pub failed: u64,
    pub delivery_rate: f64,
    pub read_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HourlyMessageData {
    pub hour: String,
    pub sent: u64,
    pub delivered: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TenantQuota {
    pub tenant_id: String,
    pub tenant: String,
    pub used: u64,
    pub limit: u64,
    pub plan: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppTemplate {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub category: TemplateCategory,
    pub status: TemplateStatus,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default)]
    pub last_used: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_sid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppProvider {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub provider: ProviderKind,
    pub status: ProviderStatus,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub uptime: f64,
    /// 毫秒
    #[serde(default)]
    pub latency: f64,
    #[serde(default)]
    pub queue: u64,
    #[serde(default)]
    pub config: Option<ProviderConfig>,
    #[serde(default)]
    pub rate_limit: Option<u32>,
    #[serde(default)]
    pub cost_per_message: Option<f64>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ProviderConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_message: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderTestResult {
    pub success: bool,
    pub latency: f64,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WhatsAppAnalytics {
    pub stats: WhatsAppStats,
    pub hourly_data: Vec<HourlyMessageData>,
    pub tenant_quotas: Vec<TenantQuota>,
    pub top_templates: Vec<WhatsAppTemplate>,
}

// =========================================================
// Request Definitions
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateFilters {
    pub category: Option<TemplateCategory>,
    pub status: Option<TemplateStatus>,
    pub search: Option<String>,
}

impl ToQuery for TemplateFilters {
    fn to_query(&self) -> Query {
        Query::new()
            .param("category", self.category)
            .param("status", self.status)
            .param("search", self.search.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateRejection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_payload() {
        let p: WhatsAppProvider = serde_json::from_value(json!({
            "id": "p1",
            "name": "Gupshup India",
            "provider": "gupshup",
            "status": "degraded",
            "isDefault": true,
            "uptime": 99.2,
            "latency": 340,
            "queue": 12
        }))
        .unwrap();
        assert_eq!(p.provider, ProviderKind::Gupshup);
        assert_eq!(p.status, ProviderStatus::Degraded);
        assert!(p.is_default);
    }

    #[test]
    fn test_template_category_wire_names() {
        assert_eq!(TemplateCategory::Otp.as_str(), "OTP");
        let filters = TemplateFilters {
            category: Some(TemplateCategory::Marketing),
            status: Some(TemplateStatus::Pending),
            search: Some("all".into()),
        };
        assert_eq!(
            filters.to_query().to_query_string(),
            "category=Marketing&status=pending"
        );
    }
}
