use serde::{Deserialize, Serialize};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =========================================================
// Endpoint Paths
// =========================================================

pub mod paths {
    // --- auth ---
    pub const AUTH_ADMIN_LOGIN: &str = "/auth/admin/login";
    pub const AUTH_LOGIN: &str = "/auth/login";
    pub const AUTH_OTP_SEND: &str = "/auth/otp/send";
    pub const AUTH_OTP_VERIFY: &str = "/auth/otp/verify";
    pub const AUTH_REFRESH: &str = "/auth/refresh";
    pub const AUTH_LOGOUT: &str = "/auth/logout";
    pub const AUTH_PROFILE: &str = "/auth/profile";
    pub const AUTH_CHANGE_PHONE_SEND: &str = "/auth/change-phone/send";
    pub const AUTH_CHANGE_PHONE_VERIFY: &str = "/auth/change-phone/verify";

    // --- analytics ---
    pub const ANALYTICS_OVERVIEW: &str = "/admin/analytics/overview";
    pub const ANALYTICS_REVENUE: &str = "/admin/analytics/revenue";
    pub const ANALYTICS_TENANT_GROWTH: &str = "/admin/analytics/tenant-growth";

    // --- resources ---
    pub const TENANTS: &str = "/admin/tenants";
    pub const USERS: &str = "/admin/users";
    pub const PLANS: &str = "/admin/plans";
    pub const INVOICES: &str = "/admin/invoices";
    pub const SUBSCRIPTION_STATS: &str = "/admin/subscriptions/stats";
    pub const WHATSAPP: &str = "/admin/whatsapp";
    pub const LOGS: &str = "/admin/logs";
    pub const AUDIT_LOGS: &str = "/admin/logs/audit";
    pub const HEALTH: &str = "/admin/health";
    pub const SETTINGS: &str = "/admin/settings";

    /// 拼接资源子路径，如 `member(TENANTS, "t1", Some("status"))`
    /// 得到 `/admin/tenants/t1/status`。`id` 会做百分号编码。
    pub fn member(collection: &str, id: &str, action: Option<&str>) -> String {
        let id = urlencoding::encode(id);
        match action {
            Some(action) => format!("{}/{}/{}", collection, id, action),
            None => format!("{}/{}", collection, id),
        }
    }

    /// 集合下的固定子路径，如 `/admin/tenants/stats`
    pub fn nested(collection: &str, segment: &str) -> String {
        format!("{}/{}", collection, segment)
    }
}
