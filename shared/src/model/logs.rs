use crate::{Query, SortOrder, ToQuery};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

wire_enum! {
    pub enum ActorType {
        User => "User",
        Admin => "Admin",
        System => "System",
    }
}

wire_enum! {
    pub enum LogStatus {
        Success => "success",
        Error => "error",
        Warning => "warning",
        Info => "info",
    }
}

wire_enum! {
    pub enum LogLevel {
        Debug => "debug",
        Info => "info",
        Warn => "warn",
        Error => "error",
    }
}

wire_enum! {
    /// 审计日志的快捷时间范围
    pub enum LogDateRange {
        Today => "today",
        Last7Days => "7days",
        Last30Days => "30days",
        Custom => "custom",
    }
}

wire_enum! {
    pub enum HealthStatus {
        Healthy => "healthy",
        Degraded => "degraded",
        Unhealthy => "unhealthy",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    #[serde(alias = "_id")]
    pub id: String,
    pub timestamp: String,
    pub action: String,
    pub actor: String,
    pub actor_type: ActorType,
    #[serde(default)]
    pub actor_id: Option<String>,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub target_id: Option<String>,
    pub status: LogStatus,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionCount {
    pub action: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogStats {
    pub total: u64,
    /// success / error / warning / info
    pub by_status: HashMap<String, u64>,
    /// User / Admin / System
    pub by_actor_type: HashMap<String, u64>,
    pub recent_actions: Vec<ActionCount>,
}

impl LogStats {
    pub fn count_for(&self, status: LogStatus) -> u64 {
        self.by_status.get(status.as_str()).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemLog {
    #[serde(alias = "_id")]
    pub id: String,
    pub level: LogLevel,
    pub message: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceHealth {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub latency: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostMetrics {
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
    pub active_connections: u64,
}

/// `GET /admin/health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemHealth {
    pub status: HealthStatus,
    #[serde(default)]
    pub uptime: f64,
    #[serde(default)]
    pub timestamp: Option<String>,
    /// database / redis / queue / whatsapp / storage
    #[serde(default)]
    pub services: HashMap<String, ServiceHealth>,
    #[serde(default)]
    pub metrics: HostMetrics,
}

impl SystemHealth {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

// =========================================================
// Request Definitions
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogFilters {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<LogStatus>,
    pub actor_type: Option<ActorType>,
    pub action: Option<String>,
    pub tenant_id: Option<String>,
    pub user_id: Option<String>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub date_range: Option<LogDateRange>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl ToQuery for LogFilters {
    fn to_query(&self) -> Query {
        Query::new()
            .param("page", self.page)
            .param("limit", self.limit)
            .param("status", self.status)
            .param("actorType", self.actor_type)
            .param("action", self.action.as_deref())
            .param("tenantId", self.tenant_id.as_deref())
            .param("userId", self.user_id.as_deref())
            .param("startDate", self.start_date)
            .param("endDate", self.end_date)
            .param("dateRange", self.date_range)
            .param("search", self.search.as_deref())
            .param("sortBy", self.sort_by.as_deref())
            .param("sortOrder", self.sort_order)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemLogFilters {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub level: Option<LogLevel>,
    pub service: Option<String>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub search: Option<String>,
}

impl ToQuery for SystemLogFilters {
    fn to_query(&self) -> Query {
        Query::new()
            .param("page", self.page)
            .param("limit", self.limit)
            .param("level", self.level)
            .param("service", self.service.as_deref())
            .param("startDate", self.start_date)
            .param("endDate", self.end_date)
            .param("search", self.search.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_health_payload() {
        let h: SystemHealth = serde_json::from_value(json!({
            "status": "degraded",
            "uptime": 86400,
            "services": {
                "database": { "status": "up", "latency": 4 },
                "redis": { "status": "down" }
            },
            "metrics": { "cpuUsage": 41.5, "memoryUsage": 62.0, "diskUsage": 70.1, "activeConnections": 18 }
        }))
        .unwrap();
        assert!(!h.is_healthy());
        assert_eq!(h.services["redis"].latency, None);
        assert_eq!(h.metrics.active_connections, 18);
    }

    #[test]
    fn test_log_stats_counts() {
        let stats: LogStats = serde_json::from_value(json!({
            "total": 10,
            "byStatus": { "success": 7, "error": 3 }
        }))
        .unwrap();
        assert_eq!(stats.count_for(LogStatus::Error), 3);
        assert_eq!(stats.count_for(LogStatus::Warning), 0);
    }

    #[test]
    fn test_audit_filters_wire_names() {
        let filters = LogFilters {
            actor_type: Some(ActorType::Admin),
            date_range: Some(LogDateRange::Last7Days),
            action: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            filters.to_query().to_query_string(),
            "actorType=Admin&dateRange=7days"
        );
    }
}
