use bizgrow_admin_shared::model::{
    AuditLog, DateRange, LogFilters, LogStats, SystemHealth, SystemLog, SystemLogFilters,
};
use bizgrow_admin_shared::protocol::paths;
use bizgrow_admin_shared::{ExportFormat, Paged};

use crate::api::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::service::export_query;

const LIST_KEY: &str = "logs";

#[derive(Clone)]
pub struct LogsService {
    api: ApiClient,
}

impl LogsService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn audit_logs(&self, filters: &LogFilters) -> Result<Paged<AuditLog>, ApiError> {
        self.api
            .paged(ApiRequest::get(paths::AUDIT_LOGS).query(filters), LIST_KEY)
            .await
    }

    pub async fn audit_log(&self, id: &str) -> Result<AuditLog, ApiError> {
        self.api
            .data(ApiRequest::get(paths::member(paths::AUDIT_LOGS, id, None)))
            .await
    }

    pub async fn audit_stats(&self, range: &DateRange) -> Result<LogStats, ApiError> {
        self.api
            .data(ApiRequest::get(paths::nested(paths::AUDIT_LOGS, "stats")).query(range))
            .await
    }

    pub async fn export_audit(&self, format: ExportFormat, filters: &LogFilters) -> Result<Vec<u8>, ApiError> {
        self.api
            .bytes(
                ApiRequest::get(paths::nested(paths::AUDIT_LOGS, "export"))
                    .query(&export_query(format))
                    .query(filters),
            )
            .await
    }

    pub async fn system_logs(&self, filters: &SystemLogFilters) -> Result<Paged<SystemLog>, ApiError> {
        self.api
            .paged(ApiRequest::get(paths::LOGS).query(filters), LIST_KEY)
            .await
    }

    pub async fn system_health(&self) -> Result<SystemHealth, ApiError> {
        self.api.data(ApiRequest::get(paths::HEALTH)).await
    }

    /// 审计日志中出现过的动作名，用于过滤下拉框
    pub async fn log_actions(&self) -> Result<Vec<String>, ApiError> {
        let page = self
            .api
            .paged(ApiRequest::get(paths::nested(paths::LOGS, "actions")), "actions")
            .await?;
        Ok(page.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrEmpty;
    use crate::service::testing::mock_api;
    use bizgrow_admin_shared::HttpMethod;
    use bizgrow_admin_shared::model::{ActorType, HealthStatus, LogLevel, LogStatus};
    use serde_json::json;

    #[tokio::test]
    async fn test_audit_logs_with_filters() {
        let (mock, api) = mock_api();
        mock.mock_response(
            HttpMethod::Get,
            paths::AUDIT_LOGS,
            200,
            json!({
                "success": true,
                "data": { "logs": [{
                    "_id": "l1",
                    "timestamp": "2025-03-01T10:00:00Z",
                    "action": "tenant.suspend",
                    "actor": "root",
                    "actorType": "Admin",
                    "status": "success"
                }] },
                "pagination": { "page": 1, "limit": 50, "total": 1, "pages": 1 }
            }),
        );

        let filters = LogFilters {
            actor_type: Some(ActorType::Admin),
            status: Some(LogStatus::Success),
            action: Some("all".into()),
            ..Default::default()
        };
        let page = LogsService::new(api).audit_logs(&filters).await.unwrap();

        assert_eq!(page.items[0].action, "tenant.suspend");
        assert_eq!(page.pagination.unwrap().total, 1);
        assert_eq!(mock.requests()[0].query(), Some("status=success&actorType=Admin"));
    }

    #[tokio::test]
    async fn test_audit_stats() {
        let (mock, api) = mock_api();
        mock.mock_response(
            HttpMethod::Get,
            "/admin/logs/audit/stats",
            200,
            json!({ "success": true, "data": { "total": 12, "byStatus": { "success": 10, "error": 2 } } }),
        );

        let stats = LogsService::new(api).audit_stats(&DateRange::default()).await.unwrap();

        assert_eq!(stats.count_for(LogStatus::Error), 2);
        assert_eq!(stats.count_for(LogStatus::Warning), 0);
    }

    #[tokio::test]
    async fn test_system_logs_missing_endpoint_is_empty() {
        let (_mock, api) = mock_api();

        let page = LogsService::new(api)
            .system_logs(&SystemLogFilters {
                level: Some(LogLevel::Error),
                ..Default::default()
            })
            .await
            .or_empty()
            .unwrap();

        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_system_health() {
        let (mock, api) = mock_api();
        mock.mock_response(
            HttpMethod::Get,
            paths::HEALTH,
            200,
            json!({ "success": true, "data": {
                "status": "degraded",
                "uptime": 86400.0,
                "services": { "database": { "status": "up", "latency": 3.0 }, "redis": { "status": "down" } },
                "metrics": { "cpuUsage": 71.5 }
            } }),
        );

        let health = LogsService::new(api).system_health().await.unwrap();

        assert_eq!(health.status, HealthStatus::Degraded);
        assert!(!health.is_healthy());
        assert_eq!(health.services["redis"].status, "down");
        assert_eq!(health.metrics.cpu_usage, 71.5);
    }
}
