use bizgrow_admin_shared::model::{
    Tenant, TenantCreate, TenantDetail, TenantFilters, TenantPlanUpdate, TenantStats, TenantStatus,
    TenantStatusUpdate, TenantUpdate,
};
use bizgrow_admin_shared::protocol::paths;
use bizgrow_admin_shared::{ExportFormat, Paged, Query, SortOrder};

use crate::api::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::service::export_query;

/// 列表对象形态下的资源字段名
const LIST_KEY: &str = "tenants";

#[derive(Clone)]
pub struct TenantService {
    api: ApiClient,
}

impl TenantService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, filters: &TenantFilters) -> Result<Paged<Tenant>, ApiError> {
        self.api
            .paged(ApiRequest::get(paths::TENANTS).query(filters), LIST_KEY)
            .await
    }

    pub async fn get(&self, id: &str) -> Result<TenantDetail, ApiError> {
        self.api
            .data(ApiRequest::get(paths::member(paths::TENANTS, id, None)))
            .await
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: TenantStatus,
        reason: Option<&str>,
    ) -> Result<Tenant, ApiError> {
        let body = TenantStatusUpdate {
            status,
            reason: reason.map(str::to_string),
        };
        tracing::info!(tenant = id, status = %status, "updating tenant status");
        self.api
            .data(ApiRequest::put(paths::member(paths::TENANTS, id, Some("status"))).json(&body)?)
            .await
    }

    pub async fn update_plan(&self, id: &str, update: &TenantPlanUpdate) -> Result<Tenant, ApiError> {
        self.api
            .data(ApiRequest::put(paths::member(paths::TENANTS, id, Some("plan"))).json(update)?)
            .await
    }

    pub async fn create(&self, data: &TenantCreate) -> Result<Tenant, ApiError> {
        self.api
            .data(ApiRequest::post(paths::TENANTS).json(data)?)
            .await
    }

    pub async fn update(&self, id: &str, data: &TenantUpdate) -> Result<Tenant, ApiError> {
        self.api
            .data(ApiRequest::put(paths::member(paths::TENANTS, id, None)).json(data)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api
            .execute(ApiRequest::delete(paths::member(paths::TENANTS, id, None)))
            .await?;
        Ok(())
    }

    pub async fn stats(&self) -> Result<TenantStats, ApiError> {
        self.api
            .data(ApiRequest::get(paths::nested(paths::TENANTS, "stats")))
            .await
    }

    /// 最近注册的租户（按 createdAt 倒序）
    pub async fn recent_signups(&self, limit: u32) -> Result<Vec<Tenant>, ApiError> {
        let query = Query::new()
            .push("sortBy", "createdAt")
            .push("sortOrder", SortOrder::Desc)
            .push("limit", limit);
        let page = self
            .api
            .paged(ApiRequest::get(paths::TENANTS).query(&query), LIST_KEY)
            .await?;
        Ok(page.items)
    }

    pub async fn export(&self, format: ExportFormat) -> Result<Vec<u8>, ApiError> {
        self.api
            .bytes(ApiRequest::get(paths::nested(paths::TENANTS, "export")).query(&export_query(format)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use crate::service::testing::mock_api;
    use bizgrow_admin_shared::HttpMethod;
    use serde_json::json;

    fn tenant(id: &str, status: &str) -> serde_json::Value {
        json!({ "id": id, "name": "Sharma Electronics", "status": status, "plan": "Pro" })
    }

    #[tokio::test]
    async fn test_list_accepts_keyed_payload() {
        let (mock, api) = mock_api();
        mock.mock_response(
            HttpMethod::Get,
            paths::TENANTS,
            200,
            json!({
                "success": true,
                "data": {
                    "tenants": [tenant("t1", "active"), tenant("t2", "trial")],
                    "pagination": { "page": 1, "limit": 10, "total": 2, "totalPages": 1 }
                }
            }),
        );
        let service = TenantService::new(api);

        let filters = TenantFilters {
            page: Some(1),
            limit: Some(10),
            search: Some("sharma".into()),
            ..Default::default()
        };
        let page = service.list(&filters).await.unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page.items[1].status, TenantStatus::Trial);
        assert_eq!(page.pagination.unwrap().pages, 1);
        assert_eq!(mock.requests()[0].query(), Some("page=1&limit=10&search=sharma"));
    }

    #[tokio::test]
    async fn test_list_accepts_bare_array() {
        let (mock, api) = mock_api();
        mock.mock_response(
            HttpMethod::Get,
            paths::TENANTS,
            200,
            json!({
                "success": true,
                "data": [tenant("t1", "active")],
                "pagination": { "page": 1, "limit": 20, "total": 1, "pages": 1 }
            }),
        );

        let page = TenantService::new(api)
            .list(&TenantFilters::default())
            .await
            .unwrap();

        assert_eq!(page.items[0].key(), "t1");
        assert_eq!(page.pagination.unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_update_status_sends_status_and_reason() {
        let (mock, api) = mock_api();
        mock.mock_response(
            HttpMethod::Put,
            "/admin/tenants/t1/status",
            200,
            json!({ "success": true, "data": tenant("t1", "suspended") }),
        );

        let updated = TenantService::new(api)
            .update_status("t1", TenantStatus::Suspended, Some("payment overdue"))
            .await
            .unwrap();

        assert_eq!(updated.status, TenantStatus::Suspended);
        assert_eq!(
            mock.requests()[0].json_body(),
            Some(json!({ "status": "suspended", "reason": "payment overdue" }))
        );
    }

    #[tokio::test]
    async fn test_get_unwraps_tenant_with_stats() {
        let (mock, api) = mock_api();
        mock.mock_response(
            HttpMethod::Get,
            "/admin/tenants/t1",
            200,
            json!({ "success": true, "data": { "tenant": tenant("t1", "active"), "stats": { "usersCount": 4 } } }),
        );

        let detail = TenantService::new(api).get("t1").await.unwrap();

        assert_eq!(detail.tenant().name, "Sharma Electronics");
        match detail {
            TenantDetail::WithStats { stats, .. } => assert_eq!(stats.unwrap().users_count, 4),
            TenantDetail::Bare(_) => panic!("expected stats"),
        }
    }

    #[tokio::test]
    async fn test_get_missing_tenant_is_not_found() {
        let (mock, api) = mock_api();
        mock.mock_response(
            HttpMethod::Get,
            "/admin/tenants/nope",
            404,
            json!({ "success": false, "message": "Tenant not found" }),
        );

        let err = TenantService::new(api).get("nope").await.unwrap_err();

        assert_eq!(err.class(), ErrorClass::NotFound);
        assert_eq!(err.to_string(), "Tenant not found");
    }

    #[tokio::test]
    async fn test_recent_signups_sorts_by_creation() {
        let (mock, api) = mock_api();
        mock.mock_response(
            HttpMethod::Get,
            paths::TENANTS,
            200,
            json!({ "success": true, "data": { "tenants": [tenant("t9", "trial")] } }),
        );

        let recent = TenantService::new(api).recent_signups(5).await.unwrap();

        assert_eq!(recent.len(), 1);
        assert_eq!(
            mock.requests()[0].query(),
            Some("sortBy=createdAt&sortOrder=desc&limit=5")
        );
    }

    #[tokio::test]
    async fn test_export_returns_raw_bytes() {
        let (mock, api) = mock_api();
        mock.mock_raw(HttpMethod::Get, "/admin/tenants/export", 200, b"id,name\nt1,Acme\n".to_vec());

        let bytes = TenantService::new(api)
            .export(ExportFormat::Csv)
            .await
            .unwrap();

        assert_eq!(bytes, b"id,name\nt1,Acme\n");
        assert_eq!(mock.requests()[0].query(), Some("format=csv"));
    }

    #[tokio::test]
    async fn test_delete_and_stats() {
        let (mock, api) = mock_api();
        mock.mock_response(HttpMethod::Delete, "/admin/tenants/t1", 200, json!({ "success": true, "message": "Tenant deleted" }));
        mock.mock_response(
            HttpMethod::Get,
            "/admin/tenants/stats",
            200,
            json!({
                "success": true,
                "data": { "total": 10, "active": 6, "suspended": 1, "pending": 1, "trial": 2, "newThisMonth": 3, "churnedThisMonth": 0 }
            }),
        );
        let service = TenantService::new(api);

        service.delete("t1").await.unwrap();
        let stats = service.stats().await.unwrap();

        assert_eq!(stats.active, 6);
        assert_eq!(mock.count(HttpMethod::Delete, "/admin/tenants/t1"), 1);
    }
}
