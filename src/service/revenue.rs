use bizgrow_admin_shared::model::{
    MonthlyRevenue, MrrMetrics, OverviewData, RevenueAnalytics, RevenueBreakdown, RevenueByPlan,
    RevenueFilters, RevenueSeries, TenantGrowth, TopTenant,
};
use bizgrow_admin_shared::protocol::paths;
use bizgrow_admin_shared::{ExportFormat, Query};

use crate::api::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::service::export_query;

pub const DEFAULT_TOP_TENANTS: u32 = 5;

/// 营收报表与仪表盘统计
#[derive(Clone)]
pub struct RevenueService {
    api: ApiClient,
}

impl RevenueService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn revenue_path(segment: &str) -> String {
        paths::nested(paths::ANALYTICS_REVENUE, segment)
    }

    /// 汇总报表（概览、月度、套餐占比、头部租户、分类）
    pub async fn analytics(&self, filters: &RevenueFilters) -> Result<RevenueAnalytics, ApiError> {
        self.api
            .data(ApiRequest::get(paths::ANALYTICS_REVENUE).query(filters))
            .await
    }

    pub async fn monthly(&self, filters: &RevenueFilters) -> Result<Vec<MonthlyRevenue>, ApiError> {
        self.api
            .data(ApiRequest::get(Self::revenue_path("monthly")).query(filters))
            .await
    }

    pub async fn by_plan(&self, filters: &RevenueFilters) -> Result<Vec<RevenueByPlan>, ApiError> {
        self.api
            .data(ApiRequest::get(Self::revenue_path("by-plan")).query(filters))
            .await
    }

    /// `limit` 缺省为 5
    pub async fn top_tenants(
        &self,
        limit: Option<u32>,
        filters: &RevenueFilters,
    ) -> Result<Vec<TopTenant>, ApiError> {
        let query = Query::new().push("limit", limit.unwrap_or(DEFAULT_TOP_TENANTS));
        self.api
            .data(
                ApiRequest::get(Self::revenue_path("top-tenants"))
                    .query(&query)
                    .query(filters),
            )
            .await
    }

    pub async fn breakdown(&self, filters: &RevenueFilters) -> Result<Vec<RevenueBreakdown>, ApiError> {
        self.api
            .data(ApiRequest::get(Self::revenue_path("breakdown")).query(filters))
            .await
    }

    pub async fn mrr(&self) -> Result<MrrMetrics, ApiError> {
        self.api.data(ApiRequest::get(Self::revenue_path("mrr"))).await
    }

    pub async fn export_report(
        &self,
        format: ExportFormat,
        filters: &RevenueFilters,
    ) -> Result<Vec<u8>, ApiError> {
        self.api
            .bytes(
                ApiRequest::get(Self::revenue_path("export"))
                    .query(&export_query(format))
                    .query(filters),
            )
            .await
    }

    // =========================================================
    // 仪表盘
    // =========================================================

    pub async fn overview(&self) -> Result<OverviewData, ApiError> {
        self.api.data(ApiRequest::get(paths::ANALYTICS_OVERVIEW)).await
    }

    /// 最近 `months` 个月的营收曲线
    pub async fn revenue_series(&self, months: u32) -> Result<RevenueSeries, ApiError> {
        self.api.data(Self::series_request(paths::ANALYTICS_REVENUE, months)).await
    }

    /// 最近 `months` 个月的新增 / 流失租户
    pub async fn tenant_growth(&self, months: u32) -> Result<TenantGrowth, ApiError> {
        self.api
            .data(Self::series_request(paths::ANALYTICS_TENANT_GROWTH, months))
            .await
    }

    /// 曲线类请求，也供 hooks 生成缓存 key
    pub fn series_request(path: &str, months: u32) -> ApiRequest {
        ApiRequest::get(path).query(&Query::new().push("months", months))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::mock_api;
    use bizgrow_admin_shared::HttpMethod;
    use bizgrow_admin_shared::model::TimeRange;
    use serde_json::json;

    #[tokio::test]
    async fn test_top_tenants_defaults_to_five() {
        let (mock, api) = mock_api();
        mock.mock_response(
            HttpMethod::Get,
            "/admin/analytics/revenue/top-tenants",
            200,
            json!({ "success": true, "data": [
                { "id": "t1", "name": "Acme", "plan": "Pro", "revenue": 48000.0, "growth": 12.5 }
            ] }),
        );

        let filters = RevenueFilters {
            time_range: Some(TimeRange::LastYear),
            ..Default::default()
        };
        let top = RevenueService::new(api).top_tenants(None, &filters).await.unwrap();

        assert_eq!(top[0].name, "Acme");
        assert_eq!(mock.requests()[0].query(), Some("limit=5&timeRange=1year"));
    }

    #[tokio::test]
    async fn test_revenue_series_by_months() {
        let (mock, api) = mock_api();
        mock.mock_response(
            HttpMethod::Get,
            paths::ANALYTICS_REVENUE,
            200,
            json!({ "success": true, "data": {
                "revenueData": [
                    { "month": "Jan", "year": 2025, "revenue": 1000.0, "tenants": 10 },
                    { "month": "Feb", "year": 2025, "revenue": 1500.0, "tenants": 12 }
                ],
                "summary": { "totalRevenue": 2500.0, "averageMonthly": 1250.0, "currentTenants": 12 }
            } }),
        );

        let series = RevenueService::new(api).revenue_series(6).await.unwrap();

        assert_eq!(series.revenue_data.len(), 2);
        assert_eq!(series.summary.unwrap().current_tenants, 12);
        assert_eq!(mock.requests()[0].query(), Some("months=6"));
    }

    #[tokio::test]
    async fn test_tenant_growth_and_overview() {
        let (mock, api) = mock_api();
        mock.mock_response(
            HttpMethod::Get,
            paths::ANALYTICS_TENANT_GROWTH,
            200,
            json!({ "success": true, "data": { "growthData": [{ "month": "Mar", "year": 2025, "new": 4, "churned": 1 }] } }),
        );
        mock.mock_response(
            HttpMethod::Get,
            paths::ANALYTICS_OVERVIEW,
            200,
            json!({ "success": true, "data": { "totalTenants": 42, "activeTenants": 30, "deliveryRate": 97.5 } }),
        );
        let service = RevenueService::new(api);

        let growth = service.tenant_growth(12).await.unwrap();
        let overview = service.overview().await.unwrap();

        assert_eq!(growth.growth_data[0].new, 4);
        assert!(growth.summary.is_none());
        assert_eq!(overview.total_tenants, 42);
        assert_eq!(overview.trial_tenants, 0);
    }

    #[tokio::test]
    async fn test_mrr() {
        let (mock, api) = mock_api();
        mock.mock_response(
            HttpMethod::Get,
            "/admin/analytics/revenue/mrr",
            200,
            json!({ "success": true, "data": { "currentMRR": 52000.0, "arr": 624000.0 } }),
        );

        let mrr = RevenueService::new(api).mrr().await.unwrap();

        assert_eq!(mrr.current_mrr, 52000.0);
        assert_eq!(mrr.arr, 624000.0);
    }
}
