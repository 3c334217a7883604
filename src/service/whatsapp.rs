use bizgrow_admin_shared::chrono::NaiveDate;
use bizgrow_admin_shared::model::{
    DateRange, HourlyMessageData, ProviderTestResult, ProviderUpdate, TemplateFilters,
    TemplateRejection, TenantQuota, WhatsAppAnalytics, WhatsAppProvider, WhatsAppStats,
    WhatsAppTemplate,
};
use bizgrow_admin_shared::protocol::paths;
use bizgrow_admin_shared::Query;

use crate::api::{ApiClient, ApiRequest};
use crate::error::ApiError;

const TEMPLATES: &str = "/admin/whatsapp/templates";
const PROVIDERS: &str = "/admin/whatsapp/providers";

/// WhatsApp 消息统计、模板审核与服务商管理
#[derive(Clone)]
pub struct WhatsAppService {
    api: ApiClient,
}

impl WhatsAppService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn stats(&self, range: &DateRange) -> Result<WhatsAppStats, ApiError> {
        self.api
            .data(ApiRequest::get(paths::nested(paths::WHATSAPP, "stats")).query(range))
            .await
    }

    /// 按小时的发送量；不传日期时由服务端取当天
    pub async fn hourly(&self, date: Option<NaiveDate>) -> Result<Vec<HourlyMessageData>, ApiError> {
        let query = Query::new().param("date", date);
        self.api
            .data(ApiRequest::get(paths::nested(paths::WHATSAPP, "hourly")).query(&query))
            .await
    }

    pub async fn quotas(&self) -> Result<Vec<TenantQuota>, ApiError> {
        let page = self
            .api
            .paged(ApiRequest::get(paths::nested(paths::WHATSAPP, "quotas")), "quotas")
            .await?;
        Ok(page.items)
    }

    pub async fn analytics(&self, range: &DateRange) -> Result<WhatsAppAnalytics, ApiError> {
        self.api
            .data(ApiRequest::get(paths::nested(paths::WHATSAPP, "analytics")).query(range))
            .await
    }

    // --- 模板 ---

    pub async fn templates(&self, filters: &TemplateFilters) -> Result<Vec<WhatsAppTemplate>, ApiError> {
        let page = self
            .api
            .paged(ApiRequest::get(TEMPLATES).query(filters), "templates")
            .await?;
        Ok(page.items)
    }

    pub async fn template(&self, id: &str) -> Result<WhatsAppTemplate, ApiError> {
        self.api
            .data(ApiRequest::get(paths::member(TEMPLATES, id, None)))
            .await
    }

    pub async fn approve_template(&self, id: &str) -> Result<WhatsAppTemplate, ApiError> {
        self.api
            .data(ApiRequest::post(paths::member(TEMPLATES, id, Some("approve"))))
            .await
    }

    pub async fn reject_template(&self, id: &str, reason: Option<&str>) -> Result<WhatsAppTemplate, ApiError> {
        let body = TemplateRejection {
            reason: reason.map(str::to_string),
        };
        self.api
            .data(ApiRequest::post(paths::member(TEMPLATES, id, Some("reject"))).json(&body)?)
            .await
    }

    // --- 服务商 ---

    pub async fn providers(&self) -> Result<Vec<WhatsAppProvider>, ApiError> {
        let page = self
            .api
            .paged(Self::providers_request(), "providers")
            .await?;
        Ok(page.items)
    }

    /// 服务商列表请求，hooks 以它的 target 作为缓存 key
    pub fn providers_request() -> ApiRequest {
        ApiRequest::get(PROVIDERS)
    }

    pub async fn update_provider(&self, id: &str, update: &ProviderUpdate) -> Result<WhatsAppProvider, ApiError> {
        self.api
            .data(ApiRequest::put(paths::member(PROVIDERS, id, None)).json(update)?)
            .await
    }

    pub async fn set_default_provider(&self, id: &str) -> Result<WhatsAppProvider, ApiError> {
        tracing::info!(provider = id, "switching default WhatsApp provider");
        self.api
            .data(ApiRequest::post(paths::member(PROVIDERS, id, Some("default"))))
            .await
    }

    pub async fn test_provider(&self, id: &str) -> Result<ProviderTestResult, ApiError> {
        self.api
            .data(ApiRequest::post(paths::member(PROVIDERS, id, Some("test"))))
            .await
    }

    /// 让服务端重新汇总消息统计
    pub async fn refresh_stats(&self) -> Result<Option<String>, ApiError> {
        self.api
            .execute(ApiRequest::post(paths::nested(paths::WHATSAPP, "refresh")))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::mock_api;
    use bizgrow_admin_shared::HttpMethod;
    use bizgrow_admin_shared::model::{ProviderKind, TemplateCategory, TemplateStatus};
    use serde_json::json;

    #[tokio::test]
    async fn test_stats_with_date_range() {
        let (mock, api) = mock_api();
        mock.mock_response(
            HttpMethod::Get,
            "/admin/whatsapp/stats",
            200,
            json!({ "success": true, "data": { "sent": 1200, "delivered": 1150, "read": 900, "failed": 50, "deliveryRate": 95.8 } }),
        );

        let range = DateRange {
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 31),
        };
        let stats = WhatsAppService::new(api).stats(&range).await.unwrap();

        assert_eq!(stats.delivered, 1150);
        assert_eq!(stats.read_rate, 0.0);
        assert_eq!(
            mock.requests()[0].query(),
            Some("startDate=2025-01-01&endDate=2025-01-31")
        );
    }

    #[tokio::test]
    async fn test_hourly_without_date_has_no_query() {
        let (mock, api) = mock_api();
        mock.mock_response(
            HttpMethod::Get,
            "/admin/whatsapp/hourly",
            200,
            json!({ "success": true, "data": [{ "hour": "09:00", "sent": 40, "delivered": 39 }] }),
        );

        let hourly = WhatsAppService::new(api).hourly(None).await.unwrap();

        assert_eq!(hourly[0].sent, 40);
        assert_eq!(mock.requests()[0].query(), None);
    }

    #[tokio::test]
    async fn test_template_review() {
        let (mock, api) = mock_api();
        let template = |status: &str| {
            json!({ "id": "tpl1", "name": "order_confirmed", "category": "Transactional", "status": status })
        };
        mock.mock_response(HttpMethod::Get, TEMPLATES, 200, json!({ "success": true, "data": { "templates": [template("pending")] } }));
        mock.mock_response(
            HttpMethod::Post,
            "/admin/whatsapp/templates/tpl1/reject",
            200,
            json!({ "success": true, "data": template("rejected") }),
        );
        let service = WhatsAppService::new(api);

        let filters = TemplateFilters {
            category: Some(TemplateCategory::Otp),
            status: Some(TemplateStatus::Pending),
            search: Some(String::new()),
        };
        let pending = service.templates(&filters).await.unwrap();
        let rejected = service.reject_template("tpl1", Some("promotional content")).await.unwrap();

        assert_eq!(pending.len(), 1);
        assert_eq!(rejected.status, TemplateStatus::Rejected);
        let reqs = mock.requests();
        assert_eq!(reqs[0].query(), Some("category=OTP&status=pending"));
        assert_eq!(reqs[1].json_body(), Some(json!({ "reason": "promotional content" })));
    }

    #[tokio::test]
    async fn test_providers_and_test_connection() {
        let (mock, api) = mock_api();
        mock.mock_response(
            HttpMethod::Get,
            PROVIDERS,
            200,
            json!({ "success": true, "data": [
                { "id": "p1", "name": "Gupshup", "provider": "gupshup", "status": "operational", "isDefault": true },
                { "id": "p2", "name": "Twilio", "provider": "twilio", "status": "standby" }
            ] }),
        );
        mock.mock_response(
            HttpMethod::Post,
            "/admin/whatsapp/providers/p2/test",
            200,
            json!({ "success": true, "data": { "success": true, "latency": 182.0, "message": "Connection OK" } }),
        );
        let service = WhatsAppService::new(api);

        let providers = service.providers().await.unwrap();
        let result = service.test_provider("p2").await.unwrap();

        assert_eq!(providers[1].provider, ProviderKind::Twilio);
        assert!(providers[0].is_default);
        assert!(result.success);
        assert_eq!(result.message, "Connection OK");
    }
}
