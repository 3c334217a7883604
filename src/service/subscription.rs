use bizgrow_admin_shared::model::{
    Invoice, InvoiceFilters, InvoiceStatus, PaymentDetails, PlanDraft, SubscriptionPlan,
    SubscriptionStats,
};
use bizgrow_admin_shared::protocol::paths;
use bizgrow_admin_shared::{ExportFormat, Paged, Query, SortOrder};
use serde::Serialize;

use crate::api::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::service::export_query;

const PLANS_KEY: &str = "plans";
const INVOICES_KEY: &str = "invoices";

#[derive(Serialize)]
struct RefundRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

/// 套餐与发票
#[derive(Clone)]
pub struct SubscriptionService {
    api: ApiClient,
}

impl SubscriptionService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    // =========================================================
    // 套餐
    // =========================================================

    pub async fn list_plans(&self) -> Result<Vec<SubscriptionPlan>, ApiError> {
        let page = self
            .api
            .paged(ApiRequest::get(paths::PLANS), PLANS_KEY)
            .await?;
        Ok(page.items)
    }

    pub async fn get_plan(&self, id: &str) -> Result<SubscriptionPlan, ApiError> {
        self.api
            .data(ApiRequest::get(paths::member(paths::PLANS, id, None)))
            .await
    }

    pub async fn create_plan(&self, draft: &PlanDraft) -> Result<SubscriptionPlan, ApiError> {
        if draft.name.as_deref().is_none_or(str::is_empty) || draft.price.is_none() {
            return Err(ApiError::InvalidInput("a plan needs a name and a price".into()));
        }
        self.api.data(ApiRequest::post(paths::PLANS).json(draft)?).await
    }

    pub async fn update_plan(&self, id: &str, draft: &PlanDraft) -> Result<SubscriptionPlan, ApiError> {
        self.api
            .data(ApiRequest::put(paths::member(paths::PLANS, id, None)).json(draft)?)
            .await
    }

    pub async fn delete_plan(&self, id: &str) -> Result<(), ApiError> {
        self.api
            .execute(ApiRequest::delete(paths::member(paths::PLANS, id, None)))
            .await?;
        Ok(())
    }

    // =========================================================
    // 发票
    // =========================================================

    pub async fn list_invoices(&self, filters: &InvoiceFilters) -> Result<Paged<Invoice>, ApiError> {
        self.api
            .paged(ApiRequest::get(paths::INVOICES).query(filters), INVOICES_KEY)
            .await
    }

    pub async fn get_invoice(&self, id: &str) -> Result<Invoice, ApiError> {
        self.api
            .data(ApiRequest::get(paths::member(paths::INVOICES, id, None)))
            .await
    }

    /// 线下收款后手动标记为已付
    pub async fn mark_paid(&self, id: &str, payment: &PaymentDetails) -> Result<Invoice, ApiError> {
        self.api
            .data(ApiRequest::post(paths::member(paths::INVOICES, id, Some("paid"))).json(payment)?)
            .await
    }

    pub async fn refund(&self, id: &str, reason: Option<&str>) -> Result<Invoice, ApiError> {
        self.api
            .data(
                ApiRequest::post(paths::member(paths::INVOICES, id, Some("refund")))
                    .json(&RefundRequest { reason })?,
            )
            .await
    }

    /// 发送催款提醒，返回服务端消息
    pub async fn send_reminder(&self, id: &str) -> Result<Option<String>, ApiError> {
        self.api
            .execute(ApiRequest::post(paths::member(paths::INVOICES, id, Some("reminder"))))
            .await
    }

    pub async fn download_pdf(&self, id: &str) -> Result<Vec<u8>, ApiError> {
        self.api
            .bytes(ApiRequest::get(paths::member(paths::INVOICES, id, Some("pdf"))))
            .await
    }

    pub async fn stats(&self) -> Result<SubscriptionStats, ApiError> {
        self.api.data(ApiRequest::get(paths::SUBSCRIPTION_STATS)).await
    }

    /// 最近的已付发票（按 paidDate 倒序）
    pub async fn recent_payments(&self, limit: u32) -> Result<Vec<Invoice>, ApiError> {
        let query = Query::new()
            .push("status", InvoiceStatus::Paid)
            .push("sortBy", "paidDate")
            .push("sortOrder", SortOrder::Desc)
            .push("limit", limit);
        let page = self
            .api
            .paged(ApiRequest::get(paths::INVOICES).query(&query), INVOICES_KEY)
            .await?;
        Ok(page.items)
    }

    pub async fn export_invoices(
        &self,
        format: ExportFormat,
        filters: &InvoiceFilters,
    ) -> Result<Vec<u8>, ApiError> {
        let req = ApiRequest::get(paths::nested(paths::INVOICES, "export"))
            .query(&export_query(format))
            .query(filters);
        self.api.bytes(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use crate::service::testing::mock_api;
    use bizgrow_admin_shared::HttpMethod;
    use bizgrow_admin_shared::model::Limit;
    use serde_json::json;

    fn invoice(id: &str, status: &str) -> serde_json::Value {
        json!({ "id": id, "tenantId": "t1", "amount": 2999.0, "status": status, "invoiceNumber": "INV-2024-001" })
    }

    #[tokio::test]
    async fn test_list_plans_from_keyed_payload() {
        let (mock, api) = mock_api();
        mock.mock_response(
            HttpMethod::Get,
            paths::PLANS,
            200,
            json!({
                "success": true,
                "data": { "plans": [
                    { "_id": "basic", "name": "Basic", "price": 999, "features": { "users": 3, "whatsapp": 500 } },
                    { "_id": "ent", "name": "Enterprise", "price": 9999, "features": { "users": "unlimited" } }
                ] }
            }),
        );

        let plans = SubscriptionService::new(api).list_plans().await.unwrap();

        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].id, "basic");
        let basic = plans[0].features.as_ref().unwrap();
        assert_eq!(basic.messages, Some(Limit::Count(500)));
        assert_eq!(plans[1].features.as_ref().unwrap().users, Some(Limit::Unlimited));
    }

    #[tokio::test]
    async fn test_create_plan_requires_name_and_price() {
        let (mock, api) = mock_api();

        let err = SubscriptionService::new(api)
            .create_plan(&PlanDraft {
                name: Some("Starter".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err.class(), ErrorClass::Rejected);
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_update_plan_sends_only_set_fields() {
        let (mock, api) = mock_api();
        mock.mock_response(
            HttpMethod::Put,
            "/admin/plans/pro",
            200,
            json!({ "success": true, "data": { "id": "pro", "name": "Pro", "price": 2499 } }),
        );

        let plan = SubscriptionService::new(api)
            .update_plan(
                "pro",
                &PlanDraft {
                    price: Some(2499.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(plan.price, 2499.0);
        assert_eq!(mock.requests()[0].json_body(), Some(json!({ "price": 2499.0 })));
    }

    #[tokio::test]
    async fn test_mark_paid_and_refund() {
        let (mock, api) = mock_api();
        mock.mock_response(
            HttpMethod::Post,
            "/admin/invoices/i1/paid",
            200,
            json!({ "success": true, "data": invoice("i1", "paid") }),
        );
        mock.mock_response(
            HttpMethod::Post,
            "/admin/invoices/i1/refund",
            200,
            json!({ "success": true, "data": invoice("i1", "refunded") }),
        );
        let service = SubscriptionService::new(api);

        let paid = service
            .mark_paid(
                "i1",
                &PaymentDetails {
                    method: "upi".into(),
                    transaction_id: Some("txn-42".into()),
                },
            )
            .await
            .unwrap();
        let refunded = service.refund("i1", Some("duplicate charge")).await.unwrap();

        assert_eq!(paid.status, InvoiceStatus::Paid);
        assert_eq!(refunded.status, InvoiceStatus::Refunded);
        let reqs = mock.requests();
        assert_eq!(reqs[0].json_body(), Some(json!({ "method": "upi", "transactionId": "txn-42" })));
        assert_eq!(reqs[1].json_body(), Some(json!({ "reason": "duplicate charge" })));
    }

    #[tokio::test]
    async fn test_recent_payments_query() {
        let (mock, api) = mock_api();
        mock.mock_response(
            HttpMethod::Get,
            paths::INVOICES,
            200,
            json!({ "success": true, "data": [invoice("i1", "paid")] }),
        );

        let recent = SubscriptionService::new(api).recent_payments(3).await.unwrap();

        assert_eq!(recent.len(), 1);
        assert_eq!(
            mock.requests()[0].query(),
            Some("status=paid&sortBy=paidDate&sortOrder=desc&limit=3")
        );
    }

    #[tokio::test]
    async fn test_export_invoices_puts_format_first() {
        let (mock, api) = mock_api();
        mock.mock_raw(HttpMethod::Get, "/admin/invoices/export", 200, b"%PDF".to_vec());

        let filters = InvoiceFilters {
            status: Some(InvoiceStatus::Overdue),
            ..Default::default()
        };
        let bytes = SubscriptionService::new(api)
            .export_invoices(ExportFormat::Xlsx, &filters)
            .await
            .unwrap();

        assert_eq!(bytes, b"%PDF");
        assert_eq!(mock.requests()[0].query(), Some("format=xlsx&status=overdue"));
    }

    #[tokio::test]
    async fn test_send_reminder_returns_message() {
        let (mock, api) = mock_api();
        mock.mock_response(
            HttpMethod::Post,
            "/admin/invoices/i1/reminder",
            200,
            json!({ "success": true, "message": "Reminder sent" }),
        );

        let message = SubscriptionService::new(api).send_reminder("i1").await.unwrap();

        assert_eq!(message.as_deref(), Some("Reminder sent"));
    }
}
