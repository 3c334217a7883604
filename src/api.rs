//! REST API 客户端
//!
//! - 注入 `Authorization: Bearer <token>` 与 `X-Request-Id`
//! - 401 时用 refresh token 换取新 token 并重放原请求一次
//! - 解包 `{success, message, data, pagination}` 信封

use std::sync::Arc;

use bizgrow_admin_shared::model::{AuthTokens, RefreshRequest};
use bizgrow_admin_shared::protocol::paths;
use bizgrow_admin_shared::{
    Envelope, HEADER_AUTHORIZATION, HEADER_REQUEST_ID, HttpMethod, Paged, Query, ToQuery,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ApiError, FALLBACK_MESSAGE};
use crate::request::{FilePart, HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient, RequestBody};
use crate::session::Session;
use crate::storage::{FileStorage, MemoryStorage, TokenStore};


// =========================================================
// 请求描述
// =========================================================

/// 一次逻辑请求：方法、相对路径、查询参数与请求体
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Query,
    pub body: Option<RequestBody>,
    /// 指定 bearer，覆盖会话中的 token
    bearer: Option<String>,
    refresh_on_401: bool,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Query::new(),
            body: None,
            bearer: None,
            refresh_on_401: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// 追加查询参数
    pub fn query(mut self, filters: &impl ToQuery) -> Self {
        self.query = self.query.extend(filters.to_query());
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(RequestBody::Json(serde_json::to_string(body)?));
        Ok(self)
    }

    pub fn file(mut self, part: FilePart) -> Self {
        match &mut self.body {
            Some(RequestBody::Multipart(parts)) => parts.push(part),
            _ => self.body = Some(RequestBody::Multipart(vec![part])),
        }
        self
    }

    /// 凭据类接口（登录、刷新）返回 401 表示凭据错误，不触发 token 刷新
    pub fn without_refresh(mut self) -> Self {
        self.refresh_on_401 = false;
        self
    }

    /// 使用给定 token 而不是会话中的 token；这类请求不参与刷新
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self.refresh_on_401 = false;
        self
    }

    /// 带查询串的相对路径，也是 hooks 的缓存 key
    pub fn target(&self) -> String {
        self.query.with_path(&self.path)
    }
}

// =========================================================
// 客户端
// =========================================================

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(base_url: &str, http: Arc<dyn HttpClient>, session: Arc<Session>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            session,
        }
    }

    /// 按配置组装：reqwest 传输层 + 文件或内存 token 存储
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let store: Arc<dyn TokenStore> = match &config.storage.path {
            Some(path) => Arc::new(FileStorage::open(path)?),
            None => Arc::new(MemoryStorage::new()),
        };
        let http = ReqwestHttpClient::new(&config.api)?;
        Ok(Self::new(
            &config.api.base_url,
            Arc::new(http),
            Arc::new(Session::new(store)),
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn build(&self, req: &ApiRequest, url: &str, request_id: &str, token: Option<&str>) -> HttpRequest {
        let mut http_req = HttpRequest::new(url, req.method).with_header(HEADER_REQUEST_ID, request_id);
        if let Some(token) = token {
            http_req = http_req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }
        if let Some(RequestBody::Json(_)) = &req.body {
            http_req = http_req.with_header("Content-Type", "application/json");
        }
        http_req.body = req.body.clone();
        http_req
    }

    // =========================================================
    // 核心发送逻辑
    // =========================================================

    /// 发送请求并返回 2xx 响应
    ///
    /// 非 2xx 一律转为 `ApiError::Status`；401 最多刷新并重放一次。
    pub async fn send(&self, req: ApiRequest) -> Result<HttpResponse, ApiError> {
        let request_id = Uuid::new_v4().to_string();
        let url = self.url(&req.target());
        let span = tracing::debug_span!(
            "api.request",
            method = %req.method,
            path = %req.path,
            request_id = %request_id,
        );

        async {
            let mut retried = false;
            loop {
                let token = req.bearer.clone().or_else(|| self.session.access_token());
                let http_req = self.build(&req, &url, &request_id, token.as_deref());
                let resp = self.http.send(http_req).await.inspect_err(|e| {
                    tracing::warn!(error = %e, "transport failure");
                })?;
                tracing::debug!(status = resp.status, retried, "response received");

                if resp.status == 401 && req.refresh_on_401 && !retried {
                    retried = true;
                    self.refresh_after_unauthorized(token.as_deref()).await?;
                    continue;
                }

                if !resp.is_success() {
                    return Err(ApiError::from_status(resp.status, &resp.body));
                }
                return Ok(resp);
            }
        }
        .instrument(span)
        .await
    }

    /// 401 后的刷新流程
    ///
    /// 持有刷新锁期间若发现 token 已被其它请求更新，直接复用新 token。
    async fn refresh_after_unauthorized(&self, stale: Option<&str>) -> Result<(), ApiError> {
        let _guard = self.session.lock_refresh().await;

        if let Some(current) = self.session.access_token() {
            if stale != Some(current.as_str()) {
                tracing::debug!("access token already refreshed, reusing it");
                return Ok(());
            }
        }

        let Some(refresh_token) = self.session.refresh_token() else {
            tracing::warn!("received 401 without a refresh token");
            self.session.clear();
            return Err(ApiError::SessionExpired);
        };

        match self.call_refresh(&refresh_token).await {
            Ok(tokens) => self.store_refreshed(&tokens),
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed");
                self.session.clear();
                Err(ApiError::SessionExpired)
            }
        }
    }

    /// 直接调用 `POST /auth/refresh`，不带 bearer、不做重试
    async fn call_refresh(&self, refresh_token: &str) -> Result<AuthTokens, ApiError> {
        tracing::info!("refreshing access token");
        let body = serde_json::to_value(RefreshRequest {
            refresh_token: refresh_token.to_string(),
        })?;
        let http_req = HttpRequest::new(&self.url(paths::AUTH_REFRESH), HttpMethod::Post)
            .with_header(HEADER_REQUEST_ID, &Uuid::new_v4().to_string())
            .with_body(body);

        let resp = self.http.send(http_req).await?;
        if !resp.is_success() {
            return Err(ApiError::from_status(resp.status, &resp.body));
        }

        let env: Envelope<AuthTokens> = resp.json()?;
        if !env.success {
            return Err(rejected(env.message));
        }
        let tokens = env
            .data
            .ok_or_else(|| ApiError::MissingData(paths::AUTH_REFRESH.to_string()))?;
        if tokens.access().is_none() {
            return Err(ApiError::MissingData(paths::AUTH_REFRESH.to_string()));
        }
        Ok(tokens)
    }

    fn store_refreshed(&self, tokens: &AuthTokens) -> Result<(), ApiError> {
        let access = tokens
            .access()
            .ok_or_else(|| ApiError::MissingData(paths::AUTH_REFRESH.to_string()))?;
        self.session
            .update_tokens(access, tokens.refresh_token.as_deref())?;
        Ok(())
    }

    /// 主动刷新 token（与 401 流程共用刷新锁）
    pub async fn refresh(&self) -> Result<AuthTokens, ApiError> {
        let _guard = self.session.lock_refresh().await;
        let refresh_token = self.session.refresh_token().ok_or(ApiError::SessionExpired)?;
        let tokens = self.call_refresh(&refresh_token).await?;
        self.store_refreshed(&tokens)?;
        Ok(tokens)
    }

    // =========================================================
    // 响应解包
    // =========================================================

    pub async fn envelope<T: DeserializeOwned>(&self, req: ApiRequest) -> Result<Envelope<T>, ApiError> {
        let resp = self.send(req).await?;
        let env: Envelope<T> = resp.json()?;
        if !env.success {
            return Err(rejected(env.message));
        }
        Ok(env)
    }

    /// 解包并要求 data 存在
    pub async fn data<T: DeserializeOwned>(&self, req: ApiRequest) -> Result<T, ApiError> {
        let path = req.path.clone();
        self.envelope::<T>(req)
            .await?
            .data
            .ok_or(ApiError::MissingData(path))
    }

    /// 列表接口：兼容裸数组与 `{<key>: [...], pagination}` 两种形态
    pub async fn paged<T: DeserializeOwned>(&self, req: ApiRequest, key: &str) -> Result<Paged<T>, ApiError> {
        let env = self.envelope::<serde_json::Value>(req).await?;
        Ok(Paged::from_payload(env.data, env.pagination, key)?)
    }

    /// 只关心是否成功，返回服务端消息（若有）
    pub async fn execute(&self, req: ApiRequest) -> Result<Option<String>, ApiError> {
        Ok(self.envelope::<serde_json::Value>(req).await?.message)
    }

    /// 二进制下载（导出文件、发票 PDF）
    pub async fn bytes(&self, req: ApiRequest) -> Result<Vec<u8>, ApiError> {
        Ok(self.send(req).await?.body)
    }
}

fn rejected(message: Option<String>) -> ApiError {
    ApiError::Rejected(
        message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
    )
}
