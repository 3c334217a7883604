use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

use bizgrow_admin_shared::HttpMethod;

use crate::config::ApiConfig;
use crate::error::TransportError;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 上传的单个文件
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    /// multipart 字段名
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(String),
    Multipart(Vec<FilePart>),
}

// 增加 Clone 以支持 401 后重放
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(body.to_string()));
        self.with_header("Content-Type", "application/json")
    }

    pub fn with_file(mut self, part: FilePart) -> Self {
        match &mut self.body {
            Some(RequestBody::Multipart(parts)) => parts.push(part),
            _ => self.body = Some(RequestBody::Multipart(vec![part])),
        }
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// HTTP 客户端特性 (Trait)
///
/// 客户端运行在 tokio 上并通过 `Arc` 在多个任务间共享，因此要求 `Send + Sync`。
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// =========================================================
// 实现层: reqwest 客户端 (Production)
// =========================================================

#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestHttpClient {
    pub fn new(config: &ApiConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        Ok(Self {
            client,
            timeout: config.timeout(),
        })
    }

    fn map_error(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if e.is_builder() {
            TransportError::Build(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

fn multipart_form(parts: Vec<FilePart>) -> Result<reqwest::multipart::Form, TransportError> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        let file = reqwest::multipart::Part::bytes(part.bytes)
            .file_name(part.file_name)
            .mime_str(&part.mime)
            .map_err(|e| TransportError::Build(e.to_string()))?;
        form = form.part(part.field, file);
    }
    Ok(form)
}

#[async_trait::async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
        };

        let mut builder = self.client.request(method, &req.url);

        for (k, v) in &req.headers {
            // multipart 的 Content-Type 需要带 boundary，交给 reqwest 生成
            if matches!(req.body, Some(RequestBody::Multipart(_)))
                && k.eq_ignore_ascii_case("Content-Type")
            {
                continue;
            }
            builder = builder.header(k, v);
        }

        builder = match req.body {
            Some(RequestBody::Json(body)) => builder.body(body),
            Some(RequestBody::Multipart(parts)) => builder.multipart(multipart_form(parts)?),
            None => builder,
        };

        let resp = builder.send().await.map_err(|e| self.map_error(e))?;

        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(|e| self.map_error(e))?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockHttpClient, RecordedRequest};

#[cfg(any(test, feature = "mock"))]
mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Mutex, MutexGuard};

    /// 已发出的请求
    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub method: HttpMethod,
        pub url: String,
        pub headers: HashMap<String, String>,
        pub body: Option<RequestBody>,
    }

    impl RecordedRequest {
        /// 去掉 scheme、host 与查询串后的路径
        pub fn path(&self) -> String {
            route_of(&self.url)
        }

        pub fn query(&self) -> Option<&str> {
            self.url.split_once('?').map(|(_, q)| q)
        }

        pub fn header(&self, key: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v.as_str())
        }

        pub fn json_body(&self) -> Option<serde_json::Value> {
            match &self.body {
                Some(RequestBody::Json(s)) => serde_json::from_str(s).ok(),
                _ => None,
            }
        }
    }

    fn route_of(url: &str) -> String {
        let without_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
        let path = match without_scheme.find('/') {
            Some(i) => &without_scheme[i..],
            None => "/",
        };
        path.split('?').next().unwrap_or(path).to_string()
    }

    fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
        m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 按 (method, path) 排队返回预设响应
    ///
    /// 同一路由预设多条时依次返回，最后一条会被重复使用。
    /// 未预设的路由返回 404。
    #[derive(Default)]
    pub struct MockHttpClient {
        responses: Mutex<HashMap<(HttpMethod, String), VecDeque<(u16, Vec<u8>)>>>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn mock_response(
            &self,
            method: HttpMethod,
            path: &str,
            status: u16,
            body: serde_json::Value,
        ) {
            self.mock_raw(method, path, status, body.to_string().into_bytes());
        }

        pub fn mock_raw(&self, method: HttpMethod, path: &str, status: u16, body: Vec<u8>) {
            lock(&self.responses)
                .entry((method, path.to_string()))
                .or_default()
                .push_back((status, body));
        }

        /// 清除某个路由已排队的响应
        pub fn reset(&self, method: HttpMethod, path: &str) {
            lock(&self.responses).remove(&(method, path.to_string()));
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            lock(&self.requests).clone()
        }

        pub fn count(&self, method: HttpMethod, path: &str) -> usize {
            lock(&self.requests)
                .iter()
                .filter(|r| r.method == method && r.path() == path)
                .count()
        }
    }

    #[async_trait::async_trait]
    impl HttpClient for MockHttpClient {
        async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
            lock(&self.requests).push(RecordedRequest {
                method: req.method,
                url: req.url.clone(),
                headers: req.headers.clone(),
                body: req.body.clone(),
            });

            // 让出执行权，使并发请求真正交错
            tokio::task::yield_now().await;

            let key = (req.method, route_of(&req.url));
            let mut responses = lock(&self.responses);
            let reply = match responses.get_mut(&key) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            };

            Ok(match reply {
                Some((status, body)) => HttpResponse { status, body },
                None => HttpResponse {
                    status: 404,
                    body: br#"{"success":false,"message":"Not Found"}"#.to_vec(),
                },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_queue_then_repeat_last() {
        let client = MockHttpClient::new();
        client.mock_response(HttpMethod::Get, "/admin/plans", 500, json!({}));
        client.mock_response(HttpMethod::Get, "/admin/plans", 200, json!({ "success": true }));

        let url = "http://mock.local/admin/plans?page=1";
        let first = client.send(HttpRequest::new(url, HttpMethod::Get)).await.unwrap();
        let second = client.send(HttpRequest::new(url, HttpMethod::Get)).await.unwrap();
        let third = client.send(HttpRequest::new(url, HttpMethod::Get)).await.unwrap();

        assert_eq!(first.status, 500);
        assert_eq!(second.status, 200);
        assert_eq!(third.status, 200);

        let reqs = client.requests();
        assert_eq!(reqs.len(), 3);
        assert_eq!(reqs[0].path(), "/admin/plans");
        assert_eq!(reqs[0].query(), Some("page=1"));
    }

    #[tokio::test]
    async fn test_mock_unknown_route_is_404() {
        let client = MockHttpClient::new();
        let resp = client
            .send(HttpRequest::new("http://mock.local/nope", HttpMethod::Delete))
            .await
            .unwrap();
        assert_eq!(resp.status, 404);
        assert!(!resp.is_success());
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let req = HttpRequest::new("http://mock.local/auth/login", HttpMethod::Post)
            .with_body(json!({ "phone": "9" }));
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert!(matches!(req.body, Some(RequestBody::Json(_))));
    }
}
