//! BizGrow360 超级管理后台的数据访问层
//!
//! - `api`: 带 bearer 注入与 401 刷新重试的 REST 客户端
//! - `service`: 按业务领域划分的类型化接口
//! - `session` / `storage`: token 持久化与登录状态广播
//!
//! 领域模型与接口路径位于 `bizgrow-admin-shared`。

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod request;
pub mod service;
pub mod session;
pub mod storage;

pub use api::{ApiClient, ApiRequest};
pub use config::ClientConfig;
pub use error::{ApiError, ErrorClass, OrEmpty, error_message, message_from_any};
pub use request::{FilePart, HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use service::AdminServices;
pub use session::Session;
pub use storage::{FileStorage, MemoryStorage, TokenStore};

pub use bizgrow_admin_shared as shared;

#[cfg(any(test, feature = "mock"))]
pub use request::{MockHttpClient, RecordedRequest};

/// 按配置组装全部服务
///
/// 读取配置 → 初始化日志 → 建立客户端。日志只会初始化一次，重复调用不会报错。
pub fn connect(config: &ClientConfig) -> Result<AdminServices, ApiError> {
    logging::init_tracing(&config.logging);
    let api = ApiClient::from_config(config)?;
    tracing::info!(base_url = api.base_url(), "admin client ready");
    Ok(AdminServices::new(api))
}
