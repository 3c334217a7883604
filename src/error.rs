//! 客户端错误类型
//!
//! 所有服务调用都返回 `Result<T, ApiError>`。
//! UI 层通过 [`error_message`] 或 [`message_from_any`] 取得可展示的文字。

use std::any::Any;
use std::error::Error as StdError;
use std::time::Duration;

use bizgrow_admin_shared::ErrorBody;
use thiserror::Error;

/// 无法提取任何可读消息时的兜底文案
pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred";

// =========================================================
// 错误分类
// =========================================================

/// 错误的处理语义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// 401 且无法刷新：会话已被清除，需要重新登录
    Authentication,
    /// 其它 4xx 或 `success: false`：把服务端消息展示给用户
    Rejected,
    /// 404：列表类读取视为空状态
    NotFound,
    /// 网络、超时、5xx、响应解析失败
    Transport,
}

impl ErrorClass {
    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorClass::Authentication => "SESSION_EXPIRED",
            ErrorClass::Rejected => "REQUEST_REJECTED",
            ErrorClass::NotFound => "RESOURCE_NOT_FOUND",
            ErrorClass::Transport => "TRANSPORT_ERROR",
        }
    }
}

// =========================================================
// 传输层错误
// =========================================================

#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("invalid request: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Other(String),
}

// =========================================================
// 存储错误
// =========================================================

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("token store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("token store is corrupted: {0}")]
    Corrupted(#[from] serde_json::Error),
}

// =========================================================
// 核心错误类型
// =========================================================

#[derive(Debug, Error)]
pub enum ApiError {
    /// 非 2xx 响应
    #[error("{}", status_display(.status, .message))]
    Status {
        status: u16,
        /// 服务端返回的 `message`
        message: Option<String>,
        /// 字段级校验错误
        errors: Option<std::collections::HashMap<String, Vec<String>>>,
    },

    /// 2xx 但信封为 `success: false`
    #[error("{0}")]
    Rejected(String),

    /// 401 后刷新失败或没有 refresh token，本地会话已清除
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// 响应成功但缺少必需的 data
    #[error("response from {0} carried no data")]
    MissingData(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// 调用方输入无法组装成请求（如上传文件读取失败）
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

fn status_display(status: &u16, message: &Option<String>) -> String {
    match message.as_deref() {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => format!("Request failed with status code {}", status),
    }
}

impl ApiError {
    /// 由非 2xx 响应构造，尽量解析出服务端的错误体
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let parsed = serde_json::from_slice::<ErrorBody>(body).ok();
        let (message, errors) = match parsed {
            Some(b) => (b.message, b.errors),
            None => (None, None),
        };
        ApiError::Status {
            status,
            message,
            errors,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::SessionExpired => Some(401),
            _ => None,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            ApiError::SessionExpired => ErrorClass::Authentication,
            ApiError::Status { status: 401, .. } => ErrorClass::Authentication,
            ApiError::Status { status: 404, .. } => ErrorClass::NotFound,
            ApiError::Status { status, .. } if (400..500).contains(status) => {
                ErrorClass::Rejected
            }
            ApiError::Rejected(_) | ApiError::InvalidInput(_) => ErrorClass::Rejected,
            ApiError::Status { .. }
            | ApiError::Transport(_)
            | ApiError::Decode(_)
            | ApiError::MissingData(_)
            | ApiError::Storage(_) => ErrorClass::Transport,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.class() == ErrorClass::NotFound
    }

    /// 服务端给出的消息（若有）
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref().filter(|m| !m.is_empty()),
            ApiError::Rejected(m) if !m.is_empty() => Some(m),
            _ => None,
        }
    }
}

/// 列表读取把 404 当作空结果
pub trait OrEmpty<T> {
    fn or_empty(self) -> Result<T, ApiError>;
}

impl<T: Default> OrEmpty<T> for Result<T, ApiError> {
    fn or_empty(self) -> Result<T, ApiError> {
        match self {
            Err(e) if e.is_not_found() => Ok(T::default()),
            other => other,
        }
    }
}

// =========================================================
// 消息提取
// =========================================================

/// 从任意错误中取得可展示的消息
///
/// 顺序：服务端 `message` → 错误自身的描述 → 兜底文案。
pub fn error_message(err: &(dyn StdError + 'static)) -> String {
    if let Some(api) = err.downcast_ref::<ApiError>() {
        if let Some(m) = api.server_message() {
            return m.to_string();
        }
    }
    non_empty(err.to_string())
}

/// 同 [`error_message`]，但接受任意值（如 panic payload 或 UI 层传来的未知错误）
pub fn message_from_any(value: &dyn Any) -> String {
    if let Some(api) = value.downcast_ref::<ApiError>() {
        return error_message(api);
    }
    if let Some(t) = value.downcast_ref::<TransportError>() {
        return error_message(t);
    }
    if let Some(s) = value.downcast_ref::<String>() {
        return non_empty(s.clone());
    }
    if let Some(s) = value.downcast_ref::<&str>() {
        return non_empty(s.to_string());
    }
    if let Some(v) = value.downcast_ref::<serde_json::Value>() {
        if let Some(m) = v.get("message").and_then(|m| m.as_str()) {
            return non_empty(m.to_string());
        }
    }
    FALLBACK_MESSAGE.to_string()
}

fn non_empty(s: String) -> String {
    if s.trim().is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        s
    }
}
