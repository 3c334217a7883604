//! 响应信封模块
//!
//! 后端所有响应都形如 `{success, message?, data, pagination?}`。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

fn default_success() -> bool {
    true
}

/// 统一响应信封
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// `DELETE` 等接口可能不返回 data，因此为 Option
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            pagination: None,
        }
    }
}

/// 分页信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default, alias = "totalPages")]
    pub pages: u32,
}

/// 错误响应体，用于提取服务端给出的可读消息
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<HashMap<String, Vec<String>>>,
}

/// 列表结果
///
/// 后端的列表接口有两种形态：
/// - `data` 直接是数组，分页信息在信封上
/// - `data` 是对象 `{<resource>: [...], pagination}`
#[derive(Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

impl<T> Default for Paged<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: None,
        }
    }
}

impl<T: DeserializeOwned> Paged<T> {
    /// 从信封的 data 中解析列表，`key` 是对象形态下的资源字段名
    pub fn from_payload(
        data: Option<Value>,
        pagination: Option<Pagination>,
        key: &str,
    ) -> Result<Self, serde_json::Error> {
        match data {
            None | Some(Value::Null) => Ok(Self {
                items: Vec::new(),
                pagination,
            }),
            Some(Value::Object(mut map)) => {
                let items = match map.remove(key) {
                    Some(Value::Null) | None => Vec::new(),
                    Some(v) => serde_json::from_value(v)?,
                };
                let nested = match map.remove("pagination") {
                    Some(Value::Null) | None => None,
                    Some(v) => Some(serde_json::from_value(v)?),
                };
                Ok(Self {
                    items,
                    pagination: nested.or(pagination),
                })
            }
            Some(other) => Ok(Self {
                items: serde_json::from_value(other)?,
                pagination,
            }),
        }
    }
}

impl<T> Paged<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
