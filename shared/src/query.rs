//! 查询参数模块
//!
//! 过滤器字段都是 `Option`，缺省即不过滤。为兼容旧调用方，
//! 值为空串或 `"all"` 的参数在序列化前同样被丢弃。

use crate::FILTER_ALL;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// 有序的查询参数列表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// 无条件添加参数
    pub fn push(mut self, key: &str, value: impl Display) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    /// 添加可选参数：`None`、空串与 `"all"` 都不会被序列化
    pub fn param<V: Display>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            let value = value.to_string();
            if !value.is_empty() && value != FILTER_ALL {
                self.pairs.push((key.to_string(), value));
            }
        }
        self
    }

    /// 合并另一组参数（追加在末尾）
    pub fn extend(mut self, other: Query) -> Self {
        self.pairs.extend(other.pairs);
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// 序列化为 `a=1&b=2`，用于拼接 URL 与生成缓存 key
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// `path` 加上查询串；无参数时原样返回
    pub fn with_path(&self, path: &str) -> String {
        if self.pairs.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, self.to_query_string())
        }
    }
}

/// 可转换为查询参数的过滤器
pub trait ToQuery {
    fn to_query(&self) -> Query;
}

impl ToQuery for Query {
    fn to_query(&self) -> Query {
        self.clone()
    }
}

impl<T: ToQuery> ToQuery for Option<T> {
    fn to_query(&self) -> Query {
        self.as_ref().map(ToQuery::to_query).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        })
    }
}

/// 导出文件格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
    Pdf,
    Json,
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_skips_absent_empty_and_all() {
        let q = Query::new()
            .param("status", Some("all"))
            .param("plan", Some(""))
            .param::<&str>("search", None)
            .param("page", Some(2));
        assert_eq!(q.to_query_string(), "page=2");
    }

    #[test]
    fn test_query_string_is_encoded() {
        let q = Query::new().push("search", "acme & co");
        assert_eq!(q.with_path("/admin/tenants"), "/admin/tenants?search=acme%20%26%20co");
    }

    #[test]
    fn test_with_path_without_params() {
        assert_eq!(Query::new().with_path("/admin/plans"), "/admin/plans");
    }
}
