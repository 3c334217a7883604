//! 领域模型 (Domain Models)
//!
//! 与后端交换的纯数据记录。字段以 camelCase 为主，
//! 后端部分接口返回 snake_case，关键字段通过 alias 同时兼容。

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 定义一个与线上字符串一一对应的枚举
///
/// 生成 serde 重命名、`as_str`、`Display` 与 `FromStr`。
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $($(#[$vmeta])* #[serde(rename = $wire)] $variant,)+
        }

        impl $name {
            pub const VARIANTS: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::model::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err($crate::model::UnknownVariant {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

pub mod analytics;
pub mod auth;
pub mod logs;
pub mod revenue;
pub mod settings;
pub mod subscription;
pub mod tenant;
pub mod user;
pub mod whatsapp;

pub use analytics::*;
pub use auth::*;
pub use logs::*;
pub use revenue::*;
pub use settings::*;
pub use subscription::*;
pub use tenant::*;
pub use user::*;
pub use whatsapp::*;

// =========================================================
// 公共类型
// =========================================================

/// 字符串无法解析为枚举值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} value: {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

/// 仅包含一条消息的确认响应，如 OTP 发送、催款提醒
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageAck {
    #[serde(default)]
    pub message: String,
}

/// 用量上限：具体数值或 "Unlimited"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Count(u64),
    Unlimited,
}

impl Serialize for Limit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Limit::Count(n) => serializer.serialize_u64(*n),
            Limit::Unlimited => serializer.serialize_str("Unlimited"),
        }
    }
}

impl<'de> Deserialize<'de> for Limit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Count(n) => Ok(Limit::Count(n)),
            Raw::Text(s) if s.eq_ignore_ascii_case("unlimited") => Ok(Limit::Unlimited),
            Raw::Text(s) => s
                .parse::<u64>()
                .map(Limit::Count)
                .map_err(|_| serde::de::Error::custom(format!("invalid limit: {}", s))),
        }
    }
}

/// 日期范围过滤（多个统计接口共用）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
}

impl crate::ToQuery for DateRange {
    fn to_query(&self) -> crate::Query {
        crate::Query::new()
            .param("startDate", self.start_date)
            .param("endDate", self.end_date)
    }
}
