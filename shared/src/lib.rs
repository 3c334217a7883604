//! BizGrow360 管理后台的共享协议层
//!
//! 客户端与 console 共用的线上契约：
//! - `envelope`: 统一响应信封与分页
//! - `model`: 各资源的实体与请求载荷
//! - `query`: 过滤条件到查询参数的序列化
//! - `protocol`: HTTP 方法与固定端点路径

pub mod envelope;
pub mod model;
pub mod protocol;
pub mod query;

pub use chrono;

pub use envelope::{Envelope, ErrorBody, Paged, Pagination};
pub use protocol::HttpMethod;
pub use query::{ExportFormat, Query, SortOrder, ToQuery};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 持久化存储中的 access token 键
pub const STORAGE_ACCESS_TOKEN: &str = "accessToken";
/// 持久化存储中的 refresh token 键
pub const STORAGE_REFRESH_TOKEN: &str = "refreshToken";
/// 登录标记键，值为 `"true"` 时视为已登录
pub const STORAGE_AUTH_FLAG: &str = "bizgrow360_auth";

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_REQUEST_ID: &str = "X-Request-Id";

/// 旧版过滤器中表示"不过滤"的哨兵值
pub const FILTER_ALL: &str = "all";
