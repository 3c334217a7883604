//! 路由定义模块 - 领域模型
//!
//! 纯业务逻辑，不依赖具体的 UI 框架。定义了控制台的所有页面及其守卫属性。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    /// 登录页面
    Login,
    /// 总览（默认路由）
    #[default]
    Overview,
    Tenants,
    Users,
    Subscriptions,
    Revenue,
    Whatsapp,
    Logs,
    Settings,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    pub const ALL: [AppRoute; 10] = [
        Self::Login,
        Self::Overview,
        Self::Tenants,
        Self::Users,
        Self::Subscriptions,
        Self::Revenue,
        Self::Whatsapp,
        Self::Logs,
        Self::Settings,
        Self::NotFound,
    ];

    /// 将 URL path 解析为路由枚举；忽略查询串、片段与末尾的 `/`
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Overview,
            "/login" => Self::Login,
            "/tenants" => Self::Tenants,
            "/users" => Self::Users,
            "/subscriptions" => Self::Subscriptions,
            "/revenue" => Self::Revenue,
            "/whatsapp" => Self::Whatsapp,
            "/logs" => Self::Logs,
            "/settings" => Self::Settings,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Overview => "/",
            Self::Tenants => "/tenants",
            Self::Users => "/users",
            Self::Subscriptions => "/subscriptions",
            Self::Revenue => "/revenue",
            Self::Whatsapp => "/whatsapp",
            Self::Logs => "/logs",
            Self::Settings => "/settings",
            Self::NotFound => "/404",
        }
    }

    /// 侧边栏标题
    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Overview => "Overview",
            Self::Tenants => "Tenants",
            Self::Users => "Users",
            Self::Subscriptions => "Subscriptions",
            Self::Revenue => "Revenue",
            Self::Whatsapp => "WhatsApp",
            Self::Logs => "Logs",
            Self::Settings => "Settings",
            Self::NotFound => "Not Found",
        }
    }

    /// **核心守卫逻辑：除登录页外全部需要认证**
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login)
    }

    /// 已认证用户是否应该离开此路由（登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 登录成功后的重定向目标
    pub fn auth_success_redirect() -> Self {
        Self::Overview
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
