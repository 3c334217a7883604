//! BizGrow360 管理控制台的状态层
//!
//! 与具体 UI 框架无关，嵌入方只需提供 [`web::router::Navigator`]：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 认证状态管理
//! - `hooks`: 带缓存与轮询的数据 hooks

pub mod auth;
pub mod hooks;

pub mod web {
    pub mod route;
    pub mod router;
    mod timer;

    pub use timer::Interval;
}

use std::sync::Arc;

use bizgrow_admin::config::CacheConfig;
use bizgrow_admin::{AdminServices, ApiError, ClientConfig};

pub use auth::{AuthContext, AuthState};
pub use hooks::{DataHooks, Resource, ResourceState};
pub use web::route::AppRoute;
pub use web::router::{AuthRedirect, Navigator, RouterService};

/// 控制台的全部上下文：服务、认证、数据 hooks 与路由
#[derive(Clone)]
pub struct Console {
    pub auth: AuthContext,
    pub hooks: DataHooks,
    pub router: RouterService,
}

impl Console {
    pub fn new(services: AdminServices, cache: CacheConfig, navigator: Arc<dyn Navigator>) -> Self {
        let session = services.api().session().clone();
        let auth = AuthContext::new(services.auth.clone(), session);
        let router = RouterService::new(navigator, Arc::new(auth.clone()));
        let hooks = DataHooks::new(services, cache);
        Self { auth, hooks, router }
    }

    /// 读取配置并建立客户端
    pub fn connect(config: &ClientConfig, navigator: Arc<dyn Navigator>) -> Result<Self, ApiError> {
        let services = bizgrow_admin::connect(config)?;
        Ok(Self::new(services, config.cache.clone(), navigator))
    }

    /// 挂载：恢复登录状态、解析当前地址并开始监听会话失效
    ///
    /// 返回的守卫被 drop 时停止监听；没有 tokio 运行时时不监听。
    pub fn mount(&self) -> (AppRoute, Option<AuthRedirect>) {
        let state = self.auth.init();
        let route = self.router.mount();
        tracing::debug!(authenticated = state.is_authenticated, %route, "console mounted");
        (route, self.router.setup_auth_redirect())
    }

    pub fn logout(&self) {
        self.auth.logout(&self.router);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::router::RecordingNavigator;
    use bizgrow_admin::{ApiClient, MockHttpClient, Session};
    use bizgrow_admin_shared::HttpMethod;
    use bizgrow_admin_shared::protocol::paths;
    use serde_json::json;

    fn console(path: &str) -> (Arc<MockHttpClient>, Arc<RecordingNavigator>, Console) {
        let mock = Arc::new(MockHttpClient::new());
        let api = ApiClient::new("http://mock.local", mock.clone(), Arc::new(Session::in_memory()));
        let nav = Arc::new(RecordingNavigator::new(path));
        let console = Console::new(AdminServices::new(api), CacheConfig::default(), nav.clone());
        (mock, nav, console)
    }

    #[tokio::test]
    async fn test_signed_out_mount_redirects_to_login() {
        let (_mock, nav, console) = console("/revenue");
        let (route, _redirect) = console.mount();

        assert_eq!(route, AppRoute::Login);
        assert_eq!(nav.current_path(), "/login");
    }

    #[test]
    fn test_mount_outside_runtime_still_guards() {
        let (_mock, nav, console) = console("/users");
        let (route, redirect) = console.mount();

        assert_eq!(route, AppRoute::Login);
        assert!(redirect.is_none());
        assert_eq!(nav.current_path(), "/login");
    }

    #[tokio::test]
    async fn test_login_leaves_login_page() {
        let (mock, nav, console) = console("/login");
        mock.mock_response(
            HttpMethod::Post,
            paths::AUTH_ADMIN_LOGIN,
            200,
            json!({ "success": true, "data": { "token": "acc", "refreshToken": "ref" } }),
        );
        let (_, _redirect) = console.mount();
        let mut routes = console.router.subscribe();
        routes.mark_unchanged();

        console.auth.login("admin@bizgrow360.com", "secret").await.unwrap();
        routes.changed().await.unwrap();

        assert_eq!(console.router.current_route(), AppRoute::Overview);
        assert_eq!(nav.current_path(), "/");
    }
}
