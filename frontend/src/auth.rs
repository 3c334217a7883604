//! 认证模块
//!
//! 管理控制台的登录状态，与路由系统解耦：
//! 路由服务只通过 [`AuthGate`] 读取认证状态。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bizgrow_admin::service::AuthService;
use bizgrow_admin::{ApiError, Session};
use bizgrow_admin_shared::model::{AdminCredentials, LoginResponse};
use tokio::sync::watch;

use crate::web::route::AppRoute;
use crate::web::router::{AuthGate, RouterService};

/// 认证状态快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthState {
    /// 持久化的登录标记为 `"true"`
    pub is_authenticated: bool,
    /// 登录请求进行中
    pub is_loading: bool,
}

struct Inner {
    auth: AuthService,
    session: Arc<Session>,
    loading: AtomicBool,
}

/// 认证上下文
///
/// 克隆开销很小，可以在各页面之间共享。
#[derive(Clone)]
pub struct AuthContext {
    inner: Arc<Inner>,
}

impl AuthContext {
    pub fn new(auth: AuthService, session: Arc<Session>) -> Self {
        Self {
            inner: Arc::new(Inner {
                auth,
                session,
                loading: AtomicBool::new(false),
            }),
        }
    }

    /// 挂载时调用：从存储中重新推导登录状态
    pub fn init(&self) -> AuthState {
        self.inner.loading.store(false, Ordering::SeqCst);
        self.inner.session.sync();
        self.state()
    }

    pub fn state(&self) -> AuthState {
        AuthState {
            is_authenticated: self.inner.session.is_authenticated(),
            is_loading: self.inner.loading.load(Ordering::SeqCst),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.inner.session
    }

    /// 管理员登录
    ///
    /// 成功后会话广播 `true`，路由的认证监听负责离开登录页。
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        self.inner.loading.store(true, Ordering::SeqCst);
        let credentials = AdminCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self.inner.auth.admin_login(&credentials).await;
        self.inner.loading.store(false, Ordering::SeqCst);

        match &result {
            Ok(_) => tracing::info!("admin signed in"),
            Err(e) => tracing::warn!(error = %e, "admin sign-in failed"),
        }
        result
    }

    /// 注销
    ///
    /// 本地凭据立即清除并跳转到登录页；服务端注销在后台进行，失败只记录日志。
    pub fn logout(&self, router: &RouterService) {
        let token = self.inner.session.access_token();
        self.inner.session.clear();
        router.navigate_to_route(AppRoute::auth_failure_redirect(), true);

        let Some(token) = token else { return };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("no runtime, skipping server logout");
            return;
        };
        let auth = self.inner.auth.clone();
        runtime.spawn(async move {
            if let Err(e) = auth.revoke(&token).await {
                tracing::warn!(error = %e, "server logout failed");
            }
        });
    }
}

impl AuthGate for AuthContext {
    fn is_authenticated(&self) -> bool {
        self.inner.session.sync()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.session.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::router::{Navigator, RecordingNavigator};
    use bizgrow_admin::{ApiClient, MockHttpClient};
    use bizgrow_admin_shared::HttpMethod;
    use bizgrow_admin_shared::protocol::paths;
    use serde_json::json;

    fn context() -> (Arc<MockHttpClient>, AuthContext) {
        let mock = Arc::new(MockHttpClient::new());
        let session = Arc::new(Session::in_memory());
        let api = ApiClient::new("http://mock.local", mock.clone(), session.clone());
        (mock, AuthContext::new(AuthService::new(api), session))
    }

    fn mock_login(mock: &MockHttpClient) {
        mock.mock_response(
            HttpMethod::Post,
            paths::AUTH_ADMIN_LOGIN,
            200,
            json!({ "success": true, "data": { "token": "acc", "refreshToken": "ref" } }),
        );
    }

    #[tokio::test]
    async fn test_login_then_mount_does_not_redirect() {
        let (mock, auth) = context();
        mock_login(&mock);
        auth.login("admin@bizgrow360.com", "secret").await.unwrap();
        assert!(auth.init().is_authenticated);

        let nav = Arc::new(RecordingNavigator::new("/tenants"));
        let router = RouterService::new(nav.clone(), Arc::new(auth.clone()));

        assert_eq!(router.mount(), AppRoute::Tenants);
        assert!(!nav.visited("/login"));
    }

    #[tokio::test]
    async fn test_failed_login_keeps_user_on_login() {
        let (mock, auth) = context();
        mock.mock_response(
            HttpMethod::Post,
            paths::AUTH_ADMIN_LOGIN,
            401,
            json!({ "success": false, "message": "Invalid credentials" }),
        );

        let err = auth.login("admin@bizgrow360.com", "wrong").await.unwrap_err();

        assert_eq!(bizgrow_admin::error_message(&err), "Invalid credentials");
        let state = auth.state();
        assert!(!state.is_authenticated);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_logout_clears_and_navigates_synchronously() {
        let (mock, auth) = context();
        mock_login(&mock);
        mock.mock_response(HttpMethod::Post, paths::AUTH_LOGOUT, 200, json!({ "success": true }));
        auth.login("admin@bizgrow360.com", "secret").await.unwrap();

        let nav = Arc::new(RecordingNavigator::new("/settings"));
        let router = RouterService::new(nav.clone(), Arc::new(auth.clone()));
        router.mount();

        auth.logout(&router);

        // 不等待后台任务即可观察到
        assert!(!auth.state().is_authenticated);
        assert!(auth.session().access_token().is_none());
        assert_eq!(router.current_route(), AppRoute::Login);
        assert_eq!(nav.current_path(), "/login");

        // 服务端注销带着旧 token
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        let reqs = mock.requests();
        let logout = reqs.iter().find(|r| r.path() == paths::AUTH_LOGOUT).unwrap();
        assert_eq!(logout.header("Authorization"), Some("Bearer acc"));
    }

    #[tokio::test]
    async fn test_expired_session_moves_router_to_login() {
        let (mock, auth) = context();
        mock_login(&mock);
        auth.login("admin@bizgrow360.com", "secret").await.unwrap();

        let nav = Arc::new(RecordingNavigator::new("/whatsapp"));
        let router = RouterService::new(nav.clone(), Arc::new(auth.clone()));
        router.mount();
        let _redirect = router.setup_auth_redirect();
        let mut routes = router.subscribe();
        routes.mark_unchanged();

        // 刷新失败时 ApiClient 会清除会话
        auth.session().clear();
        routes.changed().await.unwrap();

        assert_eq!(router.current_route(), AppRoute::Login);
        assert!(nav.visited("/login"));
    }
}
