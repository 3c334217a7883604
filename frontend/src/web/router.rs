//! 路由服务模块 - 核心引擎
//!
//! 实现"请求 -> 验证(Guard) -> 处理 -> 加载"的导航流程。
//! 具体的地址栏 / History 操作由嵌入方通过 [`Navigator`] 提供，
//! 认证状态通过 [`AuthGate`] 注入，路由服务本身不依赖认证实现。

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::route::AppRoute;

// =========================================================
// 注入点
// =========================================================

/// 宿主 UI 的导航能力（浏览器 History、桌面壳、测试桩）
pub trait Navigator: Send + Sync {
    /// 当前地址
    fn current_path(&self) -> String;
    /// 新增一条历史记录
    fn push(&self, path: &str);
    /// 替换当前历史记录（用于重定向）
    fn replace(&self, path: &str);
}

/// 路由守卫读取的认证状态
pub trait AuthGate: Send + Sync {
    /// 每次调用都重新读取持久化的登录标记
    fn is_authenticated(&self) -> bool;
    /// 登录状态变化的订阅
    fn subscribe(&self) -> watch::Receiver<bool>;
}

/// 导航记录的一项
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEntry {
    Push(String),
    Replace(String),
}

impl NavEntry {
    pub fn path(&self) -> &str {
        match self {
            NavEntry::Push(p) | NavEntry::Replace(p) => p,
        }
    }
}

/// 只记录导航动作的 Navigator，用于测试与无界面运行
#[derive(Debug)]
pub struct RecordingNavigator {
    current: Mutex<String>,
    history: Mutex<Vec<NavEntry>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RecordingNavigator {
    pub fn new(initial_path: &str) -> Self {
        Self {
            current: Mutex::new(initial_path.to_string()),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn history(&self) -> Vec<NavEntry> {
        lock(&self.history).clone()
    }

    /// 是否曾被导航到 `path`
    pub fn visited(&self, path: &str) -> bool {
        lock(&self.history).iter().any(|e| e.path() == path)
    }

    /// 模拟用户直接修改地址栏 / 后退
    pub fn set_location(&self, path: &str) {
        *lock(&self.current) = path.to_string();
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        lock(&self.current).clone()
    }

    fn push(&self, path: &str) {
        *lock(&self.current) = path.to_string();
        lock(&self.history).push(NavEntry::Push(path.to_string()));
    }

    fn replace(&self, path: &str) {
        *lock(&self.current) = path.to_string();
        lock(&self.history).push(NavEntry::Replace(path.to_string()));
    }
}

// =========================================================
// 路由服务
// =========================================================

struct RouterInner {
    navigator: Arc<dyn Navigator>,
    auth: Arc<dyn AuthGate>,
    route_tx: watch::Sender<AppRoute>,
}

/// 路由器服务
///
/// 封装所有路由操作，通过 watch 通道向界面广播当前路由。
#[derive(Clone)]
pub struct RouterService {
    inner: Arc<RouterInner>,
}

impl RouterService {
    /// 创建路由服务，初始路由取自 Navigator 的当前地址（尚未经过守卫）
    pub fn new(navigator: Arc<dyn Navigator>, auth: Arc<dyn AuthGate>) -> Self {
        let initial_route = AppRoute::from_path(&navigator.current_path());
        let (route_tx, _) = watch::channel(initial_route);
        Self {
            inner: Arc::new(RouterInner {
                navigator,
                auth,
                route_tx,
            }),
        }
    }

    /// 挂载：对当前地址执行一次守卫
    pub fn mount(&self) -> AppRoute {
        let route = AppRoute::from_path(&self.inner.navigator.current_path());
        self.navigate_to_route(route, false)
    }

    pub fn current_route(&self) -> AppRoute {
        *self.inner.route_tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppRoute> {
        self.inner.route_tx.subscribe()
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) -> AppRoute {
        self.navigate_to_route(AppRoute::from_path(path), true)
    }

    /// 导航到指定路由，返回守卫之后实际到达的路由
    ///
    /// `use_push` 为 false 时替换当前历史记录。
    pub fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) -> AppRoute {
        let is_auth = self.inner.auth.is_authenticated();

        // --- Step 1: 验证目标路由 ---
        let resolved = if target_route.requires_auth() && !is_auth {
            tracing::info!(target = %target_route, "access denied, redirecting to login");
            AppRoute::auth_failure_redirect()
        } else if target_route.should_redirect_when_authenticated() && is_auth {
            tracing::info!("already authenticated, redirecting to overview");
            AppRoute::auth_success_redirect()
        } else {
            target_route
        };

        // --- Step 2: 加载页面 (更新状态) ---
        let path = resolved.to_path();
        if use_push && resolved == target_route {
            self.inner.navigator.push(path);
        } else {
            self.inner.navigator.replace(path);
        }
        self.inner.route_tx.send_replace(resolved);
        resolved
    }

    /// 浏览器后退 / 前进：地址已变化，只需重新守卫
    pub fn handle_popstate(&self) -> AppRoute {
        self.mount()
    }

    /// 监听认证状态变化并自动重定向
    ///
    /// 会话被清除（注销或刷新失败）时从受保护页面回到登录页；
    /// 登录成功时离开登录页。返回的句柄被 drop 时停止监听；
    /// 没有 tokio 运行时时返回 `None`。
    pub fn setup_auth_redirect(&self) -> Option<AuthRedirect> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("no runtime, auth redirect disabled");
            return None;
        };
        let router = self.clone();
        let mut auth_rx = self.inner.auth.subscribe();
        auth_rx.mark_unchanged();

        let handle = runtime.spawn(async move {
            while auth_rx.changed().await.is_ok() {
                let is_auth = *auth_rx.borrow_and_update();
                let route = router.current_route();
                if is_auth && route.should_redirect_when_authenticated() {
                    tracing::info!("logged in, redirecting to overview");
                    router.navigate_to_route(AppRoute::auth_success_redirect(), true);
                } else if !is_auth && route.requires_auth() {
                    tracing::info!(from = %route, "session ended, redirecting to login");
                    router.navigate_to_route(AppRoute::auth_failure_redirect(), true);
                }
            }
        });
        Some(AuthRedirect { handle })
    }
}

/// 认证重定向监听的句柄
pub struct AuthRedirect {
    handle: JoinHandle<()>,
}

impl Drop for AuthRedirect {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// 可手动切换的认证状态
    struct FakeGate {
        flag: AtomicBool,
        tx: watch::Sender<bool>,
    }

    impl FakeGate {
        fn new(flag: bool) -> Arc<Self> {
            Arc::new(Self {
                flag: AtomicBool::new(flag),
                tx: watch::channel(flag).0,
            })
        }

        fn set(&self, flag: bool) {
            self.flag.store(flag, Ordering::SeqCst);
            self.tx.send_replace(flag);
        }
    }

    impl AuthGate for FakeGate {
        fn is_authenticated(&self) -> bool {
            self.flag.load(Ordering::SeqCst)
        }

        fn subscribe(&self) -> watch::Receiver<bool> {
            self.tx.subscribe()
        }
    }

    fn router(path: &str, auth: bool) -> (Arc<RecordingNavigator>, Arc<FakeGate>, RouterService) {
        let nav = Arc::new(RecordingNavigator::new(path));
        let gate = FakeGate::new(auth);
        let router = RouterService::new(nav.clone(), gate.clone());
        (nav, gate, router)
    }

    #[test]
    fn test_unauthenticated_is_sent_to_login() {
        let (nav, _gate, router) = router("/tenants", false);

        assert_eq!(router.mount(), AppRoute::Login);
        assert_eq!(nav.history(), vec![NavEntry::Replace("/login".into())]);
        assert_eq!(router.navigate("/settings"), AppRoute::Login);
    }

    #[test]
    fn test_authenticated_leaves_login_page() {
        let (nav, _gate, router) = router("/login", true);

        assert_eq!(router.mount(), AppRoute::Overview);
        assert_eq!(nav.current_path(), "/");
    }

    #[test]
    fn test_authenticated_navigation_pushes() {
        let (nav, _gate, router) = router("/", true);
        router.mount();

        assert_eq!(router.navigate("/revenue"), AppRoute::Revenue);
        assert_eq!(nav.history().last(), Some(&NavEntry::Push("/revenue".into())));
        assert_eq!(router.current_route(), AppRoute::Revenue);
    }

    #[test]
    fn test_auth_redirect_without_runtime_is_disabled() {
        let (_nav, _gate, router) = router("/", true);

        assert!(router.setup_auth_redirect().is_none());
    }

    #[test]
    fn test_popstate_is_guarded() {
        let (nav, gate, router) = router("/", true);
        router.mount();
        gate.set(false);

        nav.set_location("/logs");
        assert_eq!(router.handle_popstate(), AppRoute::Login);
    }

    #[tokio::test]
    async fn test_session_end_redirects_to_login() {
        let (nav, gate, router) = router("/users", true);
        router.mount();
        let _watch = router.setup_auth_redirect();
        let mut routes = router.subscribe();

        gate.set(false);
        routes.changed().await.unwrap();

        assert_eq!(router.current_route(), AppRoute::Login);
        assert!(nav.visited("/login"));
    }

    #[tokio::test]
    async fn test_login_leaves_login_page() {
        let (_nav, gate, router) = router("/login", false);
        router.mount();
        let _watch = router.setup_auth_redirect();
        let mut routes = router.subscribe();
        routes.mark_unchanged();

        gate.set(true);
        routes.changed().await.unwrap();

        assert_eq!(router.current_route(), AppRoute::Overview);
    }
}
