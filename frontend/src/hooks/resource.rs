//! 单个 hook 的状态机：`{data, is_loading, is_error, error}`

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use bizgrow_admin::ApiError;
use futures::future::BoxFuture;
use tokio::sync::watch;

use super::cache::SwrCache;
use crate::web::Interval;

/// hook 对外暴露的状态
#[derive(Debug)]
pub struct ResourceState<T> {
    pub data: Option<Arc<T>>,
    pub is_loading: bool,
    pub is_error: bool,
    pub error: Option<Arc<ApiError>>,
}

// 手写 Clone：不要求 T: Clone
impl<T> Clone for ResourceState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            is_loading: self.is_loading,
            is_error: self.is_error,
            error: self.error.clone(),
        }
    }
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            is_error: false,
            error: None,
        }
    }
}

pub type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync>;

struct Inner<T> {
    /// `None` 表示条件未满足，不发请求
    key: Option<String>,
    cache: Arc<SwrCache>,
    fetcher: Fetcher<T>,
    state: watch::Sender<ResourceState<T>>,
    poll: Mutex<Option<Interval>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// 绑定了缓存 key 与加载函数的数据 hook
///
/// 所有克隆共享同一份状态；最后一个克隆被 drop 时轮询随之停止。
pub struct Resource<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> Resource<T> {
    pub fn new(key: Option<String>, cache: Arc<SwrCache>, fetcher: Fetcher<T>) -> Self {
        let (state, _) = watch::channel(ResourceState::default());
        Self {
            inner: Arc::new(Inner {
                key,
                cache,
                fetcher,
                state,
                poll: Mutex::new(None),
            }),
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.inner.key.as_deref()
    }

    pub fn state(&self) -> ResourceState<T> {
        self.inner.state.borrow().clone()
    }

    pub fn data(&self) -> Option<Arc<T>> {
        self.inner.state.borrow().data.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.inner.state.subscribe()
    }

    /// 首次加载：去重窗口内命中缓存
    pub async fn load(&self) {
        Self::run(&self.inner, false).await;
    }

    /// 强制重新验证
    ///
    /// 失败时保留之前的数据，只更新错误状态。
    pub async fn mutate(&self) {
        Self::run(&self.inner, true).await;
    }

    async fn run(inner: &Arc<Inner<T>>, force: bool) {
        let Some(key) = inner.key.as_deref() else {
            return;
        };

        inner.state.send_modify(|s| s.is_loading = true);
        let fetcher = inner.fetcher.clone();
        let result = inner.cache.fetch(key, force, move || fetcher()).await;

        inner.state.send_modify(|s| {
            s.is_loading = false;
            match result {
                Ok(data) => {
                    s.data = Some(data);
                    s.is_error = false;
                    s.error = None;
                }
                Err(e) => {
                    tracing::warn!(key, error = %e, "revalidation failed");
                    s.is_error = true;
                    s.error = Some(Arc::new(e));
                }
            }
        });
    }

    /// 按固定间隔重新验证
    ///
    /// 重复调用会替换之前的轮询。没有 tokio 运行时时不轮询。
    pub fn start_polling(&self, period: Duration) {
        if self.inner.key.is_none() {
            return;
        }
        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);
        let interval = Interval::new(period, move || {
            let weak = weak.clone();
            async move {
                if let Some(inner) = weak.upgrade() {
                    Self::run(&inner, true).await;
                }
            }
        });
        match interval {
            Ok(interval) => *lock(&self.inner.poll) = Some(interval),
            Err(e) => tracing::debug!(error = %e, "polling disabled"),
        }
    }

    pub fn stop_polling(&self) {
        lock(&self.inner.poll).take();
    }

    pub fn is_polling(&self) -> bool {
        lock(&self.inner.poll).is_some()
    }
}
