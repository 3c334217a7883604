//! 跨 hook 共享的请求缓存
//!
//! 以请求 target（路径 + 查询串）为 key：
//! - 去重窗口内的读取直接返回缓存值
//! - 同一 key 的并发加载只发出一个请求
//! - 强制刷新（`mutate`、轮询）跳过窗口，但与同时进行的刷新合并

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use bizgrow_admin::ApiError;
use tokio::time::Instant;

type Shared = Arc<dyn Any + Send + Sync>;

struct Entry {
    value: Shared,
    fetched_at: Instant,
    /// 产生该值的那次加载的起始序号
    started: u64,
}

pub struct SwrCache {
    dedupe: Duration,
    entries: Mutex<HashMap<String, Entry>>,
    /// 调用序号与加载起始序号共用的计数器
    sequence: AtomicU64,
    /// 每个 key 一把加载锁
    loading: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SwrCache {
    pub fn new(dedupe: Duration) -> Self {
        Self {
            dedupe,
            entries: Mutex::new(HashMap::new()),
            sequence: AtomicU64::new(1),
            loading: Mutex::new(HashMap::new()),
        }
    }

    pub fn dedupe_window(&self) -> Duration {
        self.dedupe
    }

    /// 读取缓存值（不论新旧），类型不符时视为未命中
    pub fn peek<T: Send + Sync + 'static>(&self, key: &str) -> Option<Arc<T>> {
        lock(&self.entries)
            .get(key)
            .and_then(|e| e.value.clone().downcast::<T>().ok())
    }

    /// 缓存值、写入时间与加载起始序号
    fn entry<T: Send + Sync + 'static>(&self, key: &str) -> Option<(Arc<T>, Instant, u64)> {
        let entries = lock(&self.entries);
        let entry = entries.get(key)?;
        let value = entry.value.clone().downcast::<T>().ok()?;
        Some((value, entry.fetched_at, entry.started))
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst)
    }

    fn fresh<T: Send + Sync + 'static>(&self, key: &str) -> Option<Arc<T>> {
        let (value, fetched_at, _) = self.entry::<T>(key)?;
        (fetched_at.elapsed() < self.dedupe).then_some(value)
    }

    fn load_lock(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        lock(&self.loading)
            .entry(key.to_string())
            .or_default()
            .clone()
    }

    /// 读取或加载
    ///
    /// `force` 为 true 时忽略去重窗口，只复用在本次调用之后才开始的加载结果；
    /// 调用之前已经发出的请求可能读到修改前的数据，不能复用。
    /// 失败的结果不会被缓存。
    pub async fn fetch<T, F, Fut>(&self, key: &str, force: bool, fetcher: F) -> Result<Arc<T>, ApiError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if !force {
            if let Some(hit) = self.fresh::<T>(key) {
                tracing::trace!(key, "cache hit");
                return Ok(hit);
            }
        }

        let ticket = self.next_sequence();
        let load_lock = self.load_lock(key);
        let _guard = load_lock.lock().await;

        // 排队期间别人已经加载完毕
        if let Some((value, fetched_at, started)) = self.entry::<T>(key) {
            let reusable = if force {
                started > ticket
            } else {
                fetched_at.elapsed() < self.dedupe
            };
            if reusable {
                tracing::trace!(key, "joined in-flight load");
                return Ok(value);
            }
        }

        tracing::debug!(key, force, "revalidating");
        let started = self.next_sequence();
        let value = Arc::new(fetcher().await?);
        lock(&self.entries).insert(
            key.to_string(),
            Entry {
                value: value.clone(),
                fetched_at: Instant::now(),
                started,
            },
        );
        Ok(value)
    }

    pub fn invalidate(&self, key: &str) {
        lock(&self.entries).remove(key);
    }

    /// 清除某个路径下的全部 key（如 `/admin/tenants` 的所有过滤组合）
    pub fn invalidate_prefix(&self, prefix: &str) {
        lock(&self.entries).retain(|key, _| !key.starts_with(prefix));
    }

    pub fn clear(&self) {
        lock(&self.entries).clear();
    }
}

impl Default for SwrCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}
