//! 定时器封装模块
//!
//! 基于 tokio 的周期任务，用于 hooks 的轮询刷新。

use std::future::Future;
use std::time::Duration;

use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// 周期性定时器
///
/// 第一次触发发生在一个周期之后。当 `Interval` 被 drop 时，后台任务随之终止。
pub struct Interval {
    period: Duration,
    handle: JoinHandle<()>,
}

impl Interval {
    /// 在当前 tokio 运行时上启动定时器
    ///
    /// # 参数
    /// - `period`: 间隔时间
    /// - `callback`: 每次触发时执行，上一次执行完成前不会开始下一次
    pub fn new<F, Fut>(period: Duration, callback: F) -> Result<Self, TryCurrentError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let runtime = Handle::try_current()?;
        let handle = runtime.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                callback().await;
            }
        });
        Ok(Self { period, handle })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// 取消定时器
    ///
    /// 通常不需要手动调用，因为 drop 时会自动取消。
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.cancel();
    }
}
