//! 会话状态
//!
//! 持有 token 存储与登录标记，并向订阅者广播登录状态的变化。
//! `ApiClient` 通过注入的 `Session` 读写 token，而不是直接访问全局存储。

use std::sync::Arc;

use bizgrow_admin_shared::{STORAGE_ACCESS_TOKEN, STORAGE_AUTH_FLAG, STORAGE_REFRESH_TOKEN};
use tokio::sync::{Mutex, MutexGuard, watch};

use crate::error::StorageError;
use crate::storage::{MemoryStorage, TokenStore};

const AUTH_FLAG_VALUE: &str = "true";

pub struct Session {
    store: Arc<dyn TokenStore>,
    auth_tx: watch::Sender<bool>,
    /// 同一时间只允许一个 refresh 请求在途
    refresh_lock: Mutex<()>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let flag = store.get(STORAGE_AUTH_FLAG).as_deref() == Some(AUTH_FLAG_VALUE);
        let (auth_tx, _) = watch::channel(flag);
        Self {
            store,
            auth_tx,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    // --- Accessors ---

    pub fn access_token(&self) -> Option<String> {
        self.store
            .get(STORAGE_ACCESS_TOKEN)
            .filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store
            .get(STORAGE_REFRESH_TOKEN)
            .filter(|t| !t.is_empty())
    }

    /// 是否持有 access token
    pub fn has_token(&self) -> bool {
        self.access_token().is_some()
    }

    /// 登录标记是否为 `"true"`（每次调用都重新读取存储）
    pub fn is_authenticated(&self) -> bool {
        self.store.get(STORAGE_AUTH_FLAG).as_deref() == Some(AUTH_FLAG_VALUE)
    }

    /// 订阅登录状态；会话被清除时收到 `false`
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.auth_tx.subscribe()
    }

    /// 重新读取存储中的登录标记并广播（仅在变化时）
    pub fn sync(&self) -> bool {
        let flag = self.is_authenticated();
        self.auth_tx.send_if_modified(|current| {
            let changed = *current != flag;
            *current = flag;
            changed
        });
        flag
    }

    // --- Mutations ---

    /// 登录成功：保存两个 token 并设置登录标记
    pub fn establish(&self, access: &str, refresh: &str) -> Result<(), StorageError> {
        self.store.set(STORAGE_ACCESS_TOKEN, access)?;
        self.store.set(STORAGE_REFRESH_TOKEN, refresh)?;
        self.store.set(STORAGE_AUTH_FLAG, AUTH_FLAG_VALUE)?;
        self.auth_tx.send_replace(true);
        tracing::info!("session established");
        Ok(())
    }

    /// 刷新成功：替换 access token，refresh token 仅在服务端返回新值时替换
    pub fn update_tokens(&self, access: &str, refresh: Option<&str>) -> Result<(), StorageError> {
        self.store.set(STORAGE_ACCESS_TOKEN, access)?;
        if let Some(refresh) = refresh.filter(|r| !r.is_empty()) {
            self.store.set(STORAGE_REFRESH_TOKEN, refresh)?;
        }
        Ok(())
    }

    /// 清除全部凭据与登录标记
    ///
    /// 存储删除失败只记录日志，内存中的状态仍然翻转为未登录。
    pub fn clear(&self) {
        for key in [STORAGE_ACCESS_TOKEN, STORAGE_REFRESH_TOKEN, STORAGE_AUTH_FLAG] {
            if let Err(e) = self.store.delete(key) {
                tracing::warn!(key, error = %e, "failed to remove credential");
            }
        }
        self.auth_tx.send_replace(false);
        tracing::info!("session cleared");
    }

    pub(crate) async fn lock_refresh(&self) -> MutexGuard<'_, ()> {
        self.refresh_lock.lock().await
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::in_memory()
    }
}
