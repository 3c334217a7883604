//! 客户端配置
//!
//! 加载顺序（后者覆盖前者）：
//! 1. 内嵌的默认值
//! 2. 工作目录下可选的 `bizgrow-admin.toml`
//! 3. 前缀为 `BIZGROW__` 的环境变量，如 `BIZGROW__API__BASE_URL`

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const CONFIG_FILE: &str = "bizgrow-admin";
pub const ENV_PREFIX: &str = "BIZGROW";

const DEFAULTS: &str = r#"
    [api]
    base_url = "http://localhost:5000"
    timeout_secs = 30
    user_agent = "bizgrow-admin/0.1"

    [storage]

    [cache]
    dedupe_ms = 5000
    overview_refresh_ms = 60000
    fast_refresh_ms = 30000

    [logging]
    level = "info"
    format = "pretty"
"#;

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// REST API 根地址，不带结尾的 `/`
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// token 持久化文件；未设置时只保存在内存中
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// 同一 key 在该窗口内的重复读取直接命中缓存
    pub dedupe_ms: u64,
    /// 总览、收入、增长类数据的轮询间隔
    pub overview_refresh_ms: u64,
    /// 最近租户、系统健康的轮询间隔
    pub fast_refresh_ms: u64,
}

impl CacheConfig {
    pub fn dedupe_window(&self) -> Duration {
        Duration::from_millis(self.dedupe_ms)
    }

    pub fn overview_refresh(&self) -> Duration {
        Duration::from_millis(self.overview_refresh_ms)
    }

    pub fn fast_refresh(&self) -> Duration {
        Duration::from_millis(self.fast_refresh_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dedupe_ms: 5000,
            overview_refresh_ms: 60000,
            fast_refresh_ms: 30000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// `json` 或 `pretty`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULTS, config::FileFormat::Toml))
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize::<Self>()?
            .validated()
    }

    /// 只使用内嵌默认值与给定覆盖项，不读文件和环境变量
    pub fn from_overrides(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULTS, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize::<Self>()?.validated()
    }

    fn validated(mut self) -> Result<Self, config::ConfigError> {
        let trimmed = self.api.base_url.trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(config::ConfigError::Message(
                "api.base_url must not be empty".to_string(),
            ));
        }
        self.api.base_url = trimmed.to_string();

        if self.api.timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "api.timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:5000".to_string(),
                timeout_secs: 30,
                user_agent: "bizgrow-admin/0.1".to_string(),
            },
            storage: StorageConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults() {
        let cfg = ClientConfig::from_overrides(&[]).unwrap();
        assert_eq!(cfg.api.base_url, "http://localhost:5000");
        assert_eq!(cfg.api.timeout(), Duration::from_secs(30));
        assert_eq!(cfg.cache.dedupe_window(), Duration::from_secs(5));
        assert_eq!(cfg.cache.overview_refresh(), Duration::from_secs(60));
        assert_eq!(cfg.cache.fast_refresh(), Duration::from_secs(30));
        assert!(cfg.storage.path.is_none());
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let cfg = ClientConfig::from_overrides(&[
            ("api.base_url", "https://api.bizgrow360.test/api/"),
            ("logging.format", "json"),
        ])
        .unwrap();
        assert_eq!(cfg.api.base_url, "https://api.bizgrow360.test/api");
        assert_eq!(cfg.logging.format, "json");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(ClientConfig::from_overrides(&[("api.timeout_secs", "0")]).is_err());
    }
}
