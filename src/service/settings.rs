use std::path::Path;

use bizgrow_admin_shared::model::{
    FeaturePatch, FeatureToggles, GeneralPatch, GeneralSettings, MaintenanceState,
    MaintenanceToggle, NotificationPatch, NotificationSettings, PlatformSettings,
    RegistrationPatch, RegistrationSettings, SecurityPatch, SecuritySettings, SettingsUpdate,
    SlackTestResult, SlackWebhookTest, SystemPatch, SystemSettings, UploadedLogo,
};
use bizgrow_admin_shared::protocol::paths;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::request::FilePart;

/// 上传 logo 的 multipart 字段名
pub const LOGO_FIELD: &str = "logo";

/// 平台级设置
#[derive(Clone)]
pub struct SettingsService {
    api: ApiClient,
}

impl SettingsService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get(&self) -> Result<PlatformSettings, ApiError> {
        self.api.data(ApiRequest::get(paths::SETTINGS)).await
    }

    pub async fn update(&self, update: &SettingsUpdate) -> Result<PlatformSettings, ApiError> {
        self.api
            .data(ApiRequest::put(paths::SETTINGS).json(update)?)
            .await
    }

    // =========================================================
    // 分组读写
    // =========================================================

    async fn group<T: DeserializeOwned>(&self, segment: &str) -> Result<T, ApiError> {
        self.api
            .data(ApiRequest::get(paths::nested(paths::SETTINGS, segment)))
            .await
    }

    async fn update_group<P: Serialize, T: DeserializeOwned>(
        &self,
        segment: &str,
        patch: &P,
    ) -> Result<T, ApiError> {
        self.api
            .data(ApiRequest::put(paths::nested(paths::SETTINGS, segment)).json(patch)?)
            .await
    }

    pub async fn general(&self) -> Result<GeneralSettings, ApiError> {
        self.group("general").await
    }

    pub async fn update_general(&self, patch: &GeneralPatch) -> Result<GeneralSettings, ApiError> {
        self.update_group("general", patch).await
    }

    pub async fn registration(&self) -> Result<RegistrationSettings, ApiError> {
        self.group("registration").await
    }

    pub async fn update_registration(&self, patch: &RegistrationPatch) -> Result<RegistrationSettings, ApiError> {
        self.update_group("registration", patch).await
    }

    pub async fn notifications(&self) -> Result<NotificationSettings, ApiError> {
        self.group("notifications").await
    }

    pub async fn update_notifications(&self, patch: &NotificationPatch) -> Result<NotificationSettings, ApiError> {
        self.update_group("notifications", patch).await
    }

    pub async fn security(&self) -> Result<SecuritySettings, ApiError> {
        self.group("security").await
    }

    pub async fn update_security(&self, patch: &SecurityPatch) -> Result<SecuritySettings, ApiError> {
        self.update_group("security", patch).await
    }

    pub async fn features(&self) -> Result<FeatureToggles, ApiError> {
        self.group("features").await
    }

    pub async fn update_features(&self, patch: &FeaturePatch) -> Result<FeatureToggles, ApiError> {
        self.update_group("features", patch).await
    }

    pub async fn system(&self) -> Result<SystemSettings, ApiError> {
        self.group("system").await
    }

    pub async fn update_system(&self, patch: &SystemPatch) -> Result<SystemSettings, ApiError> {
        self.update_group("system", patch).await
    }

    // =========================================================
    // 特殊操作
    // =========================================================

    pub async fn toggle_maintenance(
        &self,
        enabled: bool,
        message: Option<&str>,
    ) -> Result<MaintenanceState, ApiError> {
        let body = MaintenanceToggle {
            enabled,
            message: message.map(str::to_string),
        };
        tracing::warn!(enabled, "toggling maintenance mode");
        self.api
            .data(ApiRequest::post(paths::nested(paths::SETTINGS, "maintenance")).json(&body)?)
            .await
    }

    pub async fn test_slack_webhook(&self, webhook_url: &str) -> Result<SlackTestResult, ApiError> {
        let body = SlackWebhookTest {
            webhook_url: webhook_url.to_string(),
        };
        self.api
            .data(ApiRequest::post(paths::nested(paths::SETTINGS, "test-slack")).json(&body)?)
            .await
    }

    /// 从磁盘读取图片并以 multipart 上传
    pub async fn upload_logo(&self, file: impl AsRef<Path>) -> Result<UploadedLogo, ApiError> {
        let path = file.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::InvalidInput(format!("cannot read {}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(LOGO_FIELD)
            .to_string();
        self.upload_logo_bytes(file_name, bytes).await
    }

    pub async fn upload_logo_bytes(&self, file_name: String, bytes: Vec<u8>) -> Result<UploadedLogo, ApiError> {
        if bytes.is_empty() {
            return Err(ApiError::InvalidInput("logo file is empty".into()));
        }
        let part = FilePart {
            field: LOGO_FIELD.to_string(),
            mime: mime_guess::from_path(&file_name).first_or_octet_stream().to_string(),
            file_name,
            bytes,
        };
        self.api
            .data(ApiRequest::post(paths::nested(paths::SETTINGS, "logo")).file(part))
            .await
    }
}
