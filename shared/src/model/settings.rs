use super::LogLevel;
use serde::{Deserialize, Serialize};

// =========================================================
// 平台设置分组
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralSettings {
    pub platform_name: String,
    pub support_email: String,
    pub timezone: String,
    pub currency: String,
    pub terms_url: String,
    pub privacy_url: String,
    pub logo: Option<String>,
    pub favicon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationSettings {
    pub allow_new_signups: bool,
    pub trial_period_days: u32,
    pub default_plan: String,
    pub require_email_verification: bool,
    pub require_phone_verification: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertSettings {
    pub new_tenant_signup: bool,
    pub payment_received: bool,
    pub payment_failed: bool,
    pub quota_warning: bool,
    pub system_errors: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub email_notifications: bool,
    pub slack_notifications: bool,
    pub slack_webhook_url: Option<String>,
    pub alerts: AlertSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecuritySettings {
    pub two_factor_required: bool,
    /// 分钟
    pub session_timeout: u32,
    pub max_login_attempts: u32,
    pub password_min_length: u32,
    pub require_special_chars: bool,
    pub ip_whitelist: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureToggles {
    pub whatsapp_integration: bool,
    pub sms_integration: bool,
    pub email_integration: bool,
    pub api_access: bool,
    pub bulk_export: bool,
    pub advanced_analytics: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    #[serde(default)]
    pub maintenance_mode: bool,
    #[serde(default)]
    pub maintenance_message: Option<String>,
    #[serde(default)]
    pub debug_mode: bool,
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
    #[serde(default)]
    pub api_rate_limit: u32,
    /// MB
    #[serde(default)]
    pub max_file_upload_size: u32,
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            maintenance_mode: false,
            maintenance_message: None,
            debug_mode: false,
            log_level: default_log_level(),
            api_rate_limit: 0,
            max_file_upload_size: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformSettings {
    pub general: GeneralSettings,
    pub registration: RegistrationSettings,
    pub notifications: NotificationSettings,
    pub security: SecuritySettings,
    pub features: FeatureToggles,
    pub system: SystemSettings,
}

// =========================================================
// 部分更新
// =========================================================

/// 为设置分组生成对应的部分更新结构：所有字段可选，未设置的不序列化
macro_rules! settings_patch {
    (
        $(#[$meta:meta])*
        $name:ident { $($field:ident : $ty:ty),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $(
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )+
        }
    };
}

settings_patch!(GeneralPatch {
    platform_name: String,
    support_email: String,
    timezone: String,
    currency: String,
    terms_url: String,
    privacy_url: String,
    logo: String,
    favicon: String,
});

settings_patch!(RegistrationPatch {
    allow_new_signups: bool,
    trial_period_days: u32,
    default_plan: String,
    require_email_verification: bool,
    require_phone_verification: bool,
});

settings_patch!(NotificationPatch {
    email_notifications: bool,
    slack_notifications: bool,
    slack_webhook_url: String,
    alerts: AlertSettings,
});

settings_patch!(SecurityPatch {
    two_factor_required: bool,
    session_timeout: u32,
    max_login_attempts: u32,
    password_min_length: u32,
    require_special_chars: bool,
    ip_whitelist: Vec<String>,
});

settings_patch!(FeaturePatch {
    whatsapp_integration: bool,
    sms_integration: bool,
    email_integration: bool,
    api_access: bool,
    bulk_export: bool,
    advanced_analytics: bool,
});

settings_patch!(SystemPatch {
    maintenance_mode: bool,
    maintenance_message: String,
    debug_mode: bool,
    log_level: LogLevel,
    api_rate_limit: u32,
    max_file_upload_size: u32,
});

settings_patch!(
    /// `PUT /admin/settings`：只发送需要修改的分组
    SettingsUpdate {
        general: GeneralPatch,
        registration: RegistrationPatch,
        notifications: NotificationPatch,
        security: SecurityPatch,
        features: FeaturePatch,
        system: SystemPatch,
    }
);

// =========================================================
// 特殊操作
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceToggle {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceState {
    #[serde(default)]
    pub maintenance_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlackWebhookTest {
    pub webhook_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackTestResult {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadedLogo {
    pub url: String,
}
