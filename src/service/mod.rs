//! 领域服务层 (Service Layer)
//!
//! 每个方法对应一次 HTTP 调用：类型化输入 → 类型化输出。
//! 服务不做本地缓存，修改类操作之后由调用方（hooks）重新拉取。

pub mod auth;
pub mod logs;
pub mod revenue;
pub mod settings;
pub mod subscription;
pub mod tenant;
pub mod user;
pub mod whatsapp;

pub use auth::AuthService;
pub use logs::LogsService;
pub use revenue::RevenueService;
pub use settings::SettingsService;
pub use subscription::SubscriptionService;
pub use tenant::TenantService;
pub use user::UserService;
pub use whatsapp::WhatsAppService;

use bizgrow_admin_shared::{ExportFormat, Query};

use crate::api::ApiClient;

/// 全部服务的集合，共享同一个 `ApiClient`
#[derive(Clone)]
pub struct AdminServices {
    pub auth: AuthService,
    pub tenants: TenantService,
    pub users: UserService,
    pub subscriptions: SubscriptionService,
    pub revenue: RevenueService,
    pub whatsapp: WhatsAppService,
    pub logs: LogsService,
    pub settings: SettingsService,
    api: ApiClient,
}

impl AdminServices {
    pub fn new(api: ApiClient) -> Self {
        Self {
            auth: AuthService::new(api.clone()),
            tenants: TenantService::new(api.clone()),
            users: UserService::new(api.clone()),
            subscriptions: SubscriptionService::new(api.clone()),
            revenue: RevenueService::new(api.clone()),
            whatsapp: WhatsAppService::new(api.clone()),
            logs: LogsService::new(api.clone()),
            settings: SettingsService::new(api.clone()),
            api,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}

/// 导出接口的查询参数：`format` 在前，过滤条件在后
pub(crate) fn export_query(format: ExportFormat) -> Query {
    Query::new().push("format", format)
}
