//! 数据 hooks
//!
//! 每个 hook 把缓存 key（接口路径 + 序列化后的过滤条件）绑定到一个加载函数上，
//! 对外暴露 `{data, is_loading, is_error, error}` 状态与强制刷新的 `mutate()`。
//! 列表接口的 404 视为空列表。

mod cache;
mod resource;

pub use cache::SwrCache;
pub use resource::{Fetcher, Resource, ResourceState};

use std::future::Future;
use std::sync::Arc;

use bizgrow_admin::config::CacheConfig;
use bizgrow_admin::service::{RevenueService, WhatsAppService};
use bizgrow_admin::{AdminServices, ApiError, ApiRequest, OrEmpty};
use bizgrow_admin_shared::model::{
    OverviewData, RevenueSeries, SubscriptionPlan, SystemHealth, Tenant, TenantDetail,
    TenantFilters, TenantGrowth, User, UserFilters, WhatsAppProvider,
};
use bizgrow_admin_shared::protocol::paths;
use bizgrow_admin_shared::{Paged, Query, SortOrder};

/// 所有 hook 的工厂，持有共享缓存
#[derive(Clone)]
pub struct DataHooks {
    services: AdminServices,
    cache: Arc<SwrCache>,
    config: CacheConfig,
}

impl DataHooks {
    pub fn new(services: AdminServices, config: CacheConfig) -> Self {
        let cache = Arc::new(SwrCache::new(config.dedupe_window()));
        Self {
            services,
            cache,
            config,
        }
    }

    pub fn cache(&self) -> &Arc<SwrCache> {
        &self.cache
    }

    pub fn services(&self) -> &AdminServices {
        &self.services
    }

    fn resource<T, F, Fut>(&self, key: Option<String>, fetch: F) -> Resource<T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let fetcher: Fetcher<T> = Arc::new(move || Box::pin(fetch()));
        Resource::new(key, self.cache.clone(), fetcher)
    }

    // =========================================================
    // 仪表盘
    // =========================================================

    /// 总览计数，每分钟刷新
    pub fn overview_analytics(&self) -> Resource<OverviewData> {
        let revenue = self.services.revenue.clone();
        let hook = self.resource(Some(paths::ANALYTICS_OVERVIEW.to_string()), move || {
            let revenue = revenue.clone();
            async move { revenue.overview().await }
        });
        hook.start_polling(self.config.overview_refresh());
        hook
    }

    /// 最近 `months` 个月的营收曲线，每分钟刷新
    pub fn revenue_analytics(&self, months: u32) -> Resource<RevenueSeries> {
        let key = RevenueService::series_request(paths::ANALYTICS_REVENUE, months).target();
        let revenue = self.services.revenue.clone();
        let hook = self.resource(Some(key), move || {
            let revenue = revenue.clone();
            async move { revenue.revenue_series(months).await }
        });
        hook.start_polling(self.config.overview_refresh());
        hook
    }

    pub fn tenant_growth_analytics(&self, months: u32) -> Resource<TenantGrowth> {
        let key = RevenueService::series_request(paths::ANALYTICS_TENANT_GROWTH, months).target();
        let revenue = self.services.revenue.clone();
        let hook = self.resource(Some(key), move || {
            let revenue = revenue.clone();
            async move { revenue.tenant_growth(months).await }
        });
        hook.start_polling(self.config.overview_refresh());
        hook
    }

    /// 最近注册的租户，每 30 秒刷新
    pub fn recent_tenants(&self, limit: u32) -> Resource<Vec<Tenant>> {
        let query = Query::new()
            .push("sortBy", "createdAt")
            .push("sortOrder", SortOrder::Desc)
            .push("limit", limit);
        let key = ApiRequest::get(paths::TENANTS).query(&query).target();
        let tenants = self.services.tenants.clone();
        let hook = self.resource(Some(key), move || {
            let tenants = tenants.clone();
            async move { tenants.recent_signups(limit).await.or_empty() }
        });
        hook.start_polling(self.config.fast_refresh());
        hook
    }

    // =========================================================
    // 资源列表
    // =========================================================

    pub fn tenants(&self, filters: TenantFilters) -> Resource<Paged<Tenant>> {
        let key = ApiRequest::get(paths::TENANTS).query(&filters).target();
        let tenants = self.services.tenants.clone();
        self.resource(Some(key), move || {
            let tenants = tenants.clone();
            let filters = filters.clone();
            async move { tenants.list(&filters).await.or_empty() }
        })
    }

    /// 单个租户；`id` 为 `None` 时不发请求
    pub fn tenant(&self, id: Option<&str>) -> Resource<TenantDetail> {
        let id = id.filter(|id| !id.is_empty()).map(str::to_string);
        let key = id.as_deref().map(|id| paths::member(paths::TENANTS, id, None));
        let tenants = self.services.tenants.clone();
        self.resource(key, move || {
            let tenants = tenants.clone();
            let id = id.clone().unwrap_or_default();
            async move { tenants.get(&id).await }
        })
    }

    pub fn users(&self, filters: UserFilters) -> Resource<Paged<User>> {
        let key = ApiRequest::get(paths::USERS).query(&filters).target();
        let users = self.services.users.clone();
        self.resource(Some(key), move || {
            let users = users.clone();
            let filters = filters.clone();
            async move { users.list(&filters).await.or_empty() }
        })
    }

    pub fn plans(&self) -> Resource<Vec<SubscriptionPlan>> {
        let subscriptions = self.services.subscriptions.clone();
        self.resource(Some(paths::PLANS.to_string()), move || {
            let subscriptions = subscriptions.clone();
            async move { subscriptions.list_plans().await.or_empty() }
        })
    }

    pub fn whatsapp_providers(&self) -> Resource<Vec<WhatsAppProvider>> {
        let key = WhatsAppService::providers_request().target();
        let whatsapp = self.services.whatsapp.clone();
        self.resource(Some(key), move || {
            let whatsapp = whatsapp.clone();
            async move { whatsapp.providers().await.or_empty() }
        })
    }

    /// 系统健康，每 30 秒刷新
    pub fn system_health(&self) -> Resource<SystemHealth> {
        let logs = self.services.logs.clone();
        let hook = self.resource(Some(paths::HEALTH.to_string()), move || {
            let logs = logs.clone();
            async move { logs.system_health().await }
        });
        hook.start_polling(self.config.fast_refresh());
        hook
    }
}
