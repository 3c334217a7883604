use bizgrow_admin_shared::model::{
    PasswordReset, User, UserCreate, UserFilters, UserStats, UserStatusUpdate, UserUpdate,
};
use bizgrow_admin_shared::protocol::paths;
use bizgrow_admin_shared::{ExportFormat, Paged};

use crate::api::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::service::export_query;

const LIST_KEY: &str = "users";

#[derive(Clone)]
pub struct UserService {
    api: ApiClient,
}

impl UserService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, filters: &UserFilters) -> Result<Paged<User>, ApiError> {
        self.api
            .paged(ApiRequest::get(paths::USERS).query(filters), LIST_KEY)
            .await
    }

    pub async fn get(&self, id: &str) -> Result<User, ApiError> {
        self.api
            .data(ApiRequest::get(paths::member(paths::USERS, id, None)))
            .await
    }

    /// 启用 / 停用用户
    pub async fn update_status(&self, id: &str, update: &UserStatusUpdate) -> Result<User, ApiError> {
        self.api
            .data(ApiRequest::put(paths::member(paths::USERS, id, Some("status"))).json(update)?)
            .await
    }

    pub async fn create(&self, data: &UserCreate) -> Result<User, ApiError> {
        self.api.data(ApiRequest::post(paths::USERS).json(data)?).await
    }

    pub async fn update(&self, id: &str, data: &UserUpdate) -> Result<User, ApiError> {
        self.api
            .data(ApiRequest::put(paths::member(paths::USERS, id, None)).json(data)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api
            .execute(ApiRequest::delete(paths::member(paths::USERS, id, None)))
            .await?;
        Ok(())
    }

    pub async fn stats(&self) -> Result<UserStats, ApiError> {
        self.api
            .data(ApiRequest::get(paths::nested(paths::USERS, "stats")))
            .await
    }

    /// 重置密码；后端可能返回临时密码，也可能只返回消息
    pub async fn reset_password(&self, id: &str) -> Result<PasswordReset, ApiError> {
        let env = self
            .api
            .envelope::<PasswordReset>(ApiRequest::post(paths::member(
                paths::USERS,
                id,
                Some("reset-password"),
            )))
            .await?;
        Ok(env.data.unwrap_or_default())
    }

    pub async fn export(&self, format: ExportFormat) -> Result<Vec<u8>, ApiError> {
        self.api
            .bytes(ApiRequest::get(paths::nested(paths::USERS, "export")).query(&export_query(format)))
            .await
    }
}
