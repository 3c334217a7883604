use bizgrow_admin_shared::model::{
    AdminCredentials, AuthTokens, LoginCredentials, LoginResponse, MessageAck, OtpSend, OtpVerify,
    PhoneChangeRequest, PhoneChangeVerify, ProfileUpdate, User,
};
use bizgrow_admin_shared::protocol::paths;

use crate::api::{ApiClient, ApiRequest};
use crate::error::ApiError;

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// 登录类接口成功后保存两个 token 并设置登录标记
    async fn sign_in(&self, req: ApiRequest) -> Result<LoginResponse, ApiError> {
        let resp: LoginResponse = self.api.data(req.without_refresh()).await?;
        self.api.session().establish(&resp.token, &resp.refresh_token)?;
        Ok(resp)
    }

    pub async fn admin_login(&self, credentials: &AdminCredentials) -> Result<LoginResponse, ApiError> {
        self.sign_in(ApiRequest::post(paths::AUTH_ADMIN_LOGIN).json(credentials)?)
            .await
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError> {
        self.sign_in(ApiRequest::post(paths::AUTH_LOGIN).json(credentials)?)
            .await
    }

    pub async fn send_otp(&self, data: &OtpSend) -> Result<MessageAck, ApiError> {
        self.api
            .data(ApiRequest::post(paths::AUTH_OTP_SEND).json(data)?.without_refresh())
            .await
    }

    pub async fn verify_otp(&self, data: &OtpVerify) -> Result<LoginResponse, ApiError> {
        self.sign_in(ApiRequest::post(paths::AUTH_OTP_VERIFY).json(data)?)
            .await
    }

    pub async fn refresh(&self) -> Result<AuthTokens, ApiError> {
        self.api.refresh().await
    }

    /// 注销：无论服务端是否成功，本地凭据都会被清除
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.api.execute(ApiRequest::post(paths::AUTH_LOGOUT)).await;
        self.api.session().clear();
        if let Err(e) = &result {
            tracing::warn!(error = %e, "server logout failed");
        }
        result.map(|_| ())
    }

    /// 用指定 token 通知服务端注销，不读取也不修改本地会话
    pub async fn revoke(&self, access_token: &str) -> Result<(), ApiError> {
        self.api
            .execute(ApiRequest::post(paths::AUTH_LOGOUT).with_bearer(access_token))
            .await?;
        Ok(())
    }

    pub async fn profile(&self) -> Result<User, ApiError> {
        self.api.data(ApiRequest::get(paths::AUTH_PROFILE)).await
    }

    pub async fn update_profile(&self, data: &ProfileUpdate) -> Result<User, ApiError> {
        self.api
            .data(ApiRequest::put(paths::AUTH_PROFILE).json(data)?)
            .await
    }

    pub async fn send_phone_change_otp(&self, new_phone: &str) -> Result<MessageAck, ApiError> {
        let body = PhoneChangeRequest {
            new_phone: new_phone.to_string(),
        };
        self.api
            .data(ApiRequest::post(paths::AUTH_CHANGE_PHONE_SEND).json(&body)?)
            .await
    }

    pub async fn verify_phone_change(&self, data: &PhoneChangeVerify) -> Result<User, ApiError> {
        self.api
            .data(ApiRequest::post(paths::AUTH_CHANGE_PHONE_VERIFY).json(data)?)
            .await
    }

    /// 是否持有 access token
    pub fn is_authenticated(&self) -> bool {
        self.api.session().has_token()
    }

    pub fn access_token(&self) -> Option<String> {
        self.api.session().access_token()
    }
}
