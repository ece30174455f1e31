//! Account management: verification codes, registration, login/logout, and
//! the current-user resource.
//!
//! Login stores the returned token in the client's [`Session`]; logout and
//! account deletion clear it. Authentication itself rides on the cookie the
//! server sets at login, which the pipeline replays automatically.
//!
//! [`Session`]: crate::Session

use crate::client::ApiClient;
use crate::config::{endpoints, IMAGE_TIMEOUT};
use crate::error::ApiError;
use crate::request::{FilePayload, Method, RequestOptions};
use crate::types::{
    Envelope, LoginRequest, RegisterRequest, SendCodeRequest, TokenData, UpdateEmailRequest,
    UpdatePhoneRequest, UpdateUserRequest, User,
};
use crate::api::upload::{validate_image_file, DEFAULT_MAX_IMAGE_BYTES};

impl ApiClient {
    /// Request a verification code for a phone number or email address.
    pub async fn send_code(
        &self,
        data: &SendCodeRequest,
    ) -> Result<Envelope<serde_json::Value>, ApiError> {
        self.post(endpoints::SEND_CODE, data).await
    }

    pub async fn register(
        &self,
        data: &RegisterRequest,
    ) -> Result<Envelope<User>, ApiError> {
        self.post(endpoints::REGISTER, data).await
    }

    /// Log in and remember the returned token in the session.
    pub async fn login(&self, data: &LoginRequest) -> Result<Envelope<TokenData>, ApiError> {
        let envelope: Envelope<TokenData> = self.post(endpoints::LOGIN, data).await?;
        if let Some(token) = envelope.data.as_ref().map(|d| d.token.clone()) {
            self.session().set_token(token);
        }
        Ok(envelope)
    }

    /// Log out and clear the local session.
    pub async fn logout(&self) -> Result<Envelope<serde_json::Value>, ApiError> {
        let envelope = self.delete(endpoints::LOGOUT).await?;
        self.session().clear();
        Ok(envelope)
    }

    /// Fetch the current user.
    pub async fn me(&self) -> Result<Envelope<User>, ApiError> {
        self.get(endpoints::ME, &[]).await
    }

    pub async fn update_me(&self, data: &UpdateUserRequest) -> Result<Envelope<User>, ApiError> {
        self.put(endpoints::ME, data).await
    }

    /// Delete the account and clear the local session.
    pub async fn delete_me(&self) -> Result<Envelope<serde_json::Value>, ApiError> {
        let envelope = self.delete(endpoints::ME).await?;
        self.session().clear();
        Ok(envelope)
    }

    /// Upload a new avatar (multipart PUT).
    pub async fn upload_avatar(&self, file: FilePayload) -> Result<Envelope<User>, ApiError> {
        validate_image_file(&file, DEFAULT_MAX_IMAGE_BYTES)?;
        let form = file.into_form("avatar")?;
        self.request(
            endpoints::AVATAR,
            RequestOptions::multipart(Method::PUT, form).with_timeout(IMAGE_TIMEOUT),
        )
        .await
    }

    /// Change the account's phone number, verified by a code.
    pub async fn update_phone(
        &self,
        data: &UpdatePhoneRequest,
    ) -> Result<Envelope<User>, ApiError> {
        self.put(endpoints::PHONE, data).await
    }

    /// Change the account's email address, verified by a code.
    pub async fn update_email(
        &self,
        data: &UpdateEmailRequest,
    ) -> Result<Envelope<User>, ApiError> {
        self.put(endpoints::EMAIL, data).await
    }
}
