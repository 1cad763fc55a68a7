//! SmartAPI REST Client
//!
//! reqwest-based [`ProviderPort`] adapter speaking the Angel One SmartAPI
//! REST protocol. Every call is bounded by the configured timeout.
//!
//! The opaque session handle issued by this adapter carries the API key
//! the session was created with; SmartAPI requires it as the
//! `X-PrivateKey` header on every subsequent call, alongside the JWT
//! bearer token.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::application::ports::{LtpData, ProviderError, ProviderPort, ProviderSession};
use crate::domain::session::{Credentials, Session, SessionHandle};
use crate::infrastructure::config::SmartApiSettings;

use super::messages::{
    ApiEnvelope, LoginRequestBody, LogoutRequestBody, LtpRequestBody, TokenData,
};

// =============================================================================
// Endpoints
// =============================================================================

const LOGIN_PATH: &str = "/rest/auth/angelbroking/user/v1/loginByPassword";
const LOGOUT_PATH: &str = "/rest/secure/angelbroking/user/v1/logout";
const LTP_PATH: &str = "/rest/secure/angelbroking/order/v1/getLtpData";
const PROFILE_PATH: &str = "/rest/secure/angelbroking/user/v1/getProfile";

// =============================================================================
// Client
// =============================================================================

/// SmartAPI REST adapter.
pub struct SmartApiClient {
    http: Client,
    base_url: String,
}

impl SmartApiClient {
    /// Build a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the underlying HTTP client cannot be built.
    pub fn new(settings: &SmartApiSettings) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(into_transport)?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a request with the header set SmartAPI requires on every call.
    fn request(
        &self,
        method: Method,
        path: &str,
        api_key: &str,
        jwt: Option<&str>,
    ) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{path}", self.base_url))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header("X-UserType", "USER")
            .header("X-SourceID", "WEB")
            .header("X-ClientLocalIP", "127.0.0.1")
            .header("X-ClientPublicIP", "127.0.0.1")
            .header("X-MACAddress", "00:00:00:00:00:00")
            .header("X-PrivateKey", api_key);

        if let Some(jwt) = jwt {
            builder = builder.header("Authorization", format!("Bearer {jwt}"));
        }

        builder
    }

    async fn send_enveloped<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<ApiEnvelope<T>, ProviderError> {
        let body = self.send_raw(builder).await?;
        serde_json::from_str(&body).map_err(|error| ProviderError::Decode(error.to_string()))
    }

    async fn send_raw(&self, builder: RequestBuilder) -> Result<String, ProviderError> {
        let response = builder.send().await.map_err(into_transport)?;
        let status = response.status();
        let body = response.text().await.map_err(into_transport)?;

        if !status.is_success() {
            return Err(ProviderError::Transport(format!("HTTP {status}: {body}")));
        }

        Ok(body)
    }
}

fn into_transport(error: reqwest::Error) -> ProviderError {
    ProviderError::Transport(error.to_string())
}

// =============================================================================
// Provider Port Implementation
// =============================================================================

#[async_trait]
impl ProviderPort for SmartApiClient {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<ProviderSession, ProviderError> {
        let body = LoginRequestBody {
            clientcode: credentials.client_id.as_str(),
            password: &credentials.pin,
            totp: credentials.totp.as_deref().unwrap_or(""),
        };

        let envelope: ApiEnvelope<TokenData> = self
            .send_enveloped(
                self.request(Method::POST, LOGIN_PATH, &credentials.api_key, None)
                    .json(&body),
            )
            .await?;

        if !envelope.status {
            return Err(ProviderError::Rejected(envelope.message_or("Login failed")));
        }

        let data = envelope
            .data
            .ok_or_else(|| ProviderError::Decode("login response missing token data".to_string()))?;

        Ok(ProviderSession {
            handle: SessionHandle::new(credentials.api_key.clone()),
            jwt_token: data.jwt_token,
            refresh_token: data.refresh_token,
            feed_token: data.feed_token,
        })
    }

    async fn terminate(&self, session: &Session) -> Result<(), ProviderError> {
        let body = LogoutRequestBody {
            clientcode: session.client_id.as_str(),
        };

        let envelope: ApiEnvelope<serde_json::Value> = self
            .send_enveloped(
                self.request(
                    Method::POST,
                    LOGOUT_PATH,
                    session.handle.as_str(),
                    Some(&session.jwt_token),
                )
                .json(&body),
            )
            .await?;

        if !envelope.status {
            return Err(ProviderError::Rejected(envelope.message_or("Logout failed")));
        }

        Ok(())
    }

    async fn last_traded_price(
        &self,
        session: &Session,
        exchange: &str,
        symbol: &str,
        token: &str,
    ) -> Result<LtpData, ProviderError> {
        let body = LtpRequestBody {
            exchange,
            tradingsymbol: symbol,
            symboltoken: token,
        };

        let envelope: ApiEnvelope<LtpData> = self
            .send_enveloped(
                self.request(
                    Method::POST,
                    LTP_PATH,
                    session.handle.as_str(),
                    Some(&session.jwt_token),
                )
                .json(&body),
            )
            .await?;

        if !envelope.status {
            return Err(ProviderError::Rejected(
                envelope.message_or("Quote fetch failed"),
            ));
        }

        envelope
            .data
            .ok_or_else(|| ProviderError::Decode("quote response missing data".to_string()))
    }

    async fn profile(&self, session: &Session) -> Result<serde_json::Value, ProviderError> {
        // The profile payload is opaque to the core: the full envelope is
        // handed back to the caller as-is.
        let body = self
            .send_raw(self.request(
                Method::GET,
                PROFILE_PATH,
                session.handle.as_str(),
                Some(&session.jwt_token),
            ))
            .await?;

        serde_json::from_str(&body).map_err(|error| ProviderError::Decode(error.to_string()))
    }
}
