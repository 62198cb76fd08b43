// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! HTTP implementation of [`FacadeService`].
//!
//! Requests carry a client-credentials bearer token (cached until shortly
//! before expiry) and the organisation-identifying header the facade uses for
//! auditing. Expected not-found responses map to `None`; any other
//! non-success status is surfaced as [`FacadeError::Unexpected`] — there is no
//! retry or circuit breaking here, transient failures propagate to the
//! caller's generic error handling.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::permission::PermissionType;
use crate::infrastructure::config::FacadeConfig;
use crate::infrastructure::facade::types::{
    CompaniesHouseCompany, InvitationRequest, NominationRequest, OrganisationNameUpdate,
    TeamMember, UserAccount,
};
use crate::infrastructure::facade::{FacadeError, FacadeService};

/// Header naming the organisation a request acts on behalf of.
pub const ORGANISATION_HEADER: &str = "x-epr-organisation";

/// Seconds of remaining validity below which a cached token is re-acquired.
const TOKEN_EXPIRY_SKEW_SECS: i64 = 30;

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        self.expires_at > Utc::now()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PermissionUpdateBody {
    permission: PermissionType,
}

/// Typed reqwest wrapper over the facade REST API.
pub struct HttpFacadeService {
    http: Client,
    config: FacadeConfig,
    token: RwLock<Option<CachedToken>>,
}

impl HttpFacadeService {
    pub fn new(config: FacadeConfig) -> Result<Self, FacadeError> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http,
            config,
            token: RwLock::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Return a valid bearer token, acquiring a fresh one from the token
    /// endpoint when the cached token is absent or near expiry.
    async fn bearer_token(&self) -> Result<String, FacadeError> {
        if let Some(token) = self.token.read().await.as_ref() {
            if token.is_valid() {
                return Ok(token.access_token.clone());
            }
        }

        let mut guard = self.token.write().await;
        // Another request may have refreshed while we waited for the lock.
        if let Some(token) = guard.as_ref() {
            if token.is_valid() {
                return Ok(token.access_token.clone());
            }
        }

        let token_config = &self.config.token;
        let mut params = vec![
            ("grant_type", "client_credentials"),
            ("client_id", token_config.client_id.as_str()),
            ("client_secret", token_config.client_secret.as_str()),
        ];
        if let Some(scope) = token_config.scope.as_deref() {
            params.push(("scope", scope));
        }

        debug!(endpoint = %token_config.endpoint, "acquiring facade bearer token");
        let response = self
            .http
            .post(&token_config.endpoint)
            .form(&params)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(FacadeError::Token(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }
        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| FacadeError::Token(e.to_string()))?;

        let cached = CachedToken {
            access_token: body.access_token.clone(),
            expires_at: Utc::now()
                + chrono::Duration::seconds((body.expires_in - TOKEN_EXPIRY_SKEW_SECS).max(0)),
        };
        *guard = Some(cached);
        Ok(body.access_token)
    }

    async fn authorized(
        &self,
        builder: RequestBuilder,
        organisation_id: Option<Uuid>,
    ) -> Result<RequestBuilder, FacadeError> {
        let token = self.bearer_token().await?;
        let mut builder = builder.bearer_auth(token);
        if let Some(id) = organisation_id {
            builder = builder.header(ORGANISATION_HEADER, id.to_string());
        }
        Ok(builder)
    }

    /// Read a JSON body, translating 404 into `None`.
    async fn read_optional<T: serde::de::DeserializeOwned>(
        response: Response,
    ) -> Result<Option<T>, FacadeError> {
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(FacadeError::Unauthorized),
            status if status.is_success() => Ok(Some(response.json().await?)),
            status => Err(FacadeError::Unexpected(status)),
        }
    }

    /// Read a JSON body where any non-success status is unexpected.
    async fn read_json<T: serde::de::DeserializeOwned>(
        response: Response,
    ) -> Result<T, FacadeError> {
        Self::expect_success(response.status())?;
        Ok(response.json().await?)
    }

    fn expect_success(status: StatusCode) -> Result<(), FacadeError> {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(FacadeError::Unauthorized),
            status if status.is_success() => Ok(()),
            status => Err(FacadeError::Unexpected(status)),
        }
    }
}

#[async_trait]
impl FacadeService for HttpFacadeService {
    async fn get_user_account(
        &self,
        subject_email: &str,
    ) -> Result<Option<UserAccount>, FacadeError> {
        let url = self.url(&self.config.endpoints.user_accounts);
        let request = self
            .authorized(self.http.get(url).query(&[("email", subject_email)]), None)
            .await?;
        Self::read_optional(request.send().await?).await
    }

    async fn get_team_members(
        &self,
        organisation_id: Uuid,
    ) -> Result<Vec<TeamMember>, FacadeError> {
        let url = self.url(&format!(
            "{}/{}/team-members",
            self.config.endpoints.organisations, organisation_id
        ));
        let request = self
            .authorized(self.http.get(url), Some(organisation_id))
            .await?;
        Self::read_json(request.send().await?).await
    }

    async fn send_invitation(
        &self,
        organisation_id: Uuid,
        request: &InvitationRequest,
    ) -> Result<(), FacadeError> {
        let url = self.url(&format!(
            "{}/{}/invitations",
            self.config.endpoints.organisations, organisation_id
        ));
        let builder = self
            .authorized(self.http.post(url).json(request), Some(organisation_id))
            .await?;
        Self::expect_success(builder.send().await?.status())
    }

    async fn remove_team_member(
        &self,
        organisation_id: Uuid,
        person_id: Uuid,
    ) -> Result<(), FacadeError> {
        let url = self.url(&format!(
            "{}/{}/team-members/{}",
            self.config.endpoints.organisations, organisation_id, person_id
        ));
        let builder = self
            .authorized(self.http.delete(url), Some(organisation_id))
            .await?;
        Self::expect_success(builder.send().await?.status())
    }

    async fn update_permission_level(
        &self,
        organisation_id: Uuid,
        person_id: Uuid,
        permission: PermissionType,
    ) -> Result<(), FacadeError> {
        let url = self.url(&format!(
            "{}/{}/team-members/{}/permission",
            self.config.endpoints.organisations, organisation_id, person_id
        ));
        let body = PermissionUpdateBody { permission };
        let builder = self
            .authorized(self.http.put(url).json(&body), Some(organisation_id))
            .await?;
        Self::expect_success(builder.send().await?.status())
    }

    async fn nominate_delegated_person(
        &self,
        organisation_id: Uuid,
        person_id: Uuid,
        request: &NominationRequest,
    ) -> Result<(), FacadeError> {
        let url = self.url(&format!(
            "{}/{}/team-members/{}/delegated-person-nomination",
            self.config.endpoints.organisations, organisation_id, person_id
        ));
        let builder = self
            .authorized(self.http.put(url).json(request), Some(organisation_id))
            .await?;
        Self::expect_success(builder.send().await?.status())
    }

    async fn lookup_company(
        &self,
        company_number: &str,
    ) -> Result<Option<CompaniesHouseCompany>, FacadeError> {
        let url = self.url(&format!(
            "{}/{}",
            self.config.endpoints.companies_house, company_number
        ));
        let request = self.authorized(self.http.get(url), None).await?;
        Self::read_optional(request.send().await?).await
    }

    async fn update_organisation_name(
        &self,
        organisation_id: Uuid,
        update: &OrganisationNameUpdate,
    ) -> Result<(), FacadeError> {
        let url = self.url(&format!(
            "{}/{}/name",
            self.config.endpoints.organisations, organisation_id
        ));
        let builder = self
            .authorized(self.http.put(url).json(update), Some(organisation_id))
            .await?;
        Self::expect_success(builder.send().await?.status())
    }
}
