//! REST client for the controller's `/api` endpoints.
//!
//! Every request carries HTTP basic auth and `Accept: application/json`.
//! Lookups of a single entity map `404` to `None`; any other non-2xx
//! response becomes [`Hc2ApiError::ApiError`].

use std::time::Duration;

use hc2_core::sync::{CreatedScene, PutOutcome, SceneStore};
use hc2_core::{DebugMessage, SceneAction, SceneRecord, LUA_SCENE_TYPE};
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::Hc2Config;
use crate::models::{
    render_connection_summary, Device, GlobalVariable, Hc2Info, Hc2Network, LoginStatus, Room,
    Section,
};

/// Timeout applied to every request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the controller REST layer.
#[derive(Debug, thiserror::Error)]
pub enum Hc2ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The controller returned a non-2xx status code.
    #[error("Controller API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// A scene action was answered with an error message.
    #[error("Controller rejected the action: {0}")]
    ActionRejected(String),

    /// The configured base URL cannot carry a request path.
    #[error("Invalid controller URL: {0}")]
    InvalidUrl(String),
}

/// Body of `POST /scenes`.
#[derive(Debug, Serialize)]
struct NewScene<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    object_type: &'a str,
}

/// The part of a freshly created scene we care about.
#[derive(Debug, Deserialize)]
struct CreatedSceneResponse {
    id: i64,
    #[serde(rename = "type", default)]
    object_type: String,
}

/// HTTP client for one controller.
#[derive(Debug, Clone)]
pub struct Hc2Client {
    client: reqwest::Client,
    api_url: String,
    username: String,
    password: String,
}

impl Hc2Client {
    /// Build a client for the controller described by `config`.
    pub fn new(config: &Hc2Config) -> Result<Self, Hc2ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &Hc2Config) -> Self {
        Self {
            client,
            api_url: format!("{}/api", config.base_url.trim_end_matches('/')),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }

    // ---- scenes ----

    /// All scenes (without their Lua bodies).
    pub async fn all_scenes(&self) -> Result<Vec<SceneRecord>, Hc2ApiError> {
        self.get_json("/scenes").await
    }

    /// One scene including its Lua body, `None` if it does not exist.
    pub async fn scene(&self, scene_id: i64) -> Result<Option<SceneRecord>, Hc2ApiError> {
        self.get_optional(&format!("/scenes/{scene_id}")).await
    }

    /// Overwrite a scene. Reports [`PutOutcome::Missing`] when the id is
    /// unknown to the controller.
    pub async fn put_scene(&self, scene: &SceneRecord) -> Result<PutOutcome, Hc2ApiError> {
        let response = self
            .request(Method::PUT, &format!("/scenes/{}", scene.wire_id()))
            .json(scene)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(PutOutcome::Missing);
        }
        Self::ensure_success(response).await?;
        Ok(PutOutcome::Updated)
    }

    /// Create an empty Lua scene called `name`.
    pub async fn create_scene(&self, name: &str) -> Result<CreatedScene, Hc2ApiError> {
        let body = NewScene {
            name,
            object_type: LUA_SCENE_TYPE,
        };
        let response = self
            .request(Method::POST, "/scenes")
            .json(&body)
            .send()
            .await?;
        let created: CreatedSceneResponse = Self::parse_response(response).await?;
        Ok(CreatedScene {
            id: created.id,
            object_type: created.object_type,
        })
    }

    /// Trigger `action` on a scene.
    pub async fn scene_action(
        &self,
        scene_id: i64,
        action: SceneAction,
    ) -> Result<(), Hc2ApiError> {
        let response = self
            .request(
                Method::POST,
                &format!("/scenes/{scene_id}/action/{}", action.as_str()),
            )
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let body = response.text().await?;
        if !body.trim().is_empty() {
            return Err(Hc2ApiError::ActionRejected(body));
        }
        tracing::debug!(scene_id, %action, "Scene action accepted");
        Ok(())
    }

    /// The scene's debug console, empty when the scene does not exist.
    pub async fn debug_messages(&self, scene_id: i64) -> Result<Vec<DebugMessage>, Hc2ApiError> {
        Ok(self
            .get_optional(&format!("/scenes/{scene_id}/debugMessages"))
            .await?
            .unwrap_or_default())
    }

    // ---- rooms, sections, devices, variables ----

    pub async fn room(&self, room_id: i64) -> Result<Option<Room>, Hc2ApiError> {
        self.get_optional(&format!("/rooms/{room_id}")).await
    }

    pub async fn section(&self, section_id: i64) -> Result<Option<Section>, Hc2ApiError> {
        self.get_optional(&format!("/sections/{section_id}")).await
    }

    pub async fn devices(&self) -> Result<Vec<Device>, Hc2ApiError> {
        self.get_json("/devices").await
    }

    pub async fn device(&self, device_id: i64) -> Result<Option<Device>, Hc2ApiError> {
        self.get_optional(&format!("/devices/{device_id}")).await
    }

    pub async fn global_variables(&self) -> Result<Vec<GlobalVariable>, Hc2ApiError> {
        self.get_json("/globalVariables").await
    }

    pub async fn global_variable(&self, name: &str) -> Result<Option<GlobalVariable>, Hc2ApiError> {
        let url = self.endpoint(&["globalVariables", name])?;
        Self::read_optional(self.request_to(Method::GET, url)).await
    }

    // ---- settings ----

    pub async fn settings_info(&self) -> Result<Hc2Info, Hc2ApiError> {
        self.get_json("/settings/info").await
    }

    pub async fn settings_network(&self) -> Result<Hc2Network, Hc2ApiError> {
        self.get_json("/settings/network").await
    }

    /// Login status of the configured user. A refused login yields the raw
    /// response body as the error value.
    pub async fn login_status(&self) -> Result<Result<LoginStatus, String>, Hc2ApiError> {
        let response = self.request(Method::GET, "/loginStatus").send().await?;
        let body = response.text().await?;

        match serde_json::from_str::<LoginStatus>(&body) {
            Ok(status) if !status.username.is_empty() => Ok(Ok(status)),
            _ => Ok(Err(body)),
        }
    }

    /// Controller name, versions, address and logged-in user as text.
    pub async fn connection_summary(&self, indent: usize) -> Result<String, Hc2ApiError> {
        let info = self.settings_info().await?;
        let network = self.settings_network().await?;
        let login = self.login_status().await?;
        Ok(render_connection_summary(
            &info,
            &network,
            login.as_ref().map_err(String::as_str),
            indent,
        ))
    }

    // ---- private helpers ----

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_to(method, format!("{}{}", self.api_url, path))
    }

    fn request_to(
        &self,
        method: Method,
        url: impl reqwest::IntoUrl + std::fmt::Display,
    ) -> RequestBuilder {
        tracing::trace!(%method, %url, "Controller request");
        self.client
            .request(method, url)
            .header(ACCEPT, "application/json")
            .basic_auth(&self.username, Some(&self.password))
    }

    /// API URL with `segments` appended, each percent-encoded as a single
    /// path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, Hc2ApiError> {
        let mut url = reqwest::Url::parse(&self.api_url)
            .map_err(|e| Hc2ApiError::InvalidUrl(format!("{}: {e}", self.api_url)))?;
        url.path_segments_mut()
            .map_err(|()| Hc2ApiError::InvalidUrl(self.api_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Hc2ApiError> {
        let response = self.request(Method::GET, path).send().await?;
        Self::parse_response(response).await
    }

    /// GET a single entity; `404` and an empty body both mean "absent".
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, Hc2ApiError> {
        Self::read_optional(self.request(Method::GET, path)).await
    }

    async fn read_optional<T: DeserializeOwned>(
        request: RequestBuilder,
    ) -> Result<Option<T>, Hc2ApiError> {
        let response = request.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| Hc2ApiError::ApiError {
                status: StatusCode::OK.as_u16(),
                body: format!("unexpected response body: {e}"),
            })
    }

    /// Return the response unchanged on success, or an
    /// [`Hc2ApiError::ApiError`] with status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, Hc2ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(Hc2ApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, Hc2ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

impl SceneStore for Hc2Client {
    type Error = Hc2ApiError;

    async fn list_scenes(&self) -> Result<Vec<SceneRecord>, Hc2ApiError> {
        self.all_scenes().await
    }

    async fn get_scene(&self, id: i64) -> Result<Option<SceneRecord>, Hc2ApiError> {
        self.scene(id).await
    }

    async fn create_scene(&self, name: &str) -> Result<CreatedScene, Hc2ApiError> {
        Hc2Client::create_scene(self, name).await
    }

    async fn put_scene(&self, record: &SceneRecord) -> Result<PutOutcome, Hc2ApiError> {
        Hc2Client::put_scene(self, record).await
    }
}
