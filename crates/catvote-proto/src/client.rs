//! Remote endpoint client for the voting backend.
//!
//! Request bodies are form-encoded, responses are JSON. Nothing is retried;
//! callers decide what a failure means for the screen.

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Response;
pub use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::BackendConfig;
use crate::protocol::{
    ActionOutcome, ActionResponse, BreedDetails, BreedSummary, CatImage, ErrorBody, Favorite,
    FavoritesResponse, ImageResponse, VoteAction,
};

const VOTING_PATH: &str = "/voting";
const BREED_SEARCH_PATH: &str = "/breed-search";
const FAVOURITES_PATH: &str = "/favourites";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to {context}: HTTP {status}")]
    Status {
        status: StatusCode,
        context: &'static str,
    },

    #[error("backend error: {0}")]
    Backend(String),

    #[error("invalid API key header: {0}")]
    ApiKey(#[from] reqwest::header::InvalidHeaderValue),
}

/// The five exchanges the controller needs from the backend.
#[allow(async_fn_in_trait)]
pub trait CatApi {
    async fn fetch_random_image(&self) -> Result<CatImage, ClientError>;

    async fn submit_action(
        &self,
        action: VoteAction,
        image_url: &str,
        image_id: Option<&str>,
    ) -> Result<ActionOutcome, ClientError>;

    async fn fetch_breeds(&self) -> Result<Vec<BreedSummary>, ClientError>;

    async fn fetch_breed_details(&self, breed_id: &str) -> Result<BreedDetails, ClientError>;

    async fn fetch_favorites(&self) -> Result<Vec<Favorite>, ClientError>;
}

/// reqwest-backed [`CatApi`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(config: &BackendConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            let mut value = HeaderValue::from_str(key)?;
            value.set_sensitive(true);
            headers.insert("x-api-key", value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl CatApi for HttpClient {
    async fn fetch_random_image(&self) -> Result<CatImage, ClientError> {
        let response = self.http.get(self.url(VOTING_PATH)).send().await?;
        let body: ImageResponse = read_json(response, "fetch random image").await?;
        body.into_image().map_err(ClientError::Backend)
    }

    async fn submit_action(
        &self,
        action: VoteAction,
        image_url: &str,
        image_id: Option<&str>,
    ) -> Result<ActionOutcome, ClientError> {
        let mut form = vec![("action", action.as_str()), ("image_url", image_url)];
        if let Some(id) = image_id {
            form.push(("image_id", id));
        }
        debug!("POST {} action={}", VOTING_PATH, action.as_str());

        let response = self
            .http
            .post(self.url(VOTING_PATH))
            .form(&form)
            .send()
            .await?;
        let body: ActionResponse = read_json(response, "submit action").await?;
        let next = body.image.into_image().map_err(ClientError::Backend)?;
        Ok(ActionOutcome {
            next,
            favorites: body.favorites,
        })
    }

    async fn fetch_breeds(&self) -> Result<Vec<BreedSummary>, ClientError> {
        let response = self.http.get(self.url(BREED_SEARCH_PATH)).send().await?;
        let response = require_success(response, "fetch breeds")?;
        Ok(response.json().await?)
    }

    async fn fetch_breed_details(&self, breed_id: &str) -> Result<BreedDetails, ClientError> {
        let response = self
            .http
            .post(self.url(BREED_SEARCH_PATH))
            .form(&[("breed_id", breed_id)])
            .send()
            .await?;
        let response = require_success(response, "fetch breed details")?;
        Ok(response.json().await?)
    }

    async fn fetch_favorites(&self) -> Result<Vec<Favorite>, ClientError> {
        let response = self.http.get(self.url(FAVOURITES_PATH)).send().await?;
        match read_json(response, "fetch favorites").await? {
            FavoritesResponse::List(list) => Ok(list),
            FavoritesResponse::Error { error } => Err(ClientError::Backend(error)),
        }
    }
}

fn require_success(response: Response, context: &'static str) -> Result<Response, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status { status, context });
    }
    Ok(response)
}

/// Decode a JSON body. A failure status surfaces the backend's `error`
/// message when it sent one, otherwise the status itself.
async fn read_json<T: DeserializeOwned>(
    response: Response,
    context: &'static str,
) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => Err(ClientError::Backend(body.error)),
        Err(_) => Err(ClientError::Status { status, context }),
    }
}
