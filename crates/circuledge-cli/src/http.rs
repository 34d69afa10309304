//! HTTP client for the Circuledge note server

use std::time::Duration;

use async_trait::async_trait;
use circuledge_core::models::{Channel, NoteId, RevisionedSnapshot, UserSettings};
use circuledge_core::store::NoteQuery;
use circuledge_core::util::compact_message;
use circuledge_core::wire::{CreatedNote, HistoryQuery, NoteList, UpdateNoteRequest};
use circuledge_core::workflow::{NoteTransport, SaveOutcome};
use circuledge_core::{Error, Result};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::CliError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct HttpClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(base_url: String) -> std::result::Result<Self, CliError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { base_url, client })
    }

    pub async fn list_notes(&self, query: &NoteQuery) -> Result<NoteList> {
        let response = send(self.client.get(self.url("/api/notes")).query(&query.to_pairs())).await?;
        json_or_error(response).await
    }

    pub async fn create_note(&self) -> Result<CreatedNote> {
        let response = send(self.client.post(self.url("/api/notes"))).await?;
        json_or_error(response).await
    }

    /// `false` when the note did not exist
    pub async fn delete_note(&self, id: &NoteId) -> Result<bool> {
        let response = send(self.client.delete(self.note_url(id))).await?;
        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => {
                let body = response.text().await.map_err(unavailable)?;
                Err(status_error(status, &body))
            }
        }
    }

    pub async fn channels(&self) -> Result<Vec<Channel>> {
        let response = send(self.client.get(self.url("/api/channels"))).await?;
        json_or_error(response).await
    }

    pub async fn history(&self, query: &HistoryQuery) -> Result<NoteList> {
        let response = send(self.client.get(self.url("/api/me/history")).query(query)).await?;
        json_or_error(response).await
    }

    pub async fn settings(&self) -> Result<UserSettings> {
        let response = send(self.client.get(self.url("/api/me/settings"))).await?;
        json_or_error(response).await
    }

    pub async fn update_settings(&self, settings: &UserSettings) -> Result<UserSettings> {
        let response = send(self.client.put(self.url("/api/me/settings")).json(settings)).await?;
        json_or_error(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn note_url(&self, id: &NoteId) -> String {
        self.url(&format!("/api/notes/{id}"))
    }
}

#[async_trait]
impl NoteTransport for HttpClient {
    async fn read_note(&self, id: &NoteId) -> Result<Option<RevisionedSnapshot>> {
        let response = send(self.client.get(self.note_url(id))).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        json_or_error(response).await.map(Some)
    }

    async fn update_note(&self, id: &NoteId, request: &UpdateNoteRequest) -> Result<SaveOutcome> {
        let response = send(self.client.put(self.note_url(id)).json(request)).await?;
        let status = response.status();
        let body = response.text().await.map_err(unavailable)?;
        save_outcome(status, &body)
    }
}

/// Map an update response onto the logical save outcomes
pub fn save_outcome(status: StatusCode, body: &str) -> Result<SaveOutcome> {
    match status {
        StatusCode::NO_CONTENT | StatusCode::OK => Ok(SaveOutcome::Saved),
        StatusCode::CONFLICT => serde_json::from_str(body)
            .map(SaveOutcome::Conflict)
            .map_err(|error| Error::Unavailable(format!("unreadable conflict response: {error}"))),
        StatusCode::NOT_FOUND => Ok(SaveOutcome::Missing),
        status => Err(status_error(status, body)),
    }
}

pub fn status_error(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map_or_else(|_| compact_message(body), |parsed| parsed.error);
    match status {
        StatusCode::BAD_REQUEST => Error::Malformed(message),
        StatusCode::NOT_FOUND => Error::NotFound(message),
        status => Error::Unavailable(format!("server returned {status}: {message}")),
    }
}

async fn send(request: RequestBuilder) -> Result<Response> {
    request.send().await.map_err(unavailable)
}

async fn json_or_error<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await.map_err(unavailable)?;
    if !status.is_success() {
        return Err(status_error(status, &body));
    }
    serde_json::from_str(&body)
        .map_err(|error| Error::Unavailable(format!("unexpected response body: {error}")))
}

fn unavailable(error: reqwest::Error) -> Error {
    tracing::debug!(%error, "Request failed");
    Error::Unavailable(error.to_string())
}
