use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use circuledge_core::conflict::{ConflictDetector, SubmitOutcome};
use circuledge_core::models::{Channel, NoteId, RevisionedSnapshot, UserSettings};
use circuledge_core::store::{MemoryStore, NoteQuery, RevisionStore, SettingsRepository};
use circuledge_core::util::unix_millis_now;
use circuledge_core::wire::{CreatedNote, HistoryQuery, NoteList, UpdateNoteRequest};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    store: Arc<MemoryStore>,
    detector: ConflictDetector<MemoryStore>,
}

impl AppState {
    pub fn from_config(config: Arc<AppConfig>) -> Self {
        let store_config = config.store_config();
        let conflict_test = store_config.conflict_test.clone();
        let store = Arc::new(MemoryStore::new(store_config));
        Self {
            detector: ConflictDetector::new(Arc::clone(&store), conflict_test),
            store,
            config,
        }
    }
}

pub fn app_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route(
            "/notes/{id}",
            get(read_note).put(update_note).delete(delete_note),
        )
        .route("/channels", get(list_channels))
        .route("/me/history", get(history))
        .route("/me/settings", get(get_settings).put(put_settings));

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: i64,
    notes: usize,
}

async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: unix_millis_now(),
        notes: state.store.len(),
    })
}

async fn list_notes(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<NoteList>, AppError> {
    let Query(pairs) = query?;
    let query = NoteQuery::from_pairs(pairs)?;
    let page = state.store.list(&query)?;
    Ok(Json(page.into()))
}

async fn create_note(State(state): State<AppState>) -> (StatusCode, Json<CreatedNote>) {
    let note = state.store.create();
    (StatusCode::CREATED, Json(CreatedNote::from(&note)))
}

async fn read_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RevisionedSnapshot>, AppError> {
    let id = parse_note_id(&id)?;
    let note = state
        .store
        .read(&id)
        .ok_or_else(|| AppError::not_found(id.to_string()))?;
    Ok(Json(note.snapshot()))
}

async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let id = parse_note_id(&id)?;
    let Json(request) = request?;

    match state.detector.submit_update(&id, &request)? {
        SubmitOutcome::Saved(_) => Ok(StatusCode::NO_CONTENT.into_response()),
        SubmitOutcome::Conflict(payload) => {
            Ok((StatusCode::CONFLICT, Json(payload)).into_response())
        }
        SubmitOutcome::NotFound => Err(AppError::not_found(id.to_string())),
    }
}

async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_note_id(&id)?;
    if state.store.delete(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(id.to_string()))
    }
}

async fn list_channels(State(state): State<AppState>) -> Json<Vec<Channel>> {
    Json(state.store.channels())
}

async fn history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<NoteList>, AppError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(state.config.history_page_limit);
    Ok(Json(state.store.history(limit, query.offset).into()))
}

async fn get_settings(State(state): State<AppState>) -> Json<UserSettings> {
    Json(state.store.settings())
}

async fn put_settings(
    State(state): State<AppState>,
    settings: Result<Json<UserSettings>, JsonRejection>,
) -> Result<Json<UserSettings>, AppError> {
    let Json(settings) = settings?;
    Ok(Json(state.store.update_settings(settings)?))
}

fn parse_note_id(raw: &str) -> Result<NoteId, AppError> {
    raw.parse()
        .map_err(|_| AppError::bad_request(format!("invalid note id: {raw}")))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    fn router_with(config: AppConfig) -> Router {
        app_router(AppState::from_config(Arc::new(config)))
    }

    fn router() -> Router {
        router_with(AppConfig::default())
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create(router: &Router) -> Value {
        let (status, created) = send(router, Method::POST, "/api/notes", None).await;
        assert_eq!(status, StatusCode::CREATED);
        created
    }

    fn update_body(snapshot: &Value, body: &str) -> Value {
        json!({
            "revision": snapshot["revision"],
            "channel": snapshot["channel"],
            "permission": snapshot["permission"],
            "body": body,
        })
    }

    #[tokio::test]
    async fn healthz_reports_note_count() {
        let router = router();
        create(&router).await;

        let (status, body) = send(&router, Method::GET, "/healthz", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["notes"], 1);
    }

    #[tokio::test]
    async fn create_read_update_then_stale_update_conflicts() {
        let router = router();
        let created = create(&router).await;
        let uri = format!("/api/notes/{}", created["id"].as_str().unwrap());

        let (status, r0) = send(&router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(r0["revision"], created["revision"]);
        assert_eq!(r0["permission"], "private");
        assert!(r0["createdAt"].is_i64());

        let (status, body) = send(&router, Method::PUT, &uri, Some(update_body(&r0, "new"))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (_, r1) = send(&router, Method::GET, &uri, None).await;
        assert_ne!(r1["revision"], r0["revision"]);
        assert_eq!(r1["body"], "new");

        let (status, conflict) =
            send(&router, Method::PUT, &uri, Some(update_body(&r0, "again"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(conflict["latest-revision"], r1["revision"]);
        assert_eq!(conflict["channel"], r1["channel"]);
        assert_eq!(conflict["diff"], "- new\n+ again");
    }

    #[tokio::test]
    async fn update_rejects_malformed_bodies() {
        let router = router();
        let created = create(&router).await;
        let uri = format!("/api/notes/{}", created["id"].as_str().unwrap());
        let (_, snapshot) = send(&router, Method::GET, &uri, None).await;

        let mut missing_revision = update_body(&snapshot, "x");
        missing_revision.as_object_mut().unwrap().remove("revision");
        let (status, body) = send(&router, Method::PUT, &uri, Some(missing_revision)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let mut unknown_channel = update_body(&snapshot, "x");
        unknown_channel["channel"] = json!(NoteId::new().to_string());
        let (status, _) = send(&router, Method::PUT, &uri, Some(unknown_channel)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&router, Method::GET, "/api/notes/not-a-note", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_notes_are_not_found() {
        let router = router();
        let created = create(&router).await;
        let (_, snapshot) = send(
            &router,
            Method::GET,
            &format!("/api/notes/{}", created["id"].as_str().unwrap()),
            None,
        )
        .await;
        let uri = format!("/api/notes/{}", NoteId::new());

        let (status, _) = send(&router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&router, Method::PUT, &uri, Some(update_body(&snapshot, "x"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_removes_note_and_history_entry() {
        let router = router();
        let created = create(&router).await;
        let uri = format!("/api/notes/{}", created["id"].as_str().unwrap());

        let (status, _) = send(&router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, history) = send(&router, Method::GET, "/api/me/history", None).await;
        assert_eq!(history["total"], 0);
    }

    #[tokio::test]
    async fn conflict_test_channel_always_returns_conflict() {
        let router = router_with(AppConfig {
            conflict_test_channels: true,
            ..AppConfig::default()
        });
        let (_, channels) = send(&router, Method::GET, "/api/channels", None).await;
        let test_channel = channels
            .as_array()
            .unwrap()
            .iter()
            .find(|channel| channel["path"] == "test/conflict")
            .unwrap()["id"]
            .clone();

        let created = create(&router).await;
        let uri = format!("/api/notes/{}", created["id"].as_str().unwrap());
        let (_, snapshot) = send(&router, Method::GET, &uri, None).await;
        let mut moved = update_body(&snapshot, "# Shared");
        moved["channel"] = test_channel;
        let (status, _) = send(&router, Method::PUT, &uri, Some(moved)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, current) = send(&router, Method::GET, &uri, None).await;
        let (status, conflict) =
            send(&router, Method::PUT, &uri, Some(update_body(&current, "# Shared\nmine"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_ne!(conflict["latest-revision"], current["revision"]);
        assert!(conflict["diff"].as_str().unwrap().contains("+ mine"));
    }

    #[tokio::test]
    async fn list_filters_and_reports_total() {
        let router = router();
        for body in ["# Alpha\n#rust", "# Beta\n#rust", "# Gamma\n#go"] {
            let created = create(&router).await;
            let uri = format!("/api/notes/{}", created["id"].as_str().unwrap());
            let (_, snapshot) = send(&router, Method::GET, &uri, None).await;
            send(&router, Method::PUT, &uri, Some(update_body(&snapshot, body))).await;
        }

        let (status, page) = send(
            &router,
            Method::GET,
            "/api/notes?tag=rust&sortkey=titleAsc&limit=1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 2);
        assert_eq!(page["notes"].as_array().unwrap().len(), 1);
        assert_eq!(page["notes"][0]["title"], "Alpha");
        assert_eq!(page["notes"][0]["tags"], json!(["rust"]));
        assert_eq!(page["notes"][0]["summary"], "Alpha #rust");

        let (status, page) = send(
            &router,
            Method::GET,
            "/api/notes?tag=rust&tag=go&sortkey=titleDesc",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 3);
        assert_eq!(page["notes"][0]["title"], "Gamma");

        let (status, _) = send(&router, Method::GET, "/api/notes?sortkey=newest", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&router, Method::GET, "/api/notes?title=(", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("title pattern"));
    }

    #[tokio::test]
    async fn history_lists_most_recent_reads_first() {
        let router = router();
        let x = create(&router).await;
        let y = create(&router).await;
        let x_id = x["id"].as_str().unwrap();
        let y_id = y["id"].as_str().unwrap();

        for id in [x_id, y_id, x_id] {
            send(&router, Method::GET, &format!("/api/notes/{id}"), None).await;
        }

        let (status, history) = send(&router, Method::GET, "/api/me/history", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history["total"], 2);
        assert_eq!(history["notes"][0]["id"], x_id);
        assert_eq!(history["notes"][1]["id"], y_id);

        let (_, page) = send(&router, Method::GET, "/api/me/history?limit=1&offset=1", None).await;
        assert_eq!(page["notes"][0]["id"], y_id);
    }

    #[tokio::test]
    async fn settings_control_default_channel() {
        let router = router();
        let (_, channels) = send(&router, Method::GET, "/api/channels", None).await;
        let test_channel = channels
            .as_array()
            .unwrap()
            .iter()
            .find(|channel| channel["path"] == "test/conflict")
            .unwrap()["id"]
            .clone();

        let (status, settings) = send(
            &router,
            Method::PUT,
            "/api/me/settings",
            Some(json!({ "defaultChannel": test_channel })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(settings["defaultChannel"], test_channel);

        let created = create(&router).await;
        assert_eq!(created["channel"], test_channel);

        let (status, _) = send(
            &router,
            Method::PUT,
            "/api/me/settings",
            Some(json!({ "defaultChannel": NoteId::new().to_string() })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, current) = send(&router, Method::GET, "/api/me/settings", None).await;
        assert_eq!(current["defaultChannel"], test_channel);
    }
}
