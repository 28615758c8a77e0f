//! CRUD HTTP Routes
//!
//! List page, form submissions, delete and the AJAX lookup used by the
//! edit button.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};

use super::errors::{HttpError, HttpResult};
use super::view::{PageView, Pagination, Templates};
use crate::schema::Schema;
use crate::store::{PageRequest, RecordRepository, StoreError};
use crate::validation::{self, mask, FieldErrors, FormValues};

pub const SAVE_FAILED_MESSAGE: &str = "Erro interno ao salvar. Verifique se os dados estão corretos.";
pub const UPDATE_FAILED_MESSAGE: &str = "Erro interno ao atualizar.";

const MAIN_JS: &str = include_str!("static/main.js");

// ==================
// Shared State
// ==================

/// Read-only state shared by every handler
pub struct AppState {
    pub schema: Arc<Schema>,
    pub repo: Arc<dyn RecordRepository>,
    pub templates: Templates,
    pub page_size: usize,
}

impl AppState {
    pub fn new(
        schema: Arc<Schema>,
        repo: Arc<dyn RecordRepository>,
        page_size: usize,
    ) -> Result<Self, minijinja::Error> {
        Ok(Self {
            schema,
            repo,
            templates: Templates::new()?,
            page_size,
        })
    }
}

// ==================
// Request/Response Types
// ==================

/// Query string accepted by every route
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

impl PageQuery {
    /// Unparseable or non-positive pages fall back to the first page.
    pub fn page_request(&self, size: usize) -> PageRequest {
        let page = self
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1);
        PageRequest::new(page, self.search.clone().unwrap_or_default()).with_size(size)
    }

    fn id(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ==================
// Routers
// ==================

pub fn crud_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_handler))
        .route("/create", post(create_handler))
        .route("/update", post(update_handler))
        .route("/delete", post(delete_handler))
        .route("/get", get(get_handler))
        .route("/static/main.js", get(script_handler))
        .with_state(state)
}

pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

// ==================
// Handlers
// ==================

async fn list_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> HttpResult<Html<String>> {
    render_list(&state, &query, None).await
}

async fn create_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let form = FormValues::from_pairs(pairs);

    let clean = match validation::validate(&form, &state.schema).into_result() {
        Ok(clean) => clean,
        Err(errors) => return reject(&state, &query, &form, &errors).await,
    };

    match state.repo.create(&clean).await {
        Ok(id) => {
            tracing::info!(table = %state.schema.table_name, id = ?id, "record created");
            Ok(redirect_home())
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to create record");
            let mut errors = FieldErrors::new();
            errors.set_form_error(SAVE_FAILED_MESSAGE);
            reject(&state, &query, &form, &errors).await
        }
    }
}

async fn update_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let form = FormValues::from_pairs(pairs);

    let raw_id = match form.get("id") {
        "" => query.id(),
        id => id,
    };
    if raw_id.is_empty() {
        return Err(HttpError::MissingId);
    }

    let clean = match validation::validate(&form, &state.schema).into_result() {
        Ok(clean) => clean,
        Err(errors) => return reject(&state, &query, &form, &errors).await,
    };

    let id = state.schema.parse_key(raw_id)?;

    match state.repo.update(&id, &clean).await {
        Ok(()) => {
            tracing::info!(table = %state.schema.table_name, id = %id, "record updated");
            Ok(redirect_home())
        }
        Err(err) => {
            tracing::error!(error = %err, id = %id, "failed to update record");
            let mut errors = FieldErrors::new();
            errors.set_form_error(UPDATE_FAILED_MESSAGE);
            reject(&state, &query, &form, &errors).await
        }
    }
}

async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> HttpResult<Response> {
    if query.id().is_empty() {
        return Err(HttpError::MissingId);
    }
    let id = state.schema.parse_key(query.id())?;

    state.repo.delete(&id).await.map_err(|err| match err {
        StoreError::NotFound => HttpError::NotFound,
        other => HttpError::Delete(other),
    })?;

    tracing::info!(table = %state.schema.table_name, id = %id, "record deleted");
    Ok(redirect_home())
}

async fn get_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> HttpResult<Response> {
    if query.id().is_empty() {
        return Err(HttpError::MissingId);
    }
    let id = state.schema.parse_key(query.id())?;

    let mut record = state.repo.find_by_id(&id).await.map_err(|err| match err {
        StoreError::NotFound => HttpError::NotFound,
        other => HttpError::Lookup(other),
    })?;
    mask::format_record(&state.schema, &mut record);

    Ok(Json(record).into_response())
}

async fn script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        MAIN_JS,
    )
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

// ==================
// Rendering
// ==================

async fn render_list(
    state: &AppState,
    query: &PageQuery,
    submission: Option<(&FormValues, &FieldErrors)>,
) -> HttpResult<Html<String>> {
    let request = query.page_request(state.page_size);
    let mut page = state
        .repo
        .find_all(&request)
        .await
        .map_err(HttpError::Fetch)?;
    mask::format_records(&state.schema, &mut page.records);

    let pagination = Pagination::new(request.page, request.total_pages(page.total), page.total);
    let mut view = PageView::new(&state.schema, &page.records, &request.search, pagination);
    if let Some((form, errors)) = submission {
        view = view.with_submission(&state.schema, form, errors);
    }

    Ok(Html(state.templates.render_page(&view)?))
}

/// Re-renders the list page with the rejected submission
async fn reject(
    state: &AppState,
    query: &PageQuery,
    form: &FormValues,
    errors: &FieldErrors,
) -> HttpResult<Response> {
    tracing::debug!(errors = errors.len(), "submission rejected");
    let html = render_list(state, query, Some((form, errors))).await?;
    Ok((StatusCode::BAD_REQUEST, html).into_response())
}

fn redirect_home() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, search: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(String::from),
            search: search.map(String::from),
            id: None,
        }
    }

    #[test]
    fn test_page_request_from_query() {
        let request = query(Some("3"), Some("ana")).page_request(10);
        assert_eq!(request.page, 3);
        assert_eq!(request.search, "ana");
        assert_eq!(request.offset(), 20);
    }

    #[test]
    fn test_bad_page_falls_back_to_first() {
        assert_eq!(query(Some("abc"), None).page_request(10).page, 1);
        assert_eq!(query(Some("-2"), None).page_request(10).page, 1);
        assert_eq!(query(None, None).page_request(10).page, 1);
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
    }
}
