// Blog Listings - REST API with Axum
// Read-only handlers over the shared, immutable dataset

use crate::dataset::{Dataset, Record};
use crate::pagination::{paginate, PageQuery, PageRequest, PaginationError};
use crate::summary;
use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    dataset: Arc<Dataset>,
}

/// `{ blogs: [...] }`
#[derive(Serialize)]
struct BlogList<'a> {
    blogs: &'a [Record],
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Blog not found")]
    NotFound,

    #[error("Invalid blog id {0:?}")]
    InvalidId(String),

    #[error(transparent)]
    InvalidQuery(#[from] PaginationError),

    /// Query string or path segment axum could not extract
    #[error("{0}")]
    Malformed(String),

    #[error("Route not found")]
    UnknownRoute,
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound | ApiError::UnknownRoute => StatusCode::NOT_FOUND,
            ApiError::InvalidId(_) | ApiError::InvalidQuery(_) | ApiError::Malformed(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(status = status.as_u16(), error = %self, "request rejected");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET / - Status text
async fn root() -> &'static str {
    "Blog server is running!"
}

/// GET /paginatedBlogs?page=&limit=
async fn paginated_blogs(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let request = PageRequest::from_query(&query)?;
    let page = paginate(state.dataset.records(), request);
    Ok(Json(page).into_response())
}

/// GET /blogs - Every record, unpaginated
async fn all_blogs(State(state): State<AppState>) -> Response {
    Json(BlogList {
        blogs: state.dataset.records(),
    })
    .into_response()
}

/// GET /blogs/:Cid
async fn blog_by_id(
    State(state): State<AppState>,
    raw_cid: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(raw_cid) = raw_cid?;
    let cid: i64 = raw_cid
        .trim()
        .parse()
        .map_err(|_| ApiError::InvalidId(raw_cid.clone()))?;

    match state.dataset.find(cid) {
        Some(record) => Ok(Json(record).into_response()),
        None => {
            debug!(cid, "no blog with this id");
            Err(ApiError::NotFound)
        }
    }
}

/// GET /blogs/firstWord/:firstWord?page=&limit=
async fn blogs_by_first_word(
    State(state): State<AppState>,
    first_word: Result<Path<String>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Path(first_word) = first_word?;
    let Query(query) = query?;
    let request = PageRequest::from_query(&query)?;
    let filtered = state.dataset.by_first_word(&first_word);
    let page = paginate(&filtered, request);
    Ok(Json(page).into_response())
}

/// GET /dashboard/car-summary - Model → { count, value }
async fn car_summary(State(state): State<AppState>) -> impl IntoResponse {
    Json(summary::car_summary(state.dataset.records()))
}

/// GET /dashboard/brand-summary - Brand → { count, value }
async fn brand_summary(State(state): State<AppState>) -> impl IntoResponse {
    Json(summary::brand_summary(state.dataset.records()))
}

/// GET /dashboard/car-values - Model → value
async fn car_values(State(state): State<AppState>) -> impl IntoResponse {
    Json(summary::car_values(state.dataset.records()))
}

/// GET /dashboard/car-counts - Brand → Model → count
async fn car_counts(State(state): State<AppState>) -> impl IntoResponse {
    Json(summary::car_counts(state.dataset.records()))
}

async fn unknown_route() -> ApiError {
    ApiError::UnknownRoute
}

// ============================================================================
// Router
// ============================================================================

pub fn router(dataset: Arc<Dataset>) -> Router {
    let state = AppState { dataset };

    let dashboard = Router::new()
        .route("/car-summary", get(car_summary))
        .route("/brand-summary", get(brand_summary))
        .route("/car-values", get(car_values))
        .route("/car-counts", get(car_counts));

    Router::new()
        .route("/", get(root))
        .route("/paginatedBlogs", get(paginated_blogs))
        .route("/blogs", get(all_blogs))
        .route("/blogs/:Cid", get(blog_by_id))
        .route("/blogs/firstWord/:firstWord", get(blogs_by_first_word))
        .nest("/dashboard", dashboard)
        .fallback(unknown_route)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    fn create_test_app() -> Router {
        let records = vec![
            Record::new(1, "Toyota Camry", "Camry", "20,000"),
            Record::new(2, "Toyota Corolla", "Corolla", "18,000"),
            Record::new(3, "Honda City", "City", "9,750"),
            Record::new(4, "honda Civic", "Civic", "14,200"),
            Record::new(5, "Maruti Swift", "Swift", "5,100"),
        ];
        router(Arc::new(Dataset::from_records(records)))
    }

    async fn send(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let (status, body) = send(app, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn cids(value: &Value) -> Vec<i64> {
        value["blogs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["Cid"].as_i64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_root_status_text() {
        let (status, body) = send(create_test_app(), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"Blog server is running!");
    }

    #[tokio::test]
    async fn test_paginated_blogs_defaults() {
        let (status, json) = get_json(create_test_app(), "/paginatedBlogs").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(cids(&json), vec![1, 2, 3, 4, 5]);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["totalItems"], 5);
    }

    #[tokio::test]
    async fn test_paginated_blogs_pages_cover_all_blogs() {
        let app = create_test_app();
        let (_, all) = get_json(app.clone(), "/blogs").await;

        let mut collected = Vec::new();
        for page in 1..=3 {
            let (status, json) =
                get_json(app.clone(), &format!("/paginatedBlogs?page={page}&limit=2")).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["totalPages"], 3);
            assert!(json["blogs"].as_array().unwrap().len() <= 2);
            collected.extend(cids(&json));
        }

        assert_eq!(collected, cids(&all));
    }

    #[tokio::test]
    async fn test_paginated_blogs_past_the_end_is_empty() {
        let (status, json) = get_json(create_test_app(), "/paginatedBlogs?page=40&limit=2").await;

        assert_eq!(status, StatusCode::OK);
        assert!(cids(&json).is_empty());
        assert_eq!(json["totalItems"], 5);
    }

    #[tokio::test]
    async fn test_paginated_blogs_rejects_bad_params() {
        for uri in [
            "/paginatedBlogs?page=0",
            "/paginatedBlogs?limit=0",
            "/paginatedBlogs?limit=abc",
            "/paginatedBlogs?page=-1",
            "/blogs/firstWord/toyota?limit=nope",
        ] {
            let (status, json) = get_json(create_test_app(), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(json["error"].is_string(), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_unextractable_requests_get_json_errors() {
        for uri in [
            "/paginatedBlogs?page=1&page=2",
            "/blogs/firstWord/toyota?limit=3&limit=4",
            "/blogs/firstWord/%FF",
            "/blogs/%FF",
        ] {
            let (status, body) = send(create_test_app(), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");

            let json: Value = serde_json::from_slice(&body).unwrap();
            assert!(json["error"].is_string(), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_blog_by_id() {
        let (status, json) = get_json(create_test_app(), "/blogs/3").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!({ "Cid": 3, "NameMMT": "Honda City", "Model": "City", "Prc": "9,750" })
        );
    }

    #[tokio::test]
    async fn test_blog_by_id_not_found() {
        let (status, json) = get_json(create_test_app(), "/blogs/999").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, serde_json::json!({ "error": "Blog not found" }));
    }

    #[tokio::test]
    async fn test_blog_by_non_numeric_id() {
        let (status, json) = get_json(create_test_app(), "/blogs/abc").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("abc"));
    }

    #[tokio::test]
    async fn test_first_word_filter_is_case_insensitive() {
        let app = create_test_app();
        let (_, lower) = get_json(app.clone(), "/blogs/firstWord/honda").await;
        let (_, upper) = get_json(app, "/blogs/firstWord/HONDA").await;

        assert_eq!(lower, upper);
        assert_eq!(cids(&lower), vec![3, 4]);
        assert_eq!(lower["totalItems"], 2);
        assert_eq!(lower["totalPages"], 1);
    }

    #[tokio::test]
    async fn test_first_word_filter_paginates() {
        let (status, json) =
            get_json(create_test_app(), "/blogs/firstWord/Toyota?page=2&limit=1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(cids(&json), vec![2]);
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["totalItems"], 2);
    }

    #[tokio::test]
    async fn test_first_word_no_match() {
        let (status, json) = get_json(create_test_app(), "/blogs/firstWord/Tesla").await;

        assert_eq!(status, StatusCode::OK);
        assert!(cids(&json).is_empty());
        assert_eq!(json["totalPages"], 0);
        assert_eq!(json["totalItems"], 0);
    }

    #[tokio::test]
    async fn test_dashboard_brand_summary() {
        let (status, json) = get_json(create_test_app(), "/dashboard/brand-summary").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!({
                "HONDA": { "count": 2, "value": 23950 },
                "MARUTI": { "count": 1, "value": 5100 },
                "TOYOTA": { "count": 2, "value": 38000 }
            })
        );
    }

    #[tokio::test]
    async fn test_dashboard_model_endpoints() {
        let app = create_test_app();

        let (_, summary) = get_json(app.clone(), "/dashboard/car-summary").await;
        assert_eq!(summary["Camry"], serde_json::json!({ "count": 1, "value": 20000 }));
        assert_eq!(summary.as_object().unwrap().len(), 5);

        let (_, values) = get_json(app.clone(), "/dashboard/car-values").await;
        let total: i64 = values.as_object().unwrap().values().map(|v| v.as_i64().unwrap()).sum();
        assert_eq!(total, 67050);

        let (_, counts) = get_json(app, "/dashboard/car-counts").await;
        assert_eq!(counts["HONDA"], serde_json::json!({ "City": 1, "Civic": 1 }));
        assert_eq!(counts["TOYOTA"], serde_json::json!({ "Camry": 1, "Corolla": 1 }));
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (status, json) = get_json(create_test_app(), "/nope").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/blogs")
                    .header(header::ORIGIN, "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/dashboard/brand-summary")
                    .header(header::ORIGIN, "http://example.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
        assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    }
}
