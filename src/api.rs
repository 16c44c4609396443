//! HTTP routes: the JSON API plus the HTML pages

use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;

use crate::config::ServiceConfig;
use crate::logfiles::operations::{line_total, DEFAULT_TAIL_LINES};
use crate::logfiles::LogFileService;
use crate::protocol::{
    ErrorResponse, HealthResponse, LogContentResponse, LogListResponse, SearchResponse,
    StatusResponse, TailResponse,
};
use crate::views;

const FAVICON_SVG: &str = include_str!("../assets/favicon.svg");

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub logs: Arc<LogFileService>,
}

impl AppState {
    pub fn new(config: Arc<ServiceConfig>) -> Self {
        let logs = Arc::new(LogFileService::new(config.log_files()));
        Self { config, logs }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/log/{*filename}", get(view_log))
        .route("/api/logs", get(api_list_logs))
        .route("/api/log/{*rest}", get(api_log))
        .route("/api/status", get(api_status))
        .route("/health", get(health))
        .route("/favicon.ico", get(favicon))
        .with_state(state)
}

/// What a request under `/api/log/` asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRoute {
    Content { filename: String },
    Tail { filename: String, lines: usize },
    Search { filename: String, query: String },
}

impl LogRoute {
    /// Split the trailing operation segments off a `/`-separated file name.
    ///
    /// `<file>/tail`, `<file>/tail/<n>` and `<file>/search/<query>` select an
    /// operation; anything else (including an empty query) names a file.
    pub fn parse(rest: &str) -> Self {
        let segments: Vec<&str> = rest.split('/').collect();
        match segments.as_slice() {
            [head @ .., "tail"] if !head.is_empty() => LogRoute::Tail {
                filename: head.join("/"),
                lines: DEFAULT_TAIL_LINES,
            },
            [head @ .., "tail", count] if !head.is_empty() => match count.parse::<usize>() {
                Ok(lines) => LogRoute::Tail {
                    filename: head.join("/"),
                    lines,
                },
                Err(_) => LogRoute::Content {
                    filename: rest.to_string(),
                },
            },
            [head @ .., "search", query] if !head.is_empty() && !query.is_empty() => {
                LogRoute::Search {
                    filename: head.join("/"),
                    query: query.to_string(),
                }
            }
            _ => LogRoute::Content {
                filename: rest.to_string(),
            },
        }
    }
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let records = state.logs.catalog().snapshot().await;
    Html(views::render_index(&records))
}

async fn view_log(
    State(state): State<AppState>,
    filename: Result<Path<String>, PathRejection>,
) -> Response {
    let Path(filename) = match filename {
        Ok(filename) => filename,
        Err(e) => {
            tracing::debug!("Rejected log path: {}", e);
            return (StatusCode::NOT_FOUND, "Log file not found").into_response();
        }
    };
    match state.logs.ops().read_file(&filename).await {
        Ok(content) => Html(views::render_log(&filename, &content)).into_response(),
        Err(e) => {
            tracing::debug!("Error reading file {}: {}", filename, e);
            (StatusCode::NOT_FOUND, "Log file not found").into_response()
        }
    }
}

async fn api_list_logs(State(state): State<AppState>) -> Json<LogListResponse> {
    let logs = state.logs.catalog().snapshot().await;
    Json(LogListResponse {
        success: true,
        count: logs.len(),
        logs,
    })
}

async fn api_log(
    State(state): State<AppState>,
    rest: Result<Path<String>, PathRejection>,
) -> Response {
    let Path(rest) = match rest {
        Ok(rest) => rest,
        Err(e) => {
            tracing::debug!("Rejected log path: {}", e);
            return not_found("Log file not found");
        }
    };
    match LogRoute::parse(&rest) {
        LogRoute::Content { filename } => api_get_log(&state, filename).await,
        LogRoute::Tail { filename, lines } => api_tail_log(&state, filename, lines).await,
        LogRoute::Search { filename, query } => api_search_log(&state, filename, query).await,
    }
}

async fn api_get_log(state: &AppState, filename: String) -> Response {
    match state.logs.ops().read_file(&filename).await {
        Ok(content) => Json(LogContentResponse {
            success: true,
            lines: line_total(&content),
            filename,
            content,
        })
        .into_response(),
        Err(e) => {
            tracing::debug!("Error reading file {}: {}", filename, e);
            not_found("Log file not found")
        }
    }
}

async fn api_tail_log(state: &AppState, filename: String, lines: usize) -> Response {
    let log_lines = state.logs.ops().tail_file(&filename, lines).await;
    if log_lines.is_empty() {
        return not_found("Log file not found or empty");
    }
    Json(TailResponse {
        success: true,
        filename,
        count: log_lines.len(),
        lines: log_lines,
    })
    .into_response()
}

async fn api_search_log(state: &AppState, filename: String, query: String) -> Response {
    match state.logs.search().search_file(&filename, &query).await {
        Ok(matches) => Json(SearchResponse {
            success: true,
            filename,
            query,
            count: matches.len(),
            matches,
        })
        .into_response(),
        Err(e) => {
            tracing::debug!("Error searching file {}: {}", filename, e);
            not_found("Log file not found")
        }
    }
}

async fn api_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let log_count = state.logs.catalog().snapshot().await.len();
    Json(StatusResponse {
        success: true,
        status: "online",
        data_dir: state.config.data_dir.display().to_string(),
        config_dir: state.config.config_dir.display().to_string(),
        log_count,
        timestamp: Local::now(),
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

async fn favicon() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/svg+xml")], FAVICON_SVG)
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use std::path::Path as FsPath;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app_for(data_dir: &FsPath, config_dir: &FsPath) -> Router {
        let config = Arc::new(ServiceConfig {
            data_dir: data_dir.to_path_buf(),
            config_dir: config_dir.to_path_buf(),
            bind: "127.0.0.1:0".parse().unwrap(),
            denied_patterns: Vec::new(),
        });
        router(AppState::new(config))
    }

    fn fixture() -> (TempDir, Router) {
        let temp = TempDir::new().unwrap();
        let data = temp.path().join("data");
        std::fs::create_dir_all(data.join("miner")).unwrap();
        std::fs::write(data.join("app.log"), "boot\nERROR disk\nok\nerror net\n").unwrap();
        std::fs::write(data.join("miner").join("gpu.log"), "hash 10\nhash 12").unwrap();
        std::fs::write(temp.path().join("secret.txt"), "top secret").unwrap();
        let app = app_for(&data, &temp.path().join("config"));
        (temp, app)
    }

    async fn get_raw(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let (status, body) = get_raw(app, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn log_route_parses_operations() {
        assert_eq!(
            LogRoute::parse("app.log"),
            LogRoute::Content {
                filename: "app.log".to_string()
            }
        );
        assert_eq!(
            LogRoute::parse("miner/gpu.log/tail"),
            LogRoute::Tail {
                filename: "miner/gpu.log".to_string(),
                lines: DEFAULT_TAIL_LINES
            }
        );
        assert_eq!(
            LogRoute::parse("app.log/tail/25"),
            LogRoute::Tail {
                filename: "app.log".to_string(),
                lines: 25
            }
        );
        assert_eq!(
            LogRoute::parse("app.log/search/disk full"),
            LogRoute::Search {
                filename: "app.log".to_string(),
                query: "disk full".to_string()
            }
        );
    }

    #[test]
    fn log_route_treats_bare_keywords_as_file_names() {
        assert_eq!(
            LogRoute::parse("tail"),
            LogRoute::Content {
                filename: "tail".to_string()
            }
        );
        assert_eq!(
            LogRoute::parse("app.log/tail/abc"),
            LogRoute::Content {
                filename: "app.log/tail/abc".to_string()
            }
        );
        assert_eq!(
            LogRoute::parse("search/x"),
            LogRoute::Content {
                filename: "search/x".to_string()
            }
        );
    }

    #[test]
    fn log_route_sends_empty_query_to_file_lookup() {
        assert_eq!(
            LogRoute::parse("app.log/search/"),
            LogRoute::Content {
                filename: "app.log/search/".to_string()
            }
        );
    }

    #[tokio::test]
    async fn undecodable_paths_are_json_404() {
        let (_temp, app) = fixture();

        let (status, body) = get_json(app.clone(), "/api/log/%FF.log").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Log file not found");

        let (status, body) = get_raw(app, "/log/%FF.log").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, b"Log file not found");
    }

    #[tokio::test]
    async fn search_with_empty_query_is_404() {
        let (_temp, app) = fixture();

        let (status, body) = get_json(app, "/api/log/app.log/search/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn health_is_independent_of_data_dir() {
        let temp = TempDir::new().unwrap();
        let app = app_for(&temp.path().join("missing"), &temp.path().join("config"));

        let (status, body) = get_json(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "status": "healthy" }));
    }

    #[tokio::test]
    async fn list_logs_returns_records_and_count() {
        let (_temp, app) = fixture();

        let (status, body) = get_json(app, "/api/logs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 2);

        let logs = body["logs"].as_array().unwrap();
        let gpu = logs.iter().find(|l| l["name"] == "miner/gpu.log").unwrap();
        assert_eq!(gpu["display_name"], "gpu.log");
        assert_eq!(gpu["category"], "miner");
        assert_eq!(gpu["size"], 15);
        assert!(gpu["path"].as_str().unwrap().ends_with("gpu.log"));
        assert!(gpu["modified"].is_string());
    }

    #[tokio::test]
    async fn get_log_returns_content_and_line_total() {
        let (_temp, app) = fixture();

        let (status, body) = get_json(app, "/api/log/miner/gpu.log").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["filename"], "miner/gpu.log");
        assert_eq!(body["content"], "hash 10\nhash 12");
        assert_eq!(body["lines"], 2);
    }

    #[tokio::test]
    async fn get_log_missing_is_json_404() {
        let (_temp, app) = fixture();

        let (status, body) = get_json(app, "/api/log/nope.log").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Log file not found");
    }

    #[tokio::test]
    async fn encoded_traversal_is_rejected() {
        let (_temp, app) = fixture();

        let (status, body) = get_json(app.clone(), "/api/log/..%2Fsecret.txt").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);

        let (status, _) = get_json(app.clone(), "/api/log/..%2Fsecret.txt/tail").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_json(app, "/api/log/..%2Fsecret.txt/search/secret").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn tail_defaults_and_explicit_counts() {
        let (_temp, app) = fixture();

        let (status, body) = get_json(app.clone(), "/api/log/app.log/tail").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 4);

        let (status, body) = get_json(app.clone(), "/api/log/app.log/tail/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["filename"], "app.log");
        assert_eq!(body["lines"], serde_json::json!(["ok\n", "error net\n"]));
        assert_eq!(body["count"], 2);

        let (status, body) = get_json(app, "/api/log/app.log/tail/0").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Log file not found or empty");
    }

    #[tokio::test]
    async fn search_returns_case_insensitive_matches() {
        let (_temp, app) = fixture();

        let (status, body) = get_json(app.clone(), "/api/log/app.log/search/error").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["query"], "error");
        assert_eq!(body["count"], 2);
        assert_eq!(body["matches"][0]["line_number"], 2);
        assert_eq!(body["matches"][0]["content"], "ERROR disk");
        assert_eq!(body["matches"][1]["line_number"], 4);

        let (status, body) = get_json(app.clone(), "/api/log/app.log/search/panic").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);

        let (status, _) = get_json(app, "/api/log/nope.log/search/error").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn status_reports_directories_and_count() {
        let (temp, app) = fixture();

        let (status, body) = get_json(app, "/api/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["status"], "online");
        assert_eq!(body["log_count"], 2);
        assert_eq!(
            body["data_dir"],
            temp.path().join("data").display().to_string()
        );
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn html_pages_render_and_404_as_plain_text() {
        let (_temp, app) = fixture();

        let (status, body) = get_raw(app.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("/log/miner/gpu.log"));

        let (status, body) = get_raw(app.clone(), "/log/app.log").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("ERROR disk"));

        let (status, body) = get_raw(app, "/log/missing.log").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, b"Log file not found");
    }

    #[tokio::test]
    async fn favicon_is_served_as_svg() {
        let (_temp, app) = fixture();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/favicon.ico")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "image/svg+xml"
        );
    }
}
