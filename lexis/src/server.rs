//! The HTTP API and the static front end.
//!
//! Both API versions expose the same routes and differ only in the schema of their responses:
//!
//! - `GET /api/{version}`: the available endpoints and sources.
//! - `GET /api/{version}/dictionary/{word}?sources=a,b`: a lookup in several sources at once.
//! - `GET /api/{version}/{source}/{word}`: a lookup in a single source.

use std::io;
use std::path::Path;

use axum::extract::{Extension, Path as UrlPath, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use lexis_dictionary::{Aggregate, Dictionaries, InvalidSourcePolicy, Source, parse_sources, v1, v2};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::Error;
use crate::config::ServerConfig;

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    dictionaries: Dictionaries,
    policy: InvalidSourcePolicy,
}

impl AppState {
    /// Constructs the state from the lookup services and the policy for unknown source names.
    #[must_use]
    pub const fn new(dictionaries: Dictionaries, policy: InvalidSourcePolicy) -> AppState {
        AppState {
            dictionaries,
            policy,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LookupParams {
    sources: Option<String>,
}

/// Describes the endpoints of one API version.
fn welcome(version: &str, message: &str) -> Json<Value> {
    let mut endpoints = Map::new();

    for source in Source::ALL {
        endpoints.insert(
            source.name().to_owned(),
            json!(format!("/api/{version}/{source}/:word")),
        );
    }

    endpoints.insert(
        String::from("all"),
        json!(format!("/api/{version}/dictionary/:word?sources=cambridge,oxford")),
    );

    Json(json!({
        "message": message,
        "endpoints": endpoints,
        "availableSources": Source::ALL,
    }))
}

/// The response for a source name that isn't one of ours.
fn unknown_source(name: &str) -> Response {
    let body = json!({
        "error": format!("Dictionary source '{name}' not found"),
        "availableSources": Source::ALL,
    });

    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

async fn welcome_v1() -> Json<Value> {
    welcome("v1", "Welcome to Dictionary API")
}

async fn welcome_v2() -> Json<Value> {
    welcome("v2", "Welcome to Dictionary API v2")
}

async fn lookup_multiple_v1(
    Extension(state): Extension<AppState>,
    UrlPath(word): UrlPath<String>,
    Query(params): Query<LookupParams>,
) -> Json<Aggregate<v1::DictionaryResponse>> {
    let sources = parse_sources(params.sources.as_deref(), state.policy);

    Json(state.dictionaries.lookup_multiple_v1(&word, &sources).await)
}

async fn lookup_multiple_v2(
    Extension(state): Extension<AppState>,
    UrlPath(word): UrlPath<String>,
    Query(params): Query<LookupParams>,
) -> Json<Aggregate<v2::DictionaryResponse>> {
    let sources = parse_sources(params.sources.as_deref(), state.policy);

    Json(state.dictionaries.lookup_multiple_v2(&word, &sources).await)
}

async fn lookup_v1(
    Extension(state): Extension<AppState>,
    UrlPath((name, word)): UrlPath<(String, String)>,
) -> Response {
    match name.parse::<Source>() {
        Ok(source) => Json(state.dictionaries.lookup_v1(source, &word).await).into_response(),
        Err(_) => unknown_source(&name),
    }
}

async fn lookup_v2(
    Extension(state): Extension<AppState>,
    UrlPath((name, word)): UrlPath<(String, String)>,
) -> Response {
    match name.parse::<Source>() {
        Ok(source) => Json(state.dictionaries.lookup_v2(source, &word).await).into_response(),
        Err(_) => unknown_source(&name),
    }
}

/// Builds the application router.
///
/// `/v1` and `/v2` serve the `index.html` of the matching subdirectory of `static_dir`, and any
/// other path outside the API is looked up in `static_dir`.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/api/v1", get(welcome_v1))
        .route("/api/v1/dictionary/:word", get(lookup_multiple_v1))
        .route("/api/v1/:source/:word", get(lookup_v1))
        .route("/api/v2", get(welcome_v2))
        .route("/api/v2/dictionary/:word", get(lookup_multiple_v2))
        .route("/api/v2/:source/:word", get(lookup_v2))
        .route_service("/v1", ServeFile::new(static_dir.join("v1").join("index.html")))
        .route_service("/v2", ServeFile::new(static_dir.join("v2").join("index.html")))
        .fallback_service(ServeDir::new(static_dir))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Binds a listener to `host`, starting at `port` and moving on to the next port while the
/// current one is in use, for at most `attempts` ports.
///
/// # Errors
///
/// Returns [`Error::NoFreePort`] if every port was taken, or [`Error::Bind`] if binding failed
/// for another reason.
pub async fn bind(host: &str, port: u16, attempts: u16) -> Result<TcpListener, Error> {
    let last = port.saturating_add(attempts.max(1) - 1);

    for port in port..=last {
        match TcpListener::bind((host, port)).await {
            Ok(listener) => return Ok(listener),
            Err(err) if err.kind() == io::ErrorKind::AddrInUse => {
                warn!(%port, "port is already in use, trying the next one");
            }
            Err(source) => {
                return Err(Error::Bind {
                    addr: format!("{host}:{port}"),
                    source,
                });
            }
        }
    }

    Err(Error::NoFreePort { first: port, last })
}

/// Serves the API until the process is stopped.
///
/// # Errors
///
/// Returns an error if no listener could be bound or the server fails.
pub async fn serve(config: &ServerConfig, dictionaries: Dictionaries) -> Result<(), Error> {
    let listener = bind(&config.host, config.port, config.port_attempts).await?;
    let addr = listener.local_addr().map_err(Error::Serve)?;
    let state = AppState::new(dictionaries, config.invalid_source_policy);

    info!(%addr, static_dir = ?config.static_dir, "dictionary api listening");

    axum::serve(listener, router(state, &config.static_dir))
        .await
        .map_err(Error::Serve)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use lexis_dictionary::{Fetch, LookupService};
    use tower::ServiceExt;

    use super::*;

    /// Answers every lookup with an error naming the source.
    struct Offline(Source);

    #[async_trait]
    impl LookupService for Offline {
        fn source(&self) -> Source {
            self.0
        }

        async fn lookup_v1(&self, word: &str) -> v1::DictionaryResponse {
            lexis_dictionary::LookupResponse::failed(self.0, word, format!("{} is offline", self.0))
        }

        async fn lookup_v2(&self, word: &str) -> v2::DictionaryResponse {
            lexis_dictionary::LookupResponse::failed(self.0, word, format!("{} is offline", self.0))
        }
    }

    /// Serves a single Cambridge page.
    struct CambridgeRun;

    #[async_trait]
    impl Fetch for CambridgeRun {
        async fn fetch(&self, url: &str) -> Result<String, lexis_dictionary::Error> {
            if url == "https://dictionary.cambridge.org/dictionary/english/run" {
                Ok(String::from(
                    r#"<div class="pr entry-body__el">
                         <span class="hw dhw">run</span><span class="pos dpos">verb</span>
                         <div class="def-block"><div class="def ddef_d db">to move fast on foot</div></div>
                       </div>"#,
                ))
            } else {
                Err(lexis_dictionary::Error::Fetch {
                    url: url.to_owned(),
                    reason: String::from("offline"),
                })
            }
        }
    }

    fn app(policy: InvalidSourcePolicy) -> Router {
        let dictionaries = Dictionaries::new(
            Arc::new(Offline(Source::Cambridge)),
            Arc::new(Offline(Source::Oxford)),
            Arc::new(Offline(Source::MerriamWebster)),
        );

        router(AppState::new(dictionaries, policy), Path::new("public"))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_welcome() {
        let (status, body) = get_json(app(InvalidSourcePolicy::KeepValid), "/api/v2").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Welcome to Dictionary API v2");
        assert_eq!(body["endpoints"]["oxford"], "/api/v2/oxford/:word");
        assert_eq!(
            body["availableSources"],
            json!(["cambridge", "oxford", "merriam-webster"])
        );
    }

    #[tokio::test]
    async fn test_unknown_source() {
        let (status, body) = get_json(app(InvalidSourcePolicy::KeepValid), "/api/v1/bogus/run").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Dictionary source 'bogus' not found");
        assert_eq!(body["availableSources"][2], "merriam-webster");
    }

    #[tokio::test]
    async fn test_single_source() {
        let (status, body) = get_json(app(InvalidSourcePolicy::KeepValid), "/api/v1/Oxford/run").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "oxford");
        assert_eq!(body["entries"], json!([]));
        assert_eq!(body["error"], "oxford is offline");
    }

    #[tokio::test]
    async fn test_aggregate_keeps_valid_sources() {
        let (status, body) = get_json(
            app(InvalidSourcePolicy::KeepValid),
            "/api/v2/dictionary/run?sources=merriam-webster,bogus",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["word"], "run");
        assert_eq!(body["sources"], json!(["merriam-webster"]));
        assert_eq!(body["results"][0]["error"], "merriam-webster is offline");
    }

    #[tokio::test]
    async fn test_aggregate_falls_back_to_all_sources() {
        let (_, body) = get_json(
            app(InvalidSourcePolicy::FallbackToAll),
            "/api/v1/dictionary/run?sources=cambridge,bogus",
        )
        .await;

        assert_eq!(
            body["sources"],
            json!(["cambridge", "oxford", "merriam-webster"])
        );
        assert_eq!(body["results"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn test_lookup_through_fetcher() {
        let fetcher: Arc<dyn Fetch> = Arc::new(CambridgeRun);
        let state = AppState::new(
            Dictionaries::from_fetcher(&fetcher),
            InvalidSourcePolicy::KeepValid,
        );
        let app = router(state, Path::new("public"));
        let (status, body) = get_json(app, "/api/v1/dictionary/run").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"][0]["entries"][0]["partOfSpeech"], "verb");
        assert!(body["results"][1]["error"].is_string());
    }

    #[tokio::test]
    async fn test_bind_moves_past_taken_port() {
        let taken = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = taken.local_addr().unwrap().port();
        let listener = bind("127.0.0.1", port, 2).await.unwrap();

        assert_eq!(listener.local_addr().unwrap().port(), port + 1);
    }

    #[tokio::test]
    async fn test_bind_gives_up_after_attempts() {
        let taken = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = taken.local_addr().unwrap().port();

        assert!(matches!(
            bind("127.0.0.1", port, 1).await,
            Err(Error::NoFreePort { first, last }) if first == port && last == port
        ));
    }
}
