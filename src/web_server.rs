use anyhow::{Context, Result};
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    serve, Json, Router,
};
use minijinja::{path_loader, Environment};
use minijinja_autoreload::AutoReloader;
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::advisor::{Advisor, AdvisorError};
use crate::constants;
use crate::interview::Interview;
use crate::protocol::{ChatForm, ChatReply};

/// Where the server finds its page template and assets.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub templates_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            templates_dir: PathBuf::from(constants::TEMPLATES_DIR.as_str()),
            static_dir: PathBuf::from(constants::STATIC_DIR.as_str()),
        }
    }
}

/// Handler failures, reported to the widget through the `error` field.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,
    #[error("Sorry, something went wrong with the AI service. Please try again later.")]
    AdvisorUnavailable,
    #[error("Internal Server Error: {0}")]
    Template(#[from] minijinja::Error),
}

impl From<AdvisorError> for ApiError {
    fn from(e: AdvisorError) -> Self {
        match e {
            AdvisorError::RateLimited => ApiError::RateLimited,
            other => {
                error!(error = %other, "Advisor call failed");
                ApiError::AdvisorUnavailable
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::AdvisorUnavailable | ApiError::Template(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(ChatReply::error(self.to_string()))).into_response()
    }
}

// Shared application state
#[derive(Clone)]
struct AppState {
    templates: Arc<AutoReloader>,
    // One conversation per server; loading the page starts it over.
    interview: Arc<Mutex<Interview>>,
    advisor: Arc<Advisor>,
}

fn create_minijinja_env(templates_dir: &Path) -> AutoReloader {
    let templates_dir = templates_dir.to_path_buf();
    AutoReloader::new(move |notifier| {
        let mut env = Environment::new();
        env.set_loader(path_loader(&templates_dir));
        notifier.watch_path(&templates_dir, true);
        Ok(env)
    })
}

async fn index_handler(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    state.interview.lock().await.reset();
    info!("Conversation reset");

    let env = state.templates.acquire_env()?;
    let tmpl = env.get_template("chat.html")?;
    let page = tmpl.render(minijinja::context! {
        intro_message => constants::INTRO_MESSAGE,
        chat_path => constants::CHAT_PATH,
    })?;
    Ok(Html(page))
}

async fn process_chat_handler(
    State(state): State<AppState>,
    Form(form): Form<ChatForm>,
) -> Json<ChatReply> {
    let mut interview = state.interview.lock().await;
    let reply = interview.advance(&form.user_input);
    info!(
        question_index = interview.question_index(),
        answers = interview.responses().len(),
        "Processed chat turn"
    );
    Json(reply)
}

async fn process_final_option_handler(
    State(state): State<AppState>,
    Form(form): Form<ChatForm>,
) -> Result<Json<ChatReply>, ApiError> {
    // Release the lock before the slow model call
    let answers = state
        .interview
        .lock()
        .await
        .choose_final_option(&form.user_input);
    info!(answers = answers.len(), "Requesting roadmap");

    let roadmap = state.advisor.roadmap(&answers).await.map_err(|e| {
        warn!(error = %e, "Roadmap generation failed");
        ApiError::from(e)
    })?;
    Ok(Json(ChatReply::response(roadmap)))
}

/// Builds the router. Split out from [`start_web_server`] so tests can drive it directly.
pub fn app(config: &ServerConfig, advisor: Advisor) -> Router {
    let state = AppState {
        templates: Arc::new(create_minijinja_env(&config.templates_dir)),
        interview: Arc::new(Mutex::new(Interview::new())),
        advisor: Arc::new(advisor),
    };

    Router::new()
        .route("/", get(index_handler))
        .route(constants::CHAT_PATH, post(process_chat_handler))
        .route(constants::FINAL_OPTION_PATH, post(process_final_option_handler))
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http())) // Add request logging
}

pub async fn start_web_server(
    host: &str,
    port: u16,
    config: ServerConfig,
    advisor: Advisor,
) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;
    let app = app(&config, advisor);

    info!("Web server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;

    serve(listener, app.into_make_service())
        .await
        .context("Web server failed")?;

    Ok(())
}
