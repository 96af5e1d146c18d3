//! HTTP routes: login, symbol picker and analysis

use crate::analysis::{AnalysisOutcome, AnalysisReport, StockAnalyzer};
use crate::api::{AlphaVantageClient, SerperClient};
use crate::article::HttpArticleFetcher;
use crate::catalog::{SymbolCatalog, normalize_symbol};
use crate::config::{AdvisorConfig, MIN_SECRET_KEY_LEN};
use crate::error::{Result, StockError};
use crate::pipeline::CrewPipeline;
use crate::sentiment::NewsArticle;
use crate::web::auth::{CredentialStore, StaticCredentialStore};
use crate::web::flash::{Flash, push_flash, take_flashes};
use crate::web::session::{SessionStore, expired_session_cookie, session_cookie, session_id};
use crate::web::templates::{HOME_PAGE, LOGIN_PAGE, Templates};
use agent_llm::providers::{OpenAIConfig, OpenAIProvider};
use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Json, Router};
use axum_extra::extract::cookie::{Key, SignedCookieJar};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, error, info, warn};
use uuid::Uuid;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";
pub const EMPTY_SYMBOL: &str = "Please enter a stock symbol.";

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub analyzer: StockAnalyzer,
    pub catalog: SymbolCatalog,
    pub credentials: Arc<dyn CredentialStore>,
    pub sessions: SessionStore,
    pub templates: Templates,
    pub require_login: bool,
    key: Key,
}

impl AppState {
    /// `secret_key` signs the session cookie and must be at least 32 bytes
    pub fn new(
        analyzer: StockAnalyzer,
        catalog: SymbolCatalog,
        credentials: Arc<dyn CredentialStore>,
        secret_key: &str,
        require_login: bool,
    ) -> Result<Self> {
        if secret_key.len() < MIN_SECRET_KEY_LEN {
            return Err(StockError::Config(format!(
                "secret key must be at least {MIN_SECRET_KEY_LEN} bytes"
            )));
        }

        Ok(Self {
            analyzer,
            catalog,
            credentials,
            sessions: SessionStore::new(),
            templates: Templates::new()?,
            require_login,
            key: Key::derive_from(secret_key.as_bytes()),
        })
    }

    /// Replace the session store with one that expires sessions idle for `timeout`
    pub fn with_session_idle_timeout(mut self, timeout: Duration) -> Self {
        self.sessions = SessionStore::with_idle_timeout(timeout);
        self
    }

    /// Wire the production clients described by `config`
    pub fn from_config(config: &AdvisorConfig) -> Result<Self> {
        config.validate()?;

        let market = AlphaVantageClient::new(
            &config.alpha_vantage_api_key,
            config.alpha_vantage_rate_limit,
            config.request_timeout,
        )?;
        let news = SerperClient::new(&config.serper_api_key, config.request_timeout)?;
        let articles = HttpArticleFetcher::new(config.request_timeout)?;

        let provider = OpenAIProvider::with_config(
            OpenAIConfig::new(&config.llm_api_key)
                .with_api_base(&config.llm_api_base)
                .with_timeout(config.llm_timeout.as_secs()),
        )
        .map_err(|e| StockError::Config(e.to_string()))?;
        let pipeline = CrewPipeline::new(Arc::new(provider), &config.llm_model)?;

        let analyzer = StockAnalyzer::new(
            Arc::new(market),
            Arc::new(news),
            Arc::new(articles),
            Arc::new(pipeline),
        );
        let credentials = StaticCredentialStore::new(config.users.iter().cloned());

        Ok(Self::new(
            analyzer,
            SymbolCatalog::new(&config.catalog_path),
            Arc::new(credentials),
            &config.secret_key,
            config.require_login,
        )?
        .with_session_idle_timeout(config.session_idle_timeout))
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

/// Handler error rendered as a plain 500
#[derive(Debug)]
pub struct AppError(StockError);

impl From<StockError> for AppError {
    fn from(err: StockError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

type HandlerResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    stock_symbol: String,
}

#[derive(Debug, Default, Serialize)]
struct HomeView {
    username: Option<String>,
    symbols: Vec<String>,
    flashes: Vec<String>,
    symbol: Option<String>,
    error: Option<String>,
    report: Option<ReportView>,
}

#[derive(Debug, Serialize)]
struct ReportView {
    symbol: String,
    latest_price: String,
    change_text: Option<String>,
    change_class: Option<&'static str>,
    chart_html: Option<String>,
    narrative: String,
    articles: Vec<String>,
}

impl From<&AnalysisReport> for ReportView {
    fn from(report: &AnalysisReport) -> Self {
        Self {
            symbol: report.symbol.clone(),
            latest_price: format!("{:.2}", report.latest_price),
            change_text: report.change.map(|c| c.text()),
            change_class: report.change.map(|c| c.class()),
            chart_html: report.chart_html.clone(),
            narrative: report.narrative_text(),
            articles: report.articles.iter().map(NewsArticle::annotation).collect(),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(login_page).post(login))
        .route("/home", get(home_page).post(analyze))
        .route("/logout", get(logout))
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new().layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            ),
        )
        .with_state(state)
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn login_page(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> HandlerResult<Response> {
    let (jar, flashes) = take_flashes(jar);
    let html = state
        .templates
        .render(LOGIN_PAGE, json!({ "flashes": flashes }))?;
    Ok((jar, Html(html)).into_response())
}

async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> HandlerResult<Response> {
    if !state.credentials.verify(&form.username, &form.password) {
        warn!(username = %form.username, "login rejected");
        let (jar, mut flashes) = take_flashes(jar);
        flashes.push(INVALID_CREDENTIALS.to_string());
        let html = state
            .templates
            .render(LOGIN_PAGE, json!({ "flashes": flashes }))?;
        return Ok((jar, Html(html)).into_response());
    }

    // a fresh id on every login; the previous one is dropped
    if let Some(previous) = session_id(&jar) {
        state.sessions.remove(previous).await;
    }
    let id = state.sessions.create(form.username.as_str()).await;

    info!(username = %form.username, "user logged in");
    Ok((jar.add(session_cookie(id)), Redirect::to("/home")).into_response())
}

async fn logout(State(state): State<AppState>, jar: SignedCookieJar) -> Response {
    let removed = match session_id(&jar) {
        Some(id) => state.sessions.remove(id).await,
        None => false,
    };
    if removed {
        info!("user logged out");
    }
    let jar = push_flash(jar.remove(expired_session_cookie()), Flash::LoggedOut);
    (jar, Redirect::to("/")).into_response()
}

/// Logged-in user, or the redirect to send an anonymous visitor
async fn authorize(
    state: &AppState,
    jar: &SignedCookieJar,
) -> std::result::Result<Option<String>, Response> {
    let username = match session_id(jar) {
        Some(id) => state.sessions.username(id).await,
        None => None,
    };

    if username.is_none() && state.require_login {
        let jar = push_flash(jar.clone(), Flash::LoginRequired);
        return Err((jar, Redirect::to("/")).into_response());
    }
    Ok(username)
}

async fn home_page(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> HandlerResult<Response> {
    let username = match authorize(&state, &jar).await {
        Ok(username) => username,
        Err(redirect) => return Ok(redirect),
    };

    let (jar, flashes) = take_flashes(jar);
    let view = HomeView {
        username,
        symbols: state.catalog.symbols(),
        flashes,
        ..HomeView::default()
    };
    Ok((jar, Html(state.templates.render(HOME_PAGE, view)?)).into_response())
}

async fn analyze(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<AnalyzeForm>,
) -> HandlerResult<Response> {
    let username = match authorize(&state, &jar).await {
        Ok(username) => username,
        Err(redirect) => return Ok(redirect),
    };

    let (jar, flashes) = take_flashes(jar);
    let mut view = HomeView {
        username,
        symbols: state.catalog.symbols(),
        flashes,
        ..HomeView::default()
    };

    if form.stock_symbol.trim().is_empty() {
        view.error = Some(EMPTY_SYMBOL.to_string());
    } else {
        match normalize_symbol(&form.stock_symbol) {
            Ok(symbol) => {
                let request_id = Uuid::new_v4().to_string();
                let outcome = state.analyzer.analyze(&symbol, &request_id).await;
                view.error = outcome.message();
                if let AnalysisOutcome::Analyzed(report) = &outcome {
                    view.report = Some(ReportView::from(report));
                }
                view.symbol = Some(symbol);
            }
            Err(e) => view.error = Some(e.to_string()),
        }
    }

    Ok((jar, Html(state.templates.render(HOME_PAGE, view)?)).into_response())
}
