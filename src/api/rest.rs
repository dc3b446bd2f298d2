// =============================================================================
// REST API Endpoints: Axum 0.7
// =============================================================================
//
// Thin wrappers around `crate::engine`: each computation endpoint validates the
// submitted bars, fills missing query parameters from the service config,
// calls the engine and serialises the result. Failures, including bodies and
// query strings axum cannot extract, are logged, recorded in the error log
// and mapped to HTTP status codes by `ApiError`.
//
// CORS is configured permissively; the service holds no credentials.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        DefaultBodyLimit, Json, Query, State,
    },
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info_span, warn};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::app_state::AppState;
use crate::engine::{self, Indicator, IndicatorResult, ReturnsResult, StatisticsResult};
use crate::statistics::StatisticsParams;
use crate::types::{PriceBar, TimeSeries};

const ENDPOINTS: [&str; 8] = [
    "/indicators/sma",
    "/indicators/ema",
    "/indicators/rsi",
    "/indicators/macd",
    "/indicators/bollinger",
    "/statistics/summary",
    "/statistics/returns",
    "/statistics/correlation",
];

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Service ─────────────────────────────────────────────────
        .route("/", get(root))
        .route("/health", get(health))
        // ── Indicators ──────────────────────────────────────────────
        .route("/indicators/sma", post(sma))
        .route("/indicators/ema", post(ema))
        .route("/indicators/rsi", post(rsi))
        .route("/indicators/macd", post(macd))
        .route("/indicators/bollinger", post(bollinger))
        // ── Statistics ──────────────────────────────────────────────
        .route("/statistics/summary", post(statistics_summary))
        .route("/statistics/returns", post(statistics_returns))
        .route("/statistics/correlation", post(statistics_correlation))
        // ── Middleware & State ──────────────────────────────────────
        .layer(DefaultBodyLimit::max(state.config.body_limit_bytes()))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}

// =============================================================================
// Request bodies
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct TimeSeriesRequest {
    pub symbol: String,
    pub data: Vec<PriceBar>,
}

impl TimeSeriesRequest {
    /// Enforce the bar invariants and size limit, then normalise ordering.
    fn into_series(self, max_bars: usize) -> Result<TimeSeries, ApiError> {
        if self.data.len() > max_bars {
            return Err(ApiError::Validation(format!(
                "too many bars: {} exceeds the limit of {max_bars}",
                self.data.len()
            )));
        }
        for (i, bar) in self.data.iter().enumerate() {
            bar.check()
                .map_err(|reason| ApiError::Validation(format!("data[{i}]: {reason}")))?;
        }
        Ok(TimeSeries::new(self.symbol, self.data))
    }
}

#[derive(Debug, Deserialize)]
struct CorrelationRequest {
    series_a: TimeSeriesRequest,
    series_b: TimeSeriesRequest,
}

#[derive(Debug, Serialize)]
struct CorrelationResponse {
    symbol_a: String,
    symbol_b: String,
    correlation: f64,
}

// =============================================================================
// Query parameters
// =============================================================================

#[derive(Debug, Deserialize)]
struct PeriodQuery {
    period: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct MacdQuery {
    fast: Option<usize>,
    slow: Option<usize>,
    signal: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct BollingerQuery {
    period: Option<usize>,
    std_dev: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct StatisticsQuery {
    risk_free_rate: Option<f64>,
    annualize: Option<bool>,
}

// =============================================================================
// Request handling
// =============================================================================

/// Run one computation inside a request span, recording failures.
fn handle<T>(
    state: &AppState,
    route: &'static str,
    symbol: &str,
    compute: impl FnOnce() -> Result<T, ApiError>,
) -> Result<Json<T>, ApiError> {
    let request_id = Uuid::new_v4();
    let seq = state.record_request();
    let span = info_span!("request", %request_id, route, symbol = %symbol);
    let _guard = span.enter();

    match compute() {
        Ok(value) => {
            debug!(seq, "request completed");
            Ok(Json(value))
        }
        Err(e) => {
            warn!(error = %e, code = e.code(), "request rejected");
            state.push_error(e.code(), e.to_string());
            Err(e)
        }
    }
}

fn run_indicator(
    state: &AppState,
    route: &'static str,
    body: Result<Json<TimeSeriesRequest>, JsonRejection>,
    indicator: Result<Indicator, QueryRejection>,
) -> Result<Json<IndicatorResult>, ApiError> {
    handle(state, route, &body_symbol(&body), || {
        let indicator = indicator?;
        let Json(req) = body?;
        let series = req.into_series(state.config.max_bars)?;
        Ok(engine::compute_indicator(&series, &indicator)?)
    })
}

/// Symbol for the request span; empty when the body was rejected.
fn body_symbol(body: &Result<Json<TimeSeriesRequest>, JsonRejection>) -> String {
    match body {
        Ok(Json(req)) => req.symbol.clone(),
        Err(_) => String::new(),
    }
}

// =============================================================================
// Service endpoints
// =============================================================================

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Quant Analytics API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ENDPOINTS,
    }))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    uptime_secs: u64,
    requests_served: u64,
    recent_errors: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime_secs: state.uptime_secs(),
        requests_served: state.requests_served(),
        recent_errors: state.recent_error_count(),
    })
}

// =============================================================================
// Indicator endpoints
// =============================================================================

async fn sma(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
    body: Result<Json<TimeSeriesRequest>, JsonRejection>,
) -> Result<Json<IndicatorResult>, ApiError> {
    let defaults = &state.config.indicators;
    let indicator = query.map(|Query(q)| Indicator::Sma {
        period: q.period.unwrap_or(defaults.sma_period),
    });
    run_indicator(&state, "sma", body, indicator)
}

async fn ema(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
    body: Result<Json<TimeSeriesRequest>, JsonRejection>,
) -> Result<Json<IndicatorResult>, ApiError> {
    let defaults = &state.config.indicators;
    let indicator = query.map(|Query(q)| Indicator::Ema {
        period: q.period.unwrap_or(defaults.ema_period),
    });
    run_indicator(&state, "ema", body, indicator)
}

async fn rsi(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
    body: Result<Json<TimeSeriesRequest>, JsonRejection>,
) -> Result<Json<IndicatorResult>, ApiError> {
    let defaults = &state.config.indicators;
    let indicator = query.map(|Query(q)| Indicator::Rsi {
        period: q.period.unwrap_or(defaults.rsi_period),
    });
    run_indicator(&state, "rsi", body, indicator)
}

async fn macd(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MacdQuery>, QueryRejection>,
    body: Result<Json<TimeSeriesRequest>, JsonRejection>,
) -> Result<Json<IndicatorResult>, ApiError> {
    let defaults = &state.config.indicators;
    let indicator = query.map(|Query(q)| Indicator::Macd {
        fast: q.fast.unwrap_or(defaults.macd_fast),
        slow: q.slow.unwrap_or(defaults.macd_slow),
        signal: q.signal.unwrap_or(defaults.macd_signal),
    });
    run_indicator(&state, "macd", body, indicator)
}

async fn bollinger(
    State(state): State<Arc<AppState>>,
    query: Result<Query<BollingerQuery>, QueryRejection>,
    body: Result<Json<TimeSeriesRequest>, JsonRejection>,
) -> Result<Json<IndicatorResult>, ApiError> {
    let defaults = &state.config.indicators;
    let indicator = query.map(|Query(q)| Indicator::Bollinger {
        period: q.period.unwrap_or(defaults.bollinger_period),
        std_dev: q.std_dev.unwrap_or(defaults.bollinger_std_dev),
    });
    run_indicator(&state, "bollinger", body, indicator)
}

// =============================================================================
// Statistics endpoints
// =============================================================================

async fn statistics_summary(
    State(state): State<Arc<AppState>>,
    query: Result<Query<StatisticsQuery>, QueryRejection>,
    body: Result<Json<TimeSeriesRequest>, JsonRejection>,
) -> Result<Json<StatisticsResult>, ApiError> {
    let defaults = state.config.statistics;
    handle(&state, "summary", &body_symbol(&body), || {
        let Query(q) = query?;
        let params = StatisticsParams {
            risk_free_rate: q.risk_free_rate.unwrap_or(defaults.risk_free_rate),
            annualize: q.annualize.unwrap_or(defaults.annualize),
            ..defaults
        };
        let Json(req) = body?;
        let series = req.into_series(state.config.max_bars)?;
        Ok(engine::compute_statistics(&series, &params)?)
    })
}

async fn statistics_returns(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TimeSeriesRequest>, JsonRejection>,
) -> Result<Json<ReturnsResult>, ApiError> {
    handle(&state, "returns", &body_symbol(&body), || {
        let Json(req) = body?;
        let series = req.into_series(state.config.max_bars)?;
        Ok(engine::compute_returns(&series)?)
    })
}

async fn statistics_correlation(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CorrelationRequest>, JsonRejection>,
) -> Result<Json<CorrelationResponse>, ApiError> {
    let pair = match &body {
        Ok(Json(req)) => format!("{}/{}", req.series_a.symbol, req.series_b.symbol),
        Err(_) => String::new(),
    };
    handle(&state, "correlation", &pair, || {
        let Json(req) = body?;
        let a = req.series_a.into_series(state.config.max_bars)?;
        let b = req.series_b.into_series(state.config.max_bars)?;
        let correlation = engine::compute_correlation(&a, &b)?;
        Ok(CorrelationResponse {
            symbol_a: a.symbol().to_string(),
            symbol_b: b.symbol().to_string(),
            correlation,
        })
    })
}
