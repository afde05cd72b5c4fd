//! HTTP routes and handlers

use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
};
use spoonfit_tiers::{Classifier, ClassifyError, DEFAULT_LOCALE};
use std::sync::Arc;
use tracing::debug;

use super::form::{FormOutcome, render_page};
use super::types::*;

type AppState = Arc<Classifier>;

/// Create the router with the form page and all API endpoints
pub fn create_router(classifier: AppState) -> Router {
    Router::new()
        .route("/", get(form_page).post(submit_form))
        .route("/health", get(health))
        .route("/tiers", get(tiers))
        .route("/classify", post(classify))
        .with_state(classifier)
}

// ============================================
// Health & Tiers
// ============================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn tiers(State(classifier): State<AppState>) -> Json<TiersResponse> {
    let table = classifier.tiers();

    Json(TiersResponse {
        locales: table.locales(),
        tiers: table
            .iter()
            .map(|t| TierInfo {
                name: t.name.clone(),
                upper_bound: t.upper_bound,
                labels: t.labels.clone(),
            })
            .collect(),
    })
}

// ============================================
// Classify (JSON)
// ============================================

async fn classify(
    State(classifier): State<AppState>,
    Json(req): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, (StatusCode, Json<ErrorResponse>)> {
    let locale = req
        .locale
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LOCALE);

    debug!(measurement = req.measurement, locale = %locale, "HTTP classify request");

    match classifier.classify(req.measurement, locale) {
        Ok(label) => Ok(Json(ClassifyResponse {
            measurement: req.measurement,
            locale: locale.to_string(),
            label,
        })),
        Err(e) => Err(classify_error(&e)),
    }
}

fn classify_error(e: &ClassifyError) -> (StatusCode, Json<ErrorResponse>) {
    debug!("Rejected classification: {}", e);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: e.to_string(),
            code: e.code().to_string(),
        }),
    )
}

// ============================================
// Form
// ============================================

async fn form_page(State(classifier): State<AppState>) -> Html<String> {
    let locales = classifier.tiers().locales();
    Html(render_page(&locales, DEFAULT_LOCALE, "", FormOutcome::Empty))
}

async fn submit_form(
    State(classifier): State<AppState>,
    Form(form): Form<ClassifyForm>,
) -> (StatusCode, Html<String>) {
    let locales = classifier.tiers().locales();
    let locale = match form.locale.trim() {
        "" => DEFAULT_LOCALE,
        l => l,
    };
    let input = form.measurement.trim();

    debug!(measurement = %input, locale = %locale, "HTTP form submission");

    let Ok(value) = input.parse::<f64>() else {
        let message = "Please enter the diameter as a number of millimetres.";
        return (
            StatusCode::BAD_REQUEST,
            Html(render_page(&locales, locale, input, FormOutcome::Error(message))),
        );
    };

    match classifier.classify(value, locale) {
        Ok(label) => (
            StatusCode::OK,
            Html(render_page(&locales, locale, input, FormOutcome::Label(&label))),
        ),
        Err(e) => {
            let message = e.to_string();
            (
                StatusCode::BAD_REQUEST,
                Html(render_page(&locales, locale, input, FormOutcome::Error(&message))),
            )
        }
    }
}
