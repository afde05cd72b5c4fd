//! HTTP API request and response types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================
// Classify
// ============================================

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub measurement: f64,
    pub locale: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub measurement: f64,
    pub locale: String,
    pub label: String,
}

// ============================================
// Form
// ============================================

/// Fields posted by the HTML form. The measurement stays a string so that
/// non-numeric input can be reported on the page.
#[derive(Debug, Deserialize)]
pub struct ClassifyForm {
    #[serde(default)]
    pub measurement: String,
    #[serde(default)]
    pub locale: String,
}

// ============================================
// Tiers
// ============================================

#[derive(Debug, Serialize, Deserialize)]
pub struct TierInfo {
    pub name: String,
    pub upper_bound: f64,
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TiersResponse {
    pub locales: Vec<String>,
    pub tiers: Vec<TierInfo>,
}

// ============================================
// Health
// ============================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ============================================
// Error
// ============================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
