//! Start the web form and JSON API server

use anyhow::Result;
use spoonfit_tiers::Classifier;
use tracing::info;

pub async fn serve(classifier: Classifier, port: u16, cors_origin: Option<String>) -> Result<()> {
    info!("Starting spoonfit web server");
    info!("Tiers: {}", classifier.tiers().len());
    info!("Locales: {:?}", classifier.tiers().locales());

    crate::http::serve_http(classifier, port, cors_origin).await
}
