//! Classify a single measurement

use anyhow::Result;
use spoonfit_tiers::Classifier;

pub async fn lookup(value: f64, locale: &str, classifier: &Classifier) -> Result<()> {
    let label = classifier.classify(value, locale)?;
    println!("{}", label);
    Ok(())
}
