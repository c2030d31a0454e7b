//! Seed the reference tables from a YAML file.
//!
//! The file is parsed and validated before any database connection is made,
//! so `--check` can be used in CI without a database.

use std::path::Path;

use tracing::{error, info};

use brew_concierge::config::database_url_from_env;
use brew_concierge::db::{self, ReferenceData, seed_reference_data, validate_reference_data};

/// Load reference data from `file_path` and write it to the database.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML reference-data file
/// * `check_only` - If true, stop after validation
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, validation fails,
/// or database operations fail.
pub async fn reference_data(
    file_path: &str,
    check_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading reference data from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let data = ReferenceData::from_yaml(&content)?;

    let errors = validate_reference_data(&data);
    if !errors.is_empty() {
        error!("Reference data validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    info!("Reference data validated successfully");
    if check_only {
        return Ok(());
    }

    let database_url = database_url_from_env()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let summary = seed_reference_data(&pool, &data).await?;

    info!("Seeding complete!");
    info!("  Brewing methods: {}", summary.brewing_methods);
    info!("  Brewing ratios: {}", summary.brewing_ratios);
    info!("  Shipping regions: {}", summary.shipping_regions);
    info!("  Support categories: {}", summary.support_categories);
    info!("  Store locations: {}", summary.store_locations);
    info!("  Club benefits: {}", summary.club_benefits);

    Ok(())
}
