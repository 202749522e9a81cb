//! A small bundled catalog covering every move behaviour the engine knows.

use super::{Catalog, LATEST_GENERATION};
use crate::error::CatalogError;
use once_cell::sync::Lazy;

pub const SAMPLE_CATALOG_JSON: &str = include_str!("../../data/catalog.json");

static SAMPLE: Lazy<Result<Catalog, CatalogError>> =
    Lazy::new(|| Catalog::from_json_str(SAMPLE_CATALOG_JSON, LATEST_GENERATION));

/// The bundled catalog at the latest generation, parsed on first use.
pub fn sample_catalog() -> Result<&'static Catalog, &'static CatalogError> {
    Lazy::force(&SAMPLE).as_ref()
}

/// The bundled catalog filtered to an earlier generation.
pub fn sample_catalog_for(generation: u8) -> Result<Catalog, CatalogError> {
    Catalog::from_json_str(SAMPLE_CATALOG_JSON, generation)
}
