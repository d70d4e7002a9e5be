use std::collections::HashSet;
use std::path::Path;

use crate::model::Cafe;

const BUILTIN_CATALOG: &str = include_str!("../data/cafes.json5");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] json5::Error),
    #[error("cafe at position {0} has an empty id")]
    EmptyId(usize),
    #[error("cafe '{0}' has an empty name")]
    EmptyName(String),
    #[error("duplicate cafe id '{0}'")]
    DuplicateId(String),
}

pub fn builtin() -> Result<Vec<Cafe>, CatalogError> {
    parse(BUILTIN_CATALOG)
}

/// Reads a JSON or JSON5 catalog file. Plain JSON is a subset of JSON5.
pub fn load_file(path: &Path) -> Result<Vec<Cafe>, CatalogError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let cafes = parse(&raw)?;
    tracing::debug!(path = %path.display(), count = cafes.len(), "loaded catalog file");
    Ok(cafes)
}

pub fn parse(raw: &str) -> Result<Vec<Cafe>, CatalogError> {
    let cafes: Vec<Cafe> = json5::from_str(raw)?;
    validate(&cafes)?;
    Ok(cafes)
}

pub fn validate(cafes: &[Cafe]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(cafes.len());
    for (position, cafe) in cafes.iter().enumerate() {
        if cafe.id.trim().is_empty() {
            return Err(CatalogError::EmptyId(position));
        }
        if cafe.name.trim().is_empty() {
            return Err(CatalogError::EmptyName(cafe.id.clone()));
        }
        if !seen.insert(cafe.id.as_str()) {
            return Err(CatalogError::DuplicateId(cafe.id.clone()));
        }
    }
    Ok(())
}

pub fn find<'a>(cafes: &'a [Cafe], id: &str) -> Option<&'a Cafe> {
    cafes.iter().find(|cafe| cafe.id == id)
}
