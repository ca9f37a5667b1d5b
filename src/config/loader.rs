//! Fixture file loading from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{FixtureFile, FixtureSpec};
use crate::config::validation::ValidationError;
use crate::fixture::{FixtureDefinition, FixtureError};
use crate::http::response::StaticResponse;

/// Error type for fixture file loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory: {0}")]
    CurrentDir(#[source] io::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to parse {}: {source}", .path.display())]
    Toml { path: PathBuf, source: toml::de::Error },

    #[error("failed to parse {}: {source}", .path.display())]
    Json { path: PathBuf, source: serde_json::Error },

    #[error("unsupported fixture file {}: expected a .toml or .json extension", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("fixture \"{fixture}\" has an invalid response: {}", join_errors(.errors))]
    InvalidResponse {
        fixture: String,
        errors: Vec<ValidationError>,
    },

    #[error(transparent)]
    Fixture(#[from] FixtureError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fixture file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("toml") {
            Some(Format::Toml)
        } else if extension.eq_ignore_ascii_case("json") {
            Some(Format::Json)
        } else {
            None
        }
    }
}

/// Load a fixture file, picking the format from its extension.
pub fn load_fixture_file(path: &Path) -> Result<FixtureFile, ConfigError> {
    let format = Format::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let file = match format {
        Format::Toml => FixtureFile::from_toml_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?,
        Format::Json => FixtureFile::from_json_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?,
    };

    tracing::debug!(
        path = %path.display(),
        fixtures = file.fixtures.len(),
        "Fixture file loaded"
    );

    Ok(file)
}

/// Turn every entry of a fixture file into a definition, in name order.
pub fn fixture_definitions(file: FixtureFile) -> Result<Vec<(String, FixtureDefinition)>, ConfigError> {
    file.fixtures
        .into_iter()
        .map(|(name, spec)| {
            let definition = definition_from_spec(&name, spec)?;
            Ok((name, definition))
        })
        .collect()
}

fn definition_from_spec(name: &str, spec: FixtureSpec) -> Result<FixtureDefinition, ConfigError> {
    let mut definition = FixtureDefinition::new();

    if let Some(method) = spec.method {
        definition = definition.method(method);
    }
    if let Some(route) = spec.route {
        definition = definition.route(route);
    }
    if let Some(response) = spec.response {
        let response = StaticResponse::from_spec(&response).map_err(|errors| ConfigError::InvalidResponse {
            fixture: name.to_string(),
            errors,
        })?;
        definition = definition.response(response);
    }

    Ok(definition)
}
