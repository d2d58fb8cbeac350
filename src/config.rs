//! Evaluator configuration
//!
//! Loaded from YAML. Every field has a default, so an empty document is a
//! valid configuration.
//!
//! ```yaml
//! namespaces:
//!   - prefix: xsd
//!     iri: "http://www.w3.org/2001/XMLSchema#"
//! geometry:
//!   projection:
//!     standard_parallel: 30.0
//! parallel_threshold: 1024
//! ```

use crate::geometry::{EqualAreaProjection, GeoEngine};
use crate::rdf::{default_namespaces, Namespace};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read or written
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed YAML
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Well-formed but unusable values
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Geometry adapter settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Equal-area system used for area computation
    pub projection: EqualAreaProjection,
}

/// Evaluator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Ordered prefixes used when rendering expressions
    pub namespaces: Vec<Namespace>,
    /// Geometry adapter settings
    pub geometry: GeometryConfig,
    /// Minimum row count before filtering fans out over the rayon pool
    pub parallel_threshold: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            namespaces: default_namespaces(),
            geometry: GeometryConfig::default(),
            parallel_threshold: 1024,
        }
    }
}

impl EvaluatorConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&content)?;
        info!(
            "Configuration loaded from {:?} ({} namespaces, parallel threshold {})",
            path,
            config.namespaces.len(),
            config.parallel_threshold
        );
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Save to a YAML file
    pub fn save_yaml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_yaml_string()?).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(ns) = self.namespaces.iter().find(|ns| ns.prefix.is_empty() || ns.iri.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "namespace {:?} -> {:?} needs a prefix and an IRI",
                ns.prefix, ns.iri
            )));
        }
        if self.parallel_threshold == 0 {
            return Err(ConfigError::Invalid("parallel_threshold must be at least 1".into()));
        }
        let p = &self.geometry.projection;
        if !(p.semi_major_axis > 0.0) {
            return Err(ConfigError::Invalid("semi_major_axis must be positive".into()));
        }
        if !(p.inverse_flattening > 1.0) {
            return Err(ConfigError::Invalid("inverse_flattening must be greater than 1".into()));
        }
        if !(p.standard_parallel.abs() < 90.0) {
            return Err(ConfigError::Invalid("standard_parallel must lie strictly between -90 and 90".into()));
        }
        if !p.central_meridian.is_finite() {
            return Err(ConfigError::Invalid("central_meridian must be finite".into()));
        }
        Ok(())
    }

    /// Geometry engine honouring the configured projection
    pub fn geometry_engine(&self) -> GeoEngine {
        GeoEngine::with_projection(self.geometry.projection)
    }
}
