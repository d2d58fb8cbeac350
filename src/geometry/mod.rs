//! Geometry adapter for GeoSPARQL filter functions
//!
//! The evaluation core only talks to geometries through the
//! [`GeometryEngine`] trait: parsing WKT/GML literals, computing DE-9IM
//! matrices, set operations, measures and reprojection. [`GeoEngine`] is
//! the default implementation on top of the `geo` crate.
//!
//! # Example
//!
//! ```rust
//! use samyama_filter::geometry::{GeoEngine, GeometryEngine, SpatialRelation};
//!
//! let engine = GeoEngine::new();
//! let square = engine.parse_wkt("POLYGON((0 0, 4 0, 4 4, 0 4, 0 0))").unwrap();
//! let line = engine.parse_wkt("LINESTRING(1 1, 2 2)").unwrap();
//!
//! let matrix = engine.relate(&square, &line).unwrap();
//! assert!(SpatialRelation::SfContains.holds(&matrix));
//! ```

mod engine;
mod gml_literal;
mod projection;
mod relate;
mod wkt_literal;

pub use engine::GeoEngine;
pub use gml_literal::parse_gml;
pub use projection::EqualAreaProjection;
pub use relate::{De9imMatrix, De9imPattern, SpatialRelation};
pub use wkt_literal::{parse_wkt, to_wkt};

pub use geo_types::Geometry;

use std::fmt;
use thiserror::Error;

/// Geometry errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    /// WKT text could not be parsed
    #[error("WKT parse error: {0}")]
    WktParse(String),

    /// GML text could not be parsed
    #[error("GML parse error: {0}")]
    GmlParse(String),

    /// Operation not available for the given geometry types
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Coordinates outside the projection's domain
    #[error("Projection error: {0}")]
    Projection(String),

    /// Malformed DE-9IM intersection pattern
    #[error("Invalid DE-9IM pattern: {0:?} (expected 9 characters from 0, 1, 2, T, F, *)")]
    InvalidPattern(String),

    /// Malformed DE-9IM matrix
    #[error("Invalid DE-9IM matrix: {0:?}")]
    InvalidMatrix(String),
}

pub type GeoResult<T> = Result<T, GeoError>;

/// Point-set operations producing a new geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOperation {
    Intersection,
    Union,
    Difference,
    SymDifference,
}

impl SetOperation {
    /// Local name of the GeoSPARQL function
    pub fn function_name(&self) -> &'static str {
        match self {
            SetOperation::Intersection => "intersection",
            SetOperation::Union => "union",
            SetOperation::Difference => "difference",
            SetOperation::SymDifference => "symDifference",
        }
    }
}

impl fmt::Display for SetOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.function_name())
    }
}

/// Scalar measures of a single geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measure {
    /// Area in square metres
    Area,
    /// Length (perimeter for areal geometries) in metres
    Length,
}

impl Measure {
    pub fn function_name(&self) -> &'static str {
        match self {
            Measure::Area => "area",
            Measure::Length => "length",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.function_name())
    }
}

/// Geometry capabilities required by the spatial filter functions
///
/// Coordinates are longitude/latitude on WGS84 unless stated otherwise.
pub trait GeometryEngine: Send + Sync {
    /// Parse WKT text, optionally prefixed by a CRS IRI
    fn parse_wkt(&self, text: &str) -> GeoResult<Geometry<f64>>;

    /// Parse a GML geometry element
    fn parse_gml(&self, text: &str) -> GeoResult<Geometry<f64>>;

    /// Serialize a geometry as WKT
    fn to_wkt(&self, geometry: &Geometry<f64>) -> String;

    /// Compute the DE-9IM matrix of `a` against `b`
    fn relate(&self, a: &Geometry<f64>, b: &Geometry<f64>) -> GeoResult<De9imMatrix>;

    /// Compute a point-set operation
    fn set_operation(
        &self,
        op: SetOperation,
        a: &Geometry<f64>,
        b: &Geometry<f64>,
    ) -> GeoResult<Geometry<f64>>;

    /// Compute a measure in metric units
    fn measure(&self, measure: Measure, geometry: &Geometry<f64>) -> GeoResult<f64>;

    /// Project WGS84 coordinates to the equal-area system
    fn to_equal_area(&self, geometry: &Geometry<f64>) -> GeoResult<Geometry<f64>>;

    /// Project equal-area coordinates back to WGS84
    fn from_equal_area(&self, geometry: &Geometry<f64>) -> GeoResult<Geometry<f64>>;
}
