//! WKT parsing and serialization

use super::{GeoError, GeoResult};
use geo_types::Geometry;
use std::str::FromStr;
use wkt::ToWkt;

/// Parse WKT to a geo-types Geometry
///
/// A leading CRS IRI (`<http://...> POINT(1 2)`), as allowed by
/// `geo:wktLiteral`, is stripped before parsing.
pub fn parse_wkt(text: &str) -> GeoResult<Geometry<f64>> {
    let body = strip_crs(text)?;
    wkt::Wkt::from_str(body)
        .map_err(|e| GeoError::WktParse(format!("{:?}", e)))
        .and_then(|w| {
            w.try_into()
                .map_err(|e: wkt::conversion::Error| GeoError::WktParse(format!("{:?}", e)))
        })
}

/// Serialize a geometry to WKT
pub fn to_wkt(geometry: &Geometry<f64>) -> String {
    geometry.wkt_string()
}

fn strip_crs(text: &str) -> GeoResult<&str> {
    let text = text.trim();
    match text.strip_prefix('<') {
        Some(rest) => rest
            .split_once('>')
            .map(|(_, body)| body.trim())
            .ok_or_else(|| GeoError::WktParse(format!("unterminated CRS IRI in {:?}", text))),
        None => Ok(text),
    }
}
