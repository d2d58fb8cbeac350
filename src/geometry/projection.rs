//! Lambert cylindrical equal-area projection on the WGS84 ellipsoid
//!
//! The default parameters give EPSG:6933 (WGS 84 / NSIDC EASE-Grid 2.0
//! Global), used for area computation. Formulas follow Snyder, "Map
//! Projections: A Working Manual", pp. 76-85.

use super::{GeoError, GeoResult};
use geo::MapCoords;
use geo_types::{Coord, Geometry};
use serde::{Deserialize, Serialize};

/// Cylindrical equal-area projection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqualAreaProjection {
    /// Ellipsoid semi-major axis in metres
    pub semi_major_axis: f64,
    /// Ellipsoid inverse flattening
    pub inverse_flattening: f64,
    /// Latitude of true scale, in degrees
    pub standard_parallel: f64,
    /// Longitude of origin, in degrees
    pub central_meridian: f64,
}

impl EqualAreaProjection {
    /// EPSG:6933
    pub const EPSG_6933: EqualAreaProjection = EqualAreaProjection {
        semi_major_axis: 6_378_137.0,
        inverse_flattening: 298.257_223_563,
        standard_parallel: 30.0,
        central_meridian: 0.0,
    };

    fn eccentricity(&self) -> f64 {
        let f = 1.0 / self.inverse_flattening;
        (2.0 * f - f * f).sqrt()
    }

    /// Scale factor along the standard parallel
    fn k0(&self) -> f64 {
        let e = self.eccentricity();
        let phi1 = self.standard_parallel.to_radians();
        phi1.cos() / (1.0 - e * e * phi1.sin().powi(2)).sqrt()
    }

    fn q(&self, sin_phi: f64) -> f64 {
        let e = self.eccentricity();
        let e2 = e * e;
        let es = e * sin_phi;
        (1.0 - e2) * (sin_phi / (1.0 - es * es) - (1.0 / (2.0 * e)) * ((1.0 - es) / (1.0 + es)).ln())
    }

    /// Project a longitude/latitude pair (degrees) to metres
    pub fn forward(&self, lon: f64, lat: f64) -> GeoResult<(f64, f64)> {
        if !lon.is_finite() || !lat.is_finite() || lat.abs() > 90.0 {
            return Err(GeoError::Projection(format!(
                "coordinate ({}, {}) outside the WGS84 domain",
                lon, lat
            )));
        }
        let a = self.semi_major_axis;
        let k0 = self.k0();
        let x = a * k0 * (lon - self.central_meridian).to_radians();
        let y = a * self.q(lat.to_radians().sin()) / (2.0 * k0);
        Ok((x, y))
    }

    /// Unproject metres back to longitude/latitude (degrees)
    pub fn inverse(&self, x: f64, y: f64) -> GeoResult<(f64, f64)> {
        let a = self.semi_major_axis;
        let k0 = self.k0();
        let e = self.eccentricity();
        let (e2, e4, e6) = (e * e, e.powi(4), e.powi(6));

        let qp = self.q(1.0);
        let ratio = 2.0 * y * k0 / (a * qp);
        if !x.is_finite() || !ratio.is_finite() || ratio.abs() > 1.0 + 1e-12 {
            return Err(GeoError::Projection(format!(
                "coordinate ({}, {}) outside the projected domain",
                x, y
            )));
        }
        // Authalic latitude, then the series back to geodetic latitude
        let beta = ratio.clamp(-1.0, 1.0).asin();
        let phi = beta
            + (e2 / 3.0 + 31.0 * e4 / 180.0 + 517.0 * e6 / 5040.0) * (2.0 * beta).sin()
            + (23.0 * e4 / 360.0 + 251.0 * e6 / 3780.0) * (4.0 * beta).sin()
            + (761.0 * e6 / 45360.0) * (6.0 * beta).sin();
        let lon = self.central_meridian + (x / (a * k0)).to_degrees();
        Ok((lon, phi.to_degrees()))
    }

    /// Project every coordinate of a geometry
    pub fn project(&self, geometry: &Geometry<f64>) -> GeoResult<Geometry<f64>> {
        geometry.try_map_coords(|c| self.forward(c.x, c.y).map(|(x, y)| Coord { x, y }))
    }

    /// Unproject every coordinate of a geometry
    pub fn unproject(&self, geometry: &Geometry<f64>) -> GeoResult<Geometry<f64>> {
        geometry.try_map_coords(|c| self.inverse(c.x, c.y).map(|(x, y)| Coord { x, y }))
    }
}

impl Default for EqualAreaProjection {
    fn default() -> Self {
        Self::EPSG_6933
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_origin() {
        let proj = EqualAreaProjection::default();
        let (x, y) = proj.forward(0.0, 0.0).unwrap();
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_round_trip() {
        let proj = EqualAreaProjection::default();
        for &(lon, lat) in &[(10.0, 45.0), (-122.4, 37.8), (151.2, -33.9), (0.0, 89.0)] {
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_abs_diff_eq!(lon, lon2, epsilon = 1e-9);
            assert_abs_diff_eq!(lat, lat2, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_domain() {
        let proj = EqualAreaProjection::default();
        assert!(proj.forward(0.0, 91.0).is_err());
        assert!(proj.forward(f64::NAN, 0.0).is_err());
        assert!(proj.inverse(0.0, 1.0e8).is_err());
    }
}
