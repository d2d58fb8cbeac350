//! Default geometry engine on top of the `geo` crate

use super::{
    gml_literal, wkt_literal, De9imMatrix, EqualAreaProjection, GeoError, GeoResult,
    GeometryEngine, Measure, SetOperation,
};
use geo::coordinate_position::CoordPos;
use geo::dimensions::Dimensions;
use geo::{Area, BooleanOps, Haversine, Intersects, Length, Relate};
use geo_types::{Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point};

/// Geometry engine backed by `geo`, `wkt` and the built-in GML reader
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoEngine {
    projection: EqualAreaProjection,
}

impl GeoEngine {
    /// Create an engine projecting to EPSG:6933 for areas
    pub const fn new() -> Self {
        Self {
            projection: EqualAreaProjection::EPSG_6933,
        }
    }

    /// Create an engine with a custom equal-area projection
    pub fn with_projection(projection: EqualAreaProjection) -> Self {
        Self { projection }
    }

    pub fn projection(&self) -> &EqualAreaProjection {
        &self.projection
    }
}

impl Default for GeoEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryEngine for GeoEngine {
    fn parse_wkt(&self, text: &str) -> GeoResult<Geometry<f64>> {
        wkt_literal::parse_wkt(text)
    }

    fn parse_gml(&self, text: &str) -> GeoResult<Geometry<f64>> {
        gml_literal::parse_gml(text)
    }

    fn to_wkt(&self, geometry: &Geometry<f64>) -> String {
        wkt_literal::to_wkt(geometry)
    }

    fn relate(&self, a: &Geometry<f64>, b: &Geometry<f64>) -> GeoResult<De9imMatrix> {
        let matrix = a.relate(b);
        let positions = [CoordPos::Inside, CoordPos::OnBoundary, CoordPos::Outside];
        let mut cells = [b'F'; 9];
        for (i, &lhs) in positions.iter().enumerate() {
            for (j, &rhs) in positions.iter().enumerate() {
                cells[i * 3 + j] = match matrix.get(lhs, rhs) {
                    Dimensions::Empty => b'F',
                    Dimensions::ZeroDimensional => b'0',
                    Dimensions::OneDimensional => b'1',
                    Dimensions::TwoDimensional => b'2',
                };
            }
        }
        Ok(De9imMatrix::from_cells(cells))
    }

    fn set_operation(
        &self,
        op: SetOperation,
        a: &Geometry<f64>,
        b: &Geometry<f64>,
    ) -> GeoResult<Geometry<f64>> {
        match (Shape::of(a), Shape::of(b)) {
            (Shape::Areal(pa), Shape::Areal(pb)) => {
                let result = match op {
                    SetOperation::Intersection => pa.intersection(&pb),
                    SetOperation::Union => pa.union(&pb),
                    SetOperation::Difference => pa.difference(&pb),
                    SetOperation::SymDifference => pa.xor(&pb),
                };
                Ok(Geometry::MultiPolygon(result))
            }
            (Shape::Lineal(lines), Shape::Areal(area)) => Ok(match op {
                SetOperation::Intersection => Geometry::MultiLineString(area.clip(&lines, false)),
                SetOperation::Difference => Geometry::MultiLineString(area.clip(&lines, true)),
                SetOperation::Union | SetOperation::SymDifference => areal_with_lines(area, &lines),
            }),
            (Shape::Areal(area), Shape::Lineal(lines)) => Ok(match op {
                SetOperation::Intersection => Geometry::MultiLineString(area.clip(&lines, false)),
                SetOperation::Difference => Geometry::MultiPolygon(area),
                SetOperation::Union | SetOperation::SymDifference => areal_with_lines(area, &lines),
            }),
            (Shape::Lineal(la), Shape::Lineal(lb)) if op == SetOperation::Union => {
                let mut lines = la.0;
                lines.extend(lb.0);
                Ok(Geometry::MultiLineString(MultiLineString::new(lines)))
            }
            (Shape::Puntal(pa), Shape::Puntal(pb)) => {
                let (a_only, shared) = partition(pa, b);
                let (b_only, _) = partition(pb, a);
                let points = match op {
                    SetOperation::Intersection => shared,
                    SetOperation::Difference => a_only,
                    SetOperation::Union => a_only.into_iter().chain(b_only).chain(shared).collect(),
                    SetOperation::SymDifference => a_only.into_iter().chain(b_only).collect(),
                };
                Ok(Geometry::MultiPoint(MultiPoint::new(points)))
            }
            (Shape::Puntal(points), _) => {
                let (outside, inside) = partition(points, b);
                Ok(match op {
                    SetOperation::Intersection => Geometry::MultiPoint(MultiPoint::new(inside)),
                    SetOperation::Difference => Geometry::MultiPoint(MultiPoint::new(outside)),
                    SetOperation::Union | SetOperation::SymDifference => with_points(b, outside),
                })
            }
            (_, Shape::Puntal(points)) => {
                let (outside, inside) = partition(points, a);
                Ok(match op {
                    SetOperation::Intersection => Geometry::MultiPoint(MultiPoint::new(inside)),
                    SetOperation::Difference => a.clone(),
                    SetOperation::Union | SetOperation::SymDifference => with_points(a, outside),
                })
            }
            _ => Err(GeoError::UnsupportedOperation(format!(
                "{} of {} and {}",
                op,
                geometry_kind(a),
                geometry_kind(b)
            ))),
        }
    }

    fn measure(&self, measure: Measure, geometry: &Geometry<f64>) -> GeoResult<f64> {
        match measure {
            Measure::Area => Ok(self.to_equal_area(geometry)?.unsigned_area()),
            Measure::Length => Ok(haversine_length(geometry)),
        }
    }

    fn to_equal_area(&self, geometry: &Geometry<f64>) -> GeoResult<Geometry<f64>> {
        self.projection.project(geometry)
    }

    fn from_equal_area(&self, geometry: &Geometry<f64>) -> GeoResult<Geometry<f64>> {
        self.projection.unproject(geometry)
    }
}

/// Geometry grouped by topological dimension
enum Shape {
    Puntal(Vec<Point<f64>>),
    Lineal(MultiLineString<f64>),
    Areal(MultiPolygon<f64>),
    Other,
}

impl Shape {
    fn of(geometry: &Geometry<f64>) -> Self {
        match geometry {
            Geometry::Point(p) => Shape::Puntal(vec![*p]),
            Geometry::MultiPoint(mp) => Shape::Puntal(mp.0.clone()),
            Geometry::Line(l) => Shape::Lineal(MultiLineString::new(vec![LineString::from(*l)])),
            Geometry::LineString(ls) => Shape::Lineal(MultiLineString::new(vec![ls.clone()])),
            Geometry::MultiLineString(mls) => Shape::Lineal(mls.clone()),
            Geometry::Polygon(p) => Shape::Areal(MultiPolygon::new(vec![p.clone()])),
            Geometry::MultiPolygon(mp) => Shape::Areal(mp.clone()),
            Geometry::Rect(r) => Shape::Areal(MultiPolygon::new(vec![r.to_polygon()])),
            Geometry::Triangle(t) => Shape::Areal(MultiPolygon::new(vec![t.to_polygon()])),
            Geometry::GeometryCollection(_) => Shape::Other,
        }
    }
}

/// Split points into those outside and those intersecting `other`
fn partition(points: Vec<Point<f64>>, other: &Geometry<f64>) -> (Vec<Point<f64>>, Vec<Point<f64>>) {
    let (inside, outside): (Vec<_>, Vec<_>) = points.into_iter().partition(|p| other.intersects(p));
    (outside, inside)
}

fn areal_with_lines(area: MultiPolygon<f64>, lines: &MultiLineString<f64>) -> Geometry<f64> {
    let outside = area.clip(lines, true);
    Geometry::GeometryCollection(GeometryCollection::new_from(vec![
        Geometry::MultiPolygon(area),
        Geometry::MultiLineString(outside),
    ]))
}

fn with_points(geometry: &Geometry<f64>, points: Vec<Point<f64>>) -> Geometry<f64> {
    if points.is_empty() {
        return geometry.clone();
    }
    Geometry::GeometryCollection(GeometryCollection::new_from(vec![
        geometry.clone(),
        Geometry::MultiPoint(MultiPoint::new(points)),
    ]))
}

/// Great-circle length in metres; areal geometries contribute their rings
fn haversine_length(geometry: &Geometry<f64>) -> f64 {
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => 0.0,
        Geometry::Line(l) => l.length::<Haversine>(),
        Geometry::LineString(ls) => ls.length::<Haversine>(),
        Geometry::MultiLineString(mls) => mls.length::<Haversine>(),
        Geometry::Polygon(p) => {
            p.exterior().length::<Haversine>()
                + p.interiors().iter().map(|r| r.length::<Haversine>()).sum::<f64>()
        }
        Geometry::MultiPolygon(mp) => mp
            .0
            .iter()
            .map(|p| haversine_length(&Geometry::Polygon(p.clone())))
            .sum(),
        Geometry::Rect(r) => haversine_length(&Geometry::Polygon(r.to_polygon())),
        Geometry::Triangle(t) => haversine_length(&Geometry::Polygon(t.to_polygon())),
        Geometry::GeometryCollection(gc) => gc.0.iter().map(haversine_length).sum(),
    }
}

fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
