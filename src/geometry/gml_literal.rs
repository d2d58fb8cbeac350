//! GML geometry parsing
//!
//! Supports the simple-feature subset of GML 2 and 3: `Point`,
//! `LineString`, `LinearRing`, `Polygon` (with `exterior`/`interior` or
//! `outerBoundaryIs`/`innerBoundaryIs`), the `Multi*` aggregates and
//! `MultiGeometry`. Coordinates come from `pos`, `posList` or the legacy
//! `coordinates` element and are read as x (longitude) then y (latitude).

use super::{GeoError, GeoResult};
use geo_types::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parse a GML geometry element to a geo-types Geometry
pub fn parse_gml(text: &str) -> GeoResult<Geometry<f64>> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut state = GmlState::default();
    loop {
        match reader.read_event().map_err(|e| GeoError::GmlParse(e.to_string()))? {
            Event::Start(e) => state.start(&e)?,
            Event::Empty(e) => {
                state.start(&e)?;
                state.end(e.local_name().as_ref())?;
            }
            Event::Text(t) => {
                if let Some(capture) = state.capture.as_mut() {
                    let text = t.unescape().map_err(|e| GeoError::GmlParse(e.to_string()))?;
                    capture.text.push_str(&text);
                    capture.text.push(' ');
                }
            }
            Event::End(e) => state.end(e.local_name().as_ref())?,
            Event::Eof => break,
            _ => {}
        }
    }

    if !state.stack.is_empty() {
        return Err(GeoError::GmlParse("unclosed geometry element".into()));
    }
    state
        .result
        .ok_or_else(|| GeoError::GmlParse("no geometry element found".into()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Aggregate {
    Points,
    Lines,
    Polygons,
    Mixed,
}

#[derive(Debug)]
enum Frame {
    Point(Vec<Coord<f64>>),
    LineString(Vec<Coord<f64>>),
    LinearRing(Vec<Coord<f64>>),
    Polygon {
        exterior: Option<LineString<f64>>,
        interiors: Vec<LineString<f64>>,
        in_interior: bool,
    },
    Multi(Aggregate, Vec<Geometry<f64>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoordSyntax {
    /// `pos` / `posList`: whitespace-separated ordinates
    Ordinates,
    /// `coordinates`: comma-separated tuples
    Tuples,
}

#[derive(Debug)]
struct Capture {
    syntax: CoordSyntax,
    dimension: usize,
    text: String,
}

#[derive(Debug, Default)]
struct GmlState {
    stack: Vec<Frame>,
    capture: Option<Capture>,
    result: Option<Geometry<f64>>,
}

impl GmlState {
    fn start(&mut self, e: &BytesStart<'_>) -> GeoResult<()> {
        let frame = match e.local_name().as_ref() {
            b"Point" => Frame::Point(Vec::new()),
            b"LineString" => Frame::LineString(Vec::new()),
            b"LinearRing" => Frame::LinearRing(Vec::new()),
            b"Polygon" => Frame::Polygon {
                exterior: None,
                interiors: Vec::new(),
                in_interior: false,
            },
            b"MultiPoint" => Frame::Multi(Aggregate::Points, Vec::new()),
            b"MultiLineString" | b"MultiCurve" => Frame::Multi(Aggregate::Lines, Vec::new()),
            b"MultiPolygon" | b"MultiSurface" => Frame::Multi(Aggregate::Polygons, Vec::new()),
            b"MultiGeometry" => Frame::Multi(Aggregate::Mixed, Vec::new()),
            b"exterior" | b"outerBoundaryIs" => return self.set_ring_role(false),
            b"interior" | b"innerBoundaryIs" => return self.set_ring_role(true),
            b"pos" | b"posList" => {
                self.capture = Some(Capture {
                    syntax: CoordSyntax::Ordinates,
                    dimension: srs_dimension(e)?,
                    text: String::new(),
                });
                return Ok(());
            }
            b"coordinates" => {
                self.capture = Some(Capture {
                    syntax: CoordSyntax::Tuples,
                    dimension: 0,
                    text: String::new(),
                });
                return Ok(());
            }
            // Member wrappers and unknown elements are transparent
            _ => return Ok(()),
        };
        if self.result.is_some() && self.stack.is_empty() {
            return Err(GeoError::GmlParse("more than one root geometry".into()));
        }
        self.stack.push(frame);
        Ok(())
    }

    fn end(&mut self, name: &[u8]) -> GeoResult<()> {
        match name {
            b"pos" | b"posList" | b"coordinates" => {
                let Some(capture) = self.capture.take() else {
                    return Ok(());
                };
                let coords = parse_coords(&capture)?;
                match self.stack.last_mut() {
                    Some(Frame::Point(c)) | Some(Frame::LineString(c)) | Some(Frame::LinearRing(c)) => {
                        c.extend(coords);
                        Ok(())
                    }
                    _ => Err(GeoError::GmlParse("coordinates outside a geometry".into())),
                }
            }
            b"Point" | b"LineString" | b"LinearRing" | b"Polygon" | b"MultiPoint"
            | b"MultiLineString" | b"MultiCurve" | b"MultiPolygon" | b"MultiSurface"
            | b"MultiGeometry" => {
                let frame = self
                    .stack
                    .pop()
                    .ok_or_else(|| GeoError::GmlParse("unbalanced geometry element".into()))?;
                self.finish(frame)
            }
            _ => Ok(()),
        }
    }

    fn set_ring_role(&mut self, interior: bool) -> GeoResult<()> {
        match self.stack.last_mut() {
            Some(Frame::Polygon { in_interior, .. }) => {
                *in_interior = interior;
                Ok(())
            }
            _ => Err(GeoError::GmlParse("polygon boundary outside a polygon".into())),
        }
    }

    fn finish(&mut self, frame: Frame) -> GeoResult<()> {
        let geometry = match frame {
            Frame::Point(coords) => match coords.as_slice() {
                [c] => Geometry::Point(Point::from(*c)),
                _ => return Err(GeoError::GmlParse(format!("point with {} positions", coords.len()))),
            },
            Frame::LineString(coords) => {
                if coords.len() < 2 {
                    return Err(GeoError::GmlParse("line string needs at least two positions".into()));
                }
                Geometry::LineString(LineString::new(coords))
            }
            Frame::LinearRing(coords) => {
                if coords.len() < 4 {
                    return Err(GeoError::GmlParse("linear ring needs at least four positions".into()));
                }
                return match self.stack.last_mut() {
                    Some(Frame::Polygon {
                        exterior,
                        interiors,
                        in_interior,
                    }) => {
                        let ring = LineString::new(coords);
                        if *in_interior {
                            interiors.push(ring);
                        } else if exterior.is_none() {
                            *exterior = Some(ring);
                        } else {
                            return Err(GeoError::GmlParse("polygon with two exterior rings".into()));
                        }
                        Ok(())
                    }
                    _ => Err(GeoError::GmlParse("linear ring outside a polygon".into())),
                };
            }
            Frame::Polygon {
                exterior, interiors, ..
            } => {
                let exterior = exterior
                    .ok_or_else(|| GeoError::GmlParse("polygon without exterior ring".into()))?;
                Geometry::Polygon(Polygon::new(exterior, interiors))
            }
            Frame::Multi(aggregate, parts) => build_aggregate(aggregate, parts)?,
        };

        match self.stack.last_mut() {
            Some(Frame::Multi(_, parts)) => {
                parts.push(geometry);
                Ok(())
            }
            Some(_) => Err(GeoError::GmlParse("geometry nested in a non-aggregate".into())),
            None => {
                self.result = Some(geometry);
                Ok(())
            }
        }
    }
}

fn build_aggregate(aggregate: Aggregate, parts: Vec<Geometry<f64>>) -> GeoResult<Geometry<f64>> {
    let mismatch = |kind: &str| GeoError::GmlParse(format!("unexpected member in {}", kind));
    Ok(match aggregate {
        Aggregate::Points => Geometry::MultiPoint(MultiPoint::new(
            parts
                .into_iter()
                .map(|g| match g {
                    Geometry::Point(p) => Ok(p),
                    _ => Err(mismatch("MultiPoint")),
                })
                .collect::<GeoResult<_>>()?,
        )),
        Aggregate::Lines => Geometry::MultiLineString(MultiLineString::new(
            parts
                .into_iter()
                .map(|g| match g {
                    Geometry::LineString(ls) => Ok(ls),
                    _ => Err(mismatch("MultiLineString")),
                })
                .collect::<GeoResult<_>>()?,
        )),
        Aggregate::Polygons => Geometry::MultiPolygon(MultiPolygon::new(
            parts
                .into_iter()
                .map(|g| match g {
                    Geometry::Polygon(p) => Ok(p),
                    _ => Err(mismatch("MultiPolygon")),
                })
                .collect::<GeoResult<_>>()?,
        )),
        Aggregate::Mixed => Geometry::GeometryCollection(GeometryCollection::new_from(parts)),
    })
}

fn srs_dimension(e: &BytesStart<'_>) -> GeoResult<usize> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == b"srsDimension" {
            let value = String::from_utf8_lossy(&attr.value);
            return match value.trim().parse::<usize>() {
                Ok(dim) if dim >= 2 => Ok(dim),
                _ => Err(GeoError::GmlParse(format!("invalid srsDimension {:?}", value))),
            };
        }
    }
    Ok(2)
}

fn parse_number(token: &str) -> GeoResult<f64> {
    token
        .parse::<f64>()
        .map_err(|_| GeoError::GmlParse(format!("invalid coordinate {:?}", token)))
}

fn parse_coords(capture: &Capture) -> GeoResult<Vec<Coord<f64>>> {
    match capture.syntax {
        CoordSyntax::Ordinates => {
            let values = capture
                .text
                .split_whitespace()
                .map(parse_number)
                .collect::<GeoResult<Vec<_>>>()?;
            if values.is_empty() || values.len() % capture.dimension != 0 {
                return Err(GeoError::GmlParse(format!(
                    "{} ordinates do not form {}-dimensional positions",
                    values.len(),
                    capture.dimension
                )));
            }
            Ok(values
                .chunks(capture.dimension)
                .map(|c| Coord { x: c[0], y: c[1] })
                .collect())
        }
        CoordSyntax::Tuples => capture
            .text
            .split_whitespace()
            .map(|tuple| {
                let mut parts = tuple.split(',');
                match (parts.next(), parts.next()) {
                    (Some(x), Some(y)) => Ok(Coord {
                        x: parse_number(x)?,
                        y: parse_number(y)?,
                    }),
                    _ => Err(GeoError::GmlParse(format!("invalid coordinate tuple {:?}", tuple))),
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point() {
        let gml = r#"<gml:Point xmlns:gml="http://www.opengis.net/gml/3.2"><gml:pos>1.5 2.5</gml:pos></gml:Point>"#;
        assert_eq!(parse_gml(gml).unwrap(), Geometry::Point(Point::new(1.5, 2.5)));
    }

    #[test]
    fn test_polygon_with_hole() {
        let gml = r#"
            <gml:Polygon xmlns:gml="http://www.opengis.net/gml/3.2">
              <gml:exterior><gml:LinearRing>
                <gml:posList>0 0 10 0 10 10 0 10 0 0</gml:posList>
              </gml:LinearRing></gml:exterior>
              <gml:interior><gml:LinearRing>
                <gml:posList>2 2 4 2 4 4 2 4 2 2</gml:posList>
              </gml:LinearRing></gml:interior>
            </gml:Polygon>"#;
        match parse_gml(gml).unwrap() {
            Geometry::Polygon(p) => {
                assert_eq!(p.exterior().0.len(), 5);
                assert_eq!(p.interiors().len(), 1);
            }
            other => panic!("Expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_gml2_coordinates() {
        let gml = r#"
            <gml:MultiLineString xmlns:gml="http://www.opengis.net/gml">
              <gml:lineStringMember><gml:LineString>
                <gml:coordinates>0,0 1,1</gml:coordinates>
              </gml:LineString></gml:lineStringMember>
              <gml:lineStringMember><gml:LineString>
                <gml:coordinates>2,2 3,3</gml:coordinates>
              </gml:LineString></gml:lineStringMember>
            </gml:MultiLineString>"#;
        match parse_gml(gml).unwrap() {
            Geometry::MultiLineString(mls) => assert_eq!(mls.0.len(), 2),
            other => panic!("Expected multilinestring, got {:?}", other),
        }
    }

    #[test]
    fn test_three_dimensional_pos_list() {
        let gml = r#"<gml:LineString xmlns:gml="http://www.opengis.net/gml/3.2"><gml:posList srsDimension="3">0 0 5 1 1 5</gml:posList></gml:LineString>"#;
        assert_eq!(
            parse_gml(gml).unwrap(),
            Geometry::LineString(LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]))
        );
    }

    #[test]
    fn test_errors() {
        assert!(parse_gml("").is_err());
        assert!(parse_gml("<gml:Point><gml:pos>1</gml:pos></gml:Point>").is_err());
        assert!(parse_gml("<gml:Point><gml:pos>a b</gml:pos></gml:Point>").is_err());
        assert!(parse_gml("<gml:Polygon></gml:Polygon>").is_err());
        assert!(parse_gml("<gml:Point><gml:pos>1 2</gml:pos>").is_err());
    }
}
