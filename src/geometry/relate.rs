//! DE-9IM matrices, patterns and the named topological relations
//!
//! Cells are ordered row-major: interior, boundary, exterior of the left
//! geometry against interior, boundary, exterior of the right one.
//! Relation families follow the GeoSPARQL function tables; the simple
//! features family uses the dimension-aware JTS definitions.

use super::{GeoError, GeoResult};
use std::fmt;

/// Computed intersection matrix; each cell is one of `F`, `0`, `1`, `2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct De9imMatrix([u8; 9]);

impl De9imMatrix {
    /// Build a matrix from its 9-character form
    pub fn new(cells: &str) -> GeoResult<Self> {
        let bytes = cells.as_bytes();
        if bytes.len() != 9 || !bytes.iter().all(|b| matches!(b, b'F' | b'0' | b'1' | b'2')) {
            return Err(GeoError::InvalidMatrix(cells.to_string()));
        }
        let mut out = [b'F'; 9];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }

    pub(crate) fn from_cells(cells: [u8; 9]) -> Self {
        Self(cells)
    }

    /// Check the matrix against a pattern
    pub fn matches(&self, pattern: &De9imPattern) -> bool {
        self.0.iter().zip(pattern.0.iter()).all(|(&cell, &want)| match want {
            b'*' => true,
            b'T' => cell != b'F',
            other => cell == other,
        })
    }

    fn matches_str(&self, pattern: &'static str) -> bool {
        De9imPattern::new(pattern)
            .map(|p| self.matches(&p))
            .unwrap_or(false)
    }

    fn matches_any(&self, patterns: &[&'static str]) -> bool {
        patterns.iter().any(|p| self.matches_str(p))
    }

    /// Topological dimension of the left geometry (-1 when empty)
    pub fn left_dimension(&self) -> i8 {
        [0, 1, 2].iter().map(|&i| cell_dimension(self.0[i])).max().unwrap_or(-1)
    }

    /// Topological dimension of the right geometry (-1 when empty)
    pub fn right_dimension(&self) -> i8 {
        [0, 3, 6].iter().map(|&i| cell_dimension(self.0[i])).max().unwrap_or(-1)
    }
}

impl fmt::Display for De9imMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(std::str::from_utf8(&self.0).map_err(|_| fmt::Error)?)
    }
}

fn cell_dimension(cell: u8) -> i8 {
    match cell {
        b'0' => 0,
        b'1' => 1,
        b'2' => 2,
        _ => -1,
    }
}

/// Intersection pattern: 9 characters from `{0, 1, 2, T, F, *}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct De9imPattern([u8; 9]);

impl De9imPattern {
    /// Validate a pattern string
    pub fn new(pattern: &str) -> GeoResult<Self> {
        let bytes = pattern.as_bytes();
        if bytes.len() != 9
            || !bytes
                .iter()
                .all(|b| matches!(b, b'0' | b'1' | b'2' | b'T' | b'F' | b'*'))
        {
            return Err(GeoError::InvalidPattern(pattern.to_string()));
        }
        let mut out = [b'*'; 9];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII bytes are admitted by `new`
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for De9imPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named topological relations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpatialRelation {
    // Simple features
    SfEquals,
    SfDisjoint,
    SfIntersects,
    SfTouches,
    SfCrosses,
    SfWithin,
    SfContains,
    SfOverlaps,
    // Egenhofer
    EhEquals,
    EhDisjoint,
    EhMeet,
    EhOverlap,
    EhCovers,
    EhCoveredBy,
    EhInside,
    EhContains,
    // RCC8
    Rcc8Eq,
    Rcc8Dc,
    Rcc8Ec,
    Rcc8Po,
    Rcc8Tppi,
    Rcc8Tpp,
    Rcc8Ntpp,
    Rcc8Ntppi,
}

impl SpatialRelation {
    pub const ALL: [SpatialRelation; 24] = [
        SpatialRelation::SfEquals,
        SpatialRelation::SfDisjoint,
        SpatialRelation::SfIntersects,
        SpatialRelation::SfTouches,
        SpatialRelation::SfCrosses,
        SpatialRelation::SfWithin,
        SpatialRelation::SfContains,
        SpatialRelation::SfOverlaps,
        SpatialRelation::EhEquals,
        SpatialRelation::EhDisjoint,
        SpatialRelation::EhMeet,
        SpatialRelation::EhOverlap,
        SpatialRelation::EhCovers,
        SpatialRelation::EhCoveredBy,
        SpatialRelation::EhInside,
        SpatialRelation::EhContains,
        SpatialRelation::Rcc8Eq,
        SpatialRelation::Rcc8Dc,
        SpatialRelation::Rcc8Ec,
        SpatialRelation::Rcc8Po,
        SpatialRelation::Rcc8Tppi,
        SpatialRelation::Rcc8Tpp,
        SpatialRelation::Rcc8Ntpp,
        SpatialRelation::Rcc8Ntppi,
    ];

    /// Local name of the GeoSPARQL function
    pub fn function_name(&self) -> &'static str {
        match self {
            SpatialRelation::SfEquals => "sfEquals",
            SpatialRelation::SfDisjoint => "sfDisjoint",
            SpatialRelation::SfIntersects => "sfIntersects",
            SpatialRelation::SfTouches => "sfTouches",
            SpatialRelation::SfCrosses => "sfCrosses",
            SpatialRelation::SfWithin => "sfWithin",
            SpatialRelation::SfContains => "sfContains",
            SpatialRelation::SfOverlaps => "sfOverlaps",
            SpatialRelation::EhEquals => "ehEquals",
            SpatialRelation::EhDisjoint => "ehDisjoint",
            SpatialRelation::EhMeet => "ehMeet",
            SpatialRelation::EhOverlap => "ehOverlap",
            SpatialRelation::EhCovers => "ehCovers",
            SpatialRelation::EhCoveredBy => "ehCoveredBy",
            SpatialRelation::EhInside => "ehInside",
            SpatialRelation::EhContains => "ehContains",
            SpatialRelation::Rcc8Eq => "rcc8eq",
            SpatialRelation::Rcc8Dc => "rcc8dc",
            SpatialRelation::Rcc8Ec => "rcc8ec",
            SpatialRelation::Rcc8Po => "rcc8po",
            SpatialRelation::Rcc8Tppi => "rcc8tppi",
            SpatialRelation::Rcc8Tpp => "rcc8tpp",
            SpatialRelation::Rcc8Ntpp => "rcc8ntpp",
            SpatialRelation::Rcc8Ntppi => "rcc8ntppi",
        }
    }

    /// Look a relation up by its function local name
    pub fn from_function_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.function_name() == name)
    }

    /// Decide the relation from a computed matrix
    pub fn holds(&self, m: &De9imMatrix) -> bool {
        let (da, db) = (m.left_dimension(), m.right_dimension());
        match self {
            SpatialRelation::SfEquals => m.matches_str("T*F**FFF*"),
            SpatialRelation::SfDisjoint => m.matches_str("FF*FF****"),
            SpatialRelation::SfIntersects => !m.matches_str("FF*FF****"),
            SpatialRelation::SfTouches => m.matches_any(&["FT*******", "F**T*****", "F***T****"]),
            SpatialRelation::SfWithin => m.matches_str("T*F**F***"),
            SpatialRelation::SfContains => m.matches_str("T*****FF*"),
            SpatialRelation::SfCrosses => {
                if da < db {
                    m.matches_str("T*T******")
                } else if da > db {
                    m.matches_str("T*****T**")
                } else {
                    da == 1 && m.matches_str("0********")
                }
            }
            SpatialRelation::SfOverlaps => {
                if da != db {
                    false
                } else if da == 1 {
                    m.matches_str("1*T***T**")
                } else {
                    m.matches_str("T*T***T**")
                }
            }
            SpatialRelation::EhEquals | SpatialRelation::Rcc8Eq => m.matches_str("TFFFTFFFT"),
            SpatialRelation::EhDisjoint => m.matches_str("FF*FF****"),
            SpatialRelation::EhMeet => m.matches_any(&["FT*******", "F**T*****", "F***T****"]),
            SpatialRelation::EhOverlap => m.matches_str("T*T***T**"),
            SpatialRelation::EhCovers => m.matches_str("T*TFT*FF*"),
            SpatialRelation::EhCoveredBy => m.matches_str("TFF*TFT**"),
            SpatialRelation::EhInside => m.matches_str("TFF*FFT**"),
            SpatialRelation::EhContains => m.matches_str("T*TFF*FF*"),
            SpatialRelation::Rcc8Dc => m.matches_str("FFTFFTTTT"),
            SpatialRelation::Rcc8Ec => m.matches_str("FFTFTTTTT"),
            SpatialRelation::Rcc8Po => m.matches_str("TTTTTTTTT"),
            SpatialRelation::Rcc8Tppi => m.matches_str("TTTFTTFFT"),
            SpatialRelation::Rcc8Tpp => m.matches_str("TFFTTFTTT"),
            SpatialRelation::Rcc8Ntpp => m.matches_str("TFFTFFTTT"),
            SpatialRelation::Rcc8Ntppi => m.matches_str("TTTFFTFFT"),
        }
    }
}

impl fmt::Display for SpatialRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.function_name())
    }
}
