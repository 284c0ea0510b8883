use crate::utils::error::{IceError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Codes reserve two decimal digits for the column.
pub const MAX_COLUMNS: usize = 100;

/// Row letters used for well names; also bounds the row count.
const ROW_LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub fn row_letter(row: usize) -> char {
    ROW_LETTERS.get(row).map_or('?', |b| *b as char)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlateGeometry {
    pub rows: usize,
    pub cols: usize,
}

impl PlateGeometry {
    pub const PLATE_96: PlateGeometry = PlateGeometry { rows: 8, cols: 12 };
    pub const PLATE_384: PlateGeometry = PlateGeometry { rows: 16, cols: 24 };

    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        crate::utils::validation::validate_range("plate.rows", rows, 1, ROW_LETTERS.len())?;
        crate::utils::validation::validate_range("plate.cols", cols, 1, MAX_COLUMNS)?;
        Ok(Self { rows, cols })
    }

    pub fn well_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn coordinate(&self, row: usize, col: usize) -> Result<PlateCoordinate> {
        if row >= self.rows || col >= self.cols {
            return Err(IceError::InvalidCoordinate {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(PlateCoordinate { row, col })
    }

    /// Row-major walk over every cell of the plate.
    pub fn cells(&self) -> impl Iterator<Item = PlateCoordinate> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| PlateCoordinate { row, col }))
    }

    /// Parses a bench label such as `D06` or `h12` into a coordinate on this plate.
    pub fn parse_well_name(&self, name: &str) -> Result<PlateCoordinate> {
        let invalid = |reason: &str| IceError::ValidationError {
            message: format!("Invalid well name {:?}: {}", name, reason),
        };
        let name = name.trim();
        let mut chars = name.chars();
        let letter = chars
            .next()
            .filter(|c| c.is_ascii_alphabetic())
            .ok_or_else(|| invalid("expected a row letter"))?;
        let column: usize = chars
            .as_str()
            .parse()
            .map_err(|_| invalid("expected a column number"))?;
        if column == 0 {
            return Err(invalid("columns start at 1"));
        }

        let row = (letter.to_ascii_uppercase() as u8 - b'A') as usize;
        self.coordinate(row, column - 1)
    }

    pub fn contains(&self, code: CellCode) -> bool {
        let coordinate = code.coordinate();
        coordinate.row < self.rows && coordinate.col < self.cols
    }
}

impl Default for PlateGeometry {
    fn default() -> Self {
        Self::PLATE_96
    }
}

/// A cell on a plate, as a zero-based row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlateCoordinate {
    row: usize,
    col: usize,
}

impl PlateCoordinate {
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn code(&self) -> CellCode {
        CellCode((self.row * MAX_COLUMNS + self.col) as u32)
    }

    /// Bench label, e.g. `D06` for row 3, column 5.
    pub fn well_name(&self) -> String {
        format!("{}{:02}", row_letter(self.row), self.col + 1)
    }
}

/// Linearized cell address: the row followed by the column padded to two digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCode(u32);

impl CellCode {
    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn coordinate(&self) -> PlateCoordinate {
        let value = self.0 as usize;
        PlateCoordinate {
            row: value / MAX_COLUMNS,
            col: value % MAX_COLUMNS,
        }
    }
}

impl fmt::Display for CellCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

impl FromStr for CellCode {
    type Err = IceError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || IceError::InvalidCellCode {
            code: s.to_string(),
        };
        if s.len() < 3 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        s.parse::<u32>().map(CellCode).map_err(|_| invalid())
    }
}

impl Serialize for CellCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique_across_plate() {
        for geometry in [PlateGeometry::PLATE_96, PlateGeometry::PLATE_384] {
            let codes: HashSet<String> = geometry.cells().map(|c| c.code().to_string()).collect();
            assert_eq!(codes.len(), geometry.well_count());
        }
    }

    #[test]
    fn test_code_format() {
        let plate = PlateGeometry::default();
        assert_eq!(plate.coordinate(3, 5).unwrap().code().to_string(), "305");
        assert_eq!(plate.coordinate(0, 0).unwrap().code().to_string(), "000");
        assert_eq!(plate.coordinate(7, 11).unwrap().code().to_string(), "711");
        assert_eq!(plate.coordinate(1, 10).unwrap().code().to_string(), "110");
    }

    #[test]
    fn test_code_parses_back_to_coordinate() {
        let plate = PlateGeometry::PLATE_384;
        let coordinate = plate.coordinate(15, 23).unwrap();
        let parsed: CellCode = coordinate.code().to_string().parse().unwrap();
        assert_eq!(parsed.coordinate(), coordinate);
        assert!(plate.contains(parsed));
        assert!(!PlateGeometry::PLATE_96.contains(parsed));
    }

    #[test]
    fn test_rejects_malformed_codes() {
        assert!("5".parse::<CellCode>().is_err());
        assert!("3a5".parse::<CellCode>().is_err());
        assert!("".parse::<CellCode>().is_err());
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let plate = PlateGeometry::default();
        assert!(matches!(
            plate.coordinate(8, 0),
            Err(IceError::InvalidCoordinate { row: 8, col: 0, rows: 8, cols: 12 })
        ));
        assert!(plate.coordinate(0, 12).is_err());
    }

    #[test]
    fn test_well_names() {
        let plate = PlateGeometry::default();
        assert_eq!(plate.coordinate(0, 0).unwrap().well_name(), "A01");
        assert_eq!(plate.coordinate(3, 5).unwrap().well_name(), "D06");
        assert_eq!(plate.coordinate(7, 11).unwrap().well_name(), "H12");
    }

    #[test]
    fn test_parse_well_name() {
        let plate = PlateGeometry::default();
        assert_eq!(plate.parse_well_name("D06").unwrap(), plate.coordinate(3, 5).unwrap());
        assert_eq!(plate.parse_well_name(" h12").unwrap(), plate.coordinate(7, 11).unwrap());
        assert!(matches!(
            plate.parse_well_name("I01"),
            Err(IceError::InvalidCoordinate { row: 8, .. })
        ));
        assert!(plate.parse_well_name("A00").is_err());
        assert!(plate.parse_well_name("6").is_err());
        assert!(plate.parse_well_name("").is_err());
    }

    #[test]
    fn test_geometry_bounds() {
        assert!(PlateGeometry::new(16, 24).is_ok());
        assert!(PlateGeometry::new(0, 12).is_err());
        assert!(PlateGeometry::new(8, 101).is_err());
    }

    #[test]
    fn test_code_serializes_as_string() {
        let code = PlateGeometry::default().coordinate(2, 4).unwrap().code();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"204\"");
        let back: CellCode = serde_json::from_str("\"204\"").unwrap();
        assert_eq!(back, code);
    }
}
