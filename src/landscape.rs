//! Plain-text landscape maps.
//!
//! One character per cell, one line per row. Uppercase letters are ordinary
//! cells and the lowercase form of the same letter marks a low-toxicity
//! zone. Blank lines and lines starting with `#` are skipped.
//!
//! | Symbol | Terrain   |
//! |--------|-----------|
//! | `D`    | Desert    |
//! | `W`    | Water     |
//! | `G`    | Grassland |
//! | `F`    | Forest    |
//! | `P`    | Plateau   |
//! | `C`    | Canyon    |
//! | `V`    | Valley    |

use mycoscape_data::{Landscape, LandscapeCell, TerrainType};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Map file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Map has no rows")]
    Empty,

    #[error("Row {line} has {actual} cells, expected {expected}")]
    Ragged {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown symbol '{symbol}' at row {line}, column {column}")]
    UnknownSymbol {
        line: usize,
        column: usize,
        symbol: char,
    },

    #[error("Map is {width}x{height}, larger than {max}x{max}")]
    TooLarge { width: usize, height: usize, max: usize },
}

/// Built-in map used when no map file is given.
pub const DEMO_MAP: &str = "\
# Mycoscape demo basin
DDDDDDDDPPPPPPDDDDDDDDDD
DDDDDDDPPPPPPPPDDDDDdddD
DDDDDDDDPPCCPPDDDDDddddD
GGGDDDDDDDCCDDDDDDDddddD
GGGGGDDDDDCCCDDDDDDDDDDD
FFGGGGDDDDDCCVVVVDDDDDDD
FFFGGGGDDDDVVVVVVVDDDDDD
FFFFGGGGDDVVVWWWVVVDDDDD
FFFFFGGGGVVVWWWWWVVVDDDD
FFFFGGGGGGVVVWWWVVVggDDD
FFFGGGGGGGGVVVVVVVgggDDD
FFGGGGGGGGGGVVVVVggggDDD
";

const MAX_SIDE: usize = u16::MAX as usize;

/// Terrain and elevation for a map symbol, plus its low-toxicity flag.
#[must_use]
pub fn decode_symbol(symbol: char) -> Option<(TerrainType, bool)> {
    let terrain = match symbol.to_ascii_uppercase() {
        'D' => TerrainType::Desert,
        'W' => TerrainType::Water,
        'G' => TerrainType::Grassland,
        'F' => TerrainType::Forest,
        'P' => TerrainType::Plateau,
        'C' => TerrainType::Canyon,
        'V' => TerrainType::Valley,
        _ => return None,
    };
    Some((terrain, symbol.is_ascii_lowercase()))
}

/// Nominal elevation in [0, 1] for hand-authored maps.
#[must_use]
pub fn nominal_elevation(terrain: TerrainType) -> f64 {
    match terrain {
        TerrainType::Water => 0.0,
        TerrainType::Valley => 0.15,
        TerrainType::Canyon => 0.2,
        TerrainType::Desert => 0.3,
        TerrainType::Grassland => 0.35,
        TerrainType::Forest => 0.45,
        TerrainType::Plateau => 0.8,
    }
}

pub fn parse_map(text: &str) -> Result<Landscape, MapError> {
    let mut rows: Vec<(usize, &str)> = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim_end();
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        rows.push((i + 1, line));
    }
    let Some(&(_, first)) = rows.first() else {
        return Err(MapError::Empty);
    };

    let width = first.chars().count();
    let height = rows.len();
    if width > MAX_SIDE || height > MAX_SIDE {
        return Err(MapError::TooLarge {
            width,
            height,
            max: MAX_SIDE,
        });
    }

    let mut cells = Vec::with_capacity(width * height);
    for (line, row) in rows {
        let actual = row.chars().count();
        if actual != width {
            return Err(MapError::Ragged {
                line,
                expected: width,
                actual,
            });
        }
        for (column, symbol) in row.chars().enumerate() {
            let (terrain, low_toxicity) = decode_symbol(symbol).ok_or(MapError::UnknownSymbol {
                line,
                column: column + 1,
                symbol,
            })?;
            let mut cell = LandscapeCell::new(terrain, nominal_elevation(terrain));
            cell.low_toxicity_zone = low_toxicity;
            cells.push(cell);
        }
    }

    Ok(Landscape::new(width as u16, height as u16, cells))
}

pub fn load_map(path: impl AsRef<Path>) -> Result<Landscape, MapError> {
    let text = std::fs::read_to_string(path)?;
    parse_map(&text)
}

/// The built-in demo landscape.
pub fn demo_landscape() -> Result<Landscape, MapError> {
    parse_map(DEMO_MAP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_small_map() {
        let land = parse_map("# comment\nDW\ngf\n\n").unwrap();
        assert_eq!((land.width, land.height), (2, 2));
        assert_eq!(land.get(1, 0).unwrap().terrain, TerrainType::Water);
        let forest = land.get(1, 1).unwrap();
        assert_eq!(forest.terrain, TerrainType::Forest);
        assert!(forest.low_toxicity_zone);
        assert!(!land.get(0, 0).unwrap().low_toxicity_zone);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_map("# only comments\n"), Err(MapError::Empty)));
        assert!(matches!(
            parse_map("DDD\nDD\n"),
            Err(MapError::Ragged { line: 2, expected: 3, actual: 2 })
        ));
        assert!(matches!(
            parse_map("DXD\n"),
            Err(MapError::UnknownSymbol { line: 1, column: 2, symbol: 'X' })
        ));
    }

    #[test]
    fn test_demo_map_is_rectangular() {
        let land = demo_landscape().unwrap();
        assert_eq!(land.width, 24);
        assert_eq!(land.height, 12);
        assert!(land.cells.iter().any(|c| c.low_toxicity_zone));
        assert!(land.cells.iter().any(|c| c.terrain == TerrainType::Water));
    }
}
