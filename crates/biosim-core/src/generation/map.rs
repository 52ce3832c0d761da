//! Island map text: one letter per cell, one line per row.

use biosim_logic::landscape::Terrain;

use crate::error::SimError;

/// Small island: ocean ring, jungle and savannah inside, two mountain cells.
pub const DEFAULT_MAP: &str = "\
OOOOOOO
OJJSJJO
OJSSSJO
OJSMSJO
OJSMSJO
OJJJJJO
OOOOOOO";

/// Parse map text into rows of terrain.
///
/// Whitespace inside a line is ignored and blank lines are skipped, so
/// indented multi-line literals work as-is. Every row must have the same
/// length as the first.
pub fn parse_map(map: &str) -> Result<Vec<Vec<Terrain>>, SimError> {
    let mut rows: Vec<Vec<Terrain>> = Vec::new();

    for line in map.lines() {
        let symbols: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
        if symbols.is_empty() {
            continue;
        }

        let row = rows.len();
        let terrain = symbols
            .iter()
            .enumerate()
            .map(|(col, &symbol)| {
                Terrain::from_char(symbol).ok_or(SimError::UnknownTerrain { symbol, row, col })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(first) = rows.first() {
            if first.len() != terrain.len() {
                return Err(SimError::RaggedMap {
                    row,
                    expected: first.len(),
                    found: terrain.len(),
                });
            }
        }
        rows.push(terrain);
    }

    if rows.is_empty() {
        return Err(SimError::EmptyMap);
    }
    Ok(rows)
}
