// src/level/tilemap.rs
//! `.map` ファイル (タイルマップ) の読み込み。🗺️
//!
//! 1行がマップの1行ぶんで、セルはカンマ区切りの2桁の数字。
//! 1桁目がタイル画像の「行」、2桁目が「列」だよ。例: `21` → 画像の2行目・1列目のタイル。

use thiserror::Error;

/// タイルマップの読み込みエラー。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TilemapError {
    #[error("tilemap has {found} rows, expected {expected}")]
    RowCount { expected: usize, found: usize },
    #[error("tilemap row {row} has {found} cells, expected {expected}")]
    ColumnCount { row: usize, expected: usize, found: usize },
    #[error("tilemap cell ({row}, {col}) is not two digits: {cell:?}")]
    BadCell { row: usize, col: usize, cell: String },
}

/// マップ上のタイル1枚。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePlacement {
    /// マップ上の列 (x)。
    pub col: usize,
    /// マップ上の行 (y)。
    pub row: usize,
    /// タイル画像のどの行から切り出すか。
    pub src_row: u32,
    /// タイル画像のどの列から切り出すか。
    pub src_col: u32,
}

/// タイルマップの文字列を読んで、`rows` × `cols` 枚のタイルを行優先で返す。
pub fn parse_tilemap(text: &str, cols: usize, rows: usize) -> Result<Vec<TilePlacement>, TilemapError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.len() != rows {
        return Err(TilemapError::RowCount {
            expected: rows,
            found: lines.len(),
        });
    }

    let mut tiles = Vec::with_capacity(cols * rows);
    for (row, line) in lines.iter().enumerate() {
        let cells: Vec<&str> = line
            .split(',')
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .collect();
        if cells.len() != cols {
            return Err(TilemapError::ColumnCount {
                row,
                expected: cols,
                found: cells.len(),
            });
        }
        for (col, cell) in cells.iter().enumerate() {
            let (src_row, src_col) = parse_cell(cell).ok_or_else(|| TilemapError::BadCell {
                row,
                col,
                cell: cell.to_string(),
            })?;
            tiles.push(TilePlacement {
                col,
                row,
                src_row,
                src_col,
            });
        }
    }
    Ok(tiles)
}

fn parse_cell(cell: &str) -> Option<(u32, u32)> {
    let mut digits = cell.chars().map(|c| c.to_digit(10));
    match (digits.next(), digits.next(), digits.next()) {
        (Some(Some(src_row)), Some(Some(src_col)), None) => Some((src_row, src_col)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_map_to_source_row_and_column() {
        let tiles = parse_tilemap("21,00,13\n05,22,19\n", 3, 2).unwrap();
        assert_eq!(tiles.len(), 6);
        assert_eq!(
            tiles[0],
            TilePlacement {
                col: 0,
                row: 0,
                src_row: 2,
                src_col: 1
            }
        );
        assert_eq!((tiles[5].col, tiles[5].row), (2, 1));
        assert_eq!((tiles[5].src_row, tiles[5].src_col), (1, 9));
    }

    #[test]
    fn trailing_commas_and_blank_lines_are_tolerated() {
        let tiles = parse_tilemap("\n10,11,\n\n12,13,\n", 2, 2).unwrap();
        assert_eq!(tiles.len(), 4);
    }

    #[test]
    fn malformed_maps_are_rejected() {
        assert_eq!(
            parse_tilemap("00,00", 2, 2),
            Err(TilemapError::RowCount { expected: 2, found: 1 })
        );
        assert_eq!(
            parse_tilemap("00,00\n00", 2, 2),
            Err(TilemapError::ColumnCount {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert!(matches!(
            parse_tilemap("00,x1", 2, 1),
            Err(TilemapError::BadCell { row: 0, col: 1, .. })
        ));
        assert!(matches!(
            parse_tilemap("00,123", 2, 1),
            Err(TilemapError::BadCell { .. })
        ));
    }
}
