//! src/model/masonry.rs
//! ============================================================================
//! # MasonryLayout: round-robin columns sized by aspect ratio
//!
//! Item `i` goes to column `i % columns`, so collection order reads left to
//! right, top to bottom. Each tile's height comes from the photo's aspect
//! ratio at the column width, corrected for terminal cells being roughly
//! twice as tall as they are wide. All coordinates are in rows relative to
//! the top of the grid content.

use std::sync::Arc;

use crate::api::photo::Photo;

pub const MIN_TILE_ROWS: u16 = 4;
pub const MAX_TILE_ROWS: u16 = 16;

/// Cell height over cell width of a typical terminal font.
const CELL_ASPECT: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Placement of one feed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePlacement {
    pub index: usize,
    pub column: usize,
    pub y: u32,
    pub height: u16,
}

impl TilePlacement {
    pub fn bottom(&self) -> u32 {
        self.y + u32::from(self.height)
    }

    fn center(&self) -> u32 {
        self.y + u32::from(self.height) / 2
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasonryLayout {
    columns: usize,
    column_width: u16,
    tiles: Vec<TilePlacement>,
    content_height: u32,
}

impl MasonryLayout {
    pub fn compute(photos: &[Arc<Photo>], columns: usize, column_width: u16) -> Self {
        let columns = columns.max(1);
        let mut bottoms = vec![0u32; columns];

        let tiles = photos
            .iter()
            .enumerate()
            .map(|(index, photo)| {
                let column = index % columns;
                let height = tile_rows(photo.aspect_ratio(), column_width);
                let tile = TilePlacement {
                    index,
                    column,
                    y: bottoms[column],
                    height,
                };
                bottoms[column] = tile.bottom();
                tile
            })
            .collect();

        Self {
            columns,
            column_width,
            tiles,
            content_height: bottoms.into_iter().max().unwrap_or(0),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn column_width(&self) -> u16 {
        self.column_width
    }

    pub fn tiles(&self) -> &[TilePlacement] {
        &self.tiles
    }

    pub fn tile(&self, index: usize) -> Option<&TilePlacement> {
        self.tiles.get(index)
    }

    /// Bottom of the tallest column.
    pub fn content_height(&self) -> u32 {
        self.content_height
    }

    /// Tiles intersecting `[offset, offset + height)`.
    pub fn visible(&self, offset: u32, height: u16) -> impl Iterator<Item = &TilePlacement> {
        let end = offset + u32::from(height);
        self.tiles
            .iter()
            .filter(move |t| t.bottom() > offset && t.y < end)
    }

    /// The sentinel sits just below the tallest column. It is visible once
    /// the viewport reaches the end of the content. An empty grid has none.
    pub fn sentinel_visible(&self, offset: u32, height: u16) -> bool {
        !self.tiles.is_empty() && offset + u32::from(height) >= self.content_height
    }

    /// Largest useful scroll offset for a viewport of `height` rows.
    pub fn max_offset(&self, height: u16) -> u32 {
        self.content_height.saturating_sub(u32::from(height))
    }

    /// Cursor movement between tiles.
    pub fn neighbor(&self, index: usize, direction: Direction) -> Option<usize> {
        let current = self.tiles.get(index)?;
        match direction {
            Direction::Up => index.checked_sub(self.columns),
            Direction::Down => Some(index + self.columns).filter(|i| *i < self.tiles.len()),
            Direction::Left => {
                let column = current.column.checked_sub(1)?;
                self.closest_in_column(column, current.center())
            }
            Direction::Right => {
                let column = current.column + 1;
                if column >= self.columns {
                    return None;
                }
                self.closest_in_column(column, current.center())
            }
        }
    }

    /// Tile under a grid cell: `x` in cells from the grid's left edge,
    /// `y` in content rows.
    pub fn hit(&self, x: u16, y: u32) -> Option<usize> {
        let column = usize::from(x / self.column_width.max(1));
        self.tiles
            .iter()
            .find(|t| t.column == column && t.y <= y && y < t.bottom())
            .map(|t| t.index)
    }

    /// Offset that brings `index` fully into view, moving as little as
    /// possible.
    pub fn reveal(&self, index: usize, offset: u32, height: u16) -> u32 {
        let Some(tile) = self.tiles.get(index) else {
            return offset;
        };
        let height = u32::from(height);
        if tile.y < offset {
            tile.y
        } else if tile.bottom() > offset + height {
            tile.bottom().saturating_sub(height).min(tile.y)
        } else {
            offset
        }
    }

    fn closest_in_column(&self, column: usize, center: u32) -> Option<usize> {
        self.tiles
            .iter()
            .filter(|t| t.column == column)
            .min_by_key(|t| t.center().abs_diff(center))
            .map(|t| t.index)
    }
}

/// Tile height in rows for an aspect ratio (height / width).
pub fn tile_rows(aspect_ratio: f32, column_width: u16) -> u16 {
    let rows = (f32::from(column_width) * aspect_ratio / CELL_ASPECT).round();
    if rows.is_finite() {
        (rows as u16).clamp(MIN_TILE_ROWS, MAX_TILE_ROWS)
    } else {
        MIN_TILE_ROWS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::photo::fixtures;

    fn feed(sizes: &[(u32, u32)]) -> Vec<Arc<Photo>> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| {
                let mut p = fixtures::photo(&format!("p{i}"));
                p.width = w;
                p.height = h;
                Arc::new(p)
            })
            .collect()
    }

    #[test]
    fn items_go_round_robin() {
        let photos = feed(&[(100, 100); 8]);
        let layout = MasonryLayout::compute(&photos, 3, 20);

        let columns: Vec<_> = layout.tiles().iter().map(|t| t.column).collect();
        assert_eq!(columns, [0, 1, 2, 0, 1, 2, 0, 1]);
        assert_eq!(layout.tile(3).unwrap().y, layout.tile(0).unwrap().bottom());
    }

    #[test]
    fn heights_follow_aspect_and_clamp() {
        assert_eq!(tile_rows(1.0, 20), 10);
        assert_eq!(tile_rows(1.5, 20), 15);
        assert_eq!(tile_rows(0.1, 20), MIN_TILE_ROWS);
        assert_eq!(tile_rows(5.0, 20), MAX_TILE_ROWS);
        assert_eq!(tile_rows(f32::NAN, 20), MIN_TILE_ROWS);
    }

    #[test]
    fn content_height_is_tallest_column() {
        // column 0 gets two portrait tiles, column 1 one landscape
        let photos = feed(&[(100, 150), (150, 100), (100, 150)]);
        let layout = MasonryLayout::compute(&photos, 2, 20);
        assert_eq!(layout.content_height(), 30);
    }

    #[test]
    fn sentinel_needs_content_and_bottom() {
        let empty = MasonryLayout::compute(&[], 6, 20);
        assert!(!empty.sentinel_visible(0, 40));

        let photos = feed(&[(100, 100); 12]);
        let layout = MasonryLayout::compute(&photos, 3, 20);
        assert_eq!(layout.content_height(), 40);
        assert!(!layout.sentinel_visible(0, 30));
        assert!(layout.sentinel_visible(10, 30));
        assert!(layout.sentinel_visible(0, 50));
    }

    #[test]
    fn cursor_moves_through_grid() {
        let photos = feed(&[(100, 100); 7]);
        let layout = MasonryLayout::compute(&photos, 3, 20);

        assert_eq!(layout.neighbor(0, Direction::Down), Some(3));
        assert_eq!(layout.neighbor(4, Direction::Up), Some(1));
        assert_eq!(layout.neighbor(1, Direction::Up), None);
        assert_eq!(layout.neighbor(5, Direction::Down), None);
        assert_eq!(layout.neighbor(3, Direction::Right), Some(4));
        assert_eq!(layout.neighbor(2, Direction::Right), None);
        assert_eq!(layout.neighbor(0, Direction::Left), None);
        assert_eq!(layout.neighbor(6, Direction::Right), Some(4));
    }

    #[test]
    fn reveal_scrolls_minimally() {
        let photos = feed(&[(100, 100); 9]);
        let layout = MasonryLayout::compute(&photos, 3, 20);

        assert_eq!(layout.reveal(0, 0, 15), 0);
        assert_eq!(layout.reveal(3, 0, 15), 5);
        assert_eq!(layout.reveal(0, 12, 15), 0);
        assert_eq!(layout.max_offset(15), 15);
    }

    #[test]
    fn visible_filters_by_window() {
        let photos = feed(&[(100, 100); 9]);
        let layout = MasonryLayout::compute(&photos, 3, 20);
        let shown: Vec<_> = layout.visible(10, 10).map(|t| t.index).collect();
        assert_eq!(shown, [3, 4, 5]);
    }

    #[test]
    fn hit_maps_cells_to_tiles() {
        let photos = feed(&[(100, 100); 6]);
        let layout = MasonryLayout::compute(&photos, 3, 20);

        assert_eq!(layout.hit(0, 0), Some(0));
        assert_eq!(layout.hit(25, 9), Some(1));
        assert_eq!(layout.hit(45, 10), Some(5));
        assert_eq!(layout.hit(45, 20), None);
        assert_eq!(layout.hit(70, 0), None);
    }
}
