use anyhow::Result;

use crate::math::{Rect, Size, Vec2};

/// A single tile in a tilemap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    /// Tile ID (index into tileset, 0 = empty/no tile)
    pub id: u32,
}

impl Tile {
    pub fn new(id: u32) -> Self {
        Self { id }
    }

    pub fn empty() -> Self {
        Self { id: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.id == 0
    }
}

/// Projection used to lay out tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MapOrientation {
    #[default]
    Orthogonal,
    Isometric,
}

/// Tile grid of one map layer.
#[derive(Clone, Debug)]
pub struct Tilemap {
    /// Path of the tileset image, resolved by the asset layer.
    pub tileset: String,
    /// Number of tiles in the tileset (columns, rows)
    pub tileset_size: (u32, u32),
    /// Size of each tile in world units
    pub tile_size: Size,
    /// Map dimensions (width, height) in tiles
    pub map_size: (u32, u32),
    pub orientation: MapOrientation,
    /// Tile data (row-major: [y * width + x])
    pub tiles: Vec<Tile>,
}

impl Tilemap {
    /// Create a new empty orthogonal tilemap.
    pub fn new(
        tileset: impl Into<String>,
        tileset_size: (u32, u32),
        tile_size: Size,
        map_size: (u32, u32),
    ) -> Self {
        let (width, height) = map_size;
        Self {
            tileset: tileset.into(),
            tileset_size,
            tile_size,
            map_size,
            orientation: MapOrientation::Orthogonal,
            tiles: vec![Tile::empty(); width as usize * height as usize],
        }
    }

    pub fn set_tile(&mut self, x: u32, y: u32, tile_id: u32) {
        let (width, height) = self.map_size;
        if x < width && y < height {
            self.tiles[y as usize * width as usize + x as usize] = Tile::new(tile_id);
        }
    }

    pub fn get_tile(&self, x: u32, y: u32) -> Option<Tile> {
        let (width, height) = self.map_size;
        if x < width && y < height {
            Some(self.tiles[y as usize * width as usize + x as usize])
        } else {
            None
        }
    }

    /// Map size in world units.
    pub fn world_size(&self) -> Size {
        Size::new(
            self.map_size.0 as f32 * self.tile_size.width,
            self.map_size.1 as f32 * self.tile_size.height,
        )
    }

    /// World location of a tile's top-left corner.
    pub fn tile_location(&self, x: u32, y: u32) -> Vec2 {
        Vec2::new(
            x as f32 * self.tile_size.width,
            y as f32 * self.tile_size.height,
        )
    }

    /// Tile coordinates containing a world position.
    pub fn world_to_tile(&self, world_pos: Vec2) -> (i32, i32) {
        (
            (world_pos.x / self.tile_size.width).floor() as i32,
            (world_pos.y / self.tile_size.height).floor() as i32,
        )
    }

    /// Non-empty tiles overlapping `viewport`, as `(x, y, tile)`, row by row.
    pub fn tiles_in_viewport(&self, viewport: &Rect) -> Vec<(u32, u32, Tile)> {
        let (map_width, map_height) = self.map_size;
        if map_width == 0 || map_height == 0 || viewport.width <= 0.0 || viewport.height <= 0.0 {
            return Vec::new();
        }

        let (min_x, min_y) = self.world_to_tile(Vec2::new(viewport.min_x(), viewport.min_y()));
        // far edges are exclusive
        let (max_x, max_y) = self.world_to_tile(Vec2::new(
            viewport.max_x() - f32::EPSILON * viewport.max_x().abs().max(1.0),
            viewport.max_y() - f32::EPSILON * viewport.max_y().abs().max(1.0),
        ));

        if max_x < 0 || max_y < 0 || min_x >= map_width as i32 || min_y >= map_height as i32 {
            return Vec::new();
        }

        let start_x = min_x.max(0) as u32;
        let start_y = min_y.max(0) as u32;
        let end_x = (max_x.min(map_width as i32 - 1)) as u32;
        let end_y = (max_y.min(map_height as i32 - 1)) as u32;

        let mut visible = Vec::new();
        for y in start_y..=end_y {
            for x in start_x..=end_x {
                let tile = self.tiles[y as usize * map_width as usize + x as usize];
                if !tile.is_empty() {
                    visible.push((x, y, tile));
                }
            }
        }
        visible
    }

    /// Normalized UV rectangle (u, v, width, height) of a tile ID in the tileset.
    pub fn tile_uv_rect(&self, tile_id: u32) -> Option<[f32; 4]> {
        if tile_id == 0 {
            return None;
        }

        let (cols, rows) = self.tileset_size;
        let tile_index = tile_id - 1; // tile_id 1 = first tile
        if tile_index >= cols * rows {
            return None;
        }

        let uv_width = 1.0 / cols as f32;
        let uv_height = 1.0 / rows as f32;
        Some([
            (tile_index % cols) as f32 * uv_width,
            (tile_index / cols) as f32 * uv_height,
            uv_width,
            uv_height,
        ])
    }
}

/// Draws tile maps, limited to the region a camera currently shows.
pub trait MapRenderer {
    fn supported_orientation(&self) -> MapOrientation;

    /// Draw the part of `map` inside `viewport` (world coordinates).
    fn render(&mut self, map: &Tilemap, viewport: &Rect) -> Result<()>;
}
