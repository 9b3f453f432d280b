mod spritesheet;
mod tilemap;

pub use spritesheet::{parse_sprite_info, SpriteInfo, Spritesheet};
pub use tilemap::{MapOrientation, MapRenderer, Tile, Tilemap};
