//! Bounds, Grid, CRS, Tile and TilePyramid value types.

mod bounds;
pub use bounds::*;

mod crs;
pub use crs::*;

mod grid;
pub use grid::*;

mod tile;
pub use tile::*;

mod tile_pyramid;
pub use tile_pyramid::*;
