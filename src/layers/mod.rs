//! Overlay layers projected on top of the tile grid.

pub mod pin;
