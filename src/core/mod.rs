//! Core geospatial types, projection math, and the viewport-driven engine.

pub mod bounds;
pub mod constants;
pub mod geo;
pub mod map;
pub mod projection;
pub mod viewport;
