//! Curve geometry and the bounded point history drawn behind the pen.

pub mod lissajous;
pub mod trail;
