//! Drawing: the frame algorithm, and the surfaces it can draw on.

pub mod blur;
pub mod cpu;
pub mod frame;
pub mod recording;
pub mod renderer;
