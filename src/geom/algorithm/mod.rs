mod buffer;
mod proj;

pub use buffer::{buffer, Buffer, DEFAULT_CIRCLE_SEGMENTS};
pub use proj::{ProjectionKind, Projector};
