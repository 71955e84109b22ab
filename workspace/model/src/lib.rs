pub mod entities;
pub mod frequency;

pub use frequency::Frequency;

// Re-export tracing for use in this crate
pub use tracing;
