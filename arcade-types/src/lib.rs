pub mod entities;
pub mod wire;

// Re-export all types
pub use entities::*;
pub use wire::*;
