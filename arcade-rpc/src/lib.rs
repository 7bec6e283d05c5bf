pub mod error;
pub mod games;
pub mod stages;
pub mod transport;
pub mod users;

// Re-export all types
pub use error::*;
pub use games::*;
pub use stages::*;
pub use transport::*;
pub use users::*;
