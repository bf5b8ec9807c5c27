// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod identity;
pub mod logging;
pub mod server;
pub mod types;

pub use identity::*;
pub use logging::*;
pub use server::*;
pub use types::*;
