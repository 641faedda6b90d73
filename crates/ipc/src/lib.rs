//! Message protocol for monosprite
//!
//! Defines the commands a front end sends to the session host, the events the
//! host sends back, and the request/response shapes of the format bridge.

mod commands;
mod error;
mod input;
mod messages;
mod types;

pub use commands::*;
pub use error::IpcError;
pub use input::*;
pub use messages::*;
pub use types::*;
