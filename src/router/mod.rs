//! Poll router.
//!
//! The router resolves logical sensor identifiers to devices for control
//! operations and multiplexes the devices' descriptors into one blocking
//! wait for the data path.

mod builder;
mod core;
mod route;

pub use builder::RouterBuilder;
pub use self::core::PollRouter;
