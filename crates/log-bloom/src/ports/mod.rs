//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for external callers
//! - Driven Ports (outbound) - Dependencies on the node's block data

pub mod inbound;
pub mod outbound;

pub use inbound::LogBloomApi;
pub use outbound::BlockLogProvider;
