// # Remote Client Implementations
//
// This module provides implementations of the RemoteClient trait that do
// not need the network. The HTTP client lives in the `mailjet-client` crate.

pub mod memory;

pub use memory::MemoryRemote;
