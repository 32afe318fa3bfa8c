//! The reference AS2 server binary: configuration loading, directory bootstrap, the HTTP
//! receive endpoint, outbound transport, and the background retry/async coordinator.
#![forbid(unsafe_code)]

pub mod cfg;
pub mod context;
pub mod http;
pub mod transport;
