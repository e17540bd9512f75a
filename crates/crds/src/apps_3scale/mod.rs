//! 3scale API gateway CRDs
//!
//! Resources managed by the APIcast operator:
//! - APIcast gateways

pub mod apicast;

pub use apicast::*;
