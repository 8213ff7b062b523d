//! Provider-facing descriptors.
//!
//! `descriptor` exposes validated endpoint metadata (`ProviderDescriptor`): the site that
//! profile paths resolve against plus the authorization and token endpoints, each
//! HTTPS-only outside loopback development hosts.

pub mod descriptor;

pub use descriptor::*;
