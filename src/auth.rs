//! Access tokens handed over by the OAuth2 exchange and the transport-ready credentials
//! derived from them.

pub mod credential;
pub mod token;

pub use credential::*;
pub use token::{secret::*, *};
