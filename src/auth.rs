//! Auth-domain credential models, per-user configuration, and token records.

pub mod config;
pub mod credentials;
pub mod token;

pub use config::*;
pub use credentials::*;
pub use token::{record::*, secret::*};
