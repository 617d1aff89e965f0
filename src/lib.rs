//! Photovoltaic sizing and 25-year payback projection.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod projection;
pub mod runner;
pub mod site;

pub use error::{Error, Result};
