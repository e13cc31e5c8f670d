//! Middleware applied in front of the mux.

pub mod cors;
pub mod isolation;

pub use cors::{Cors, CorsLayer};
pub use isolation::{CatchPanic, CatchPanicLayer};
