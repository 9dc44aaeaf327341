//! Time-stretch engine
//!
//! Changes the duration of a buffer without changing its pitch, using
//! overlap-add granular resynthesis.

mod ola;

pub use ola::{stretch, IDENTITY_TOLERANCE, SYNTHESIS_HOP, WINDOW_SIZE};
