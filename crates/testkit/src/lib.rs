#![warn(missing_docs)]
//! Testing surfaces: fake actors and hosts, a scripted interpreter and the
//! JSONL transcript writer.

mod fakes;
mod transcript;

pub use fakes::*;
pub use transcript::*;
