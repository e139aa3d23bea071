#![forbid(unsafe_code)]

//! Test harness for phonefield.
//!
//! - [`HandlerLog`] records handler invocations in order, with a JSON
//!   transcript and a BLAKE3 digest for golden comparisons.
//! - [`FieldFixture`] is a field mounted on a headless control with
//!   observable bindings and a manual scheduler.
//! - [`ops`] holds the operation model and `proptest` strategies shared by
//!   property tests and the fuzz target.

pub mod fixture;
pub mod log;
pub mod ops;

pub use fixture::{FieldFixture, FieldFixtureBuilder, region};
pub use log::{HandlerEntry, HandlerLog};
pub use ops::FieldOp;
