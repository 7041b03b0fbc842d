//! Stackful generators on stable Rust.
//!
//! A [`Generator`] runs its producer on a [`Fiber`][`fiber::Fiber`] of its
//! own, so that the producer may suspend from any depth of nested calls with
//! [`Co::yield_`], its whole stack being preserved until the caller pulls the
//! next value out of it.
//!
//! ```rust
//! use ::fiber_gen::prelude::*;
//!
//! fn walk (co: &mut Co<'_, u32>, depth: u32)
//!   -> Result<(), Exception>
//! {
//!     if depth > 0 {
//!         walk(co, depth - 1)?; // suspend from within recursive calls
//!         co.yield_(depth)?;
//!     }
//!     Ok(())
//! }
//!
//! let generator = Generator::new("walk", |co| walk(co, 3));
//! let values: Vec<u32> =
//!     generator
//!         .into_iter()
//!         .collect::<Result<_, _>>()
//!         .unwrap()
//! ;
//! assert_eq!(values, [1, 2, 3]);
//! ```
//!
//! The caller may also send values into the producer
//! ([`Generator::send`]), raise exceptions at its suspension point
//! ([`Generator::throw_into`]), or cancel it ([`Generator::close`]), in which
//! case the producer unwinds through its own release logic. Whatever the way a
//! generator ends, the context payload it owns is handed to its cleanup
//! callback exactly once.

#![warn(
    future_incompatible,
    missing_docs,
    rust_2018_compatibility,
    clippy::cargo,
    clippy::pedantic,
)]
#![deny(
    unused_must_use,
    unsafe_code,
)]
#![doc(test(attr(deny(warnings))))]

#[path = "public_prelude.rs"]
pub
mod prelude;

mod public_macros;

#[macro_use]
mod utils;

pub
mod fiber;

pub
mod state;

mod config;
mod error;
mod exception;
mod iter;

pub use self::{
    config::{Config, DEFAULT_STACK_SIZE, STACK_SIZE_ENV_VAR},
    error::GeneratorError,
    exception::{Exception, GeneratorExit},
    generator::*,
    iter::Iter,
    state::Status,
};
mod generator;

#[cfg(test)]
mod tests;
