#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::new_without_default)]

// core types
pub mod data;
pub use data::*;

pub mod erp;
pub use erp::{Enumerable, Erp, ErpRef, Support};

// per-pass machinery
pub mod addressing;
pub mod context;
pub use context::Ctx;
pub mod registry;

pub mod trace;
pub use trace::{Computation, Proposal, Trace};

// interface
pub mod init;
pub use init::{InitOutcome, Initializer, Strategy};

pub mod pipeline;
pub use pipeline::*;

// extras
pub mod utils;

#[cfg(test)]
mod tests;

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;
