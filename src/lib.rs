//! Runtime support library for compiled Sable programs.
//!
//! Compiled code carries no control-flow or matching logic of its own; it is
//! a sequence of calls into this crate. The escape mechanism lives in
//! [`signal`], structural pattern matching in [`pattern`], traversal and
//! comprehensions in [`iterate`] and [`accum`], ordering in [`compare`],
//! reflective dispatch in [`verb`], and boolean-flow broken references in
//! [`flow`].
pub mod accum;
pub mod compare;
pub mod dump;
pub mod flow;
pub mod hash_key;
pub mod iterate;
pub mod pattern;
pub mod signal;
pub mod tables;
pub mod value;
pub mod verb;
