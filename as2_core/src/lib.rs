//! Core foundational types and macros for the as2rs AS2 message engine.
//!
//! This crate provides the error handling, logging and small utility layer that every other
//! as2rs crate builds on. Key features include:
//!
//! - Error handling via [`Outcome<T>`] and [`Error<T>`] with support for tagging errors
//!   and chaining them together to preserve context during propagation
//!
//! - A flexible logging system via [`log::base::LOG`] supporting multiple output targets and
//!   log levels with console and file support
//!
//! - Thread and bot management through message passing primitives for reliable background
//!   worker coordination (used by the retry/async MDN coordinator)
//!
//! - String, path, and byte manipulation helpers with consistent error handling
//!
//! - Testing utilities with filtering and assertion support via [`test_it!`]
//!
//! # Error Handling Example
//!
//! ```
//! use as2_core::prelude::*;
//!
//! fn validate_age(age: i32) -> Outcome<i32> {
//!     if age < 0 {
//!         return Err(err!(errmsg!("Age cannot be negative, got {}", age), Invalid, Input));
//!     }
//!     if age > 150 {
//!         return Err(err!(errmsg!("Age seems unrealistic: {}", age), Invalid, Range));
//!     }
//!     Ok(age)
//! }
//! ```
//!
#![forbid(unsafe_code)]
#![allow(dead_code)]
#![allow(unused_assignments)]

#[macro_use]
pub mod macros {
    #[macro_use]
    pub mod error;
    #[macro_use]
    pub mod fallible;
    #[macro_use]
    pub mod meta;
    #[macro_use]
    pub mod string;
    #[macro_use]
    pub mod sync;
    #[macro_use]
    pub mod test;
}

//pub mod alias;
pub mod alt;
pub mod bool;
pub mod bot;
pub mod byte;
pub mod channels;
pub mod conv;
pub mod count;
pub mod error;
pub mod file;
pub mod id;
pub mod int;
pub mod log;
pub mod map;
pub mod mem;
pub mod ord;
pub mod path;
pub mod prelude;
pub mod rand;
pub mod string;
pub mod term;
pub mod test;
pub mod time;
pub mod thread;

use error::Error;
pub use string::contains_str;

pub type Outcome<V> = std::result::Result<V, Error<error::ErrTag>>;

pub trait GenTag:
    Clone
    + std::fmt::Debug
    + Default
    + std::fmt::Display
    + Send
    + Sync
    + 'static
{}

pub fn format_type<T>(_: T) -> String {
    fmt!("{}", std::any::type_name::<T>())
}
