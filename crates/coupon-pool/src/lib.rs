#![doc = include_str!("../README.md")]

mod campaign;
mod code;
mod error;
mod random;
mod registry;
mod time;

pub use crate::campaign::*;
pub use crate::code::*;
pub use crate::error::*;
pub use crate::random::*;
pub use crate::registry::*;
pub use crate::time::*;
