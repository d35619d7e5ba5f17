//! Primitives - Element building blocks.
//!
//! - [`element`] - Index with a hit region, click handler, click-outside
//!   binding and children
//! - [`dropdown`] - Trigger plus panel, dismissed by clicking outside
//!
//! # Architecture
//!
//! Elements are indices handed out by the engine registry. Each primitive:
//! 1. Allocates an index under the current parent
//! 2. Fills its hit region
//! 3. Registers handlers and directives keyed by the index
//! 4. Builds children with itself as parent
//! 5. Returns a handle whose cleanup releases the index
//!
//! Releasing an index tears down everything keyed by it, so handlers never
//! outlive their element.

mod dropdown;
mod element;
mod types;

pub use dropdown::{dropdown, Dropdown, DropdownProps};
pub use element::{element, ElementProps, Mounted};
pub use types::*;
