//! Engine - Element registry and tree.
//!
//! Elements are NOT objects. They are indices handed out by the registry:
//!
//! ```text
//! Index 0: page   (parent=-)
//! Index 1: header (parent=0)
//! Index 2: menu   (parent=1)
//! ```
//!
//! The index is the element's identity for as long as it is mounted. Mouse
//! handlers, hit regions and directive bindings are all keyed by it.

mod registry;

pub use registry::*;
