//! Directives - Reusable behaviour attached to mounted elements.
//!
//! A directive receives two lifecycle hooks: `mounted` when an element
//! enters the tree with a bound value, and `unmounted` when it leaves.
//! [`bind_directive`] wires both to the element registry, so releasing the
//! element (directly or through an ancestor) unbinds the directive.
//!
//! - [`ClickOutside`] - Callback for clicks outside an element
//! - [`ListenerRegistry`] - Bookkeeping behind `ClickOutside`

mod click_outside;
mod listener_registry;

use std::cell::Cell;
use std::rc::Rc;

pub use click_outside::*;
pub use listener_registry::*;

use crate::engine;
use crate::primitives::Cleanup;

/// Lifecycle hooks of a directive.
pub trait Directive {
    /// Value the caller binds to the element.
    type Value;

    /// The element entered the tree.
    fn mounted(&self, element: ElementId, value: Self::Value);

    /// The element left the tree. Must tolerate elements that were never
    /// mounted or were already unmounted.
    fn unmounted(&self, element: ElementId);
}

/// Bind `directive` to `element` for as long as the element is allocated.
///
/// Calls `mounted` immediately and `unmounted` when the element is
/// released. The returned cleanup unbinds earlier; whichever of the two
/// runs first wins and the other does nothing.
pub fn bind_directive<D>(element: ElementId, directive: &D, value: D::Value) -> Cleanup
where
    D: Directive + Clone + 'static,
{
    directive.mounted(element, value);

    let active = Rc::new(Cell::new(true));

    let on_release = directive.clone();
    let release_active = active.clone();
    let forget_release = engine::on_destroy(element, move || {
        if release_active.replace(false) {
            on_release.unmounted(element);
        }
    });

    let on_cleanup = directive.clone();
    Box::new(move || {
        if active.replace(false) {
            forget_release();
            on_cleanup.unmounted(element);
        }
    })
}
