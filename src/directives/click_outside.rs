//! Click Outside - Invoke a callback when a click lands outside an element.
//!
//! Attaching installs one global click listener for the element and records
//! it in a [`ListenerRegistry`]. Detaching looks the entry up, uninstalls the
//! listener and forgets the entry. Once `detach` returns the callback cannot
//! run again, not even for a click that is already being dispatched.
//!
//! # Matching
//!
//! For each click the handler:
//! 1. ignores clicks that did not land on the terminal at all
//! 2. ignores clicks on the element or any of its descendants
//! 3. ignores clicks inside any present entry of the ignore list
//!    (absent entries never match)
//! 4. otherwise calls the callback once, synchronously, with the event as
//!    dispatched
//!
//! The terminal is the root of the tree. A click on empty space lands on
//! the terminal itself, and so does a click whose element was released
//! before this handler ran. Neither lies inside any element, so both count
//! as outside.
//!
//! The ignore list is captured when the binding is attached. Later changes
//! on the caller's side are not seen until the element is bound again.
//!
//! Handlers never consume the click, so every bound element judges the
//! same click independently.
//!
//! # Example
//!
//! ```ignore
//! use placeview::directives::{ClickOutside, ClickOutsideBinding, bind_directive};
//!
//! let click_outside = ClickOutside::new();
//! let cleanup = bind_directive(
//!     menu_panel,
//!     &click_outside,
//!     ClickOutsideBinding::new(move |_| modal.close_menu()).ignore(Some(menu_button)),
//! );
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::listener_registry::{ElementId, InstalledHandler, ListenerRegistry};
use super::Directive;
use crate::engine;
use crate::state::mouse::{self, MouseEvent, MouseHandler};

// =============================================================================
// TYPES
// =============================================================================

/// Callback invoked for an outside click.
pub type OutsideCallback = Rc<dyn Fn(&MouseEvent)>;

/// Value bound to an element: the callback and the regions to ignore.
#[derive(Clone)]
pub struct ClickOutsideBinding {
    pub callback: OutsideCallback,
    /// Elements whose clicks do not count as outside. `None` entries stand
    /// for references that do not resolve to an element yet.
    pub ignore: Vec<Option<ElementId>>,
}

impl ClickOutsideBinding {
    /// Binding with an empty ignore list.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&MouseEvent) + 'static,
    {
        Self {
            callback: Rc::new(callback),
            ignore: Vec::new(),
        }
    }

    /// Add one element to the ignore list.
    pub fn ignore(mut self, element: Option<ElementId>) -> Self {
        self.ignore.push(element);
        self
    }

    /// Add several elements to the ignore list.
    pub fn ignoring(mut self, elements: impl IntoIterator<Item = Option<ElementId>>) -> Self {
        self.ignore.extend(elements);
        self
    }
}

/// What `attach` does when the element is already bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReattachPolicy {
    /// Detach the previous binding first. Exactly one listener per element.
    #[default]
    Replace,
    /// Overwrite the registry entry only. The previous listener stays
    /// installed and keeps firing until the host removes it; `detach` can
    /// no longer reach it.
    Overwrite,
}

// =============================================================================
// MATCHING
// =============================================================================

/// Whether `event` counts as an outside click for `element`.
pub fn is_outside(element: ElementId, ignore: &[Option<ElementId>], event: &MouseEvent) -> bool {
    if !mouse::on_screen(event.x, event.y) {
        return false;
    }

    // Empty space or a released element: the terminal root
    let Some(target) = event.target() else {
        return true;
    };

    if engine::contains(element, target) {
        return false;
    }

    !ignore
        .iter()
        .flatten()
        .any(|&ignored| engine::contains(ignored, target))
}

/// Build the global click handler for a binding.
///
/// The binding (and with it the ignore list) is moved into the handler.
pub fn outside_handler(element: ElementId, binding: ClickOutsideBinding) -> MouseHandler {
    let ClickOutsideBinding { callback, ignore } = binding;

    Rc::new(move |event: &MouseEvent| {
        if is_outside(element, &ignore, event) {
            trace!(element, hit = ?event.component_index, "outside click");
            callback(event);
        }
        false // Never consume
    })
}

// =============================================================================
// DIRECTIVE
// =============================================================================

/// The click-outside directive.
///
/// Owns the listener registry. Clones share it, so a clone captured in a
/// destroy callback detaches from the same table the application attached to.
#[derive(Clone, Default)]
pub struct ClickOutside {
    registry: Rc<RefCell<ListenerRegistry>>,
    policy: ReattachPolicy,
}

impl ClickOutside {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ReattachPolicy) -> Self {
        Self {
            registry: Rc::default(),
            policy,
        }
    }

    pub fn policy(&self) -> ReattachPolicy {
        self.policy
    }

    /// Bind `element`: install a global click listener and record it.
    pub fn attach(&self, element: ElementId, binding: ClickOutsideBinding) {
        if self.policy == ReattachPolicy::Replace && self.is_bound(element) {
            debug!(element, "rebinding click-outside, detaching previous listener");
            self.detach(element);
        }

        let handler = outside_handler(element, binding);
        let listener = mouse::add_click_listener(handler.clone());
        let displaced = self
            .registry
            .borrow_mut()
            .register(element, InstalledHandler { listener, handler });

        if let Some(previous) = displaced {
            warn!(
                element,
                leaked_listener = previous.listener,
                "click-outside rebound without detach, previous listener still installed"
            );
        }
        debug!(element, listener, "click-outside attached");
    }

    /// Unbind `element`. Does nothing if it is not bound.
    pub fn detach(&self, element: ElementId) {
        let installed = self.registry.borrow().lookup(element).cloned();
        let Some(installed) = installed else {
            trace!(element, "click-outside detach on unbound element");
            return;
        };

        mouse::remove_click_listener(installed.listener);
        self.registry.borrow_mut().remove(element);
        debug!(element, listener = installed.listener, "click-outside detached");
    }

    pub fn is_bound(&self, element: ElementId) -> bool {
        self.registry.borrow().contains(element)
    }

    /// Global listener currently recorded for `element`.
    pub fn listener_for(&self, element: ElementId) -> Option<mouse::ListenerId> {
        self.registry.borrow().lookup(element).map(|h| h.listener)
    }

    /// Number of bound elements.
    pub fn bound_count(&self) -> usize {
        self.registry.borrow().len()
    }
}

impl Directive for ClickOutside {
    type Value = ClickOutsideBinding;

    fn mounted(&self, element: ElementId, value: ClickOutsideBinding) {
        self.attach(element, value);
    }

    fn unmounted(&self, element: ElementId) {
        self.detach(element);
    }
}

// =============================================================================
// TESTS
// =============================================================================
