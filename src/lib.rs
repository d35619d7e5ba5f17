//! # placeview
//!
//! Front-end core for browsing places and their reviews.
//!
//! ## Architecture
//!
//! Elements are indices handed out by the engine registry, arranged in a
//! parent tree. Mouse input is hit-tested to an index and dispatched to
//! component handlers and global listeners. Directives bind behavior to an
//! element for as long as it stays mounted.
//!
//! ```text
//! crossterm event → state::input → state::mouse::dispatch → global click listeners
//!                                                          → ClickOutside guards
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - Element registry, parent tree, containment
//! - [`state`] - Mouse dispatch, terminal input bridge, modal state
//! - [`directives`] - Directive binding and the click-outside guard
//! - [`primitives`] - Elements and the dropdown menu
//! - [`places`] - Places model, REST client and store
//! - [`router`] - Route table
//! - [`config`] / [`logging`] / [`error`] - Ambient setup

pub mod config;
pub mod directives;
pub mod engine;
pub mod error;
pub mod logging;
pub mod places;
pub mod primitives;
pub mod router;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use router::Route;

pub use engine::{
    allocate_index, contains, get_allocated_count, get_current_parent_index, get_id, get_index,
    get_parent_index, is_allocated, on_destroy, pop_parent_context, push_parent_context,
    release_index, reset_registry, with_parent,
};

pub use directives::{
    bind_directive, ClickOutside, ClickOutsideBinding, Directive, ElementId, ListenerRegistry,
    ReattachPolicy,
};

pub use primitives::{
    dropdown, element, Cleanup, Dropdown, DropdownProps, ElementProps, Mounted, Rect,
};

pub use state::{
    add_click_listener, click_at, click_listener_count, dispatch, fill_hit_rect, hit_test,
    remove_click_listener, reset_mouse_state, ListenerId, ModalState, MouseAction, MouseButton,
    MouseEvent, MouseHandler,
};

pub use places::{Category, NewPlace, Place, PlacesClient, PlacesStore, Review};
