//! State Module - Runtime state management systems
//!
//! - **Mouse** - HitGrid, event dispatch, element and global click handlers
//! - **Input** - crossterm event conversion, polling, mouse capture
//! - **Modal** - Open/closed flag for the navigation menu

pub mod input;
pub mod modal;
pub mod mouse;

pub use modal::ModalState;
pub use mouse::{
    MouseAction, MouseButton, MouseEvent, MouseHandler, MouseHandlers, Modifiers, ListenerId,
    dispatch, click_at, on_click, on_component, add_click_listener, remove_click_listener,
    click_listener_count, fill_hit_rect, hit_test, reset_mouse_state,
};
