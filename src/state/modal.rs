//! Modal Module - Open/closed state for the navigation menu
//!
//! A single reactive flag. Views read it through `is_open` (creating a
//! dependency when called from a derived/effect); the dropdown and the
//! click-outside guard flip it.

use spark_signals::{signal, Signal};
use tracing::trace;

/// Open/closed state of a menu or modal.
///
/// Cloning shares the underlying signal.
#[derive(Clone)]
pub struct ModalState {
    is_open: Signal<bool>,
}

impl ModalState {
    /// Create a closed menu.
    pub fn new() -> Self {
        Self {
            is_open: signal(false),
        }
    }

    /// Whether the menu is open (reactive).
    pub fn is_open(&self) -> bool {
        self.is_open.get()
    }

    pub fn open_menu(&self) {
        trace!("menu opened");
        self.is_open.set(true);
    }

    pub fn close_menu(&self) {
        trace!("menu closed");
        self.is_open.set(false);
    }

    /// Flip between open and closed.
    pub fn toggle(&self) {
        if self.is_open() {
            self.close_menu();
        } else {
            self.open_menu();
        }
    }
}

impl Default for ModalState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close_toggle() {
        let modal = ModalState::new();
        assert!(!modal.is_open());

        modal.open_menu();
        assert!(modal.is_open());

        modal.close_menu();
        assert!(!modal.is_open());

        modal.toggle();
        assert!(modal.is_open());
        modal.toggle();
        assert!(!modal.is_open());
    }

    #[test]
    fn test_clones_share_state() {
        let modal = ModalState::default();
        let other = modal.clone();

        other.open_menu();
        assert!(modal.is_open());
    }
}
