//! Dropdown - a trigger that opens a panel, closed by clicking elsewhere.
//!
//! Clicking the trigger toggles the panel. While open, the panel carries a
//! click-outside binding that ignores the trigger, so the trigger's own
//! toggle is the only thing that handles clicks on it. Any other click
//! outside the panel closes the menu and releases the panel, which detaches
//! the binding.
//!
//! ```ignore
//! let menu = dropdown(DropdownProps {
//!     trigger: Rect::new(0, 0, 6, 1),
//!     panel: Rect::new(0, 1, 20, 6),
//!     modal: modal.clone(),
//!     click_outside: click_outside.clone(),
//!     ..Default::default()
//! });
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use super::element::{element, ElementProps, Mounted};
use super::types::Rect;
use crate::directives::{ClickOutside, ClickOutsideBinding};
use crate::engine::{get_current_parent_index, with_parent};
use crate::state::modal::ModalState;

/// Props for [`dropdown`].
#[derive(Default)]
pub struct DropdownProps {
    pub id: Option<String>,
    pub trigger: Rect,
    pub panel: Rect,
    pub modal: ModalState,
    pub click_outside: ClickOutside,
    /// Builds the panel's children each time it opens.
    pub panel_children: Option<Rc<dyn Fn()>>,
}

struct DropdownInner {
    parent: Option<usize>,
    panel_rect: Rect,
    modal: ModalState,
    click_outside: ClickOutside,
    panel_children: Option<Rc<dyn Fn()>>,
    trigger: RefCell<Option<Mounted>>,
    trigger_index: usize,
    panel: RefCell<Option<Mounted>>,
}

/// Handle to a mounted dropdown. Clones refer to the same dropdown.
#[derive(Clone)]
pub struct Dropdown {
    inner: Rc<DropdownInner>,
}

impl Dropdown {
    pub fn trigger(&self) -> usize {
        self.inner.trigger_index
    }

    /// Index of the open panel.
    pub fn panel(&self) -> Option<usize> {
        self.inner.panel.borrow().as_ref().map(|panel| panel.index)
    }

    pub fn is_open(&self) -> bool {
        self.inner.panel.borrow().is_some()
    }

    pub fn open(&self) {
        if self.is_open() {
            return;
        }

        let this = self.clone();
        let binding = ClickOutsideBinding::new(move |_| this.close())
            .ignore(Some(self.inner.trigger_index));

        let props = ElementProps {
            rect: Some(self.inner.panel_rect),
            click_outside: Some((self.inner.click_outside.clone(), binding)),
            children: self
                .inner
                .panel_children
                .clone()
                .map(|children| Box::new(move || children()) as Box<dyn FnOnce()>),
            ..Default::default()
        };
        let panel = match self.inner.parent {
            Some(parent) => with_parent(parent, || element(props)),
            None => element(props),
        };

        *self.inner.panel.borrow_mut() = Some(panel);
        self.inner.modal.open_menu();
    }

    pub fn close(&self) {
        let panel = self.inner.panel.borrow_mut().take();
        if let Some(panel) = panel {
            panel.unmount();
        }
        self.inner.modal.close_menu();
    }

    pub fn toggle(&self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    /// Close the panel and release the trigger.
    pub fn unmount(&self) {
        self.close();
        let trigger = self.inner.trigger.borrow_mut().take();
        if let Some(trigger) = trigger {
            trigger.unmount();
        }
    }
}

/// Mount a dropdown trigger under the current parent. The panel mounts as
/// a sibling of the trigger when opened.
pub fn dropdown(props: DropdownProps) -> Dropdown {
    let parent = get_current_parent_index();
    let toggle_target: Rc<RefCell<Option<Dropdown>>> = Rc::new(RefCell::new(None));
    let toggle_clone = toggle_target.clone();

    let trigger = element(ElementProps {
        id: props.id,
        rect: Some(props.trigger),
        on_click: Some(Rc::new(move |_| {
            let dropdown = toggle_clone.borrow().clone();
            if let Some(dropdown) = dropdown {
                dropdown.toggle();
            }
        })),
        ..Default::default()
    });

    let dropdown = Dropdown {
        inner: Rc::new(DropdownInner {
            parent,
            panel_rect: props.panel,
            modal: props.modal,
            click_outside: props.click_outside,
            panel_children: props.panel_children,
            trigger_index: trigger.index,
            trigger: RefCell::new(Some(trigger)),
            panel: RefCell::new(None),
        }),
    };

    *toggle_target.borrow_mut() = Some(dropdown.clone());
    dropdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::engine::{self, is_allocated};
    use crate::state::mouse::{self, click_at, click_listener_count};

    fn setup() {
        engine::reset_registry();
        mouse::reset_mouse_state();
    }

    fn menu(modal: &ModalState, click_outside: &ClickOutside) -> Dropdown {
        dropdown(DropdownProps {
            trigger: Rect::new(0, 0, 6, 1),
            panel: Rect::new(0, 1, 20, 6),
            modal: modal.clone(),
            click_outside: click_outside.clone(),
            ..Default::default()
        })
    }

    #[test]
    fn test_trigger_toggles_menu() {
        setup();
        let modal = ModalState::new();
        let click_outside = ClickOutside::new();
        let menu = menu(&modal, &click_outside);

        click_at(1, 0);
        assert!(menu.is_open());
        assert!(modal.is_open());
        assert_eq!(click_outside.bound_count(), 1);

        // The trigger is ignored by the panel's guard, so it only toggles
        click_at(1, 0);
        assert!(!menu.is_open());
        assert!(!modal.is_open());
        assert_eq!(click_outside.bound_count(), 0);
        assert_eq!(click_listener_count(), 0);
    }

    #[test]
    fn test_click_in_panel_keeps_menu_open() {
        setup();
        let modal = ModalState::new();
        let click_outside = ClickOutside::new();
        let menu = menu(&modal, &click_outside);

        menu.open();
        click_at(10, 3);
        assert!(menu.is_open());
        assert!(modal.is_open());
    }

    #[test]
    fn test_outside_click_closes_and_releases_panel() {
        setup();
        let modal = ModalState::new();
        let click_outside = ClickOutside::new();
        let menu = menu(&modal, &click_outside);
        let page = engine::allocate_index(Some("page"));
        mouse::fill_hit_rect(30, 0, 40, 20, page);

        menu.open();
        let panel = menu.panel().unwrap();

        click_at(40, 10);
        assert!(!menu.is_open());
        assert!(!modal.is_open());
        assert!(!is_allocated(panel));
        assert!(!click_outside.is_bound(panel));
        assert_eq!(click_listener_count(), 0);

        // Further outside clicks are inert
        click_at(40, 10);
        assert!(!modal.is_open());
    }

    #[test]
    fn test_empty_space_click_closes_menu() {
        setup();
        let modal = ModalState::new();
        let click_outside = ClickOutside::new();
        let menu = menu(&modal, &click_outside);

        menu.open();
        click_at(60, 20);
        assert!(!menu.is_open());
        assert!(!modal.is_open());
        assert_eq!(click_listener_count(), 0);
    }

    #[test]
    fn test_panel_children_are_inside() {
        setup();
        let modal = ModalState::new();
        let click_outside = ClickOutside::new();
        let picked = Rc::new(Cell::new(0));
        let picked_clone = picked.clone();

        let menu = dropdown(DropdownProps {
            trigger: Rect::new(0, 0, 6, 1),
            panel: Rect::new(0, 1, 20, 6),
            modal: modal.clone(),
            click_outside: click_outside.clone(),
            panel_children: Some(Rc::new(move || {
                let picked = picked_clone.clone();
                let _item = element(ElementProps {
                    rect: Some(Rect::new(1, 2, 18, 1)),
                    on_click: Some(Rc::new(move |_| picked.set(picked.get() + 1))),
                    ..Default::default()
                });
            })),
            ..Default::default()
        });

        menu.open();
        click_at(5, 2);
        assert_eq!(picked.get(), 1);
        assert!(menu.is_open());
    }

    #[test]
    fn test_unmount_releases_everything() {
        setup();
        let modal = ModalState::new();
        let click_outside = ClickOutside::new();
        let menu = menu(&modal, &click_outside);
        let trigger = menu.trigger();

        menu.open();
        menu.unmount();

        assert!(!is_allocated(trigger));
        assert_eq!(click_outside.bound_count(), 0);
        assert_eq!(engine::get_allocated_count(), 0);
    }
}
