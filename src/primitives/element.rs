//! Element primitive - an index with a hit region, handlers and children.

use tracing::trace;

use super::types::{Cleanup, MouseCallback, Rect};
use crate::directives::{bind_directive, ClickOutside, ClickOutsideBinding};
use crate::engine::{allocate_index, get_id, release_index, with_parent};
use crate::state::mouse::{self, MouseHandlers};

/// Props for [`element`].
#[derive(Default)]
pub struct ElementProps {
    /// Stable ID. Generated if not provided.
    pub id: Option<String>,
    /// Hit region. Elements without one are never click targets themselves.
    pub rect: Option<Rect>,
    pub on_click: Option<MouseCallback>,
    /// Click-outside binding, detached when the element is released.
    pub click_outside: Option<(ClickOutside, ClickOutsideBinding)>,
    /// Builds children with this element as their parent.
    pub children: Option<Box<dyn FnOnce()>>,
}

/// A mounted element.
pub struct Mounted {
    pub index: usize,
    cleanup: Cleanup,
}

impl Mounted {
    /// Release the element and all of its children.
    pub fn unmount(self) {
        (self.cleanup)();
    }
}

/// Create an element under the current parent.
///
/// Hit regions of children are filled after the parent's, so a click on a
/// child resolves to the child.
pub fn element(props: ElementProps) -> Mounted {
    // 1. ALLOCATE INDEX
    let index = allocate_index(props.id.as_deref());
    let id = get_id(index);

    // 2. HIT REGION
    if let Some(rect) = props.rect {
        mouse::fill_hit_rect(rect.x, rect.y, rect.width, rect.height, index);
    }

    // 3. MOUSE HANDLERS - removed by the registry on release
    if let Some(on_click) = props.on_click {
        let _ = mouse::on_component(index, MouseHandlers {
            on_click: Some(on_click),
            ..Default::default()
        });
    }

    // 4. DIRECTIVES
    if let Some((directive, binding)) = props.click_outside {
        let _ = bind_directive(index, &directive, binding);
    }

    // 5. CHILDREN
    if let Some(children) = props.children {
        with_parent(index, children);
    }

    trace!(index, id = ?id, "element mounted");

    Mounted {
        index,
        cleanup: Box::new(move || {
            // The index may have been released (and reused) through an ancestor
            if get_id(index) == id {
                release_index(index);
            }
        }),
    }
}
