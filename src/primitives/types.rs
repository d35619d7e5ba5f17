//! Primitive types - Props and cleanup.

use std::rc::Rc;

use crate::state::mouse::MouseEvent;

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by components and bindings.
///
/// Call this to unmount the component and release resources.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Callback Types
// =============================================================================

/// Mouse event callback type (Rc for shared ownership in closures).
pub type MouseCallback = Rc<dyn Fn(&MouseEvent)>;

// =============================================================================
// Geometry
// =============================================================================

/// Screen rectangle in terminal cells. Used as an element's hit region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Whether the cell at (x, y) lies inside.
    pub fn contains_point(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && y >= self.y
            && (x - self.x) < self.width
            && (y - self.y) < self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_point() {
        let rect = Rect::new(2, 3, 4, 2);

        assert!(rect.contains_point(2, 3));
        assert!(rect.contains_point(5, 4));
        assert!(!rect.contains_point(6, 4));
        assert!(!rect.contains_point(5, 5));
        assert!(!rect.contains_point(1, 3));
        assert!(!Rect::default().contains_point(0, 0));
    }
}
