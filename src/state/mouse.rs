//! Mouse Module - Mouse event state and handler registry
//!
//! HitGrid for coordinate-to-element lookup.
//! State and handler registry for mouse events.
//! Does NOT own stdin (that is the input module).
//!
//! # API
//!
//! - `last_event` - Get last mouse event
//! - `mouse_x`, `mouse_y` - Get cursor position
//! - `is_mouse_down` - Get button state
//! - `dispatch(event)` - Dispatch mouse event
//! - `on_component(index, handlers)` - Per-element handlers
//! - `on_mouse_down(fn)` / `on_mouse_up(fn)` - Global down/up handlers
//! - `on_click(fn)` - Global click handler with cleanup closure
//! - `add_click_listener(fn)` / `remove_click_listener(id)` - Global click
//!   listener addressed by id, for callers that must remove it later from
//!   somewhere other than the registration site
//!
//! # Clicks
//!
//! A click is synthesized on mouse up when the press and the release landed
//! on the same element (or both on empty space) with the same button.
//! Element click handlers bubble up the parent chain. Global click listeners
//! then run in registration order; one returning `true` consumes the click.
//!
//! Listeners are snapshotted before a click is delivered, and each one is
//! checked again right before it runs. A listener removed by an earlier
//! listener of the same click is therefore not invoked.
//!
//! # Example
//!
//! ```ignore
//! use placeview::state::mouse;
//!
//! // Subscribe to clicks on an element
//! let cleanup = mouse::on_component(element_index, MouseHandlers {
//!     on_click: Some(Rc::new(|event| {
//!         println!("Clicked at ({}, {})", event.x, event.y);
//!     })),
//!     ..Default::default()
//! });
//!
//! // Subscribe to all mouse clicks
//! let cleanup = mouse::on_click(|event| {
//!     println!("Click at ({}, {})", event.x, event.y);
//!     false // Don't consume
//! });
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use spark_signals::{signal, Signal};

use crate::engine;

// =============================================================================
// TYPES
// =============================================================================

/// Mouse action type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Down,
    Up,
    Move,
    Drag,
    Scroll,
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    #[default]
    None,
}

/// Keyboard modifier state carried by mouse events
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

/// Mouse event
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    /// Action type (down, up, move, drag, scroll)
    pub action: MouseAction,
    /// Button pressed
    pub button: MouseButton,
    /// X coordinate (0-indexed)
    pub x: u16,
    /// Y coordinate (0-indexed)
    pub y: u16,
    /// Modifier keys state
    pub modifiers: Modifiers,
    /// Element at this position (filled by dispatch). `None` over empty space.
    pub component_index: Option<usize>,
}

impl MouseEvent {
    /// Create a new mouse event
    pub fn new(action: MouseAction, button: MouseButton, x: u16, y: u16) -> Self {
        Self {
            action,
            button,
            x,
            y,
            modifiers: Modifiers::default(),
            component_index: None,
        }
    }

    /// Create a mouse down event
    pub fn down(button: MouseButton, x: u16, y: u16) -> Self {
        Self::new(MouseAction::Down, button, x, y)
    }

    /// Create a mouse up event
    pub fn up(button: MouseButton, x: u16, y: u16) -> Self {
        Self::new(MouseAction::Up, button, x, y)
    }

    /// Create a mouse move event
    pub fn move_to(x: u16, y: u16) -> Self {
        Self::new(MouseAction::Move, MouseButton::None, x, y)
    }

    /// The element this event landed on, if it is still mounted.
    pub fn target(&self) -> Option<usize> {
        self.component_index.filter(|&index| engine::is_allocated(index))
    }
}

// =============================================================================
// HIT GRID - O(1) Coordinate to Element Lookup
// =============================================================================

/// A grid for O(1) mouse hit detection.
///
/// Each cell contains the element index that occupies that position,
/// or `None` if empty. Later fills win, so children are filled after
/// their parents.
///
/// The filled regions are kept in fill order. Removing an index repaints
/// its cells from the regions still below it, so a released child hands
/// its cells back to its parent.
pub struct HitGrid {
    width: u16,
    height: u16,
    cells: Vec<usize>,
    regions: Vec<HitRegion>,
}

#[derive(Debug, Clone, Copy)]
struct HitRegion {
    x: u16,
    y: u16,
    width: u16,
    height: u16,
    index: usize,
}

impl HitRegion {
    fn covers(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && y >= self.y
            && (x - self.x) < self.width
            && (y - self.y) < self.height
    }
}

impl HitGrid {
    /// Create a new hit grid with the given dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![usize::MAX; size],
            regions: Vec::new(),
        }
    }

    /// Get the grid width.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Get the grid height.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Whether a position lies on the grid.
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Resize the grid and repaint the filled regions, clipped to the new size.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let size = width as usize * height as usize;
        self.cells.clear();
        self.cells.resize(size, usize::MAX);
        for region in self.regions.clone() {
            self.paint(region);
        }
    }

    /// Clear all cells and forget every region.
    pub fn clear(&mut self) {
        self.cells.fill(usize::MAX);
        self.regions.clear();
    }

    /// Fill a rectangle with an element index.
    pub fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16, index: usize) {
        let region = HitRegion { x, y, width, height, index };
        self.regions.push(region);
        self.paint(region);
    }

    fn paint(&mut self, region: HitRegion) {
        for dy in 0..region.height {
            let cy = region.y.saturating_add(dy);
            if cy >= self.height {
                break;
            }
            for dx in 0..region.width {
                let cx = region.x.saturating_add(dx);
                if cx >= self.width {
                    break;
                }
                let idx = cy as usize * self.width as usize + cx as usize;
                self.cells[idx] = region.index;
            }
        }
    }

    /// Remove `index` from the grid. Its cells fall back to the topmost
    /// remaining region covering them, or to empty.
    pub fn clear_index(&mut self, index: usize) {
        let before = self.regions.len();
        self.regions.retain(|region| region.index != index);
        if self.regions.len() == before {
            return;
        }

        let width = self.width as usize;
        for (i, cell) in self.cells.iter_mut().enumerate() {
            if *cell != index {
                continue;
            }
            let x = (i % width) as u16;
            let y = (i / width) as u16;
            *cell = self
                .regions
                .iter()
                .rev()
                .find(|region| region.covers(x, y))
                .map_or(usize::MAX, |region| region.index);
        }
    }

    /// Get the element index at a position.
    pub fn get(&self, x: u16, y: u16) -> Option<usize> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let idx = y as usize * self.width as usize + x as usize;
        let value = self.cells.get(idx).copied().unwrap_or(usize::MAX);
        if value == usize::MAX {
            None
        } else {
            Some(value)
        }
    }
}

// =============================================================================
// GLOBAL HIT GRID
// =============================================================================

thread_local! {
    static HIT_GRID: RefCell<HitGrid> = RefCell::new(HitGrid::new(80, 24));
}

/// Resize the global hit grid.
pub fn resize_hit_grid(width: u16, height: u16) {
    HIT_GRID.with(|g| g.borrow_mut().resize(width, height));
}

/// Clear the global hit grid.
pub fn clear_hit_grid() {
    HIT_GRID.with(|g| g.borrow_mut().clear());
}

/// Fill a rectangle in the global hit grid.
pub fn fill_hit_rect(x: u16, y: u16, width: u16, height: u16, index: usize) {
    HIT_GRID.with(|g| g.borrow_mut().fill_rect(x, y, width, height, index));
}

/// Get the element at a position from the global hit grid.
pub fn hit_test(x: u16, y: u16) -> Option<usize> {
    HIT_GRID.with(|g| g.borrow().get(x, y))
}

/// Whether a position lies on the terminal covered by the global hit grid.
pub fn on_screen(x: u16, y: u16) -> bool {
    HIT_GRID.with(|g| g.borrow().in_bounds(x, y))
}

/// Get the global hit grid dimensions.
pub fn hit_grid_size() -> (u16, u16) {
    HIT_GRID.with(|g| {
        let grid = g.borrow();
        (grid.width(), grid.height())
    })
}

// =============================================================================
// REACTIVE STATE
// =============================================================================

thread_local! {
    static LAST_EVENT: Signal<Option<MouseEvent>> = signal(None);
    static MOUSE_X: Signal<u16> = signal(0);
    static MOUSE_Y: Signal<u16> = signal(0);
    static IS_MOUSE_DOWN: Signal<bool> = signal(false);
    static PRESSED_COMPONENT: Signal<Option<usize>> = signal(None);
    static PRESSED_BUTTON: Signal<MouseButton> = signal(MouseButton::None);
}

/// Get the last mouse event
pub fn last_event() -> Option<MouseEvent> {
    LAST_EVENT.with(|s| s.get())
}

/// Get current mouse X position
pub fn mouse_x() -> u16 {
    MOUSE_X.with(|s| s.get())
}

/// Get current mouse Y position
pub fn mouse_y() -> u16 {
    MOUSE_Y.with(|s| s.get())
}

/// Check if mouse button is currently down
pub fn is_mouse_down() -> bool {
    IS_MOUSE_DOWN.with(|s| s.get())
}

/// Get the currently pressed element index
pub fn pressed_component() -> Option<usize> {
    PRESSED_COMPONENT.with(|s| s.get())
}

// =============================================================================
// HANDLER TYPES
// =============================================================================

/// Handler for global mouse events. Return true to consume the event.
pub type MouseHandler = Rc<dyn Fn(&MouseEvent) -> bool>;

/// Identifies an installed global listener.
pub type ListenerId = usize;

/// Handlers for an element.
///
/// Uses Rc<dyn Fn> so handlers can be cloned out of the registry before
/// they run. A handler is then free to register or release elements.
#[derive(Default)]
pub struct MouseHandlers {
    pub on_mouse_down: Option<Rc<dyn Fn(&MouseEvent)>>,
    pub on_mouse_up: Option<Rc<dyn Fn(&MouseEvent)>>,
    pub on_click: Option<Rc<dyn Fn(&MouseEvent)>>,
}

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

struct HandlerRegistry {
    component_handlers: HashMap<usize, MouseHandlers>,
    global_down_handlers: Vec<(ListenerId, MouseHandler)>,
    global_up_handlers: Vec<(ListenerId, MouseHandler)>,
    global_click_handlers: Vec<(ListenerId, MouseHandler)>,
    next_id: ListenerId,
}

impl HandlerRegistry {
    fn new() -> Self {
        Self {
            component_handlers: HashMap::new(),
            global_down_handlers: Vec::new(),
            global_up_handlers: Vec::new(),
            global_click_handlers: Vec::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

thread_local! {
    static REGISTRY: RefCell<HandlerRegistry> = RefCell::new(HandlerRegistry::new());
}

// =============================================================================
// PUBLIC API - REGISTRATION
// =============================================================================

/// Register handlers for an element. Returns cleanup function.
pub fn on_component(index: usize, handlers: MouseHandlers) -> impl FnOnce() {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.component_handlers.insert(index, handlers);
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            reg.component_handlers.remove(&index);
        });
    }
}

/// Register a global mouse down handler. Returns cleanup function.
pub fn on_mouse_down<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&MouseEvent) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.global_down_handlers.push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            reg.global_down_handlers.retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Register a global mouse up handler. Returns cleanup function.
pub fn on_mouse_up<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&MouseEvent) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.global_up_handlers.push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            reg.global_up_handlers.retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Register a global click handler. Returns cleanup function.
pub fn on_click<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&MouseEvent) -> bool + 'static,
{
    let id = add_click_listener(Rc::new(handler));

    move || {
        remove_click_listener(id);
    }
}

/// Install a global click listener and return its id.
pub fn add_click_listener(handler: MouseHandler) -> ListenerId {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.global_click_handlers.push((id, handler));
        id
    })
}

/// Remove a global click listener. Returns false if it was not installed.
pub fn remove_click_listener(id: ListenerId) -> bool {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let before = reg.global_click_handlers.len();
        reg.global_click_handlers.retain(|(handler_id, _)| *handler_id != id);
        reg.global_click_handlers.len() != before
    })
}

/// Whether a global click listener is still installed.
pub fn has_click_listener(id: ListenerId) -> bool {
    REGISTRY.with(|reg| {
        reg.borrow()
            .global_click_handlers
            .iter()
            .any(|(handler_id, _)| *handler_id == id)
    })
}

/// Number of installed global click listeners.
pub fn click_listener_count() -> usize {
    REGISTRY.with(|reg| reg.borrow().global_click_handlers.len())
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Dispatch a mouse event to all registered handlers.
/// Returns true if any handler consumed the event.
pub fn dispatch(mut event: MouseEvent) -> bool {
    // 1. Lookup element from HitGrid
    event.component_index = hit_test(event.x, event.y);

    // 2. Update reactive state
    LAST_EVENT.with(|s| s.set(Some(event.clone())));
    MOUSE_X.with(|s| s.set(event.x));
    MOUSE_Y.with(|s| s.set(event.y));

    match event.action {
        MouseAction::Down => {
            IS_MOUSE_DOWN.with(|s| s.set(true));
        }
        MouseAction::Up => {
            IS_MOUSE_DOWN.with(|s| s.set(false));
        }
        _ => {}
    }

    // 3. Handle specific actions
    match event.action {
        MouseAction::Down => dispatch_down(&event),
        MouseAction::Up => dispatch_up(&event),
        _ => false,
    }
}

/// Clone the element handler selected by `pick` out of the registry.
fn component_handler(
    index: usize,
    pick: impl Fn(&MouseHandlers) -> Option<Rc<dyn Fn(&MouseEvent)>>,
) -> Option<Rc<dyn Fn(&MouseEvent)>> {
    REGISTRY.with(|reg| reg.borrow().component_handlers.get(&index).and_then(pick))
}

/// Run a snapshot of global handlers, skipping any removed mid-dispatch.
fn run_global(
    event: &MouseEvent,
    list: impl Fn(&HandlerRegistry) -> &Vec<(ListenerId, MouseHandler)>,
) -> bool {
    let snapshot: Vec<(ListenerId, MouseHandler)> =
        REGISTRY.with(|reg| list(&reg.borrow()).clone());

    for (id, handler) in snapshot {
        let installed = REGISTRY.with(|reg| {
            list(&reg.borrow()).iter().any(|(handler_id, _)| *handler_id == id)
        });
        if installed && handler(event) {
            return true;
        }
    }
    false
}

fn dispatch_down(event: &MouseEvent) -> bool {
    // Track pressed element
    PRESSED_COMPONENT.with(|s| s.set(event.component_index));
    PRESSED_BUTTON.with(|s| s.set(event.button));

    // Element handler (non-consuming, just fires)
    if let Some(idx) = event.component_index {
        if let Some(on_down) = component_handler(idx, |h| h.on_mouse_down.clone()) {
            on_down(event);
        }
    }

    run_global(event, |reg| &reg.global_down_handlers)
}

fn dispatch_up(event: &MouseEvent) -> bool {
    let pressed_idx = PRESSED_COMPONENT.with(|s| s.get());
    let pressed_btn = PRESSED_BUTTON.with(|s| s.get());

    // Clear pressed tracking
    PRESSED_COMPONENT.with(|s| s.set(None));
    PRESSED_BUTTON.with(|s| s.set(MouseButton::None));

    // Element handler (non-consuming, just fires)
    if let Some(idx) = event.component_index {
        if let Some(on_up) = component_handler(idx, |h| h.on_mouse_up.clone()) {
            on_up(event);
        }
    }

    let mut consumed = run_global(event, |reg| &reg.global_up_handlers);

    // Detect click (press and release on same element with same button)
    if pressed_btn != MouseButton::None
        && pressed_idx == event.component_index
        && pressed_btn == event.button
    {
        // Element click handler with bubbling - walk up parent chain until handler found
        let mut current = event.component_index;
        while let Some(idx) = current {
            if let Some(on_click) = component_handler(idx, |h| h.on_click.clone()) {
                on_click(event);
                break;
            }
            current = engine::get_parent_index(idx);
        }

        // Global click listeners (can consume)
        if run_global(event, |reg| &reg.global_click_handlers) {
            consumed = true;
        }
    }

    consumed
}

// =============================================================================
// CLEANUP
// =============================================================================

/// Clean up all handlers for an element index.
/// Called by the registry when the element is released.
pub fn cleanup_index(index: usize) {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.component_handlers.remove(&index);
    });

    HIT_GRID.with(|g| g.borrow_mut().clear_index(index));

    let pressed = PRESSED_COMPONENT.with(|s| s.get());
    if pressed == Some(index) {
        PRESSED_COMPONENT.with(|s| s.set(None));
        PRESSED_BUTTON.with(|s| s.set(MouseButton::None));
    }
}

/// Clear all state and handlers.
pub fn cleanup() {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.component_handlers.clear();
        reg.global_down_handlers.clear();
        reg.global_up_handlers.clear();
        reg.global_click_handlers.clear();
    });

    LAST_EVENT.with(|s| s.set(None));
    MOUSE_X.with(|s| s.set(0));
    MOUSE_Y.with(|s| s.set(0));
    IS_MOUSE_DOWN.with(|s| s.set(false));
    PRESSED_COMPONENT.with(|s| s.set(None));
    PRESSED_BUTTON.with(|s| s.set(MouseButton::None));

    HIT_GRID.with(|g| g.borrow_mut().clear());
}

/// Reset mouse state (for testing)
pub fn reset_mouse_state() {
    cleanup();
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.next_id = 0;
    });
    HIT_GRID.with(|g| {
        let mut grid = g.borrow_mut();
        grid.resize(80, 24);
    });
}

/// Press and release the left button at a position.
///
/// Convenience for hosts that synthesize clicks (and for tests).
pub fn click_at(x: u16, y: u16) -> bool {
    dispatch(MouseEvent::down(MouseButton::Left, x, y));
    dispatch(MouseEvent::up(MouseButton::Left, x, y))
}

// =============================================================================
// TESTS
// =============================================================================
