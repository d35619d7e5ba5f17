//! Element Registry - Index allocation and the element tree.
//!
//! Manages the lifecycle of element indices:
//! - ID ↔ Index bidirectional mapping
//! - Free index pool for O(1) reuse
//! - ReactiveSet for allocated indices (deriveds react to add/remove)
//! - Parent links and the parent context stack for nested creation
//! - Containment queries ("does this element contain that node")
//!
//! An index is never handed out twice while it is allocated. It goes back to
//! the pool only after `release_index` has run every destroy callback, so
//! anything keyed by the index (mouse handlers, directive bindings) is torn
//! down while the index still identifies the same element.

use std::cell::RefCell;
use std::collections::HashMap;
use spark_signals::ReactiveSet;

use crate::state::mouse;

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Map element ID to index.
    static ID_TO_INDEX: RefCell<HashMap<String, usize>> = RefCell::new(HashMap::new());

    /// Map index to element ID.
    static INDEX_TO_ID: RefCell<HashMap<usize, String>> = RefCell::new(HashMap::new());

    /// Set of currently allocated indices (for iteration).
    static ALLOCATED_INDICES: RefCell<ReactiveSet<usize>> = RefCell::new(ReactiveSet::new());

    /// Parent link per allocated index. Roots have no entry.
    static PARENT_INDEX: RefCell<HashMap<usize, usize>> = RefCell::new(HashMap::new());

    /// Pool of freed indices for reuse.
    static FREE_INDICES: RefCell<Vec<usize>> = RefCell::new(Vec::new());

    /// Next index to allocate if pool is empty.
    static NEXT_INDEX: RefCell<usize> = const { RefCell::new(0) };

    /// Counter for generating unique IDs.
    static ID_COUNTER: RefCell<usize> = const { RefCell::new(0) };

    /// Stack of parent indices for nested element creation.
    static PARENT_STACK: RefCell<Vec<usize>> = RefCell::new(Vec::new());

    /// Destroy callbacks registered per index, tagged so they can be removed.
    static DESTROY_CALLBACKS: RefCell<HashMap<usize, Vec<(usize, Box<dyn FnOnce()>)>>> = RefCell::new(HashMap::new());

    /// Counter for destroy callback tags.
    static DESTROY_COUNTER: RefCell<usize> = const { RefCell::new(0) };
}

// =============================================================================
// Parent Context Stack
// =============================================================================

/// Get current parent index (None if at root).
pub fn get_current_parent_index() -> Option<usize> {
    PARENT_STACK.with(|stack| {
        let stack = stack.borrow();
        stack.last().copied()
    })
}

/// Push a parent index onto the stack.
pub fn push_parent_context(index: usize) {
    PARENT_STACK.with(|stack| {
        stack.borrow_mut().push(index);
    })
}

/// Pop a parent index from the stack.
pub fn pop_parent_context() {
    PARENT_STACK.with(|stack| {
        stack.borrow_mut().pop();
    })
}

/// Run `children` with `index` as the current parent.
///
/// Every element allocated inside the closure becomes a child of `index`.
pub fn with_parent<R>(index: usize, children: impl FnOnce() -> R) -> R {
    push_parent_context(index);
    let result = children();
    pop_parent_context();
    result
}

// =============================================================================
// Index Allocation
// =============================================================================

/// Allocate an index for a new element.
///
/// The element is parented to the top of the parent context stack.
///
/// # Arguments
/// * `id` - Optional element ID. If not provided, one is generated.
///
/// # Returns
/// The allocated index.
pub fn allocate_index(id: Option<&str>) -> usize {
    // Generate ID if not provided
    let element_id = match id {
        Some(id) => id.to_string(),
        None => {
            ID_COUNTER.with(|counter| {
                let mut counter = counter.borrow_mut();
                let id = format!("e{}", *counter);
                *counter += 1;
                id
            })
        }
    };

    // Check if already allocated
    let existing = ID_TO_INDEX.with(|map| {
        map.borrow().get(&element_id).copied()
    });
    if let Some(index) = existing {
        return index;
    }

    // Reuse free index or allocate new
    let index = FREE_INDICES.with(|free| {
        let mut free = free.borrow_mut();
        if let Some(index) = free.pop() {
            index
        } else {
            NEXT_INDEX.with(|next| {
                let mut next = next.borrow_mut();
                let index = *next;
                *next += 1;
                index
            })
        }
    });

    // Register mappings
    ID_TO_INDEX.with(|map| {
        map.borrow_mut().insert(element_id.clone(), index);
    });
    INDEX_TO_ID.with(|map| {
        map.borrow_mut().insert(index, element_id);
    });
    if let Some(parent) = get_current_parent_index() {
        PARENT_INDEX.with(|parents| {
            parents.borrow_mut().insert(index, parent);
        });
    }
    ALLOCATED_INDICES.with(|set| {
        set.borrow_mut().insert(index);
    });

    index
}

/// Release an index back to the pool.
///
/// Also recursively releases all children!
pub fn release_index(index: usize) {
    let id = INDEX_TO_ID.with(|map| {
        map.borrow().get(&index).cloned()
    });
    let Some(id) = id else { return };

    // FIRST: Find and release all children (recursive!)
    // We collect children first to avoid modifying while iterating
    let children: Vec<usize> = PARENT_INDEX.with(|parents| {
        parents
            .borrow()
            .iter()
            .filter(|&(_, &parent)| parent == index)
            .map(|(&child, _)| child)
            .collect()
    });

    for child_index in children {
        release_index(child_index);
    }

    // Destroy callbacks run while the index still names this element
    run_destroy_callbacks(index);

    mouse::cleanup_index(index);

    // Clean up mappings
    ID_TO_INDEX.with(|map| {
        map.borrow_mut().remove(&id);
    });
    INDEX_TO_ID.with(|map| {
        map.borrow_mut().remove(&index);
    });
    PARENT_INDEX.with(|parents| {
        parents.borrow_mut().remove(&index);
    });
    ALLOCATED_INDICES.with(|set| {
        set.borrow_mut().remove(&index);
    });

    // Return to pool for reuse
    FREE_INDICES.with(|free| {
        free.borrow_mut().push(index);
    });

    // When everything is released, start numbering from zero again
    let is_empty = ALLOCATED_INDICES.with(|set| set.borrow().is_empty());
    if is_empty {
        FREE_INDICES.with(|free| {
            free.borrow_mut().clear();
        });
        NEXT_INDEX.with(|next| {
            *next.borrow_mut() = 0;
        });
    }
}

// =============================================================================
// Destroy Callbacks
// =============================================================================

/// Register a callback to run when the element at `index` is destroyed.
///
/// Returns a function that removes the callback without running it. It does
/// nothing once the callback has run or the index was released.
pub fn on_destroy(index: usize, callback: impl FnOnce() + 'static) -> impl FnOnce() {
    let tag = DESTROY_COUNTER.with(|counter| {
        let mut counter = counter.borrow_mut();
        *counter += 1;
        *counter
    });

    DESTROY_CALLBACKS.with(|callbacks| {
        callbacks
            .borrow_mut()
            .entry(index)
            .or_default()
            .push((tag, Box::new(callback)));
    });

    move || {
        // Dropped outside the borrow: the callback may own handles into the registry
        let removed = DESTROY_CALLBACKS.with(|callbacks| {
            let mut callbacks = callbacks.borrow_mut();
            let list = callbacks.get_mut(&index)?;
            let position = list.iter().position(|(t, _)| *t == tag)?;
            let removed = list.remove(position);
            if list.is_empty() {
                callbacks.remove(&index);
            }
            Some(removed)
        });
        drop(removed);
    }
}

/// Number of destroy callbacks pending for an index.
pub fn destroy_callback_count(index: usize) -> usize {
    DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow().get(&index).map_or(0, Vec::len))
}

/// Run and clear destroy callbacks for an index.
fn run_destroy_callbacks(index: usize) {
    let callbacks = DESTROY_CALLBACKS.with(|callbacks| {
        callbacks.borrow_mut().remove(&index)
    });
    if let Some(callbacks) = callbacks {
        for (_, callback) in callbacks {
            callback();
        }
    }
}

// =============================================================================
// Tree Queries
// =============================================================================

/// Get the parent of an element, if it has one.
pub fn get_parent_index(index: usize) -> Option<usize> {
    PARENT_INDEX.with(|parents| parents.borrow().get(&index).copied())
}

/// Whether `node` lies inside `ancestor`: it is the element itself or one
/// of its descendants.
///
/// Released indices contain nothing and are contained by nothing.
pub fn contains(ancestor: usize, node: usize) -> bool {
    if !is_allocated(ancestor) || !is_allocated(node) {
        return false;
    }

    let mut current = Some(node);
    while let Some(index) = current {
        if index == ancestor {
            return true;
        }
        current = get_parent_index(index);
    }
    false
}

// =============================================================================
// Lookups
// =============================================================================

/// Get index for an element ID.
pub fn get_index(id: &str) -> Option<usize> {
    ID_TO_INDEX.with(|map| map.borrow().get(id).copied())
}

/// Get ID for an index.
pub fn get_id(index: usize) -> Option<String> {
    INDEX_TO_ID.with(|map| map.borrow().get(&index).cloned())
}

/// Get all currently allocated indices.
///
/// Note: This creates a reactive dependency when called from a derived/effect.
pub fn get_allocated_indices() -> Vec<usize> {
    ALLOCATED_INDICES.with(|set| set.borrow().iter().copied().collect())
}

/// Check if an index is currently allocated.
pub fn is_allocated(index: usize) -> bool {
    ALLOCATED_INDICES.with(|set| set.borrow().contains(&index))
}

/// Get the count of currently allocated elements.
pub fn get_allocated_count() -> usize {
    ALLOCATED_INDICES.with(|set| set.borrow().len())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset all registry state (for testing).
pub fn reset_registry() {
    ID_TO_INDEX.with(|map| map.borrow_mut().clear());
    INDEX_TO_ID.with(|map| map.borrow_mut().clear());
    ALLOCATED_INDICES.with(|set| set.borrow_mut().clear());
    PARENT_INDEX.with(|parents| parents.borrow_mut().clear());
    FREE_INDICES.with(|free| free.borrow_mut().clear());
    NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
    ID_COUNTER.with(|counter| *counter.borrow_mut() = 0);
    PARENT_STACK.with(|stack| stack.borrow_mut().clear());
    DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().clear());
}
