use placeview::directives::{bind_directive, ClickOutside, ClickOutsideBinding, ReattachPolicy};
use placeview::primitives::{dropdown, DropdownProps, Rect};
use placeview::state::mouse::{
    click_at, click_listener_count, fill_hit_rect, hit_test, on_click, reset_mouse_state,
};
use placeview::state::ModalState;
use placeview::{allocate_index, release_index, reset_registry, with_parent};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn setup() {
    reset_registry();
    reset_mouse_state();
}

fn node(parent: Option<usize>, rect: Rect) -> usize {
    let build = || {
        let index = allocate_index(None);
        fill_hit_rect(rect.x, rect.y, rect.width, rect.height, index);
        index
    };
    match parent {
        Some(parent) => with_parent(parent, build),
        None => build(),
    }
}

/// Page with three disjoint regions, `a` and `b` each with one child.
///
/// ```text
/// a       (0,0) 20x10    a_child (2,2) 5x5
/// sibling (30,0) 10x10
/// b       (50,0) 10x10   b_child (52,2) 3x3
/// ```
struct Page {
    page: usize,
    a: usize,
    a_child: usize,
    sibling: usize,
    b: usize,
    b_child: usize,
}

fn page() -> Page {
    let page = node(None, Rect::new(0, 0, 80, 24));
    let a = node(Some(page), Rect::new(0, 0, 20, 10));
    let a_child = node(Some(a), Rect::new(2, 2, 5, 5));
    let sibling = node(Some(page), Rect::new(30, 0, 10, 10));
    let b = node(Some(page), Rect::new(50, 0, 10, 10));
    let b_child = node(Some(b), Rect::new(52, 2, 3, 3));
    Page { page, a, a_child, sibling, b, b_child }
}

/// Binding that records the target of every outside click.
fn recorder() -> (Rc<RefCell<Vec<Option<usize>>>>, ClickOutsideBinding) {
    let hits = Rc::new(RefCell::new(Vec::new()));
    let hits_clone = hits.clone();
    let binding = ClickOutsideBinding::new(move |event| {
        hits_clone.borrow_mut().push(event.target());
    });
    (hits, binding)
}

#[test]
fn test_click_inside_and_on_sibling() {
    setup();
    let page = page();
    let guard = ClickOutside::new();
    let (hits, binding) = recorder();
    guard.attach(page.a, binding);

    click_at(3, 3);
    assert!(hits.borrow().is_empty(), "click on a child of the element");

    click_at(31, 1);
    assert_eq!(*hits.borrow(), vec![Some(page.sibling)]);
}

#[test]
fn test_ignore_list_covers_descendants() {
    setup();
    let page = page();
    let guard = ClickOutside::new();
    let (hits, binding) = recorder();
    guard.attach(page.a, binding.ignore(Some(page.b)));

    click_at(50, 0);
    click_at(53, 3);
    assert!(hits.borrow().is_empty());

    click_at(70, 20);
    assert_eq!(*hits.borrow(), vec![Some(page.page)]);
}

#[test]
fn test_detach_stops_callbacks() {
    setup();
    let page = page();
    let guard = ClickOutside::new();
    let (hits, binding) = recorder();
    guard.attach(page.a, binding);
    guard.detach(page.a);

    click_at(31, 1);
    click_at(70, 20);
    assert!(hits.borrow().is_empty());
    assert_eq!(click_listener_count(), 0);
    assert!(!guard.is_bound(page.a));
}

#[test]
fn test_absent_ignore_entry_never_matches() {
    setup();
    let page = page();
    let guard = ClickOutside::new();
    let (hits, binding) = recorder();
    guard.attach(page.a, binding.ignore(None));

    click_at(31, 1);
    assert_eq!(hits.borrow().len(), 1);
}

#[test]
fn test_empty_space_is_outside() {
    setup();
    // No page background: most of the screen has no element
    let a = node(None, Rect::new(0, 0, 5, 5));
    let guard = ClickOutside::new();
    let (hits, binding) = recorder();
    guard.attach(a, binding);

    click_at(60, 20);
    assert_eq!(*hits.borrow(), vec![None]);

    // Positions past the terminal edge hit nothing at all
    click_at(500, 300);
    assert_eq!(hits.borrow().len(), 1);
}

#[test]
fn test_released_child_cells_belong_to_parent() {
    setup();
    let a = node(None, Rect::new(0, 0, 5, 5));
    let panel = node(None, Rect::new(10, 0, 30, 10));
    let item = node(Some(panel), Rect::new(12, 2, 3, 3));
    let guard = ClickOutside::new();
    let (hits, binding) = recorder();
    guard.attach(a, binding);

    release_index(item);
    assert_eq!(hit_test(13, 3), Some(panel));

    click_at(13, 3);
    assert_eq!(*hits.borrow(), vec![Some(panel)]);
}

#[test]
fn test_target_released_earlier_in_same_click_is_outside() {
    setup();
    let page = page();
    let sibling = page.sibling;
    let _remove_on_click = on_click(move |event| {
        if event.target() == Some(sibling) {
            release_index(sibling);
        }
        false
    });

    let guard = ClickOutside::new();
    let (hits, binding) = recorder();
    guard.attach(page.a, binding.ignore(Some(page.b)));

    click_at(31, 1);
    assert!(!placeview::is_allocated(sibling));
    assert_eq!(*hits.borrow(), vec![None]);
}

#[test]
fn test_release_detaches_bound_descendants() {
    setup();
    let page = page();
    let guard = ClickOutside::new();
    let (hits, binding) = recorder();
    let _cleanup = bind_directive(page.a_child, &guard, binding);
    assert_eq!(click_listener_count(), 1);

    release_index(page.a);

    assert_eq!(click_listener_count(), 0);
    assert!(!guard.is_bound(page.a_child));
    click_at(31, 1);
    assert!(hits.borrow().is_empty());
}

#[test]
fn test_guards_judge_each_click_independently() {
    setup();
    let page = page();
    let guard = ClickOutside::new();
    let (a_hits, a_binding) = recorder();
    let (b_hits, b_binding) = recorder();
    guard.attach(page.a, a_binding);
    guard.attach(page.b, b_binding);

    click_at(31, 1);
    assert_eq!(a_hits.borrow().len(), 1);
    assert_eq!(b_hits.borrow().len(), 1);

    click_at(53, 3);
    assert_eq!(a_hits.borrow().last(), Some(&Some(page.b_child)));
    assert_eq!(a_hits.borrow().len(), 2);
    assert_eq!(b_hits.borrow().len(), 1);
    assert_eq!(guard.bound_count(), 2);
}

#[test]
fn test_rebinding_keeps_one_listener() {
    setup();
    let page = page();
    let guard = ClickOutside::new();
    let (old_hits, old_binding) = recorder();
    let (new_hits, new_binding) = recorder();
    guard.attach(page.a, old_binding);
    guard.attach(page.a, new_binding);

    click_at(31, 1);
    assert!(old_hits.borrow().is_empty());
    assert_eq!(new_hits.borrow().len(), 1);
    assert_eq!(click_listener_count(), 1);
}

#[test]
fn test_overwrite_policy_leaks_previous_listener() {
    setup();
    let page = page();
    let guard = ClickOutside::with_policy(ReattachPolicy::Overwrite);
    let (old_hits, old_binding) = recorder();
    let (new_hits, new_binding) = recorder();
    guard.attach(page.a, old_binding);
    guard.attach(page.a, new_binding);
    guard.detach(page.a);

    click_at(31, 1);
    assert_eq!(old_hits.borrow().len(), 1);
    assert!(new_hits.borrow().is_empty());
    assert_eq!(click_listener_count(), 1);
}

#[test]
fn test_callback_may_release_its_element() {
    setup();
    let page = page();
    let guard = ClickOutside::new();
    let calls = Rc::new(Cell::new(0));
    let calls_clone = calls.clone();
    let a = page.a;
    let _cleanup = bind_directive(
        a,
        &guard,
        ClickOutsideBinding::new(move |_| {
            calls_clone.set(calls_clone.get() + 1);
            release_index(a);
        }),
    );

    click_at(31, 1);
    click_at(31, 1);
    assert_eq!(calls.get(), 1);
    assert_eq!(click_listener_count(), 0);
}

#[test]
fn test_dropdown_closes_on_outside_click() {
    setup();
    let page = page();
    let modal = ModalState::new();
    let menu = with_parent(page.page, || {
        dropdown(DropdownProps {
            trigger: Rect::new(70, 0, 8, 1),
            panel: Rect::new(60, 1, 18, 6),
            modal: modal.clone(),
            ..Default::default()
        })
    });

    click_at(71, 0);
    assert!(modal.is_open());
    assert!(menu.is_open());

    click_at(65, 3);
    assert!(modal.is_open(), "click inside the panel");

    click_at(31, 1);
    assert!(!modal.is_open());
    assert!(menu.panel().is_none());
    assert_eq!(click_listener_count(), 0);

    // Trigger toggles closed without the outside guard reopening it
    click_at(71, 0);
    click_at(71, 0);
    assert!(!modal.is_open());
}
