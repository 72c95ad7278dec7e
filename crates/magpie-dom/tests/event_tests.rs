//! Integration tests for event construction and dispatch ordering.

use std::cell::RefCell;
use std::rc::Rc;

use magpie_dom::events::{Event, EventPhase, EventTargets};
use magpie_dom::{DomTree, NodeId};

/// Build `div > section > button` and return the three ids.
fn three_level_tree() -> (DomTree, NodeId, NodeId, NodeId) {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    let section = tree.create_element("section");
    let button = tree.create_element("button");
    tree.append_child(NodeId::ROOT, div);
    tree.append_child(div, section);
    tree.append_child(section, button);
    (tree, div, section, button)
}

#[test]
fn event_defaults() {
    let event = Event::new("click");
    assert_eq!(event.event_type(), "click");
    assert!(event.bubbles());
    assert!(event.cancelable());
    assert_eq!(event.phase, EventPhase::None);
    assert_eq!(event.target, None);
    assert_eq!(event.current_target, None);
    assert!(!event.propagation_stopped());
    assert!(!event.default_prevented());
}

#[test]
fn non_bubbling_event() {
    let event = Event::new_with("focus", false, false);
    assert!(!event.bubbles());
    assert!(!event.cancelable());
}

#[test]
fn capture_target_bubble_ordering() {
    let (tree, div, section, button) = three_level_tree();
    let mut targets = EventTargets::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    let push = |log: &Rc<RefCell<Vec<&'static str>>>, label: &'static str| {
        let log = Rc::clone(log);
        move |_: &mut Event| log.borrow_mut().push(label)
    };

    let _ = targets.add_event_listener(div, "click", true, push(&log, "gp-capture"));
    let _ = targets.add_event_listener(div, "click", false, push(&log, "gp-bubble"));
    let _ = targets.add_event_listener(section, "click", true, push(&log, "p-capture"));
    let _ = targets.add_event_listener(section, "click", false, push(&log, "p-bubble"));
    let _ = targets.add_event_listener(button, "click", false, push(&log, "c-target"));

    let mut event = Event::new("click");
    targets.dispatch_event(&tree, button, &mut event);

    assert_eq!(
        *log.borrow(),
        vec!["gp-capture", "p-capture", "c-target", "p-bubble", "gp-bubble"]
    );
}

#[test]
fn non_bubbling_event_skips_bubble_phase() {
    let (tree, div, _section, button) = three_level_tree();
    let mut targets = EventTargets::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    {
        let log = Rc::clone(&log);
        let _ = targets.add_event_listener(div, "focus", true, move |_| {
            log.borrow_mut().push("capture");
        });
    }
    {
        let log = Rc::clone(&log);
        let _ = targets.add_event_listener(div, "focus", false, move |_| {
            log.borrow_mut().push("bubble");
        });
    }
    {
        let log = Rc::clone(&log);
        let _ = targets.add_event_listener(button, "focus", false, move |_| {
            log.borrow_mut().push("target");
        });
    }

    let mut event = Event::new_with("focus", false, false);
    targets.dispatch_event(&tree, button, &mut event);

    assert_eq!(*log.borrow(), vec!["capture", "target"]);
}

#[test]
fn stop_propagation_still_runs_same_node_listeners() {
    let (tree, _div, _section, button) = three_level_tree();
    let mut targets = EventTargets::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    {
        let log = Rc::clone(&log);
        let _ = targets.add_event_listener(button, "click", false, move |e| {
            log.borrow_mut().push("first");
            e.stop_propagation();
        });
    }
    {
        let log = Rc::clone(&log);
        let _ = targets.add_event_listener(button, "click", false, move |_| {
            log.borrow_mut().push("second");
        });
    }

    let mut event = Event::new("click");
    targets.dispatch_event(&tree, button, &mut event);

    assert_eq!(*log.borrow(), vec!["first", "second"]);
    assert!(event.propagation_stopped());
}

#[test]
fn stop_propagation_halts_before_bubble() {
    let (tree, div, _section, button) = three_level_tree();
    let mut targets = EventTargets::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    {
        let log = Rc::clone(&log);
        let _ = targets.add_event_listener(button, "click", false, move |e| {
            log.borrow_mut().push("target");
            e.stop_propagation();
        });
    }
    {
        let log = Rc::clone(&log);
        let _ = targets.add_event_listener(div, "click", false, move |_| {
            log.borrow_mut().push("ancestor-bubble");
        });
    }

    let mut event = Event::new("click");
    targets.dispatch_event(&tree, button, &mut event);

    assert_eq!(*log.borrow(), vec!["target"]);
}

#[test]
fn stop_immediate_propagation_halts_same_node_listeners() {
    let (tree, _div, _section, button) = three_level_tree();
    let mut targets = EventTargets::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    {
        let log = Rc::clone(&log);
        let _ = targets.add_event_listener(button, "click", false, move |e| {
            log.borrow_mut().push("first");
            e.stop_immediate_propagation();
        });
    }
    {
        let log = Rc::clone(&log);
        let _ = targets.add_event_listener(button, "click", false, move |_| {
            log.borrow_mut().push("second");
        });
    }

    let mut event = Event::new("click");
    targets.dispatch_event(&tree, button, &mut event);

    assert_eq!(*log.borrow(), vec!["first"]);
    assert!(event.propagation_stopped());
    assert!(event.immediate_propagation_stopped());
}

#[test]
fn prevent_default_requires_cancelable() {
    let mut cancelable = Event::new_with("click", true, true);
    cancelable.prevent_default();
    assert!(cancelable.default_prevented());

    let mut rigid = Event::new_with("click", true, false);
    rigid.prevent_default();
    assert!(!rigid.default_prevented());
}

#[test]
fn listeners_run_in_registration_order() {
    let (tree, _div, _section, button) = three_level_tree();
    let mut targets = EventTargets::new();
    let order = Rc::new(RefCell::new(Vec::new()));

    for n in 1..=3 {
        let order = Rc::clone(&order);
        let _ = targets.add_event_listener(button, "click", false, move |_| {
            order.borrow_mut().push(n);
        });
    }

    let mut event = Event::new("click");
    targets.dispatch_event(&tree, button, &mut event);
    assert_eq!(*order.borrow(), vec![1, 2, 3]);
}

#[test]
fn remove_all_listeners_silences_node() {
    let (tree, _div, _section, button) = three_level_tree();
    let mut targets = EventTargets::new();
    let count = Rc::new(RefCell::new(0));

    for _ in 0..2 {
        let count = Rc::clone(&count);
        let _ = targets.add_event_listener(button, "click", false, move |_| {
            *count.borrow_mut() += 1;
        });
    }
    targets.remove_all_listeners(button, "click");

    let mut event = Event::new("click");
    targets.dispatch_event(&tree, button, &mut event);
    assert_eq!(*count.borrow(), 0);
}

#[test]
fn remove_single_listener_by_handle() {
    let (tree, _div, _section, button) = three_level_tree();
    let mut targets = EventTargets::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    let keep = {
        let log = Rc::clone(&log);
        targets.add_event_listener(button, "click", false, move |_| {
            log.borrow_mut().push("keep");
        })
    };
    let drop_me = {
        let log = Rc::clone(&log);
        targets.add_event_listener(button, "click", false, move |_| {
            log.borrow_mut().push("drop");
        })
    };
    assert_ne!(keep, drop_me);
    targets.remove_event_listener(button, drop_me);

    let mut event = Event::new("click");
    targets.dispatch_event(&tree, button, &mut event);
    assert_eq!(*log.borrow(), vec!["keep"]);
}

#[test]
fn listener_for_other_event_type_not_called() {
    let (tree, _div, _section, button) = three_level_tree();
    let mut targets = EventTargets::new();
    let called = Rc::new(RefCell::new(false));

    {
        let called = Rc::clone(&called);
        let _ = targets.add_event_listener(button, "keydown", false, move |_| {
            *called.borrow_mut() = true;
        });
    }

    let mut event = Event::new("click");
    targets.dispatch_event(&tree, button, &mut event);
    assert!(!*called.borrow());
}

#[test]
fn target_and_current_target_are_set_during_dispatch() {
    let (tree, div, _section, button) = three_level_tree();
    let mut targets = EventTargets::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    {
        let seen = Rc::clone(&seen);
        let _ = targets.add_event_listener(div, "click", true, move |e| {
            seen.borrow_mut().push((e.target, e.current_target, e.phase));
        });
    }
    {
        let seen = Rc::clone(&seen);
        let _ = targets.add_event_listener(button, "click", false, move |e| {
            seen.borrow_mut().push((e.target, e.current_target, e.phase));
        });
    }

    let mut event = Event::new("click");
    targets.dispatch_event(&tree, button, &mut event);

    let seen = seen.borrow();
    assert_eq!(seen[0], (Some(button), Some(div), EventPhase::Capturing));
    assert_eq!(seen[1], (Some(button), Some(button), EventPhase::AtTarget));
    // Flags are reset once dispatch completes.
    assert_eq!(event.phase, EventPhase::None);
    assert_eq!(event.current_target, None);
}
