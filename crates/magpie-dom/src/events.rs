//! DOM events: construction, listener registry, and dispatch.
//!
//! [§ 2 Events](https://dom.spec.whatwg.org/#events)
//!
//! "Throughout the web platform events are dispatched to objects to signal
//! an occurrence, such as network activity or user interaction."
//!
//! Dispatch follows the three-phase model of
//! [§ 2.9 Dispatching events](https://dom.spec.whatwg.org/#concept-event-dispatch):
//! the ancestor path from root to target is computed once, capture-phase
//! listeners run root → parent-of-target, every listener on the target runs
//! in registration order, and bubble-phase listeners run
//! parent-of-target → root when the event bubbles.
//!
//! Listeners are stored in an [`EventTargets`] registry keyed by [`NodeId`]
//! rather than inside the arena nodes, so the tree stays `Clone` and the
//! closure types never touch the node storage.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{DomTree, NodeId};

/// [§ 2.2 Interface Event](https://dom.spec.whatwg.org/#interface-event)
///
/// "An event's eventPhase attribute..."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPhase {
    /// "NONE" — the event is not being dispatched.
    #[default]
    None,
    /// "CAPTURING_PHASE" — propagating root → target.
    Capturing,
    /// "AT_TARGET" — listeners on the target itself run.
    AtTarget,
    /// "BUBBLING_PHASE" — propagating target → root.
    Bubbling,
}

/// [§ 2.2 Interface Event](https://dom.spec.whatwg.org/#interface-event)
///
/// An event in flight. Constructed by the embedder, mutated by dispatch and
/// by listeners via the flag methods.
#[derive(Debug, Clone)]
pub struct Event {
    event_type: String,
    bubbles: bool,
    cancelable: bool,
    /// Current phase; [`EventPhase::None`] outside dispatch.
    pub phase: EventPhase,
    /// The node the event was dispatched to.
    pub target: Option<NodeId>,
    /// The node whose listeners are currently being invoked.
    pub current_target: Option<NodeId>,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
    default_prevented: bool,
}

impl Event {
    /// Create a bubbling, cancelable event (the common case for `click`).
    #[must_use]
    pub fn new(event_type: &str) -> Self {
        Self::new_with(event_type, true, true)
    }

    /// Create an event with explicit `bubbles`/`cancelable` flags (`focus`
    /// is neither).
    #[must_use]
    pub fn new_with(event_type: &str, bubbles: bool, cancelable: bool) -> Self {
        Self {
            event_type: event_type.to_string(),
            bubbles,
            cancelable,
            phase: EventPhase::None,
            target: None,
            current_target: None,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
            default_prevented: false,
        }
    }

    /// The event type string (`"click"`, `"input"`, …).
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// "The bubbles attribute must return the value it was initialized to."
    #[must_use]
    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    /// "The cancelable attribute must return the value it was initialized
    /// to."
    #[must_use]
    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    /// [§ 2.2](https://dom.spec.whatwg.org/#dom-event-stoppropagation)
    ///
    /// "Its stopPropagation() method... prevents event from reaching any
    /// objects other than the current object." Remaining listeners on the
    /// current node still run.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// [§ 2.2](https://dom.spec.whatwg.org/#dom-event-stopimmediatepropagation)
    ///
    /// "Invoking this method prevents event from reaching any registered
    /// event listeners after the current one finishes running."
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    /// [§ 2.2](https://dom.spec.whatwg.org/#dom-event-preventdefault)
    ///
    /// "If invoked when the cancelable attribute value is true... signals to
    /// the operation that caused event to be dispatched that it needs to be
    /// canceled." Ignored for non-cancelable events.
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// True once [`Event::stop_propagation`] has been called.
    #[must_use]
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// True once [`Event::stop_immediate_propagation`] has been called.
    #[must_use]
    pub fn immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }

    /// True once a listener successfully called [`Event::prevent_default`].
    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// A registered listener callback. `Rc<RefCell<…>>` so the registry can be
/// iterated while a listener mutates its captured state; the pipeline is
/// single-threaded by contract.
type ListenerCallback = Rc<RefCell<dyn FnMut(&mut Event)>>;

/// Handle returned by [`EventTargets::add_event_listener`], used to remove
/// a specific listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(usize);

struct ListenerEntry {
    id: ListenerId,
    event_type: String,
    capture: bool,
    callback: ListenerCallback,
}

/// [§ 2.7 Interface EventTarget](https://dom.spec.whatwg.org/#interface-eventtarget)
///
/// Listener registry for a whole tree, keyed by node. Registration order is
/// preserved per node; dispatch consults it phase by phase.
#[derive(Default)]
pub struct EventTargets {
    listeners: HashMap<NodeId, Vec<ListenerEntry>>,
    next_id: usize,
}

impl EventTargets {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// [§ 2.7](https://dom.spec.whatwg.org/#dom-eventtarget-addeventlistener)
    ///
    /// Register a listener for `event_type` on `node`. `capture` selects
    /// the phase the listener observes when the node is an ancestor of the
    /// target; at the target itself every listener runs.
    pub fn add_event_listener<F>(
        &mut self,
        node: NodeId,
        event_type: &str,
        capture: bool,
        callback: F,
    ) -> ListenerId
    where
        F: FnMut(&mut Event) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.entry(node).or_default().push(ListenerEntry {
            id,
            event_type: event_type.to_string(),
            capture,
            callback: Rc::new(RefCell::new(callback)),
        });
        id
    }

    /// [§ 2.7](https://dom.spec.whatwg.org/#dom-eventtarget-removeeventlistener)
    ///
    /// Remove one listener by its handle.
    pub fn remove_event_listener(&mut self, node: NodeId, listener: ListenerId) {
        if let Some(entries) = self.listeners.get_mut(&node) {
            entries.retain(|e| e.id != listener);
        }
    }

    /// Remove every listener for `event_type` on `node`.
    pub fn remove_all_listeners(&mut self, node: NodeId, event_type: &str) {
        if let Some(entries) = self.listeners.get_mut(&node) {
            entries.retain(|e| e.event_type != event_type);
        }
    }

    /// [§ 2.9 Dispatching events](https://dom.spec.whatwg.org/#concept-event-dispatch)
    ///
    /// Dispatch `event` to `target`:
    ///
    /// 1. "Let path be event's path" — the ancestor chain root → target,
    ///    computed once up front.
    /// 2. Capture phase: root → parent-of-target, capture listeners only.
    /// 3. Target phase: all listeners on the target in registration order.
    /// 4. Bubble phase (only if `event.bubbles()`): parent-of-target → root,
    ///    non-capture listeners.
    ///
    /// `stop_propagation` is honored between nodes; remaining listeners on
    /// the node that called it still run. `stop_immediate_propagation`
    /// additionally halts the current node's remaining listeners.
    pub fn dispatch_event(&self, tree: &DomTree, target: NodeId, event: &mut Event) {
        event.target = Some(target);

        // Path from root down to the target's parent.
        let mut path: Vec<NodeId> = tree.ancestors(target).collect();
        path.reverse();

        // Capture phase: root -> parent of target.
        event.phase = EventPhase::Capturing;
        for &node in &path {
            self.invoke(node, event, EventPhase::Capturing);
            if event.propagation_stopped {
                event.phase = EventPhase::None;
                event.current_target = None;
                return;
            }
        }

        // Target phase.
        event.phase = EventPhase::AtTarget;
        self.invoke(target, event, EventPhase::AtTarget);
        if event.propagation_stopped || !event.bubbles {
            event.phase = EventPhase::None;
            event.current_target = None;
            return;
        }

        // Bubble phase: parent of target -> root.
        event.phase = EventPhase::Bubbling;
        for &node in path.iter().rev() {
            self.invoke(node, event, EventPhase::Bubbling);
            if event.propagation_stopped {
                break;
            }
        }

        event.phase = EventPhase::None;
        event.current_target = None;
    }

    /// Run the listeners on one node that match the event type and phase.
    fn invoke(&self, node: NodeId, event: &mut Event, phase: EventPhase) {
        let Some(entries) = self.listeners.get(&node) else {
            return;
        };

        // Clone the callback handles first so a listener that mutates the
        // registry cannot invalidate the iteration.
        let callbacks: Vec<ListenerCallback> = entries
            .iter()
            .filter(|e| e.event_type == event.event_type)
            .filter(|e| match phase {
                EventPhase::Capturing => e.capture,
                EventPhase::Bubbling => !e.capture,
                // "If object is event's target, invoke listeners regardless
                // of their capture flag."
                EventPhase::AtTarget | EventPhase::None => true,
            })
            .map(|e| Rc::clone(&e.callback))
            .collect();

        event.current_target = Some(node);
        for callback in callbacks {
            (callback.borrow_mut())(event);
            if event.immediate_propagation_stopped {
                break;
            }
        }
    }
}
