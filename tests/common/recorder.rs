//! Observer that records every event it receives

use propsheet_rs::model::{ObserverId, PropertyEvent, PropertyId, PropertyTree};
use std::cell::RefCell;
use std::rc::Rc;

/// Records `(channel, event)` pairs from every property it is attached to
pub struct EventRecorder {
    events: Rc<RefCell<Vec<(PropertyId, PropertyEvent)>>>,
    observer: ObserverId,
}

impl EventRecorder {
    pub fn new(tree: &mut PropertyTree) -> Self {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let observer = tree.register_observer(Rc::new(propsheet_rs::model::FnObserver(
            move |_: &mut PropertyTree, channel: PropertyId, event: &PropertyEvent| {
                sink.borrow_mut().push((channel, event.clone()));
            },
        )));
        Self { events, observer }
    }

    /// Recorder subscribed to a single property.
    pub fn on(tree: &mut PropertyTree, property: PropertyId) -> Self {
        let recorder = Self::new(tree);
        recorder.attach(tree, property);
        recorder
    }

    pub fn attach(&self, tree: &mut PropertyTree, property: PropertyId) {
        tree.subscribe(property, self.observer);
    }

    pub fn observer(&self) -> ObserverId {
        self.observer
    }

    pub fn events(&self) -> Vec<(PropertyId, PropertyEvent)> {
        self.events.borrow().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(|(_, e)| e.name()).collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|(_, e)| e.name() == name)
            .count()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}
