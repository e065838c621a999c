//! Shared test support: a scripted readiness source for driving the loop
//! without any OS resources.
#![allow(dead_code)]

use weft::{Interest, Poller, Resource};

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

/// Observable poller bookkeeping, shared with the test body.
#[derive(Default)]
pub struct PollerState {
    /// Resources currently registered, in registration order.
    pub registered: Vec<(Resource, Interest)>,
    /// Number of poll calls made so far.
    pub polls: usize,
}

/// Synthetic poller: each poll call reports the next scripted batch.
///
/// Panics if polled past the end of its script, so a test that scripts N
/// batches also asserts the loop blocks exactly N times.
pub struct ScriptedPoller {
    script: VecDeque<Vec<(Resource, Interest)>>,
    state: Rc<RefCell<PollerState>>,
}

impl ScriptedPoller {
    pub fn new(script: Vec<Vec<(Resource, Interest)>>) -> (Self, Rc<RefCell<PollerState>>) {
        let state = Rc::new(RefCell::new(PollerState::default()));
        let poller = Self {
            script: script.into(),
            state: state.clone(),
        };
        (poller, state)
    }
}

impl Poller for ScriptedPoller {
    fn register(&mut self, resource: Resource, interest: Interest) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        assert!(
            !state.registered.iter().any(|&(r, _)| r == resource),
            "{resource} registered twice"
        );
        state.registered.push((resource, interest));
        Ok(())
    }

    fn deregister(&mut self, resource: Resource) -> io::Result<()> {
        self.state
            .borrow_mut()
            .registered
            .retain(|&(r, _)| r != resource);
        Ok(())
    }

    fn poll(&mut self, ready: &mut Vec<(Resource, Interest)>) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        state.polls += 1;

        let batch = self
            .script
            .pop_front()
            .expect("poll called with no scripted batch left");
        ready.extend(batch);

        Ok(())
    }
}
