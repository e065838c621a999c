//! Batch fairness: every session whose resource is reported ready in one
//! poll batch is resumed, in reported order, before the next poll.

mod common;

use common::ScriptedPoller;
use weft::{
    Inbound, Interest, Resource, SchedulerBuilder, Session, SessionError, Step, WaitRequest,
};

use std::cell::RefCell;
use std::rc::Rc;

/// Suspends once on its resource, then records its tag and finishes.
struct TaggedSession {
    resource: Resource,
    tag: &'static str,
    order: Rc<RefCell<Vec<&'static str>>>,
}

impl Session for TaggedSession {
    fn resume(&mut self, inbound: Inbound) -> Result<Step, SessionError> {
        match inbound {
            Inbound::Start => Ok(Step::Wait(WaitRequest::readable(self.resource))),
            Inbound::Ready(_) => {
                self.order.borrow_mut().push(self.tag);
                Ok(Step::Done)
            }
        }
    }
}

#[test]
fn resumption_order_matches_reported_order() {
    let (a, b, c) = (Resource(11), Resource(12), Resource(13));

    // One batch reports all three, in an order unrelated to submission.
    let (poller, state) = ScriptedPoller::new(vec![vec![
        (b, Interest::Readable),
        (a, Interest::Readable),
        (c, Interest::Readable),
    ]]);

    let order = Rc::new(RefCell::new(Vec::new()));
    let mut scheduler = SchedulerBuilder::new().build_with_poller(poller);

    for (resource, tag) in [(a, "a"), (b, "b"), (c, "c")] {
        scheduler.submit(Box::new(TaggedSession {
            resource,
            tag,
            order: order.clone(),
        }));
    }

    let report = scheduler.run().unwrap();

    assert_eq!(report.completed, 3);
    assert_eq!(*order.borrow(), vec!["b", "a", "c"]);

    // All three resumed off a single poll; the scripted poller would have
    // panicked on a second call.
    assert_eq!(state.borrow().polls, 1);
    assert!(state.borrow().registered.is_empty());
}

#[test]
fn stale_readiness_is_ignored() {
    let watched = Resource(21);
    let stale = Resource(99);

    let (poller, state) = ScriptedPoller::new(vec![vec![
        (stale, Interest::Readable),
        (watched, Interest::Readable),
    ]]);

    let order = Rc::new(RefCell::new(Vec::new()));
    let mut scheduler = SchedulerBuilder::new().build_with_poller(poller);
    scheduler.submit(Box::new(TaggedSession {
        resource: watched,
        tag: "watched",
        order: order.clone(),
    }));

    let report = scheduler.run().unwrap();

    assert_eq!(report.completed, 1);
    assert!(report.is_clean());
    assert_eq!(*order.borrow(), vec!["watched"]);
    assert_eq!(state.borrow().polls, 1);
}
