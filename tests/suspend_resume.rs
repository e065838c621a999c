//! Suspend/resume equivalence: a resumed session continues exactly after
//! its suspend point with all prior local state intact.

mod common;

use common::ScriptedPoller;
use weft::{Inbound, Interest, Resource, SchedulerBuilder, Session, SessionError, Step, WaitRequest};

use std::cell::RefCell;
use std::rc::Rc;

/// Increments a local counter on every resume and records it, suspending on
/// the same resource between increments.
struct CounterSession {
    resource: Resource,
    rounds: u32,
    counter: u32,
    seen: Rc<RefCell<Vec<(Inbound, u32)>>>,
}

impl Session for CounterSession {
    fn resume(&mut self, inbound: Inbound) -> Result<Step, SessionError> {
        self.counter += 1;
        self.seen.borrow_mut().push((inbound, self.counter));

        if self.counter < self.rounds {
            Ok(Step::Wait(WaitRequest::readable(self.resource)))
        } else {
            Ok(Step::Done)
        }
    }
}

#[test]
fn counter_survives_suspend_cycles() {
    let resource = Resource(10);
    // Four waits before the final resume completes the session.
    let script = vec![vec![(resource, Interest::Readable)]; 4];
    let (poller, state) = ScriptedPoller::new(script);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut scheduler = SchedulerBuilder::new().build_with_poller(poller);

    scheduler.submit(Box::new(CounterSession {
        resource,
        rounds: 5,
        counter: 0,
        seen: seen.clone(),
    }));

    let report = scheduler.run().unwrap();
    assert_eq!(report.completed, 1);
    assert!(report.is_clean());

    // Strictly increasing counter across cycles: local state was preserved.
    let seen = seen.borrow();
    let values: Vec<u32> = seen.iter().map(|&(_, v)| v).collect();
    assert_eq!(values, vec![1, 2, 3, 4, 5]);

    // First resume starts the session; every later one carries readiness.
    assert_eq!(seen[0].0, Inbound::Start);
    for &(inbound, _) in &seen[1..] {
        assert_eq!(inbound, Inbound::Ready(Interest::Readable));
    }

    let state = state.borrow();
    assert_eq!(state.polls, 4);
    assert!(state.registered.is_empty());
    assert_eq!(scheduler.pending_waits(), 0);
}

#[test]
fn mismatched_interest_keeps_the_wait_installed() {
    let resource = Resource(2);

    struct WriteWaiter {
        resource: Resource,
        resumed: bool,
    }

    impl Session for WriteWaiter {
        fn resume(&mut self, inbound: Inbound) -> Result<Step, SessionError> {
            if self.resumed {
                assert_eq!(inbound, Inbound::Ready(Interest::Writable));
                return Ok(Step::Done);
            }

            self.resumed = true;
            Ok(Step::Wait(WaitRequest::writable(self.resource)))
        }
    }

    // First batch fires the wrong interest; the wait must survive it and
    // resolve on the second batch.
    let (poller, state) = ScriptedPoller::new(vec![
        vec![(resource, Interest::Readable)],
        vec![(resource, Interest::Writable)],
    ]);

    let mut scheduler = SchedulerBuilder::new().build_with_poller(poller);
    scheduler.submit(Box::new(WriteWaiter {
        resource,
        resumed: false,
    }));

    let report = scheduler.run().unwrap();
    assert_eq!(report.completed, 1);
    assert_eq!(state.borrow().polls, 2);
}
