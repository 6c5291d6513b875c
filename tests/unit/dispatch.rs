//! Range iterator and command dispatchers working together.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use plast::dispatch::{Command, Dispatcher, RangeIterator};
use plast::{PlastError, Result};

/// Drains a shared range and records every value it claimed.
struct Drain<'a> {
    range: &'a RangeIterator,
    claimed: Vec<u64>,
    label: String,
}

impl Command for Drain<'_> {
    fn execute(&mut self) -> Result<()> {
        while let Some(chunk) = self.range.next_chunk() {
            self.claimed.extend(chunk.start..chunk.end);
        }
        Ok(())
    }

    fn label(&self) -> &str {
        &self.label
    }
}

fn drain_with(dispatcher: &Dispatcher, end: u64, chunk: u64) -> Vec<Vec<u64>> {
    let range = RangeIterator::new(0, end, chunk);
    let cmds: Vec<Drain> = (0..dispatcher.units())
        .map(|unit| Drain {
            range: &range,
            claimed: Vec::new(),
            label: format!("drain-{unit}"),
        })
        .collect();
    let done = dispatcher.dispatch(cmds).unwrap();
    assert!(range.next_chunk().is_none());
    done.completed.into_iter().map(|c| c.claimed).collect()
}

#[test]
fn test_every_value_claimed_once() {
    let dispatcher = Dispatcher::parallel(6).unwrap();
    let claims = drain_with(&dispatcher, 10_007, 13);
    assert_eq!(claims.len(), 6);

    let mut all: Vec<u64> = claims.into_iter().flatten().collect();
    all.sort_unstable();
    assert_eq!(all, (0..10_007).collect::<Vec<_>>());
}

#[test]
fn test_serial_claims_in_order() {
    let claims = drain_with(&Dispatcher::serial(), 250, 100);
    assert_eq!(claims, vec![(0..250).collect::<Vec<_>>()]);
}

/// Fails once the shared flag is cleared by a sibling.
#[derive(Debug)]
struct Watcher<'a> {
    running: &'a AtomicBool,
    stop_others: bool,
    polls: &'a AtomicU64,
}

impl Command for Watcher<'_> {
    fn execute(&mut self) -> Result<()> {
        if self.stop_others {
            self.running.store(false, Ordering::SeqCst);
            return Ok(());
        }
        loop {
            self.polls.fetch_add(1, Ordering::Relaxed);
            if !self.running.load(Ordering::SeqCst) {
                return Err(PlastError::Cancelled);
            }
            std::thread::yield_now();
        }
    }

    fn label(&self) -> &str {
        "watcher"
    }
}

#[test]
fn test_cancellation_surfaces_as_cancelled() {
    let running = AtomicBool::new(true);
    let polls = AtomicU64::new(0);
    let cmds: Vec<Watcher> = (0..4)
        .map(|i| Watcher {
            running: &running,
            stop_others: i == 3,
            polls: &polls,
        })
        .collect();
    let err = Dispatcher::parallel(4).unwrap().dispatch(cmds).unwrap_err();
    assert!(matches!(err, PlastError::Cancelled));
}

#[derive(Debug)]
struct Flaky<'a> {
    unit: usize,
    log: &'a Mutex<Vec<usize>>,
}

impl Command for Flaky<'_> {
    fn execute(&mut self) -> Result<()> {
        self.log.lock().unwrap().push(self.unit);
        if self.unit % 2 == 1 {
            return Err(PlastError::InvalidParameter(format!("unit {}", self.unit)));
        }
        Ok(())
    }

    fn label(&self) -> &str {
        "flaky"
    }
}

#[test]
fn test_failures_reported_and_survivors_kept() {
    let log = Mutex::new(Vec::new());
    let cmds: Vec<Flaky> = (0..5).map(|unit| Flaky { unit, log: &log }).collect();
    let done = Dispatcher::serial().dispatch(cmds).unwrap();

    assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    let survivors: Vec<usize> = done.completed.iter().map(|c| c.unit).collect();
    assert_eq!(survivors, vec![0, 2, 4]);
    let units: Vec<usize> = done
        .failures
        .iter()
        .map(|f| match f {
            PlastError::CommandFailed { unit, .. } => *unit,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(units, vec![1, 3]);
}

#[test]
fn test_batch_fails_when_nothing_completes() {
    let log = Mutex::new(Vec::new());
    let cmds: Vec<Flaky> = [1, 3, 5].into_iter().map(|unit| Flaky { unit, log: &log }).collect();
    match Dispatcher::parallel(3).unwrap().dispatch(cmds) {
        Err(PlastError::Dispatch(failures)) => assert_eq!(failures.len(), 3),
        other => panic!("unexpected {other:?}"),
    }
}
