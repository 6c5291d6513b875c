//! Command dispatchers: run a batch of independent commands serially or on
//! a fixed pool of worker threads, then join.
//!
//! A failing command never stops its siblings. Every failure is logged and
//! collected once all commands have returned. The commands that completed
//! are handed back with their output, so a batch only fails as a whole when
//! it was cancelled or when none of its commands completed.

use std::panic::{catch_unwind, AssertUnwindSafe};

use log::error;

use crate::config::DispatcherKind;
use crate::error::{PlastError, Result};

/// One long-running unit of work handed to a dispatcher.
pub trait Command: Send {
    fn execute(&mut self) -> Result<()>;

    /// Short name used in logs and failure reports.
    fn label(&self) -> &str;
}

#[derive(Debug, Default)]
pub struct SerialDispatcher;

pub struct ParallelDispatcher {
    pool: rayon::ThreadPool,
    units: usize,
}

impl std::fmt::Debug for ParallelDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelDispatcher")
            .field("units", &self.units)
            .finish()
    }
}

#[derive(Debug)]
pub enum Dispatcher {
    Serial(SerialDispatcher),
    Parallel(ParallelDispatcher),
}

impl Dispatcher {
    pub fn serial() -> Self {
        Dispatcher::Serial(SerialDispatcher)
    }

    /// Pool of `units` worker threads; `0` means one per available core.
    pub fn parallel(units: usize) -> Result<Self> {
        let units = if units == 0 { num_cpus::get() } else { units };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(units)
            .thread_name(|i| format!("plast-worker-{i}"))
            .build()
            .map_err(|e| PlastError::WorkerPool(e.to_string()))?;
        Ok(Dispatcher::Parallel(ParallelDispatcher { pool, units }))
    }

    pub fn from_kind(kind: DispatcherKind) -> Result<Self> {
        match kind {
            DispatcherKind::Serial => Ok(Self::serial()),
            DispatcherKind::Parallel { units } => Self::parallel(units),
        }
    }

    /// Number of commands each stage should issue.
    pub fn units(&self) -> usize {
        match self {
            Dispatcher::Serial(_) => 1,
            Dispatcher::Parallel(p) => p.units,
        }
    }

    /// Runs every command and blocks until all of them have returned.
    pub fn dispatch<C: Command>(&self, mut commands: Vec<C>) -> Result<Dispatched<C>> {
        let mut outcomes: Vec<Result<()>> = Vec::with_capacity(commands.len());

        match self {
            Dispatcher::Serial(_) => {
                for (unit, cmd) in commands.iter_mut().enumerate() {
                    outcomes.push(run_command(unit, cmd));
                }
            }
            Dispatcher::Parallel(p) => {
                outcomes.resize_with(commands.len(), || Ok(()));
                p.pool.scope(|s| {
                    for (unit, (cmd, slot)) in
                        commands.iter_mut().zip(outcomes.iter_mut()).enumerate()
                    {
                        s.spawn(move |_| *slot = run_command(unit, cmd));
                    }
                });
            }
        }

        settle(commands, outcomes)
    }
}

/// Commands of one batch that ran to completion, and the failures of the
/// others.
#[derive(Debug)]
pub struct Dispatched<C> {
    pub completed: Vec<C>,
    pub failures: Vec<PlastError>,
}

fn run_command<C: Command>(unit: usize, cmd: &mut C) -> Result<()> {
    let outcome = match catch_unwind(AssertUnwindSafe(|| cmd.execute())) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic".to_string());
            Err(PlastError::CommandFailed {
                unit,
                label: cmd.label().to_string(),
                message,
            })
        }
    };
    match outcome {
        Err(PlastError::Cancelled) => Err(PlastError::Cancelled),
        Err(e @ PlastError::CommandFailed { .. }) => {
            error!("{e}");
            Err(e)
        }
        Err(e) => {
            error!("Command '{}' (unit {unit}) failed: {e}", cmd.label());
            Err(PlastError::CommandFailed {
                unit,
                label: cmd.label().to_string(),
                message: e.to_string(),
            })
        }
        Ok(()) => Ok(()),
    }
}

fn settle<C>(commands: Vec<C>, outcomes: Vec<Result<()>>) -> Result<Dispatched<C>> {
    let issued = commands.len();
    let mut completed = Vec::with_capacity(issued);
    let mut failures = Vec::new();
    let mut cancelled = false;
    for (cmd, outcome) in commands.into_iter().zip(outcomes) {
        match outcome {
            Ok(()) => completed.push(cmd),
            Err(PlastError::Cancelled) => cancelled = true,
            Err(e) => failures.push(e),
        }
    }
    if cancelled {
        return Err(PlastError::Cancelled);
    }
    if issued > 0 && completed.is_empty() {
        return Err(PlastError::Dispatch(failures));
    }
    Ok(Dispatched {
        completed,
        failures,
    })
}
