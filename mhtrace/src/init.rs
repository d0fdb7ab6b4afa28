//! Ways to bring a fresh trace into a world that satisfies its conditions.
use crate::data::*;
use crate::erp::Support;
use crate::registry;
use crate::trace::Trace;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitOutcome {
    Satisfied { passes: usize },
    /// Every assignment of an all-enumerable trace was tried.
    Exhausted { worlds: usize },
}

pub trait Initializer {
    fn initialize(&self, trace: &mut Trace) -> Result<InitOutcome>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    #[default]
    Rejection,
    Enumerate,
    Hybrid,
}
impl Initializer for Strategy {
    fn initialize(&self, trace: &mut Trace) -> Result<InitOutcome> {
        match self {
            Strategy::Rejection => Rejection.initialize(trace),
            Strategy::Enumerate => Enumerate.initialize(trace),
            Strategy::Hybrid => Hybrid.initialize(trace),
        }
    }
}

/// Fresh runs until one satisfies the conditions. Unbounded unless the trace's
/// limits cap the number of attempts.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rejection;

/// Odometer walk over the enumerable domains of the free variables.
#[derive(Clone, Copy, Debug, Default)]
pub struct Enumerate;

/// Random restarts interleaved with growing runs of enumeration. Enumeration
/// that diverges is abandoned for a rejection pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hybrid;

fn check_attempts(trace: &Trace, passes: usize) -> Result<()> {
    match trace.limits().max_attempts {
        Some(max) if passes >= max => Err(TraceError::AttemptsExhausted(passes)),
        _ => Ok(()),
    }
}

fn fresh_pass(trace: &mut Trace) -> Result<()> {
    let _plain = registry::stop_enumerate();
    trace.reset();
    trace.trace_update(false)
}

impl Initializer for Rejection {
    fn initialize(&self, trace: &mut Trace) -> Result<InitOutcome> {
        let mut passes = 0;
        loop {
            check_attempts(trace, passes)?;
            fresh_pass(trace)?;
            passes += 1;
            if trace.conditions_satisfied() {
                break;
            }
        }
        info!(passes, "rejection initialized");
        Ok(InitOutcome::Satisfied { passes })
    }
}

/// Moves the free variables to the next assignment, last-visited variable first.
/// Variables that wrap around carry into the one before them. Returns `false`
/// once every variable has wrapped.
pub(crate) fn advance(trace: &mut Trace) -> Result<bool> {
    let mut ids = trace.free_ids(true, true);
    while let Some(id) = ids.pop() {
        let rec = trace.slot_mut(id)?;
        let erp = rec.erp;
        if let Support::Enumerable(dom) = erp.support() {
            let (next, carry) = match dom.next_in_domain(Some(&rec.val), &rec.params)? {
                Some(v) => (v, false),
                None => (dom.first_in_domain(&rec.params)?, true),
            };
            rec.log_density = erp.log_density(&next, &rec.params)?;
            rec.val = next;
            if !carry {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn has_free_nonenumerable(trace: &Trace) -> bool {
    trace
        .records()
        .any(|r| !r.conditioned && !matches!(r.erp.support(), Support::Enumerable(_)))
}

impl Initializer for Enumerate {
    fn initialize(&self, trace: &mut Trace) -> Result<InitOutcome> {
        let _enumerating = registry::start_enumerate();
        let (mut passes, mut worlds) = (0, 1);
        check_attempts(trace, passes)?;
        trace.trace_update(false)?;
        passes += 1;
        while !trace.conditions_satisfied() {
            check_attempts(trace, passes)?;
            if advance(trace)? {
                worlds += 1;
            } else if has_free_nonenumerable(trace) {
                debug!(worlds, "odometer wrapped, restarting");
                trace.reset();
            } else {
                info!(worlds, passes, "enumeration exhausted");
                return Ok(InitOutcome::Exhausted { worlds });
            }
            trace.trace_update(false)?;
            passes += 1;
        }
        info!(worlds, passes, "enumeration initialized");
        Ok(InitOutcome::Satisfied { passes })
    }
}

fn enumeration_step(trace: &mut Trace) -> Result<()> {
    let _enumerating = registry::start_enumerate();
    if !advance(trace)? {
        trace.reset();
    }
    trace.trace_update(false)
}

impl Initializer for Hybrid {
    fn initialize(&self, trace: &mut Trace) -> Result<InitOutcome> {
        let mut passes = 0;
        check_attempts(trace, passes)?;
        fresh_pass(trace)?;
        passes += 1;

        let (mut i, mut esteps) = (1, 1);
        while !trace.conditions_satisfied() {
            check_attempts(trace, passes)?;
            if i % esteps == 0 {
                fresh_pass(trace)?;
                // enumerate longer after every restart
                esteps += 10;
            } else {
                match enumeration_step(trace) {
                    Ok(()) => {}
                    Err(e @ TraceError::Divergent { .. }) => {
                        warn!("{}; falling back to rejection", e);
                        fresh_pass(trace)?;
                    }
                    Err(e) => return Err(e),
                }
            }
            passes += 1;
            i += 1;
        }
        info!(passes, "hybrid initialized");
        Ok(InitOutcome::Satisfied { passes })
    }
}
