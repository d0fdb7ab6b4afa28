//! Execution traces: every random choice of one run of a probabilistic program,
//! stored in an arena and re-synchronized with the program on each pass.
mod lookup;
mod propose;
mod update;
pub use propose::Proposal;

use crate::context::Ctx;
use crate::data::*;
use crate::init::{InitOutcome, Initializer};
use crate::pipeline::{Limits, Options};
use crate::registry::TraceId;
use crate::utils::render::*;
use itertools::*;
use rand::rngs::StdRng;
use std::fmt;
use std::rc::Rc;

pub type Computation = Rc<dyn Fn(&mut Ctx<'_>) -> Result<Val>>;

pub struct Trace {
    id: TraceId,
    computation: Computation,
    limits: Limits,
    pub(crate) rng: StdRng,

    // arena of records, with free slots reused
    slots: Vec<Option<Record>>,
    free: Vec<VarId>,
    vars: HashMap<Address, VarId>,
    // visitation order of the last pass; positional fast path
    order: Vec<VarId>,
    cursor: usize,

    log_prob: f64,
    new_log_prob: f64,
    removed_log_prob: f64,
    removed: Vec<Record>,
    conditions_satisfied: bool,
    return_value: Option<Val>,
}

impl Trace {
    /// A trace that has never run its computation.
    pub fn unstarted<F>(computation: F, opts: &Options) -> Trace
    where
        F: Fn(&mut Ctx<'_>) -> Result<Val> + 'static,
    {
        Trace {
            id: TraceId::fresh(),
            computation: Rc::new(computation),
            limits: opts.limits(),
            rng: opts.rng(),
            slots: vec![],
            free: vec![],
            vars: Default::default(),
            order: vec![],
            cursor: 0,
            log_prob: 0.0,
            new_log_prob: 0.0,
            removed_log_prob: 0.0,
            removed: vec![],
            conditions_satisfied: false,
            return_value: None,
        }
    }

    /// Builds a trace and runs `init` until its conditions hold.
    pub fn new<F, I>(computation: F, init: &I, opts: &Options) -> Result<Trace>
    where
        F: Fn(&mut Ctx<'_>) -> Result<Val> + 'static,
        I: Initializer + ?Sized,
    {
        let mut trace = Trace::unstarted(computation, opts);
        match init.initialize(&mut trace)? {
            InitOutcome::Satisfied { .. } => Ok(trace),
            InitOutcome::Exhausted { worlds } => Err(TraceError::EnumerationExhausted { worlds }),
        }
    }

    /// Copies every record; nothing is shared with `self` except the computation
    /// and the immutable ERP descriptors.
    pub fn deep_copy(&self) -> Trace {
        Trace {
            id: TraceId::fresh(),
            computation: Rc::clone(&self.computation),
            limits: self.limits,
            rng: self.rng.clone(),
            slots: self.slots.clone(),
            free: self.free.clone(),
            vars: self.vars.clone(),
            order: self.order.clone(),
            cursor: self.cursor,
            log_prob: self.log_prob,
            new_log_prob: self.new_log_prob,
            removed_log_prob: self.removed_log_prob,
            removed: self.removed.clone(),
            conditions_satisfied: self.conditions_satisfied,
            return_value: self.return_value.clone(),
        }
    }

    /// Forgets every variable.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.vars.clear();
        self.order.clear();
        self.removed.clear();
        self.cursor = 0;
    }

    pub fn id(&self) -> TraceId {
        self.id
    }
    pub fn limits(&self) -> Limits {
        self.limits
    }
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }
    pub fn joint_log_probability(&self) -> f64 {
        self.log_prob
    }
    /// Log-density of the variables created by the last pass.
    pub fn new_log_probability(&self) -> f64 {
        self.new_log_prob
    }
    /// Log-density of the variables the last pass no longer reached.
    pub fn removed_log_probability(&self) -> f64 {
        self.removed_log_prob
    }
    pub fn conditions_satisfied(&self) -> bool {
        self.conditions_satisfied
    }
    pub fn return_value(&self) -> Option<&Val> {
        self.return_value.as_ref()
    }
    pub fn len(&self) -> usize {
        self.vars.len()
    }
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn record(&self, address: &str) -> Option<&Record> {
        self.vars.get(address).and_then(|id| self.slot(*id))
    }
    pub fn value(&self, address: &str) -> Option<&Val> {
        self.record(address).map(|r| &r.val)
    }
    /// Records in the order the last pass visited them.
    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.order.iter().filter_map(|id| self.slot(*id))
    }
    pub fn addresses(&self) -> Vec<Address> {
        self.records().map(|r| r.address.clone()).collect_vec()
    }
    /// Records pruned by the last pass. Cleared by the next one.
    pub fn removed_records(&self) -> &[Record] {
        &self.removed
    }

    /// Overwrites a stored value and rescores it. Takes effect in the joint
    /// log-probability on the next pass.
    pub fn set_value(&mut self, address: &str, val: Val) -> Result<()> {
        let id = self.id_of(address)?;
        let rec = self.slot_mut(id)?;
        rec.log_density = rec.erp.log_density(&val, &rec.params)?;
        rec.val = val;
        Ok(())
    }

    /// Addresses of unobserved variables, by structural class, in visitation order.
    pub fn free_addresses(&self, structural: bool, nonstructural: bool) -> Vec<Address> {
        self.free_ids(structural, nonstructural)
            .into_iter()
            .filter_map(|id| self.slot(id).map(|r| r.address.clone()))
            .collect_vec()
    }
    pub(crate) fn free_ids(&self, structural: bool, nonstructural: bool) -> Vec<VarId> {
        self.order
            .iter()
            .copied()
            .filter(|id| match self.slot(*id) {
                Some(r) => {
                    !r.conditioned
                        && ((structural && r.structural) || (nonstructural && !r.structural))
                }
                None => false,
            })
            .collect_vec()
    }

    /// Addresses `self` has that `other` does not.
    pub fn variables_only_in(&self, other: &Trace) -> Vec<Address> {
        self.records()
            .filter(|r| !other.vars.contains_key(&r.address))
            .map(|r| r.address.clone())
            .collect_vec()
    }
    /// Log-density carried by [`Trace::variables_only_in`].
    pub fn log_probability_only_in(&self, other: &Trace) -> f64 {
        self.records()
            .filter(|r| !other.vars.contains_key(&r.address))
            .map(|r| r.log_density)
            .sum()
    }

    pub fn add_factor(&mut self, log_weight: f64) {
        self.log_prob += log_weight;
    }
    pub fn condition_on(&mut self, holds: bool) {
        self.conditions_satisfied &= holds;
    }

    pub(crate) fn slot(&self, id: VarId) -> Option<&Record> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }
    pub(crate) fn slot_mut(&mut self, id: VarId) -> Result<&mut Record> {
        match self.slots.get_mut(id.0).and_then(Option::as_mut) {
            Some(r) => Ok(r),
            None => generic(&format!("dangling variable {}", id)),
        }
    }
    fn id_of(&self, address: &str) -> Result<VarId> {
        match self.vars.get(address) {
            Some(id) => Ok(*id),
            None => unknown_address(&Address::from(address)),
        }
    }
}

impl fmt::Debug for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trace")
            .field("id", &self.id)
            .field("variables", &self.len())
            .field("log_prob", &self.log_prob)
            .field("conditions_satisfied", &self.conditions_satisfied)
            .field("return_value", &self.return_value)
            .finish()
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "trace {} (lp {}, {})",
            self.id.value(),
            fmt_f64(true)(self.log_prob),
            if self.conditions_satisfied {
                "satisfied"
            } else {
                "unsatisfied"
            }
        )?;
        for r in self.records() {
            writeln!(f, "  {}", render_record(r))?;
        }
        Ok(())
    }
}
