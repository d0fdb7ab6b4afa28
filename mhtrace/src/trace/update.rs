use super::Trace;
use crate::context::Ctx;
use crate::data::*;
use crate::registry;
use std::rc::Rc;
use tracing::debug;

impl Trace {
    /// Runs the computation once against this trace.
    ///
    /// With `structure_is_fixed` the previous visitation order is kept and choices
    /// are matched by position first; otherwise every choice is matched by
    /// address. Variables the run does not reach are pruned afterwards.
    pub fn trace_update(&mut self, structure_is_fixed: bool) -> Result<()> {
        let span = tracing::span!(tracing::Level::DEBUG, "pass", trace = self.id.value());
        let _senter = span.enter();
        let _active = registry::activate(self.id)?;

        self.log_prob = 0.0;
        self.new_log_prob = 0.0;
        self.removed_log_prob = 0.0;
        self.removed.clear();
        self.conditions_satisfied = true;
        self.cursor = 0;
        if !structure_is_fixed {
            self.order.clear();
        }
        for rec in self.slots.iter_mut().flatten() {
            rec.active = false;
        }

        let computation = Rc::clone(&self.computation);
        let result = {
            let mut ctx = Ctx::active(self);
            computation(&mut ctx)
        };
        match result {
            Ok(v) => self.return_value = Some(v),
            Err(e) => {
                debug!("pass aborted: {}", e);
                self.abandon();
                return Err(e);
            }
        }

        self.prune();
        debug!(
            variables = self.len(),
            lp = self.log_prob,
            added = self.new_log_prob,
            removed = self.removed_log_prob,
            satisfied = self.conditions_satisfied,
            "pass complete"
        );
        Ok(())
    }

    /// Keeps every record of an unfinished pass, reached or not, and marks the
    /// world unsatisfied. The joint is rescored from the kept records; factors
    /// of the unfinished pass are lost.
    fn abandon(&mut self) {
        self.conditions_satisfied = false;
        self.order.clear();
        self.log_prob = 0.0;
        for (ix, slot) in self.slots.iter_mut().enumerate() {
            let shadowed = match slot {
                Some(rec) => self.vars.get(&rec.address) != Some(&VarId(ix)),
                None => continue,
            };
            if shadowed {
                // replaced at its address before the pass failed
                if let Some(rec) = slot.take() {
                    self.removed_log_prob += rec.log_density;
                    self.free.push(VarId(ix));
                    self.removed.push(rec);
                }
            } else if let Some(rec) = slot.as_mut() {
                rec.active = true;
                self.log_prob += rec.log_density;
                self.order.push(VarId(ix));
            }
        }
        self.cursor = self.order.len();
    }

    /// Drops every record the last pass did not reach.
    fn prune(&mut self) {
        self.order.truncate(self.cursor);
        for (ix, slot) in self.slots.iter_mut().enumerate() {
            if !slot.as_ref().map_or(false, |r| !r.active) {
                continue;
            }
            if let Some(rec) = slot.take() {
                self.removed_log_prob += rec.log_density;
                // a stale record may share its address with its replacement
                if self.vars.get(&rec.address) == Some(&VarId(ix)) {
                    self.vars.remove(&rec.address);
                }
                self.free.push(VarId(ix));
                self.removed.push(rec);
            }
        }
    }
}
