use super::Trace;
use crate::addressing::{Addresser, Site};
use crate::data::*;
use crate::erp::{ErpRef, Support};
use crate::registry;
use tracing::trace;

impl Trace {
    /// Returns the value of the next random choice of the running pass, reusing
    /// the stored record when there is one and creating it otherwise.
    pub(crate) fn lookup(
        &mut self,
        addresser: &mut Addresser,
        erp: ErpRef,
        params: &[f64],
        structural: bool,
        conditioned: Option<Val>,
    ) -> Result<Val> {
        if registry::enumerating() && self.cursor >= self.limits.max_choices {
            return divergent(addresser.depth(), self.cursor);
        }
        let site = addresser.current_address();

        let id = match self.positional(erp, structural, site) {
            Some(id) => {
                self.refresh(id, params, conditioned)?;
                id
            }
            None => {
                let address = site.address();
                let id = match self.by_address(&address, erp, structural) {
                    Some(id) => {
                        self.refresh(id, params, conditioned)?;
                        id
                    }
                    None => self.create(address, erp, params, structural, conditioned)?,
                };
                self.order.push(id);
                id
            }
        };

        self.cursor += 1;
        let rec = self.slot_mut(id)?;
        rec.active = true;
        let (lp, val) = (rec.log_density, rec.val.clone());
        self.log_prob += lp;
        Ok(val)
    }

    /// Fast path: the record the previous pass visited at this position. Once a
    /// position turns out stale the rest of the old order is dropped, so every
    /// later choice of this pass goes through the address map.
    fn positional(&mut self, erp: ErpRef, structural: bool, site: Site<'_>) -> Option<VarId> {
        let id = *self.order.get(self.cursor)?;
        match self.slot(id) {
            Some(r) if r.matches(erp, structural) && r.address.is_at(site.path, site.count) => {
                Some(id)
            }
            _ => {
                trace!(position = self.cursor, "stale positional record");
                self.order.truncate(self.cursor);
                None
            }
        }
    }

    fn by_address(&self, address: &Address, erp: ErpRef, structural: bool) -> Option<VarId> {
        let id = *self.vars.get(address)?;
        match self.slot(id) {
            Some(r) if r.matches(erp, structural) => Some(id),
            Some(r) => {
                trace!(
                    "discarding {} ({} -> {}, structural {} -> {})",
                    address,
                    r.erp.name(),
                    erp.name(),
                    r.structural,
                    structural
                );
                None
            }
            None => None,
        }
    }

    /// Brings a reused record up to date with this pass's parameters and
    /// observation, rescoring it only if something changed.
    fn refresh(&mut self, id: VarId, params: &[f64], conditioned: Option<Val>) -> Result<()> {
        let rec = self.slot_mut(id)?;
        rec.conditioned = conditioned.is_some();
        let mut changed = false;
        if rec.params.as_slice() != params {
            rec.params = params.to_vec();
            changed = true;
        }
        if let Some(v) = conditioned {
            if v != rec.val {
                rec.val = v;
                changed = true;
            }
        }
        if changed {
            rec.log_density = rec.erp.log_density(&rec.val, &rec.params)?;
        }
        Ok(())
    }

    fn create(
        &mut self,
        address: Address,
        erp: ErpRef,
        params: &[f64],
        structural: bool,
        conditioned: Option<Val>,
    ) -> Result<VarId> {
        let is_conditioned = conditioned.is_some();
        let val = match (conditioned, erp.support()) {
            (Some(v), _) => v,
            (None, Support::Enumerable(dom)) if registry::enumerating() => {
                dom.first_in_domain(params)?
            }
            (None, _) => erp.sample(&mut self.rng, params)?,
        };
        let lp = erp.log_density(&val, params)?;
        self.new_log_prob += lp;
        trace!("new {} ~ {} = {} (lp {})", address, erp.name(), val.pretty(), lp);

        let rec = Record::new(
            address.clone(),
            erp,
            params,
            val,
            lp,
            structural,
            is_conditioned,
        );
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id.0] = Some(rec);
                id
            }
            None => {
                self.slots.push(Some(rec));
                VarId(self.slots.len() - 1)
            }
        };
        self.vars.insert(address, id);
        Ok(id)
    }
}
