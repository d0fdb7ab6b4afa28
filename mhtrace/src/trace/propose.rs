use super::Trace;
use crate::data::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// A candidate trace together with the proposal log-probabilities an MH(G)
/// acceptance ratio needs. Accepting or rejecting it is up to the caller.
#[derive(Debug)]
pub struct Proposal {
    pub trace: Trace,
    pub fwd_log_prob: f64,
    pub rvs_log_prob: f64,
}

impl Trace {
    /// Perturbs the free variable at `address` with its ERP's proposal kernel in a
    /// copy of this trace and re-runs the computation on the copy.
    ///
    /// Variables created by the re-run count towards the forward probability and
    /// variables it removed count towards the reverse one. Only this trace's
    /// generator advances; its records are left untouched.
    pub fn propose_change(&mut self, address: &str, structure_is_fixed: bool) -> Result<Proposal> {
        match self.record(address) {
            None => return unknown_address(&Address::from(address)),
            Some(r) if r.conditioned => return observed(&r.address),
            Some(_) => {}
        }
        let mut next = self.deep_copy();
        next.rng = StdRng::seed_from_u64(self.rng.gen());

        let id = next.id_of(address)?;
        let rec = match next.slots.get_mut(id.0).and_then(Option::as_mut) {
            Some(r) => r,
            None => return unknown_address(&Address::from(address)),
        };
        let erp = rec.erp;
        let proposed = erp.propose(&mut next.rng, &rec.val, &rec.params)?;
        let mut fwd = erp.log_proposal_density(&rec.val, &proposed, &rec.params)?;
        let mut rvs = erp.log_proposal_density(&proposed, &rec.val, &rec.params)?;
        debug!(
            "propose {}: {} -> {}",
            address,
            rec.val.pretty(),
            proposed.pretty()
        );
        rec.log_density = erp.log_density(&proposed, &rec.params)?;
        rec.val = proposed;

        next.trace_update(structure_is_fixed)?;
        fwd += next.new_log_prob;
        rvs += next.removed_log_prob;
        Ok(Proposal {
            trace: next,
            fwd_log_prob: fwd,
            rvs_log_prob: rvs,
        })
    }
}
