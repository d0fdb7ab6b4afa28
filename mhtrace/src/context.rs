use crate::addressing::Addresser;
use crate::data::*;
use crate::erp::ErpRef;
use crate::registry;
use crate::trace::Trace;
use rand::rngs::StdRng;

enum Mode<'t> {
    Active(&'t mut Trace),
    Detached(&'t mut StdRng),
}

/// Handle through which a probabilistic program makes its random choices.
///
/// During a pass the handle routes every choice to the trace being populated.
/// A detached handle simply samples (or returns the observed value) and ignores
/// factors and conditions, so the same program code runs outside inference.
pub struct Ctx<'t> {
    mode: Mode<'t>,
    addresser: Addresser,
}

impl<'t> Ctx<'t> {
    pub(crate) fn active(trace: &'t mut Trace) -> Self {
        Ctx {
            mode: Mode::Active(trace),
            addresser: Addresser::new(),
        }
    }
    pub fn detached(rng: &'t mut StdRng) -> Self {
        Ctx {
            mode: Mode::Detached(rng),
            addresser: Addresser::new(),
        }
    }
    pub fn is_active(&self) -> bool {
        matches!(self.mode, Mode::Active(_))
    }
    pub fn addresser(&self) -> &Addresser {
        &self.addresser
    }

    pub fn enter(&mut self, id: &str) -> Result<()> {
        if let Mode::Active(trace) = &self.mode {
            let limits = trace.limits();
            if registry::enumerating() && self.addresser.depth() >= limits.max_depth {
                return divergent(self.addresser.depth(), trace.cursor());
            }
        }
        self.addresser.enter(id);
        Ok(())
    }
    pub fn leave(&mut self, id: &str) {
        self.addresser.leave(id)
    }
    /// Runs `f` under the call site `id`, leaving it again on every exit.
    pub fn call<T, F>(&mut self, id: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        self.enter(id)?;
        let r = f(self);
        self.leave(id);
        r
    }

    pub fn observe_choice(
        &mut self,
        erp: ErpRef,
        params: &[f64],
        structural: bool,
        conditioned: Option<Val>,
    ) -> Result<Val> {
        match &mut self.mode {
            Mode::Active(trace) => {
                trace.lookup(&mut self.addresser, erp, params, structural, conditioned)
            }
            Mode::Detached(rng) => match conditioned {
                Some(v) => Ok(v),
                None => erp.sample(&mut **rng, params),
            },
        }
    }
    pub fn sample(&mut self, erp: ErpRef, params: &[f64]) -> Result<Val> {
        self.observe_choice(erp, params, false, None)
    }
    /// A choice whose value decides which other choices exist.
    pub fn structural(&mut self, erp: ErpRef, params: &[f64]) -> Result<Val> {
        self.observe_choice(erp, params, true, None)
    }
    pub fn observe(&mut self, erp: ErpRef, params: &[f64], val: Val) -> Result<Val> {
        self.observe_choice(erp, params, false, Some(val))
    }

    pub fn factor(&mut self, log_weight: f64) {
        if let Mode::Active(trace) = &mut self.mode {
            trace.add_factor(log_weight)
        }
    }
    pub fn condition(&mut self, holds: bool) {
        if let Mode::Active(trace) = &mut self.mode {
            trace.condition_on(holds)
        }
    }
}
