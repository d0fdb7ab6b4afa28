//! Elementary random procedures: parametrized distribution families that the
//! trace draws, scores, perturbs and (sometimes) enumerates.
pub mod continuous;
pub mod discrete;
pub use continuous::*;
pub use discrete::*;

use crate::context::Ctx;
use crate::data::*;
use rand::rngs::StdRng;
use std::fmt;

/// What an ERP can do beyond sampling and scoring.
pub enum Support<'a> {
    Continuous,
    Discrete,
    Enumerable(&'a dyn Enumerable),
}

/// Deterministic walk over a finite domain.
pub trait Enumerable {
    /// `None` asks for the first element; a `None` result means `val` was the last.
    fn next_in_domain(&self, val: Option<&Val>, params: &[f64]) -> Result<Option<Val>>;

    fn first_in_domain(&self, params: &[f64]) -> Result<Val> {
        match self.next_in_domain(None, params)? {
            Some(v) => Ok(v),
            None => generic("enumerable domain is empty"),
        }
    }
}

pub trait Erp: fmt::Debug {
    /// Identity of the family. Records drawn from ERPs with different names are
    /// never reused for one another, and records drawn from ERPs that share a
    /// name are, so every implementation must return a name of its own.
    fn name(&self) -> &'static str;

    fn sample(&self, rng: &mut StdRng, params: &[f64]) -> Result<Val>;

    fn log_density(&self, val: &Val, params: &[f64]) -> Result<f64>;

    /// Proposal kernel. Defaults to an independent draw from the prior.
    fn propose(&self, rng: &mut StdRng, _val: &Val, params: &[f64]) -> Result<Val> {
        self.sample(rng, params)
    }

    fn log_proposal_density(&self, _from: &Val, to: &Val, params: &[f64]) -> Result<f64> {
        self.log_density(to, params)
    }

    fn support(&self) -> Support<'_>;
}

pub type ErpRef = &'static dyn Erp;

/// Compares by [`Erp::name`]; the built-in descriptors are zero-sized, so their
/// addresses say nothing.
pub fn same_erp(l: ErpRef, r: ErpRef) -> bool {
    l.name() == r.name()
}

pub(crate) fn arity(erp: &str, params: &[f64], n: usize) -> Result<()> {
    if params.len() == n {
        Ok(())
    } else {
        invalid_params(
            erp,
            &format!("expected {} parameters, got {}", n, params.len()),
        )
    }
}

pub(crate) fn stats<T, E: fmt::Display>(erp: &str, r: core::result::Result<T, E>) -> Result<T> {
    r.map_err(|e| TraceError::InvalidParams {
        erp: erp.to_string(),
        msg: e.to_string(),
    })
}

pub(crate) fn float_of(erp: &str, v: &Val) -> Result<f64> {
    match v.as_float() {
        Some(x) => Ok(x),
        None => type_mismatch(erp, "float", v),
    }
}
pub(crate) fn int_of(erp: &str, v: &Val) -> Result<u64> {
    match v.as_int() {
        Some(i) => Ok(i),
        None => type_mismatch(erp, "integer", v),
    }
}
pub(crate) fn bool_of(erp: &str, v: &Val) -> Result<bool> {
    match v.as_bool() {
        Some(b) => Ok(b),
        None => type_mismatch(erp, "boolean", v),
    }
}

// Program-facing shorthands. Each draws a non-structural choice; models whose
// control flow depends on the result should go through `Ctx::structural`.

pub fn flip(ctx: &mut Ctx<'_>, p: f64) -> Result<bool> {
    bool_of(FLIP.name(), &ctx.sample(&FLIP, &[p])?)
}
pub fn uniform(ctx: &mut Ctx<'_>, lo: f64, hi: f64) -> Result<f64> {
    float_of(UNIFORM.name(), &ctx.sample(&UNIFORM, &[lo, hi])?)
}
pub fn gaussian(ctx: &mut Ctx<'_>, mu: f64, sigma: f64) -> Result<f64> {
    float_of(GAUSSIAN.name(), &ctx.sample(&GAUSSIAN, &[mu, sigma])?)
}
pub fn gamma(ctx: &mut Ctx<'_>, shape: f64, scale: f64) -> Result<f64> {
    float_of(GAMMA.name(), &ctx.sample(&GAMMA, &[shape, scale])?)
}
pub fn beta(ctx: &mut Ctx<'_>, a: f64, b: f64) -> Result<f64> {
    float_of(BETA.name(), &ctx.sample(&BETA, &[a, b])?)
}
pub fn binomial(ctx: &mut Ctx<'_>, p: f64, n: u64) -> Result<u64> {
    int_of(BINOMIAL.name(), &ctx.sample(&BINOMIAL, &[p, n as f64])?)
}
pub fn poisson(ctx: &mut Ctx<'_>, mu: f64) -> Result<u64> {
    int_of(POISSON.name(), &ctx.sample(&POISSON, &[mu])?)
}
pub fn categorical(ctx: &mut Ctx<'_>, ps: &[f64]) -> Result<usize> {
    Ok(int_of(CATEGORICAL.name(), &ctx.sample(&CATEGORICAL, ps)?)? as usize)
}
pub fn multinomial_draw<T: Clone>(ctx: &mut Ctx<'_>, items: &[T], ps: &[f64]) -> Result<T> {
    if items.len() != ps.len() {
        return invalid_params(
            CATEGORICAL.name(),
            "items and probabilities differ in length",
        );
    }
    let ix = categorical(ctx, ps)?;
    match items.get(ix) {
        Some(x) => Ok(x.clone()),
        None => generic("categorical draw fell outside its items"),
    }
}
