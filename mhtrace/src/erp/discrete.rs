use crate::data::*;
use crate::erp::*;
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use statrs::distribution::Discrete as _;

/// Bernoulli choice over `{false, true}`. Params: `[p]`.
#[derive(Debug, Clone, Copy)]
pub struct Flip;
pub static FLIP: Flip = Flip;

impl Flip {
    fn dist(&self, params: &[f64]) -> Result<statrs::distribution::Bernoulli> {
        arity(self.name(), params, 1)?;
        stats(self.name(), statrs::distribution::Bernoulli::new(params[0]))
    }
}
impl Erp for Flip {
    fn name(&self) -> &'static str {
        "flip"
    }
    fn sample(&self, rng: &mut StdRng, params: &[f64]) -> Result<Val> {
        let dist = self.dist(params)?;
        Ok(Val::Bool(dist.sample(rng) == 1.0))
    }
    fn log_density(&self, val: &Val, params: &[f64]) -> Result<f64> {
        let b = bool_of(self.name(), val)?;
        Ok(self.dist(params)?.ln_pmf(b as u64))
    }
    /// Always proposes the other outcome.
    fn propose(&self, _rng: &mut StdRng, val: &Val, _params: &[f64]) -> Result<Val> {
        Ok(Val::Bool(!bool_of(self.name(), val)?))
    }
    fn log_proposal_density(&self, from: &Val, to: &Val, _params: &[f64]) -> Result<f64> {
        if bool_of(self.name(), from)? != bool_of(self.name(), to)? {
            Ok(0.0)
        } else {
            Ok(f64::NEG_INFINITY)
        }
    }
    fn support(&self) -> Support<'_> {
        Support::Enumerable(self)
    }
}
impl Enumerable for Flip {
    fn next_in_domain(&self, val: Option<&Val>, _params: &[f64]) -> Result<Option<Val>> {
        match val {
            None => Ok(Some(Val::Bool(false))),
            Some(v) => match bool_of(self.name(), v)? {
                false => Ok(Some(Val::Bool(true))),
                true => Ok(None),
            },
        }
    }
}

/// Draw of an index `0..k` with the given (unnormalized) masses. Params: `ps`.
#[derive(Debug, Clone, Copy)]
pub struct Categorical;
pub static CATEGORICAL: Categorical = Categorical;

impl Categorical {
    fn dist(&self, params: &[f64]) -> Result<statrs::distribution::Categorical> {
        if params.is_empty() {
            return invalid_params(self.name(), "no outcomes");
        }
        stats(self.name(), statrs::distribution::Categorical::new(params))
    }
}
impl Erp for Categorical {
    fn name(&self) -> &'static str {
        "categorical"
    }
    fn sample(&self, rng: &mut StdRng, params: &[f64]) -> Result<Val> {
        let dist = self.dist(params)?;
        Ok(Val::Int(dist.sample(rng) as u64))
    }
    fn log_density(&self, val: &Val, params: &[f64]) -> Result<f64> {
        let i = int_of(self.name(), val)?;
        Ok(self.dist(params)?.ln_pmf(i))
    }
    fn support(&self) -> Support<'_> {
        Support::Enumerable(self)
    }
}
impl Enumerable for Categorical {
    fn next_in_domain(&self, val: Option<&Val>, params: &[f64]) -> Result<Option<Val>> {
        let next = match val {
            None => 0,
            Some(v) => int_of(self.name(), v)? + 1,
        };
        Ok(((next as usize) < params.len()).then_some(Val::Int(next)))
    }
}

/// Number of successes in `n` trials. Params: `[p, n]`.
#[derive(Debug, Clone, Copy)]
pub struct Binomial;
pub static BINOMIAL: Binomial = Binomial;

impl Binomial {
    fn trials(&self, params: &[f64]) -> Result<u64> {
        arity(self.name(), params, 2)?;
        let n = params[1];
        if n < 0.0 || n.fract() != 0.0 {
            return invalid_params(self.name(), &format!("trial count {} is not a count", n));
        }
        Ok(n as u64)
    }
    fn dist(&self, params: &[f64]) -> Result<statrs::distribution::Binomial> {
        let n = self.trials(params)?;
        stats(self.name(), statrs::distribution::Binomial::new(params[0], n))
    }
}
impl Erp for Binomial {
    fn name(&self) -> &'static str {
        "binomial"
    }
    fn sample(&self, rng: &mut StdRng, params: &[f64]) -> Result<Val> {
        let dist = self.dist(params)?;
        Ok(Val::Int(dist.sample(rng) as u64))
    }
    fn log_density(&self, val: &Val, params: &[f64]) -> Result<f64> {
        let k = int_of(self.name(), val)?;
        Ok(self.dist(params)?.ln_pmf(k))
    }
    fn support(&self) -> Support<'_> {
        Support::Enumerable(self)
    }
}
impl Enumerable for Binomial {
    fn next_in_domain(&self, val: Option<&Val>, params: &[f64]) -> Result<Option<Val>> {
        let n = self.trials(params)?;
        let next = match val {
            None => 0,
            Some(v) => int_of(self.name(), v)? + 1,
        };
        Ok((next <= n).then_some(Val::Int(next)))
    }
}

/// Poisson counts. Params: `[mu]`. The domain is unbounded, so it is not enumerable.
#[derive(Debug, Clone, Copy)]
pub struct Poisson;
pub static POISSON: Poisson = Poisson;

impl Poisson {
    fn dist(&self, params: &[f64]) -> Result<statrs::distribution::Poisson> {
        arity(self.name(), params, 1)?;
        stats(self.name(), statrs::distribution::Poisson::new(params[0]))
    }
}
impl Erp for Poisson {
    fn name(&self) -> &'static str {
        "poisson"
    }
    fn sample(&self, rng: &mut StdRng, params: &[f64]) -> Result<Val> {
        let dist = self.dist(params)?;
        Ok(Val::Int(dist.sample(rng) as u64))
    }
    fn log_density(&self, val: &Val, params: &[f64]) -> Result<f64> {
        let k = int_of(self.name(), val)?;
        Ok(self.dist(params)?.ln_pmf(k))
    }
    fn support(&self) -> Support<'_> {
        Support::Discrete
    }
}
