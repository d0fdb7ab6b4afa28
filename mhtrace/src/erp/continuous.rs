use crate::data::*;
use crate::erp::*;
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use statrs::distribution::Continuous as _;

/// Params: `[lo, hi]`.
#[derive(Debug, Clone, Copy)]
pub struct Uniform;
pub static UNIFORM: Uniform = Uniform;

impl Uniform {
    fn dist(&self, params: &[f64]) -> Result<statrs::distribution::Uniform> {
        arity(self.name(), params, 2)?;
        stats(
            self.name(),
            statrs::distribution::Uniform::new(params[0], params[1]),
        )
    }
}
impl Erp for Uniform {
    fn name(&self) -> &'static str {
        "uniform"
    }
    fn sample(&self, rng: &mut StdRng, params: &[f64]) -> Result<Val> {
        let dist = self.dist(params)?;
        Ok(Val::Float(dist.sample(rng)))
    }
    fn log_density(&self, val: &Val, params: &[f64]) -> Result<f64> {
        let x = float_of(self.name(), val)?;
        Ok(self.dist(params)?.ln_pdf(x))
    }
    fn support(&self) -> Support<'_> {
        Support::Continuous
    }
}

/// Params: `[mu, sigma]`. Proposals are a symmetric random walk of width `sigma`.
#[derive(Debug, Clone, Copy)]
pub struct Gaussian;
pub static GAUSSIAN: Gaussian = Gaussian;

impl Gaussian {
    fn dist(&self, params: &[f64]) -> Result<statrs::distribution::Normal> {
        arity(self.name(), params, 2)?;
        stats(
            self.name(),
            statrs::distribution::Normal::new(params[0], params[1]),
        )
    }
    fn kernel(&self, center: f64, params: &[f64]) -> Result<statrs::distribution::Normal> {
        arity(self.name(), params, 2)?;
        stats(
            self.name(),
            statrs::distribution::Normal::new(center, params[1]),
        )
    }
}
impl Erp for Gaussian {
    fn name(&self) -> &'static str {
        "gaussian"
    }
    fn sample(&self, rng: &mut StdRng, params: &[f64]) -> Result<Val> {
        let dist = self.dist(params)?;
        Ok(Val::Float(dist.sample(rng)))
    }
    fn log_density(&self, val: &Val, params: &[f64]) -> Result<f64> {
        let x = float_of(self.name(), val)?;
        Ok(self.dist(params)?.ln_pdf(x))
    }
    fn propose(&self, rng: &mut StdRng, val: &Val, params: &[f64]) -> Result<Val> {
        let x = float_of(self.name(), val)?;
        Ok(Val::Float(self.kernel(x, params)?.sample(rng)))
    }
    fn log_proposal_density(&self, from: &Val, to: &Val, params: &[f64]) -> Result<f64> {
        let (x, y) = (float_of(self.name(), from)?, float_of(self.name(), to)?);
        Ok(self.kernel(x, params)?.ln_pdf(y))
    }
    fn support(&self) -> Support<'_> {
        Support::Continuous
    }
}

/// Params: `[shape, scale]`.
#[derive(Debug, Clone, Copy)]
pub struct Gamma;
pub static GAMMA: Gamma = Gamma;

impl Gamma {
    fn dist(&self, params: &[f64]) -> Result<statrs::distribution::Gamma> {
        arity(self.name(), params, 2)?;
        if params[1] <= 0.0 {
            return invalid_params(self.name(), "scale must be positive");
        }
        // statrs is parametrized by rate
        stats(
            self.name(),
            statrs::distribution::Gamma::new(params[0], 1.0 / params[1]),
        )
    }
}
impl Erp for Gamma {
    fn name(&self) -> &'static str {
        "gamma"
    }
    fn sample(&self, rng: &mut StdRng, params: &[f64]) -> Result<Val> {
        let dist = self.dist(params)?;
        Ok(Val::Float(dist.sample(rng)))
    }
    fn log_density(&self, val: &Val, params: &[f64]) -> Result<f64> {
        let x = float_of(self.name(), val)?;
        Ok(self.dist(params)?.ln_pdf(x))
    }
    fn support(&self) -> Support<'_> {
        Support::Continuous
    }
}

/// Params: `[a, b]`.
#[derive(Debug, Clone, Copy)]
pub struct Beta;
pub static BETA: Beta = Beta;

impl Beta {
    fn dist(&self, params: &[f64]) -> Result<statrs::distribution::Beta> {
        arity(self.name(), params, 2)?;
        stats(
            self.name(),
            statrs::distribution::Beta::new(params[0], params[1]),
        )
    }
}
impl Erp for Beta {
    fn name(&self) -> &'static str {
        "beta"
    }
    fn sample(&self, rng: &mut StdRng, params: &[f64]) -> Result<Val> {
        let dist = self.dist(params)?;
        Ok(Val::Float(dist.sample(rng)))
    }
    fn log_density(&self, val: &Val, params: &[f64]) -> Result<f64> {
        let x = float_of(self.name(), val)?;
        Ok(self.dist(params)?.ln_pdf(x))
    }
    fn support(&self) -> Support<'_> {
        Support::Continuous
    }
}
