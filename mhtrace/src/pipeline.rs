use crate::context::Ctx;
use crate::data::*;
use crate::init::Strategy;
use crate::trace::Trace;
use rand::rngs::StdRng;

/// Budgets a trace carries into every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// call-site nesting allowed while enumerating
    pub max_depth: usize,
    /// random choices allowed in one enumerating pass
    pub max_choices: usize,
    /// passes an initialization may spend; `None` never gives up
    pub max_attempts: Option<usize>,
}
impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_depth: 256,
            max_choices: 10_000,
            max_attempts: None,
        }
    }
}

#[derive(Default, Debug, Clone)]
pub struct Options {
    pub seed: Option<StdRng>,
    pub limits: Limits,
}
impl Options {
    pub fn rng(&self) -> StdRng {
        match &self.seed {
            None => rand::SeedableRng::from_entropy(),
            Some(s) => s.clone(),
        }
    }
    pub fn stoch() -> Self {
        Default::default()
    }
    pub fn seed(s: u64) -> Self {
        Self {
            seed: Some(rand::SeedableRng::seed_from_u64(s)),
            ..Default::default()
        }
    }
    pub fn new(seed: Option<u64>, max_attempts: Option<usize>) -> Self {
        Self {
            seed: seed.map(|s| rand::SeedableRng::seed_from_u64(s)),
            limits: Limits {
                max_attempts,
                ..Default::default()
            },
        }
    }
    pub fn max_attempts(mut self, n: usize) -> Self {
        self.limits.max_attempts = Some(n);
        self
    }
    pub fn budget(mut self, max_depth: usize, max_choices: usize) -> Self {
        self.limits.max_depth = max_depth;
        self.limits.max_choices = max_choices;
        self
    }
    pub fn limits(&self) -> Limits {
        self.limits
    }
}

pub fn create_trace<F>(computation: F, strategy: Strategy) -> Result<Trace>
where
    F: Fn(&mut Ctx<'_>) -> Result<Val> + 'static,
{
    create_trace_with(computation, strategy, &Options::stoch())
}

pub fn create_trace_with<F>(computation: F, strategy: Strategy, opts: &Options) -> Result<Trace>
where
    F: Fn(&mut Ctx<'_>) -> Result<Val> + 'static,
{
    Trace::new(computation, &strategy, opts)
}
