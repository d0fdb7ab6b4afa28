use itertools::*;

/// The value a random choice (or a whole computation) takes.
#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    Bool(bool),
    Int(u64),
    Float(f64),
    Vec(Vec<Val>),
}
impl Val {
    pub fn pretty(&self) -> String {
        match self {
            Val::Bool(x) => format!("{}", x),
            Val::Int(x) => format!("{}", x),
            Val::Float(x) => format!("{}", x),
            Val::Vec(xs) => format!("[{}]", xs.iter().map(Self::pretty).join(", ")),
        }
    }
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Val::Bool(b) => Some(*b),
            _ => None,
        }
    }
    pub fn as_int(&self) -> Option<u64> {
        match self {
            Val::Int(i) => Some(*i),
            _ => None,
        }
    }
    /// Integers widen to floats; booleans do not.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Val::Float(x) => Some(*x),
            Val::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl From<bool> for Val {
    fn from(b: bool) -> Self {
        Val::Bool(b)
    }
}
impl From<u64> for Val {
    fn from(i: u64) -> Self {
        Val::Int(i)
    }
}
impl From<f64> for Val {
    fn from(x: f64) -> Self {
        Val::Float(x)
    }
}
impl From<Vec<Val>> for Val {
    fn from(xs: Vec<Val>) -> Self {
        Val::Vec(xs)
    }
}
