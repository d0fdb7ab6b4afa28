use crate::data::address::Address;
use crate::data::value::Val;
use std::fmt;

#[derive(Clone, PartialEq, Debug)]
pub enum TraceError {
    Reentrant(),
    UnknownAddress(Address),
    Observed(Address),
    Divergent { depth: usize, choices: usize },
    EnumerationExhausted { worlds: usize },
    AttemptsExhausted(usize),
    InvalidParams { erp: String, msg: String },
    TypeMismatch { erp: String, expected: String, got: String },
    Generic(String),
}
impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TraceError::*;
        match self {
            Reentrant() => write!(f, "a trace is already being populated on this thread"),
            UnknownAddress(a) => write!(f, "no variable at address {}", a),
            Observed(a) => write!(
                f,
                "variable at address {} is observed and cannot be proposed to",
                a
            ),
            Divergent { depth, choices } => write!(
                f,
                "enumeration diverged (call depth {}, {} random choices in one pass)",
                depth, choices
            ),
            EnumerationExhausted { worlds } => write!(
                f,
                "enumerated {} worlds without satisfying the conditions",
                worlds
            ),
            AttemptsExhausted(n) => write!(f, "gave up initializing after {} passes", n),
            InvalidParams { erp, msg } => write!(f, "{}: invalid parameters: {}", erp, msg),
            TypeMismatch { erp, expected, got } => {
                write!(f, "{}: expected a {} value, got {}", erp, expected, got)
            }
            Generic(s) => write!(f, "{}", s),
        }
    }
}
impl std::error::Error for TraceError {}

pub type Result<T> = core::result::Result<T, TraceError>;

pub fn generic<T>(s: &str) -> Result<T> {
    Err(TraceError::Generic(s.to_string()))
}
pub fn unknown_address<T>(a: &Address) -> Result<T> {
    Err(TraceError::UnknownAddress(a.clone()))
}
pub fn observed<T>(a: &Address) -> Result<T> {
    Err(TraceError::Observed(a.clone()))
}
pub fn invalid_params<T>(erp: &str, msg: &str) -> Result<T> {
    Err(TraceError::InvalidParams {
        erp: erp.to_string(),
        msg: msg.to_string(),
    })
}
pub fn type_mismatch<T>(erp: &str, expected: &str, got: &Val) -> Result<T> {
    Err(TraceError::TypeMismatch {
        erp: erp.to_string(),
        expected: expected.to_string(),
        got: got.pretty(),
    })
}
pub fn divergent<T>(depth: usize, choices: usize) -> Result<T> {
    Err(TraceError::Divergent { depth, choices })
}
