use std::borrow::Borrow;
use std::fmt;

/// Structural name of a random choice: the enclosing call-site path followed by
/// the number of earlier choices made at that path during the same pass.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(String);

impl Address {
    pub fn at(path: &str, count: usize) -> Address {
        Address(format!("{}:{}", path, count))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    /// Compares against `path:count` without building the string.
    pub fn is_at(&self, path: &str, count: usize) -> bool {
        self.0
            .strip_prefix(path)
            .and_then(|rest| rest.strip_prefix(':'))
            .and_then(|n| n.parse::<usize>().ok())
            == Some(count)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl Borrow<str> for Address {
    fn borrow(&self) -> &str {
        &self.0
    }
}
impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Address(s.to_string())
    }
}
