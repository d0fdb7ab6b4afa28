//! Call-site naming. A pass keeps a stack of qualified call-site paths and a
//! per-path invocation counter; together they name every random choice.
use crate::data::*;

/// A claimed call-site slot: the enclosing path and the invocation number there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Site<'a> {
    pub path: &'a str,
    pub count: usize,
}
impl Site<'_> {
    pub fn address(&self) -> Address {
        Address::at(self.path, self.count)
    }
}

#[derive(Debug, Clone)]
pub struct Addresser {
    stack: Vec<String>,
    counters: HashMap<String, usize>,
}

impl Default for Addresser {
    fn default() -> Self {
        Addresser {
            stack: vec![String::new()],
            counters: Default::default(),
        }
    }
}

impl Addresser {
    pub fn new() -> Self {
        Default::default()
    }
    pub fn enter(&mut self, id: &str) {
        let path = format!("{}:{}", self.path(), id);
        self.stack.push(path);
    }
    pub fn leave(&mut self, id: &str) {
        debug_assert!(
            self.path().ends_with(id),
            "leaving {} from {}",
            id,
            self.path()
        );
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }
    /// Number of call sites currently entered.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }
    pub fn path(&self) -> &str {
        self.stack.last().map(String::as_str).unwrap_or("")
    }
    /// Claims the next invocation number at the current path.
    fn next_count(&mut self) -> usize {
        let path = self.stack.last().map(String::as_str).unwrap_or("");
        match self.counters.get_mut(path) {
            Some(c) => {
                let n = *c;
                *c += 1;
                n
            }
            None => {
                self.counters.insert(path.to_string(), 1);
                0
            }
        }
    }
    /// Names the next choice at the current path. The address itself is only
    /// built on demand.
    pub fn current_address(&mut self) -> Site<'_> {
        let count = self.next_count();
        Site {
            path: self.path(),
            count,
        }
    }
    pub fn reset(&mut self) {
        self.stack.truncate(1);
        self.counters.clear();
    }
}
