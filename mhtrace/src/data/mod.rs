pub mod address;
pub mod errors;
pub mod record;
pub mod value;
pub use crate::data::address::*;
pub use crate::data::errors::TraceError::*;
pub use crate::data::errors::*;
pub use crate::data::record::*;
pub use crate::data::value::*;

// reexports and aliases
pub use rustc_hash::{FxHashMap, FxHashSet};

pub type HashMap<K, V> = FxHashMap<K, V>;
pub type HashSet<V> = FxHashSet<V>;
