use crate::data::address::Address;
use crate::data::value::Val;
use crate::erp::{same_erp, ErpRef};
use std::fmt;

/// Stable arena index of a record inside one trace.
#[derive(Clone, Copy, Eq, Hash, PartialEq, Debug)]
pub struct VarId(pub(crate) usize);

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One random choice as persisted in a trace.
#[derive(Debug, Clone)]
pub struct Record {
    pub address: Address,
    pub erp: ErpRef,
    pub params: Vec<f64>,
    pub val: Val,
    pub log_density: f64,
    pub structural: bool,
    pub conditioned: bool,
    pub(crate) active: bool,
}

impl Record {
    pub fn new(
        address: Address,
        erp: ErpRef,
        params: &[f64],
        val: Val,
        log_density: f64,
        structural: bool,
        conditioned: bool,
    ) -> Record {
        Record {
            address,
            erp,
            params: params.to_vec(),
            val,
            log_density,
            structural,
            conditioned,
            active: true,
        }
    }
    /// A stored record is only reused for a choice drawn from the same ERP with
    /// the same structural classification.
    pub fn matches(&self, erp: ErpRef, structural: bool) -> bool {
        same_erp(self.erp, erp) && self.structural == structural
    }
    pub fn is_active(&self) -> bool {
        self.active
    }
}
