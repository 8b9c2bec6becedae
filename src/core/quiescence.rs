//! Termination and wake predicates.
//!
//! Both are pure functions of the ledger and the pool and must be evaluated while
//! holding the run lock, otherwise a caller could observe supply consumed for a
//! party that has not been assigned yet.

use crate::core::instance::InstancePool;
use crate::core::ledger::SupplyLedger;

/// No party is inside an instance and no further party can be formed.
///
/// Supply only shrinks, so once this holds it holds for the rest of the run.
#[must_use]
pub fn is_quiescent(ledger: &SupplyLedger, pool: &InstancePool) -> bool {
    pool.active_groups() == 0 && !ledger.can_form()
}

/// A party can be formed and there is a free instance to put it in.
#[must_use]
pub fn can_dispatch(ledger: &SupplyLedger, pool: &InstancePool) -> bool {
    ledger.can_form() && pool.find_free().is_some()
}

/// Whether the scheduler has anything to do after a wake.
///
/// Nothing happens until the run is marked ready; after that the scheduler
/// proceeds when it can dispatch or when it should exit.
#[must_use]
pub fn scheduler_should_wake(ready: bool, ledger: &SupplyLedger, pool: &InstancePool) -> bool {
    ready && (can_dispatch(ledger, pool) || is_quiescent(ledger, pool))
}
