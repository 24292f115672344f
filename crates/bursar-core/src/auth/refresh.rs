//! Refresh coordination. At most one token refresh runs at a time; tasks
//! that hit a 401 while one is in flight queue on the gate and reuse its
//! outcome instead of issuing their own.

use tokio::sync::{Mutex, MutexGuard};

/// Observable state of the refresh machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    /// No refresh in flight.
    Idle,
    /// A refresh request is on the wire.
    Refreshing,
    /// The last refresh failed and ended the session.
    Failed,
}

/// Serializes refresh attempts. The mutex's waiter queue is the pending
/// request queue: tasks blocked in `acquire` resume one at a time once the
/// in-flight refresh settles, then decide via the session epoch whether the
/// work is already done.
pub struct RefreshGate {
    lock: Mutex<()>,
    phase: parking_lot::Mutex<RefreshPhase>,
}

impl RefreshGate {
    pub fn new() -> Self {
        Self {
            lock: Mutex::new(()),
            phase: parking_lot::Mutex::new(RefreshPhase::Idle),
        }
    }

    /// Wait for exclusive refresh rights. Holding the guard means no other
    /// task is refreshing.
    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }

    pub fn phase(&self) -> RefreshPhase {
        *self.phase.lock()
    }

    pub fn set_phase(&self, phase: RefreshPhase) {
        *self.phase.lock() = phase;
    }
}

impl Default for RefreshGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_gate_serializes_holders() {
        let gate = Arc::new(RefreshGate::new());
        let guard = gate.acquire().await;

        let contender = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move {
                let _guard = gate.acquire().await;
            })
        };

        // The contender cannot finish while the guard is held.
        tokio::task::yield_now().await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.expect("contender completes");
    }

    #[test]
    fn test_phase_transitions() {
        let gate = RefreshGate::new();
        assert_eq!(gate.phase(), RefreshPhase::Idle);

        gate.set_phase(RefreshPhase::Refreshing);
        assert_eq!(gate.phase(), RefreshPhase::Refreshing);

        gate.set_phase(RefreshPhase::Failed);
        assert_eq!(gate.phase(), RefreshPhase::Failed);
    }
}
