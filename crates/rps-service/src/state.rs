//! Application state management.

use rps_core::{GameRegistry, RegistryConfig, RegistryError};
use rps_ledger::{Clock, ManualClock, MockLedger, SystemClock};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Every request goes through this lock, which totally orders operations
    registry: Arc<Mutex<GameRegistry>>,
    ledger: MockLedger,
    /// Present when running on simulated time
    manual_clock: Option<Arc<ManualClock>>,
    clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(config: RegistryConfig, simulated_clock: bool) -> Result<Self, RegistryError> {
        let ledger = MockLedger::new();
        let manual_clock = simulated_clock.then(|| Arc::new(ManualClock::starting_now()));
        let clock: Arc<dyn Clock> = match &manual_clock {
            Some(c) => c.clone() as Arc<dyn Clock>,
            None => Arc::new(SystemClock),
        };
        let registry = GameRegistry::new(config, Arc::new(ledger.clone()), clock.clone())?;

        Ok(Self {
            registry: Arc::new(Mutex::new(registry)),
            ledger,
            manual_clock,
            clock,
        })
    }

    /// Exclusive access to the registry
    pub fn registry(&self) -> MutexGuard<'_, GameRegistry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ledger(&self) -> &MockLedger {
        &self.ledger
    }

    /// Current time (real or simulated)
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    pub fn is_simulated(&self) -> bool {
        self.manual_clock.is_some()
    }

    /// Advance simulated time by seconds. `None` on a real clock.
    pub fn advance_time(&self, seconds: u64) -> Option<u64> {
        self.manual_clock.as_ref().map(|c| c.advance(seconds))
    }
}
