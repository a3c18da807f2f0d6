//! Thread-safe handle to the single device instance.
//!
//! Every request handler, the monitor, and any front panel go through one
//! `DeviceService`; each call holds the lock for the whole operation so
//! readers never observe a half-applied action.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use disinfect_traits::Clock;
use serde_json::Value;

use crate::action::Action;
use crate::catalog::ProgramCatalog;
use crate::device::{DeviceSnapshot, DeviceState, TickOutcome};
use crate::error::DeviceError;

#[derive(Clone)]
pub struct DeviceService {
    state: Arc<Mutex<DeviceState>>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl std::fmt::Debug for DeviceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceService").finish_non_exhaustive()
    }
}

impl DeviceService {
    pub fn new<C: Clock + Send + Sync + 'static>(state: DeviceState, clock: C) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            clock: Arc::new(clock),
        }
    }

    // A panic inside an operation cannot leave the record torn: operations
    // validate before they mutate. Keep serving after a poisoned lock.
    fn lock(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn apply(&self, action: Action) -> Result<(), DeviceError> {
        let name = action.name();
        let now = self.clock.now();
        let res = self.lock().apply(action, now);
        match &res {
            Ok(()) => tracing::debug!(action = name, "action applied"),
            Err(e) => tracing::info!(action = name, kind = e.kind(), error = %e, "action rejected"),
        }
        res
    }

    /// Decode and apply a JSON action body.
    pub fn apply_json(&self, body: &Value) -> Result<(), DeviceError> {
        self.apply(Action::from_json(body)?)
    }

    pub fn snapshot(&self) -> DeviceSnapshot {
        let now = self.clock.now();
        self.lock().snapshot(now)
    }

    pub fn tick(&self) -> TickOutcome {
        let now = self.clock.now();
        self.lock().tick(now)
    }

    pub fn catalog(&self) -> ProgramCatalog {
        self.lock().catalog().clone()
    }

    /// Run `f` against the locked state. For front panels that need several
    /// reads to be consistent with each other.
    pub fn with_state<R>(&self, f: impl FnOnce(&DeviceState) -> R) -> R {
        f(&self.lock())
    }
}
