use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

/// Tracks which store operations are currently running.
#[derive(Debug, Clone, Default)]
pub struct SingleFlight {
    running: Arc<Mutex<HashSet<&'static str>>>,
}

/// Releases its operation name when dropped.
#[derive(Debug)]
pub struct FlightGuard {
    running: Arc<Mutex<HashSet<&'static str>>>,
    operation: &'static str,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` if `operation` is already in flight.
    pub fn try_begin(&self, operation: &'static str) -> Option<FlightGuard> {
        let mut running = self.running.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !running.insert(operation) {
            return None;
        }

        Some(FlightGuard { running: self.running.clone(), operation })
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.running.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).remove(self.operation);
    }
}
