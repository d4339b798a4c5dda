use std::sync::Mutex;

/// Whether a refresh cycle is currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleState {
    #[default]
    Idle,
    Refreshing,
}

/// Admits at most one refresh cycle at a time
#[derive(Debug, Default)]
pub struct SingleFlight {
    state: Mutex<CycleState>,
}

/// Held for the duration of a cycle; dropping it returns the guard to `Idle`,
/// including when the cycle unwinds
#[derive(Debug)]
pub struct FlightPermit<'a> {
    guard: &'a SingleFlight,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CycleState {
        match self.state.lock() {
            Ok(state) => *state,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Move `Idle -> Refreshing`, or `None` if a cycle is already running
    pub fn try_begin(&self) -> Option<FlightPermit<'_>> {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        match *state {
            CycleState::Refreshing => None,
            CycleState::Idle => {
                *state = CycleState::Refreshing;
                Some(FlightPermit { guard: self })
            }
        }
    }
}

impl Drop for FlightPermit<'_> {
    fn drop(&mut self) {
        let mut state = match self.guard.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        *state = CycleState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_is_refused_until_permit_drops() {
        let flight = SingleFlight::new();
        assert_eq!(flight.state(), CycleState::Idle);

        let permit = flight.try_begin().expect("first begin");
        assert_eq!(flight.state(), CycleState::Refreshing);
        assert!(flight.try_begin().is_none());

        drop(permit);
        assert_eq!(flight.state(), CycleState::Idle);
        assert!(flight.try_begin().is_some());
    }

    #[test]
    fn permit_released_on_panic() {
        let flight = SingleFlight::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _permit = flight.try_begin().expect("begin");
            panic!("cycle blew up");
        }));
        assert!(result.is_err());
        assert_eq!(flight.state(), CycleState::Idle);
    }
}
