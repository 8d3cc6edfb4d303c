use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, info};

use crate::state_machine::StateMachine;
use crate::state_machine::lifecycle::{LifecycleInput, LifecycleMachine, LifecycleOutput, Phase};

/// Shared driver for a [`LifecycleMachine`].
///
/// Serializes inputs from the serve loop, the stop path and every in-flight
/// call, and publishes the current [`Phase`] so waiters can be woken.
pub struct Lifecycle {
    machine: Mutex<LifecycleMachine>,
    phase_tx: watch::Sender<Phase>,
}

impl std::fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lifecycle")
            .field("phase", &self.phase())
            .finish()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        let (phase_tx, _) = watch::channel(Phase::Created);
        Self {
            machine: Mutex::new(LifecycleMachine::new()),
            phase_tx,
        }
    }

    pub fn phase(&self) -> Phase {
        *self.phase_tx.borrow()
    }

    pub fn in_flight(&self) -> usize {
        self.machine
            .lock()
            .expect("lifecycle lock poisoned")
            .in_flight()
    }

    pub fn bind(&self) {
        self.apply(LifecycleInput::Bind);
    }

    pub fn request_stop(&self) {
        self.apply(LifecycleInput::Stop);
    }

    pub fn terminate(&self) {
        self.apply(LifecycleInput::Terminate);
    }

    /// Register a new call. Returns `None` unless the endpoint is listening.
    /// The call counts as in flight until the guard is dropped.
    pub fn try_admit(self: &Arc<Self>) -> Option<CallGuard> {
        self.apply(LifecycleInput::BeginCall).then(|| CallGuard {
            lifecycle: Arc::clone(self),
        })
    }

    /// Resolve once the lifecycle reaches `phase`.
    pub async fn wait_for(&self, phase: Phase) {
        let mut rx = self.phase_tx.subscribe();
        // The sender lives as long as `self`, so this cannot close early.
        let _ = rx.wait_for(|current| *current == phase).await;
    }

    /// Feed `input` to the machine and act on its outputs. Returns whether a
    /// call was admitted.
    fn apply(&self, input: LifecycleInput) -> bool {
        let mut machine = self.machine.lock().expect("lifecycle lock poisoned");
        machine.process_input(input);

        let mut admitted = false;
        while let Some(output) = machine.poll_output() {
            match output {
                LifecycleOutput::PhaseChanged { from, to } => {
                    info!(%from, %to, "Responder phase changed");
                    self.phase_tx.send_replace(to);
                }
                LifecycleOutput::Admitted => admitted = true,
                LifecycleOutput::Rejected => {}
                LifecycleOutput::Drained => debug!("In-flight calls drained"),
            }
        }
        admitted
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Marks one admitted call as in flight.
#[derive(Debug)]
pub struct CallGuard {
    lifecycle: Arc<Lifecycle>,
}

impl Drop for CallGuard {
    fn drop(&mut self) {
        self.lifecycle.apply(LifecycleInput::EndCall);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_tracks_in_flight_calls() {
        let lifecycle = Arc::new(Lifecycle::new());
        lifecycle.bind();

        let first = lifecycle.try_admit().expect("listening admits calls");
        let second = lifecycle.try_admit().expect("listening admits calls");
        assert_eq!(lifecycle.in_flight(), 2);

        drop(first);
        assert_eq!(lifecycle.in_flight(), 1);
        drop(second);
        assert_eq!(lifecycle.in_flight(), 0);
    }

    #[test]
    fn test_no_admission_outside_listening() {
        let lifecycle = Arc::new(Lifecycle::new());
        assert!(lifecycle.try_admit().is_none());

        lifecycle.bind();
        lifecycle.request_stop();
        assert_eq!(lifecycle.phase(), Phase::ShuttingDown);
        assert!(lifecycle.try_admit().is_none());
    }

    #[tokio::test]
    async fn test_wait_for_wakes_on_transition() {
        let lifecycle = Arc::new(Lifecycle::new());
        lifecycle.bind();

        let waiter = {
            let lifecycle = Arc::clone(&lifecycle);
            tokio::spawn(async move { lifecycle.wait_for(Phase::Stopped).await })
        };

        lifecycle.request_stop();
        lifecycle.terminate();

        tokio::time::timeout(std::time::Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
        assert_eq!(lifecycle.phase(), Phase::Stopped);
    }
}
