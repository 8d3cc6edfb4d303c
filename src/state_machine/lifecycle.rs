//! Pure model of a responder's endpoint lifecycle.
//!
//! ```text
//! Created --Bind--> Listening --Stop--> ShuttingDown --Terminate--> Stopped
//!    |                                                                ^
//!    +----------------------------Stop / Terminate--------------------+
//! ```
//!
//! Calls are admitted only while `Listening`. `Stopped` is terminal.

use std::collections::VecDeque;
use std::fmt;

use super::StateMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Created,
    Listening,
    ShuttingDown,
    Stopped,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Created => "created",
            Phase::Listening => "listening",
            Phase::ShuttingDown => "shutting_down",
            Phase::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleInput {
    /// The listening endpoint is bound.
    Bind,
    /// An external stop signal arrived.
    Stop,
    /// A call wants to be handled.
    BeginCall,
    /// An admitted call finished.
    EndCall,
    /// The server is gone, either drained or forcibly terminated.
    Terminate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOutput {
    PhaseChanged { from: Phase, to: Phase },
    Admitted,
    Rejected,
    /// The last in-flight call finished while shutting down.
    Drained,
}

#[derive(Debug)]
pub struct LifecycleMachine {
    phase: Phase,
    in_flight: usize,
    pending: VecDeque<LifecycleOutput>,
}

impl LifecycleMachine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Created,
            in_flight: 0,
            pending: VecDeque::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn transition(&mut self, to: Phase) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        self.pending.push_back(LifecycleOutput::PhaseChanged { from, to });
    }

    fn bind(&mut self) {
        if self.phase == Phase::Created {
            self.transition(Phase::Listening);
        }
    }

    fn stop(&mut self) {
        match self.phase {
            Phase::Created => self.transition(Phase::Stopped),
            Phase::Listening => {
                self.transition(Phase::ShuttingDown);
                if self.in_flight == 0 {
                    self.pending.push_back(LifecycleOutput::Drained);
                }
            }
            Phase::ShuttingDown | Phase::Stopped => {}
        }
    }

    fn begin_call(&mut self) {
        if self.phase == Phase::Listening {
            self.in_flight += 1;
            self.pending.push_back(LifecycleOutput::Admitted);
        } else {
            self.pending.push_back(LifecycleOutput::Rejected);
        }
    }

    fn end_call(&mut self) {
        let Some(remaining) = self.in_flight.checked_sub(1) else {
            return;
        };
        self.in_flight = remaining;
        if remaining == 0 && self.phase == Phase::ShuttingDown {
            self.pending.push_back(LifecycleOutput::Drained);
        }
    }

    fn terminate(&mut self) {
        self.transition(Phase::Stopped);
    }
}

impl Default for LifecycleMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine for LifecycleMachine {
    type Input = LifecycleInput;
    type Output = LifecycleOutput;

    fn process_input(&mut self, input: Self::Input) {
        match input {
            LifecycleInput::Bind => self.bind(),
            LifecycleInput::Stop => self.stop(),
            LifecycleInput::BeginCall => self.begin_call(),
            LifecycleInput::EndCall => self.end_call(),
            LifecycleInput::Terminate => self.terminate(),
        }
    }

    fn poll_output(&mut self) -> Option<Self::Output> {
        self.pending.pop_front()
    }
}
