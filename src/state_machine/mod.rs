pub mod lifecycle;

/// The [`StateMachine`] trait provides calling semantics and indicates the upholding of invariants
/// that guarantee deterministic behavior.
///
/// # Functionality
/// A state machine consumes [`Input`](StateMachine::Input) through
/// [`process_input`](StateMachine::process_input) and hands back whatever it produced through
/// [`poll_output`](StateMachine::poll_output). Both associated types are usually enums with one
/// variant per kind of input/output, so the implementor only writes the dispatch mapping while the
/// logic lives in its inherent impl.
///
/// # Invariants
/// A [`StateMachine`] must be pure in that its operation does not depend on any external behavior
/// of the broader system:
///
/// - **No interior mutability.** State changes only through `&mut self`.
/// - **No IO.** No sockets, files, or reads of the system clock. Time that matters to the logic
///   is passed in as input.
/// - **No concurrency or async.** The machine never spawns, awaits, or blocks.
///
/// This is what lets a runner wrap the machine in a plain mutex and drive it from any number of
/// tasks: every call returns promptly and two runs over the same inputs produce the same outputs.
///
/// # Side Effects
/// Logging is allowed as long as the logic never depends on its outcome.
///
/// # Example
/// ```ignore
/// pub struct Toggle {
///     on: bool,
///     pending: bool,
/// }
///
/// pub enum ToggleInput {
///     Flip,
/// }
///
/// pub enum ToggleOutput {
///     Changed(bool),
/// }
///
/// impl StateMachine for Toggle {
///     type Input = ToggleInput;
///     type Output = ToggleOutput;
///
///     fn process_input(&mut self, input: Self::Input) {
///         match input {
///             ToggleInput::Flip => {
///                 self.on = !self.on;
///                 self.pending = true;
///             }
///         }
///     }
///
///     fn poll_output(&mut self) -> Option<Self::Output> {
///         std::mem::take(&mut self.pending).then(|| ToggleOutput::Changed(self.on))
///     }
/// }
/// ```
pub trait StateMachine {
    /// The type of input that is [processed](StateMachine::process_input) by the state machine.
    type Input;
    /// The type of output that is [polled](StateMachine::poll_output) by the state machine.
    type Output;

    /// Process the provided `input` into the state machine.
    fn process_input(&mut self, input: Self::Input);

    /// Poll the state machine for output, returning the first available output if present.
    fn poll_output(&mut self) -> Option<Self::Output>;
}
