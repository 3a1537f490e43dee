use thiserror::Error;

pub type FlowResult<T> = Result<T, FlowError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// A flow's root is not the concrete type it was declared as.
    /// This is a wiring bug in the caller, not a runtime condition.
    #[error("root of flow `{flow}` is `{actual}`, expected `{expected}`")]
    RootTypeMismatch {
        flow: String,
        expected: &'static str,
        actual: &'static str,
    },
    /// Waiting on no flows at all would fire without anything being shown.
    #[error("readiness set has no flows")]
    EmptyReadySet,
    #[error("no tokio runtime available to schedule `{0}`")]
    NoRuntime(&'static str),
}
