/// Error types for message operations.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// An underlying key or signature error.
    #[error(transparent)]
    Primitives(#[from] fvm_primitives::PrimitivesError),
}
