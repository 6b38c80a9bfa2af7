#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to open capture source '{0}'")]
    OpenFailed(String),
    #[error("transient read failure: {0}")]
    TransientRead(String),
    #[error("capture backend '{0}' was not compiled in")]
    BackendUnavailable(&'static str),
}
