/// The results/remote-service error bucket (spec §7's "ProtocolError"):
/// transport failures, a response whose `Content-Type` no formatter is
/// registered for, and the I/O errors quick-xml's reader surfaces while
/// walking a response body.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("http error: {0}")]
    Http(String),
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
