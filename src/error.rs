use thiserror::Error;

// Errors that cross a system boundary (file I/O, CLI arguments) and are
// propagated out of `main` to a non-zero exit. Numerical edge cases inside
// the renderer (degenerate vectors, zero-area triangles, a miss) are handled
// silently at the point of use and never become an `RtError`.
#[derive(Error, Debug)]
pub enum RtError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode image: {0}")]
    ImageDecode(String),

    #[error("failed to parse mesh: {0}")]
    MeshParse(String),

    #[error("unknown demo scene index: {0}")]
    UnknownDemo(usize),
}
