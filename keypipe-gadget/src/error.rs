//! Gadget session error types

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from gadget keyboard sessions
#[derive(Error, Debug)]
pub enum GadgetError {
    /// Gadget device could not be opened for writing
    #[error("Failed to open gadget device {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writer thread is gone; events can no longer be forwarded
    #[error("Gadget writer is closed")]
    Closed,
}
