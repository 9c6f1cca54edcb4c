// ABOUTME: Typed failure taxonomy for the host selection pipeline
// ABOUTME: Separates fatal source errors from dispatch failures reported after handoff

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// known_hosts is the one mandatory source; without it there is no
    /// candidate list to offer.
    #[error("cannot read known_hosts at {}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The external ssh client never started.
    #[error("failed to start {program}")]
    DispatchFailure {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The external ssh client ran and exited non-zero. Reported once,
    /// never retried.
    #[error("ssh exited with {status}")]
    SshExit { status: ExitStatus },
}
