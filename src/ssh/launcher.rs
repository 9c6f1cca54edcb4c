// ABOUTME: Dispatch of a confirmed selection to the external ssh client
// ABOUTME: The child inherits the terminal and blocks this process until it exits

use std::path::PathBuf;
use std::process::Command;

use crate::error::Error;
use crate::registry::HostRecord;

pub struct SshLauncher {
    program: String,
}

impl SshLauncher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolves the configured client on PATH, for a startup diagnostic
    /// before the terminal goes into raw mode.
    pub fn locate(&self) -> Option<PathBuf> {
        which::which(&self.program).ok()
    }

    /// Hands the terminal to `ssh user@host -p port` and waits for the
    /// child to exit. The record already carries the resolved username and
    /// port; nothing is re-derived here.
    pub fn connect(&self, record: &HostRecord) -> Result<(), Error> {
        let args = connect_args(record);

        println!("Connecting to {}@{}...", record.username, record.address);
        tracing::info!("running {} {}", self.program, args.join(" "));

        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|source| Error::DispatchFailure {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(Error::SshExit { status });
        }
        Ok(())
    }
}

/// Argument list for the external client: `user@host`, then the port. A
/// finalized record never has an empty port, so `-p` is always passed.
fn connect_args(record: &HostRecord) -> Vec<String> {
    vec![
        format!("{}@{}", record.username, record.address),
        "-p".to_string(),
        record.port.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::HostSource;

    fn record(username: &str, address: &str, port: &str) -> HostRecord {
        HostRecord {
            name: address.to_string(),
            address: address.to_string(),
            username: username.to_string(),
            port: port.to_string(),
            source: HostSource::KnownHosts,
        }
    }

    #[test]
    fn test_connect_args_shape() {
        let args = connect_args(&record("admin", "server.example.com", "2222"));

        assert_eq!(args, ["admin@server.example.com", "-p", "2222"]);
    }

    #[test]
    fn test_connect_args_reuse_record_port() {
        // The port travels with the record from the merge; a known_hosts
        // port must survive all the way to the command line.
        let args = connect_args(&record("deploy", "box", "2201"));

        assert_eq!(args[2], "2201");
    }

    #[test]
    fn test_connect_reports_spawn_failure() {
        let launcher = SshLauncher::new("definitely-not-a-real-ssh-binary");

        let result = launcher.connect(&record("deploy", "box", "22"));

        assert!(matches!(result, Err(Error::DispatchFailure { .. })));
    }

    #[test]
    fn test_connect_surfaces_nonzero_exit() {
        let launcher = SshLauncher::new("false");

        let result = launcher.connect(&record("deploy", "box", "22"));

        assert!(matches!(result, Err(Error::SshExit { .. })));
    }

    #[test]
    fn test_connect_succeeds_when_client_exits_cleanly() {
        let launcher = SshLauncher::new("true");

        let result = launcher.connect(&record("deploy", "box", "22"));

        assert!(result.is_ok());
    }

    #[test]
    fn test_locate_finds_binary_on_path() {
        let launcher = SshLauncher::new("true");

        assert!(launcher.locate().is_some());
    }
}
