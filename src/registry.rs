// ABOUTME: Merged, source-attributed host registry built from known_hosts and ssh config
// ABOUTME: Applies config-over-known_hosts precedence and deterministic display ordering

use std::collections::HashSet;
use std::fmt;

use crate::ssh::{DEFAULT_PORT, HostPorts, SshConfig};

/// Which source a record came from. Config overrides win entirely on a
/// name collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSource {
    Config,
    KnownHosts,
}

impl fmt::Display for HostSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostSource::Config => f.write_str("config"),
            HostSource::KnownHosts => f.write_str("known_hosts"),
        }
    }
}

/// One reachable target, fully resolved for display and dispatch. The
/// username and port are final; the dispatcher never re-derives them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRecord {
    pub name: String,
    pub address: String,
    pub username: String,
    pub port: String,
    pub source: HostSource,
}

/// Builds the ordered candidate list: config hosts first in declaration
/// order, then known_hosts names not already covered, in ascending lexical
/// order. A name present in both sources keeps only its config record,
/// user and port included.
pub fn merge(config: &SshConfig, known_ports: &HostPorts, default_user: &str) -> Vec<HostRecord> {
    let covered: HashSet<&str> = config
        .hosts()
        .iter()
        .map(|host| host.pattern.as_str())
        .collect();

    let mut records: Vec<HostRecord> = config
        .hosts()
        .iter()
        .map(|host| HostRecord {
            name: host.pattern.clone(),
            address: host.pattern.clone(),
            username: host.user().unwrap_or(default_user).to_string(),
            port: host.port().unwrap_or(DEFAULT_PORT).to_string(),
            source: HostSource::Config,
        })
        .collect();

    // HostPorts is a BTreeMap, so this walks names in ascending order.
    for (name, port) in known_ports {
        if covered.contains(name.as_str()) {
            continue;
        }
        records.push(HostRecord {
            name: name.clone(),
            address: name.clone(),
            username: default_user.to_string(),
            port: if port.is_empty() {
                DEFAULT_PORT.to_string()
            } else {
                port.clone()
            },
            source: HostSource::KnownHosts,
        });
    }

    records
}
