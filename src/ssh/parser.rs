// ABOUTME: SSH source file parsers extracting candidate hosts from known_hosts and ssh config
// ABOUTME: Produces the port and option mappings consumed by the registry merge

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::Error;

pub const DEFAULT_PORT: &str = "22";

/// Hostname to port mapping mined from known_hosts. A BTreeMap keeps the
/// names in ascending lexical order for the registry.
pub type HostPorts = BTreeMap<String, String>;

pub fn parse_known_hosts(path: &Path) -> Result<HostPorts, Error> {
    let content = fs::read_to_string(path).map_err(|source| Error::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_known_hosts_content(&content))
}

fn parse_known_hosts_content(content: &str) -> HostPorts {
    let mut ports = HostPorts::new();

    for line in content.lines() {
        // Hashed entries cannot be reversed into hostnames; skip them
        // rather than misparse the hash as a name.
        if line.is_empty() || line.starts_with('|') {
            continue;
        }

        let Some(hosts_field) = line.split_whitespace().next() else {
            continue;
        };

        for token in hosts_field.split(',') {
            if token.is_empty() {
                continue;
            }
            let (host, port) = split_port_token(token);
            // Last-seen entry wins on repeated hostnames.
            ports.insert(host.to_string(), port.to_string());
        }
    }

    ports
}

/// Splits a `[host]:port` token; anything else is a bare hostname on the
/// default port. A stray `[` without a closing `]:` is kept as a bare
/// hostname.
fn split_port_token(token: &str) -> (&str, &str) {
    if let Some(rest) = token.strip_prefix('[') {
        if let Some((host, port)) = rest.split_once("]:") {
            return (host, port);
        }
    }
    (token, DEFAULT_PORT)
}

/// One `Host` block from the user's ssh config: the pattern it was
/// declared with and its key/value options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigHost {
    pub pattern: String,
    options: BTreeMap<String, String>,
}

impl ConfigHost {
    fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            options: BTreeMap::new(),
        }
    }

    /// Declared value for a config key, if present and non-empty. Keys are
    /// stored lowercase; ssh config keys are case-insensitive.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn user(&self) -> Option<&str> {
        self.option("user")
    }

    pub fn port(&self) -> Option<&str> {
        self.option("port")
    }
}

/// Per-host option overrides from the user's ssh config, in declaration
/// order. Only `Host` blocks are understood; Include and Match directives
/// do not contribute to host discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SshConfig {
    hosts: Vec<ConfigHost>,
}

impl SshConfig {
    /// The config source is optional: a missing or unreadable file
    /// degrades to an empty config so known_hosts-only operation still
    /// works.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(err) => {
                tracing::debug!("no usable ssh config at {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Self {
        let mut hosts: Vec<ConfigHost> = Vec::new();
        let mut current: Option<ConfigHost> = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            let Some(key) = parts.next() else { continue };
            let key = key.to_lowercase();

            if key == "host" {
                if let Some(done) = current.take() {
                    push_host(&mut hosts, done);
                }
                // Only the first pattern of a Host line names a single
                // selectable target; extra patterns are aliases we cannot
                // attribute overrides to.
                current = parts.next().map(ConfigHost::new);
                continue;
            }

            if let Some(host) = current.as_mut() {
                let value = parts.collect::<Vec<_>>().join(" ");
                host.options.insert(key, value);
            }
        }

        if let Some(done) = current.take() {
            push_host(&mut hosts, done);
        }

        Self { hosts }
    }

    pub fn hosts(&self) -> &[ConfigHost] {
        &self.hosts
    }
}

/// The catch-all `*` pattern carries defaults, not a host of its own; it
/// never becomes selectable. A repeated pattern replaces the options of
/// the earlier block but keeps its position.
fn push_host(hosts: &mut Vec<ConfigHost>, host: ConfigHost) {
    if host.pattern == "*" {
        return;
    }
    if let Some(existing) = hosts.iter_mut().find(|h| h.pattern == host.pattern) {
        existing.options = host.options;
    } else {
        hosts.push(host);
    }
}
