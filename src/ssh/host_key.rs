// ABOUTME: Host key policies applied when the server presents its key.
// ABOUTME: Blind acceptance is an explicit, named policy rather than a hidden default.

use russh::keys::known_hosts::{
    check_known_hosts, check_known_hosts_path, learn_known_hosts, learn_known_hosts_path,
};
use russh::keys::ssh_key;
use std::path::Path;

/// How the server's host key is checked during connect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HostKeyPolicy {
    /// Accept any host key for this session and persist nothing.
    ///
    /// This is trust-on-first-use without memory: every connection is a
    /// "first" one, so a changed key is never detected.
    #[default]
    AcceptAny,
    /// Check known_hosts, record unknown keys, reject changed keys.
    TrustOnFirstUse,
    /// Check known_hosts and reject anything not already recorded.
    Strict,
}

impl HostKeyPolicy {
    pub fn name(self) -> &'static str {
        match self {
            HostKeyPolicy::AcceptAny => "accept-any",
            HostKeyPolicy::TrustOnFirstUse => "trust-on-first-use",
            HostKeyPolicy::Strict => "strict",
        }
    }

    /// Decide whether `key` is acceptable for `host:port`.
    ///
    /// `known_hosts` overrides the default `~/.ssh/known_hosts` location for
    /// the policies that consult it.
    pub fn verify(
        self,
        host: &str,
        port: u16,
        key: &ssh_key::PublicKey,
        known_hosts: Option<&Path>,
    ) -> bool {
        if self == HostKeyPolicy::AcceptAny {
            tracing::warn!(
                "accepting host key for {}:{} without verification ({})",
                host,
                port,
                key.fingerprint(ssh_key::HashAlg::Sha256)
            );
            return true;
        }

        let check_result = match known_hosts {
            Some(path) => check_known_hosts_path(host, port, key, path),
            None => check_known_hosts(host, port, key),
        };

        match check_result {
            Ok(true) => true,
            Ok(false) if self == HostKeyPolicy::TrustOnFirstUse => {
                tracing::warn!(
                    "Trust-On-First-Use: accepting unknown host key for {}:{}",
                    host,
                    port
                );
                let learn_result = match known_hosts {
                    Some(path) => learn_known_hosts_path(host, port, key, path),
                    None => learn_known_hosts(host, port, key),
                };
                if let Err(e) = learn_result {
                    tracing::warn!("Failed to save host key to known_hosts: {}", e);
                }
                true
            }
            Ok(false) => {
                tracing::debug!("host key for {}:{} not in known_hosts", host, port);
                false
            }
            Err(russh::keys::Error::KeyChanged { .. }) => {
                tracing::error!("host key for {}:{} does not match known_hosts", host, port);
                false
            }
            Err(e) => {
                tracing::debug!("known_hosts lookup failed: {}", e);
                false
            }
        }
    }
}
