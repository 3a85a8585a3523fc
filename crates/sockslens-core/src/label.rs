//! Label-key selection for the per-request series.
//!
//! The label attached to the duration summary and latency histogram is a
//! deployment choice, not a fixed contract: a constant tag keeps cardinality
//! at one, the client IP slices by caller, and the remote address slices by
//! dialed target. The facade does not cap distinct label values, so the two
//! address modes inherit an unbounded-cardinality risk sized by the traffic.

use std::net::SocketAddr;

use serde::Deserialize;

/// Which dimension the per-request series are keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    /// A single fixed tag for every request.
    Constant,
    /// The connecting client's IP address (port stripped).
    ClientIp,
    /// The remote address the proxy dialed on the client's behalf.
    RemoteAddr,
}

impl LabelMode {
    /// Label key as it appears in the exported series.
    pub fn key(self) -> &'static str {
        match self {
            LabelMode::Constant => "request",
            LabelMode::ClientIp => "client_ip",
            LabelMode::RemoteAddr => "remote_addr",
        }
    }

    /// Resolve the label value for one proxied connection.
    ///
    /// `constant` is the configured tag used in [`LabelMode::Constant`];
    /// `remote` is the target address as dialed (host:port).
    pub fn value(self, constant: &str, client: SocketAddr, remote: &str) -> String {
        match self {
            LabelMode::Constant => constant.to_string(),
            LabelMode::ClientIp => client.ip().to_string(),
            LabelMode::RemoteAddr => remote.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn value_per_mode() {
        let client: SocketAddr = "203.0.113.9:51034".parse().unwrap();
        assert_eq!(LabelMode::Constant.value("request", client, "example.com:443"), "request");
        assert_eq!(LabelMode::ClientIp.value("request", client, "example.com:443"), "203.0.113.9");
        assert_eq!(
            LabelMode::RemoteAddr.value("request", client, "example.com:443"),
            "example.com:443"
        );
    }

    #[test]
    fn keys_are_stable() {
        assert_eq!(LabelMode::Constant.key(), "request");
        assert_eq!(LabelMode::ClientIp.key(), "client_ip");
        assert_eq!(LabelMode::RemoteAddr.key(), "remote_addr");
    }
}
