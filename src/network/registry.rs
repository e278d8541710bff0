use std::collections::HashSet;
use url::Url;

use crate::error::AddressError;

/// Reduce a node address to its network location (`host[:port]`).
///
/// Accepts full URLs such as `http://192.168.0.5:5000/chain` and bare
/// locations such as `192.168.0.5:5000`; scheme and path are discarded.
/// Peers are fetched over plain http, so the port is kept whenever it is
/// not http's default (`https://h` becomes `h:443`).
pub fn parse_node_address(address: &str) -> Result<String, AddressError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(AddressError::Empty);
    }

    let with_scheme = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    let url = Url::parse(&with_scheme).map_err(|e| AddressError::Malformed {
        address: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    let host = match url.host_str() {
        Some(host) if !host.is_empty() => host,
        _ => return Err(AddressError::MissingHost(trimmed.to_string())),
    };
    let port = if url.scheme() == "http" {
        url.port()
    } else {
        url.port_or_known_default()
    };
    Ok(match port {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Whether `address` starts with `scheme://`. A `://` later in the path or
/// query does not count.
fn has_scheme(address: &str) -> bool {
    match address.find("://") {
        Some(pos) => {
            let scheme = &address[..pos];
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Known peers, deduplicated by network location.
#[derive(Debug, Default, Clone)]
pub struct NodeRegistry {
    nodes: HashSet<String>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and remember `address`; re-registering a known node is a no-op.
    pub fn register(&mut self, address: &str) -> Result<String, AddressError> {
        let location = parse_node_address(address)?;
        self.nodes.insert(location.clone());
        Ok(location)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{NodeRegistry, parse_node_address};
    use crate::error::AddressError;

    #[test]
    fn strips_scheme_and_path() {
        assert_eq!(
            parse_node_address("http://192.168.0.5:5000").unwrap(),
            "192.168.0.5:5000"
        );
        assert_eq!(
            parse_node_address("https://peer.example.org:8443/chain?x=1").unwrap(),
            "peer.example.org:8443"
        );
        assert_eq!(parse_node_address("http://localhost").unwrap(), "localhost");
        assert_eq!(parse_node_address("http://localhost:80").unwrap(), "localhost");
    }

    #[test]
    fn keeps_port_of_non_http_schemes() {
        assert_eq!(
            parse_node_address("https://peer.example.org:443").unwrap(),
            "peer.example.org:443"
        );
        assert_eq!(
            parse_node_address("https://peer.example.org/chain").unwrap(),
            "peer.example.org:443"
        );
    }

    #[test]
    fn scheme_separator_in_path_is_not_a_scheme() {
        assert_eq!(
            parse_node_address("host:5000/p?next=http://x").unwrap(),
            "host:5000"
        );
        assert_eq!(
            parse_node_address("10.0.0.7:5000/a?b=https://c:1").unwrap(),
            "10.0.0.7:5000"
        );
    }

    #[test]
    fn accepts_bare_locations() {
        assert_eq!(
            parse_node_address(" 127.0.0.1:5001 ").unwrap(),
            "127.0.0.1:5001"
        );
        assert_eq!(parse_node_address("node-b").unwrap(), "node-b");
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse_node_address("   "), Err(AddressError::Empty));
        assert!(matches!(
            parse_node_address("http://host:notaport"),
            Err(AddressError::Malformed { .. })
        ));
        assert!(matches!(
            parse_node_address("http://"),
            Err(AddressError::Malformed { .. })
        ));
        assert_eq!(
            parse_node_address("unix:///tmp/socket"),
            Err(AddressError::MissingHost("unix:///tmp/socket".into()))
        );
    }

    #[test]
    fn registration_is_idempotent() {
        let mut nodes = NodeRegistry::new();
        nodes.register("http://127.0.0.1:5001").unwrap();
        nodes.register("127.0.0.1:5001").unwrap();
        nodes.register("http://127.0.0.1:5001/some/path").unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes.iter().next().unwrap(), "127.0.0.1:5001");

        nodes.register("127.0.0.1:5002").unwrap();
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn failed_registration_leaves_registry_untouched() {
        let mut nodes = NodeRegistry::new();
        assert!(nodes.register("").is_err());
        assert!(nodes.is_empty());
    }
}
