//! Dial-target overrides.
//!
//! A host mapping reroutes the TCP connection for a `host:port` pair to another
//! address without touching the request itself: the `Host` header and the TLS
//! server name still come from the URL. This is the `--resolve`-like override of
//! the CLI (`--maphost srchost:srcport=dsthost[:dstport]`).
//!
//! The connection layer only ever sees this module through the [`DialResolver`]
//! trait, so the override is a pluggable hook rather than a URL rewrite.

mod parse;


pub use parse::parse_host_mappings;

/// Chooses the address the connection layer actually dials.
pub trait DialResolver: Send + Sync {
    /// Maps a dial target (`host:port`) to the address to connect to.
    ///
    /// Returning the target unchanged means "no override".
    fn resolve_dial_target(&self, target: &str) -> String;
}

/// A single override rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMapping {
    /// Source in the form `hostname:port`, `*`, `*:*` or `*:port`.
    pub src: String,
    /// Destination in the form `hostname:port` or just `hostname`. Without a
    /// port the source port is used.
    pub dst: String,
}

impl HostMapping {
    /// Creates a mapping from its two raw sides.
    pub fn new(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
        }
    }

    /// Returns true when this rule applies to the dial target.
    ///
    /// `*` and `*:*` match everything, `*:port` matches any host on exactly that
    /// port, anything else must equal the target. An empty source never matches.
    pub fn matches(&self, target: &str) -> bool {
        match self.src.as_str() {
            "" => false,
            "*" | "*:*" => true,
            src => match src.strip_prefix("*:") {
                Some(port) => split_host_port(target).is_some_and(|(_, p)| p == port),
                None => src == target,
            },
        }
    }

    /// Destination address, with the source port appended when `dst` has none.
    pub fn dst_host(&self) -> String {
        if split_host_port(&self.dst).is_some() {
            return self.dst.clone();
        }

        match split_host_port(&self.src) {
            Some((_, port)) => format!("{}:{port}", self.dst),
            None => self.dst.clone(),
        }
    }
}

/// Ordered list of host mappings; the first matching rule wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostMappings(Vec<HostMapping>);

impl HostMappings {
    /// Wraps an ordered list of rules.
    pub fn new(mappings: Vec<HostMapping>) -> Self {
        Self(mappings)
    }

    /// Returns the destination of the first rule matching `target`, or `target`
    /// itself when nothing matches.
    pub fn resolve(&self, target: &str) -> String {
        self.0
            .iter()
            .find(|m| m.matches(target))
            .map(HostMapping::dst_host)
            .unwrap_or_else(|| target.to_string())
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no rules.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the rules in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, HostMapping> {
        self.0.iter()
    }
}

impl From<Vec<HostMapping>> for HostMappings {
    fn from(mappings: Vec<HostMapping>) -> Self {
        Self(mappings)
    }
}

impl<'a> IntoIterator for &'a HostMappings {
    type Item = &'a HostMapping;
    type IntoIter = std::slice::Iter<'a, HostMapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl DialResolver for HostMappings {
    fn resolve_dial_target(&self, target: &str) -> String {
        self.resolve(target)
    }
}

/// Splits `host:port` at the last colon. Bracketed IPv6 hosts keep their brackets.
pub(crate) fn split_host_port(addr: &str) -> Option<(&str, &str)> {
    let (host, port) = addr.rsplit_once(':')?;
    // "[::1]" alone has colons but no port
    if host.starts_with('[') && !host.ends_with(']') {
        return None;
    }
    Some((host, port))
}
