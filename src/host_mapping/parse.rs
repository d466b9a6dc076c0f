//! Parsing of `srchost:srcport=dsthost[:dstport]` entries.

use crate::error_handling::HostMappingError;
use crate::host_mapping::{split_host_port, HostMapping, HostMappings};

/// Parses raw `--maphost` entries, preserving their order.
///
/// Parsing is all-or-nothing: the first invalid entry aborts and only its error
/// is returned.
///
/// # Errors
///
/// Returns the `HostMappingError` of the first entry that has no `=`
/// separator, no source port, a non-numeric source port, or a non-numeric
/// destination port.
pub fn parse_host_mappings<S: AsRef<str>>(values: &[S]) -> Result<HostMappings, HostMappingError> {
    values
        .iter()
        .map(|v| parse_host_mapping(v.as_ref()))
        .collect::<Result<Vec<_>, _>>()
        .map(HostMappings::new)
}

fn parse_host_mapping(value: &str) -> Result<HostMapping, HostMappingError> {
    let (src, dst) = match value.find('=') {
        Some(idx) if idx > 0 => (&value[..idx], &value[idx + 1..]),
        _ => {
            return Err(HostMappingError::NoSeparator {
                value: value.to_string(),
            })
        }
    };

    let Some((_, src_port)) = split_host_port(src) else {
        return Err(HostMappingError::NoSrcPort {
            value: value.to_string(),
            src: src.to_string(),
        });
    };
    if !is_port(src_port) {
        return Err(HostMappingError::InvalidSrcPort {
            value: value.to_string(),
            port: src_port.to_string(),
        });
    }

    if let Some((_, dst_port)) = split_host_port(dst) {
        if !is_port(dst_port) {
            return Err(HostMappingError::InvalidDstPort {
                value: value.to_string(),
                port: dst_port.to_string(),
            });
        }
    }

    Ok(HostMapping::new(src, dst))
}

fn is_port(s: &str) -> bool {
    s.parse::<i64>().is_ok()
}
