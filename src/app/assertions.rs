//! Assertion flags to assertion list.

use crate::assertions::Assertion;
use crate::config::AssertionFlags;
use crate::error_handling::ConfigError;
use crate::fetch::parse_header_line;

/// Builds the assertion list from the command-line flags.
///
/// Order: ok/nok, redirect (match), redirect (eq), status, header (match),
/// header (eq), header missing, body (match), body (eq), body empty.
///
/// # Errors
///
/// Returns `ConfigError::InvalidPattern` for a pattern that does not compile and
/// `ConfigError::NoAssertions` when no assertion flag was given.
pub fn build_assertions(flags: &AssertionFlags) -> Result<Vec<Assertion>, ConfigError> {
    let mut res = Vec::new();

    match flags.assert_ok {
        Some(true) => res.push(Assertion::StatusOk),
        Some(false) => res.push(Assertion::StatusNok),
        None => {}
    }

    if let Some(pattern) = &flags.assert_redirect {
        res.push(Assertion::redirect_matches(pattern)?);
    }
    if let Some(url) = &flags.assert_redirect_eq {
        res.push(Assertion::redirect_equals(url.clone()));
    }

    if let Some(status) = flags.assert_status {
        res.push(Assertion::StatusEquals(status));
    }

    res.extend(parse_header_assertions(&flags.assert_header, false)?);
    res.extend(parse_header_assertions(&flags.assert_header_eq, true)?);
    res.extend(
        flags
            .assert_header_missing
            .iter()
            .map(|name| Assertion::header_missing(name.trim())),
    );

    if let Some(pattern) = &flags.assert_body {
        res.push(Assertion::body_matches(pattern)?);
    }
    if let Some(value) = &flags.assert_body_eq {
        res.push(Assertion::body_equals(value.clone()));
    }
    if flags.assert_body_empty {
        res.push(Assertion::BodyEmpty);
    }

    if res.is_empty() {
        return Err(ConfigError::NoAssertions);
    }
    Ok(res)
}

/// Parses `Name: value` header assertions.
///
/// A line without a value asserts presence only. Otherwise `exact_match`
/// selects equality over pattern matching.
///
/// # Errors
///
/// Returns `ConfigError::InvalidPattern` if a pattern does not compile.
pub fn parse_header_assertions<S: AsRef<str>>(
    lines: &[S],
    exact_match: bool,
) -> Result<Vec<Assertion>, ConfigError> {
    lines
        .iter()
        .map(|line| {
            let (name, value) = parse_header_line(line.as_ref());
            if value.is_empty() {
                Ok(Assertion::header_present(name))
            } else if exact_match {
                Ok(Assertion::header_equals(name, value))
            } else {
                Assertion::header_matches(name, &value)
            }
        })
        .collect()
}
