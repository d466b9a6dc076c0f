//! Response assertions.
//!
//! An [`Assertion`] is a named predicate over a [`CapturedResponse`]. Patterns
//! are compiled once, when the assertion is built, so a bad pattern is a
//! configuration error rather than a failed check. Running a list of
//! assertions never stops early: every failure is collected into a
//! [`FailureSet`] in declaration order.

mod failure;


use bytes::Bytes;
use regex::Regex;

use crate::error_handling::ConfigError;
use crate::fetch::CapturedResponse;

pub use failure::{AssertionFailure, FailureSet};

/// A predicate over a captured response.
#[derive(Debug, Clone)]
pub enum Assertion {
    /// Status is 2xx.
    StatusOk,
    /// Status is anything but 2xx.
    StatusNok,
    /// Status equals the given code.
    StatusEquals(u16),
    /// Header has at least one value.
    HeaderPresent {
        name: String,
    },
    /// At least one header value equals `value`.
    HeaderEquals {
        name: String,
        value: String,
    },
    /// At least one header value matches `pattern`.
    HeaderMatches {
        name: String,
        pattern: Regex,
    },
    /// Header has no values.
    HeaderMissing {
        name: String,
    },
    /// Body is non-empty and equals the given bytes.
    BodyEquals(Bytes),
    /// Body is non-empty and the pattern matches somewhere in it.
    BodyMatches(regex::bytes::Regex),
    /// Body is empty.
    BodyEmpty,
    /// 3xx with a first `Location` value equal to the given URL.
    RedirectEquals(String),
    /// 3xx with a first `Location` value matching the pattern.
    RedirectMatches(Regex),
}

impl Assertion {
    /// `HeaderPresent` for `name`.
    pub fn header_present(name: impl Into<String>) -> Self {
        Assertion::HeaderPresent { name: name.into() }
    }

    /// `HeaderEquals` for `name` and `value`.
    pub fn header_equals(name: impl Into<String>, value: impl Into<String>) -> Self {
        Assertion::HeaderEquals {
            name: name.into(),
            value: value.into(),
        }
    }

    /// `HeaderMatches` with a compiled pattern.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` if `pattern` does not compile.
    pub fn header_matches(name: impl Into<String>, pattern: &str) -> Result<Self, ConfigError> {
        let name = name.into();
        let pattern = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            assertion: header_label(&name),
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Assertion::HeaderMatches { name, pattern })
    }

    /// `HeaderMissing` for `name`.
    pub fn header_missing(name: impl Into<String>) -> Self {
        Assertion::HeaderMissing { name: name.into() }
    }

    /// `BodyEquals` for the given bytes.
    pub fn body_equals(value: impl Into<Bytes>) -> Self {
        Assertion::BodyEquals(value.into())
    }

    /// `BodyMatches` with a compiled byte pattern.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` if `pattern` does not compile.
    pub fn body_matches(pattern: &str) -> Result<Self, ConfigError> {
        regex::bytes::Regex::new(pattern)
            .map(Assertion::BodyMatches)
            .map_err(|source| ConfigError::InvalidPattern {
                assertion: "body".to_string(),
                pattern: pattern.to_string(),
                source,
            })
    }

    /// `RedirectEquals` for the given URL.
    pub fn redirect_equals(url: impl Into<String>) -> Self {
        Assertion::RedirectEquals(url.into())
    }

    /// `RedirectMatches` with a compiled pattern.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` if `pattern` does not compile.
    pub fn redirect_matches(pattern: &str) -> Result<Self, ConfigError> {
        Regex::new(pattern)
            .map(Assertion::RedirectMatches)
            .map_err(|source| ConfigError::InvalidPattern {
                assertion: "redirect".to_string(),
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Label used as the prefix of failure messages, e.g. `header[Content-Type]`.
    pub fn name(&self) -> String {
        match self {
            Assertion::StatusOk => "ok".to_string(),
            Assertion::StatusNok => "nok".to_string(),
            Assertion::StatusEquals(_) => "status".to_string(),
            Assertion::HeaderPresent { name }
            | Assertion::HeaderEquals { name, .. }
            | Assertion::HeaderMatches { name, .. }
            | Assertion::HeaderMissing { name } => header_label(name),
            Assertion::BodyEquals(_) | Assertion::BodyMatches(_) | Assertion::BodyEmpty => {
                "body".to_string()
            }
            Assertion::RedirectEquals(_) | Assertion::RedirectMatches(_) => {
                "redirect".to_string()
            }
        }
    }

    /// Evaluates the assertion. The response is only read.
    ///
    /// # Errors
    ///
    /// Returns an `AssertionFailure` describing the expected and observed values.
    pub fn check(&self, response: &CapturedResponse) -> Result<(), AssertionFailure> {
        let fail = |detail: String| Err(AssertionFailure::new(self.name(), detail));

        match self {
            Assertion::StatusOk => {
                if response.is_success() {
                    Ok(())
                } else {
                    fail(format!("expected OK, got {}", status_of(response)))
                }
            }
            Assertion::StatusNok => {
                if response.is_success() {
                    fail(format!("expected NOK, got {}", status_of(response)))
                } else {
                    Ok(())
                }
            }
            Assertion::StatusEquals(expected) => {
                if response.status() == *expected {
                    Ok(())
                } else {
                    fail(format!("expected {expected}, got {}", status_of(response)))
                }
            }
            Assertion::HeaderPresent { name } => match response.header_values(name) {
                Some(_) => Ok(()),
                None => fail("expected to be present, missing".to_string()),
            },
            Assertion::HeaderEquals { name, value } => match response.header_values(name) {
                None => fail(format!("expected {value:?}, missing")),
                Some(values) if values.iter().any(|v| v == value) => Ok(()),
                Some(values) => fail(format!("expected {value:?}, got {values:?}")),
            },
            Assertion::HeaderMatches { name, pattern } => match response.header_values(name) {
                None => fail(format!("expected to match {:?}, missing", pattern.as_str())),
                Some(values) if values.iter().any(|v| pattern.is_match(v)) => Ok(()),
                Some(values) => fail(format!(
                    "expected to match {:?}, got {values:?}",
                    pattern.as_str()
                )),
            },
            Assertion::HeaderMissing { name } => match response.header_values(name) {
                None => Ok(()),
                Some(values) => fail(format!("expected to be missing, got {values:?}")),
            },
            Assertion::BodyEquals(expected) => {
                let body = response.body();
                let expected_text = String::from_utf8_lossy(expected);
                if body.is_empty() {
                    fail(format!("expected {expected_text:?}, missing"))
                } else if body == expected {
                    Ok(())
                } else {
                    fail(format!(
                        "expected {expected_text:?}, got {:?}",
                        String::from_utf8_lossy(body)
                    ))
                }
            }
            Assertion::BodyMatches(pattern) => {
                let body = response.body();
                if body.is_empty() {
                    fail(format!("expected to match {:?}, missing", pattern.as_str()))
                } else if pattern.is_match(body) {
                    Ok(())
                } else {
                    fail(format!(
                        "expected to match {:?}, got {:?}",
                        pattern.as_str(),
                        String::from_utf8_lossy(body)
                    ))
                }
            }
            Assertion::BodyEmpty => {
                let body = response.body();
                if body.is_empty() {
                    Ok(())
                } else {
                    fail(format!(
                        "expected to be empty, got {:?}",
                        String::from_utf8_lossy(body)
                    ))
                }
            }
            Assertion::RedirectEquals(expected) => {
                let location = redirect_location(response).map_err(|d| self.failure(d))?;
                if location == *expected {
                    Ok(())
                } else {
                    fail(format!(
                        "wrong Location: expected {expected:?}, got {location:?}"
                    ))
                }
            }
            Assertion::RedirectMatches(pattern) => {
                let location = redirect_location(response).map_err(|d| self.failure(d))?;
                if pattern.is_match(&location) {
                    Ok(())
                } else {
                    fail(format!(
                        "wrong Location: expected to match {:?}, got {location:?}",
                        pattern.as_str()
                    ))
                }
            }
        }
    }

    fn failure(&self, detail: String) -> AssertionFailure {
        AssertionFailure::new(self.name(), detail)
    }
}

/// Evaluates every assertion against the response, in order, without stopping
/// at the first failure.
pub fn run_assertions(response: &CapturedResponse, assertions: &[Assertion]) -> FailureSet {
    assertions
        .iter()
        .filter_map(|a| a.check(response).err())
        .collect()
}

fn header_label(name: &str) -> String {
    format!("header[{name}]")
}

fn status_of(response: &CapturedResponse) -> String {
    format!("{} ({:?})", response.status(), response.status_text())
}

/// First `Location` value of a 3xx response.
fn redirect_location(response: &CapturedResponse) -> Result<String, String> {
    if !(300..400).contains(&response.status()) {
        return Err(format!("wrong HTTP status: got {}", status_of(response)));
    }

    response
        .header_values("Location")
        .and_then(|values| values.into_iter().next())
        .ok_or_else(|| "no Location header".to_string())
}
