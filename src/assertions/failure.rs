use std::fmt;

/// One failed assertion: its label and what was expected versus observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    assertion: String,
    detail: String,
}

impl AssertionFailure {
    pub(crate) fn new(assertion: String, detail: String) -> Self {
        Self { assertion, detail }
    }

    /// Label of the failed assertion, e.g. `status` or `header[Location]`.
    pub fn assertion(&self) -> &str {
        &self.assertion
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.assertion, self.detail)
    }
}

impl std::error::Error for AssertionFailure {}

/// Failures in assertion declaration order. Empty means every assertion passed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureSet(Vec<AssertionFailure>);

impl FailureSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AssertionFailure> {
        self.0.iter()
    }

    /// Rendered failure messages, in order.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl FromIterator<AssertionFailure> for FailureSet {
    fn from_iter<I: IntoIterator<Item = AssertionFailure>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FailureSet {
    type Item = &'a AssertionFailure;
    type IntoIter = std::slice::Iter<'a, AssertionFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
