//! GraphQL [`Name`]s: `/[_A-Za-z][_0-9A-Za-z]*/`.

use std::{borrow::Borrow, fmt, ops::Deref};

/// A validated GraphQL name.
///
/// Used for type names, field names, argument names, enum members and
/// variable names alike. Construction fails for anything that does not
/// match `/[_A-Za-z][_0-9A-Za-z]*/`.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Name(String);

/// A `Name` did not match `/[_A-Za-z][_0-9A-Za-z]*/`.
#[derive(Clone, Debug, Eq, PartialEq, derive_more::Display, derive_more::Error)]
#[display("invalid GraphQL name: {_0:?}")]
pub struct InvalidName(#[error(not(source))] pub String);

impl Name {
    /// Validates and constructs a new [`Name`].
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidName> {
        let s = s.into();
        if is_valid_name(&s) {
            Ok(Self(s))
        } else {
            Err(InvalidName(s))
        }
    }

    /// Borrows the underlying string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for Name {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Name {
    type Error = InvalidName;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Name {
    type Error = InvalidName;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::Name;

    #[test]
    fn accepts_valid_names() {
        for s in ["_", "_foo", "Foo", "foo_Bar42", "a"] {
            assert!(Name::new(s).is_ok(), "{s:?} should be valid");
        }
    }

    #[test]
    fn rejects_invalid_names() {
        for s in ["", "1foo", "foo-bar", "foo bar", "@foo"] {
            assert!(Name::new(s).is_err(), "{s:?} should be invalid");
        }
    }
}
