//! Craft identifier parsing.
//!
//! Registry crafts are always namespaced. Two shapes are accepted:
//!
//! - `author/name`
//! - `@author/name`
//!
//! There is no default-author fallback: a bare `name` is rejected.

use std::fmt;
use std::str::FromStr;

use crate::error::{RegistryError, Result};

/// A validated `(author, name)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CraftIdentifier {
    author: String,
    name: String,
}

impl CraftIdentifier {
    /// Parse a craft identifier.
    ///
    /// # Example
    ///
    /// ```
    /// use craft_registry::CraftIdentifier;
    ///
    /// let id = CraftIdentifier::parse("@john/rails-api").unwrap();
    /// assert_eq!(id.author(), "john");
    /// assert_eq!(id.name(), "rails-api");
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || RegistryError::InvalidNameFormat {
            input: input.to_string(),
        };

        let unscoped = input.strip_prefix('@').unwrap_or(input);

        let mut parts = unscoped.split('/');
        let (Some(author), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };

        if author.is_empty() || name.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            author: author.to_string(),
            name: name.to_string(),
        })
    }

    /// The namespace segment (without any leading `@`).
    pub fn author(&self) -> &str {
        &self.author
    }

    /// The craft name segment.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// URL path segments addressing this craft on a registry.
    pub(crate) fn api_segments(&self) -> [&str; 5] {
        ["api", "v1", "crafts", &self.author, &self.name]
    }
}

impl fmt::Display for CraftIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.author, self.name)
    }
}

impl FromStr for CraftIdentifier {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(input: &str) {
        match CraftIdentifier::parse(input) {
            Err(RegistryError::InvalidNameFormat { input: got }) => assert_eq!(got, input),
            other => panic!("expected InvalidNameFormat for {:?}, got {:?}", input, other),
        }
    }

    #[test]
    fn parses_author_slash_name() {
        let id = CraftIdentifier::parse("john/rails-api").unwrap();
        assert_eq!(id.author(), "john");
        assert_eq!(id.name(), "rails-api");
    }

    #[test]
    fn parses_scoped_name() {
        let id = CraftIdentifier::parse("@acme/deploy-hook").unwrap();
        assert_eq!(id.author(), "acme");
        assert_eq!(id.name(), "deploy-hook");
    }

    #[test]
    fn scoped_and_unscoped_forms_are_equal() {
        let a = CraftIdentifier::parse("@john/rails-api").unwrap();
        let b = CraftIdentifier::parse("john/rails-api").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_empty_string() {
        assert_invalid("");
    }

    #[test]
    fn rejects_bare_name() {
        assert_invalid("rails-api");
    }

    #[test]
    fn rejects_scope_without_name() {
        assert_invalid("@john");
    }

    #[test]
    fn rejects_extra_segments() {
        assert_invalid("john/rails/api");
        assert_invalid("@john/rails/api");
    }

    #[test]
    fn rejects_empty_segments() {
        assert_invalid("/rails-api");
        assert_invalid("john/");
        assert_invalid("@/rails-api");
        assert_invalid("/");
        assert_invalid("@");
    }

    #[test]
    fn strips_only_one_scope_marker() {
        let id = CraftIdentifier::parse("@@john/x").unwrap();
        assert_eq!(id.author(), "@john");
    }

    #[test]
    fn display_renders_unscoped_form() {
        let id = CraftIdentifier::parse("@john/rails-api").unwrap();
        assert_eq!(id.to_string(), "john/rails-api");
    }

    #[test]
    fn from_str_delegates_to_parse() {
        let id: CraftIdentifier = "a/b".parse().unwrap();
        assert_eq!(id.name(), "b");
        assert!("nope".parse::<CraftIdentifier>().is_err());
    }

    #[test]
    fn api_segments_address_the_craft() {
        let id = CraftIdentifier::parse("john/rails-api").unwrap();
        assert_eq!(
            id.api_segments(),
            ["api", "v1", "crafts", "john", "rails-api"]
        );
    }
}
