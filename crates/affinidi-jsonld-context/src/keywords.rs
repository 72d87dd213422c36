//! Reserved JSON-LD keywords.
//!
//! Context-processing keys are plain string constants; the keywords that may
//! appear in a node object are a closed [`Keyword`] enumeration so that alias
//! tables can be keyed by value rather than by free-form strings.

use std::fmt;

pub const CONTEXT: &str = "@context";
pub const BASE: &str = "@base";
pub const VOCAB: &str = "@vocab";
pub const VERSION: &str = "@version";
pub const PROPAGATE: &str = "@propagate";
pub const CONTAINER: &str = "@container";
pub const INDEX: &str = "@index";
pub const PREFIX: &str = "@prefix";
pub const ID: &str = "@id";
pub const TYPE: &str = "@type";
pub const LANGUAGE: &str = "@language";
pub const REVERSE: &str = "@reverse";

/// A reserved node-object keyword.
///
/// These are the keys a user context may declare aliases for, and the
/// terminals of recursive term-reference expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Graph,
    Id,
    Included,
    Json,
    List,
    Nest,
    None,
    Reverse,
    Set,
    Type,
    Value,
    Language,
}

impl Keyword {
    /// The canonical `@`-prefixed spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Graph => "@graph",
            Keyword::Id => "@id",
            Keyword::Included => "@included",
            Keyword::Json => "@json",
            Keyword::List => "@list",
            Keyword::Nest => "@nest",
            Keyword::None => "@none",
            Keyword::Reverse => "@reverse",
            Keyword::Set => "@set",
            Keyword::Type => "@type",
            Keyword::Value => "@value",
            Keyword::Language => "@language",
        }
    }

    /// Parse a canonical spelling back into a keyword.
    pub fn parse(s: &str) -> Option<Keyword> {
        match s {
            "@graph" => Some(Keyword::Graph),
            "@id" => Some(Keyword::Id),
            "@included" => Some(Keyword::Included),
            "@json" => Some(Keyword::Json),
            "@list" => Some(Keyword::List),
            "@nest" => Some(Keyword::Nest),
            "@none" => Some(Keyword::None),
            "@reverse" => Some(Keyword::Reverse),
            "@set" => Some(Keyword::Set),
            "@type" => Some(Keyword::Type),
            "@value" => Some(Keyword::Value),
            "@language" => Some(Keyword::Language),
            _ => Option::None,
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RDF namespace constants.
pub mod rdf {
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_matches_canonical_spelling() {
        for kw in [
            Keyword::Graph,
            Keyword::Id,
            Keyword::Included,
            Keyword::Json,
            Keyword::List,
            Keyword::Nest,
            Keyword::None,
            Keyword::Reverse,
            Keyword::Set,
            Keyword::Type,
            Keyword::Value,
            Keyword::Language,
        ] {
            assert_eq!(Keyword::parse(kw.as_str()), Some(kw));
        }
    }

    #[test]
    fn parse_rejects_processing_keys() {
        assert_eq!(Keyword::parse("@vocab"), None);
        assert_eq!(Keyword::parse("@container"), None);
        assert_eq!(Keyword::parse("id"), None);
    }
}
