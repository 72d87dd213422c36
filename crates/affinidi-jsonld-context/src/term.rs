//! Term definitions and the multi-key term table.

use std::collections::{BTreeSet, HashMap};

use serde_json::Value;

use crate::keywords::Keyword;

/// URI generic delimiters from RFC 3986 §2.2. An id ending in one of these
/// is usable as a prefix by default.
const URI_GEN_DELIMS: [char; 7] = [':', '/', '?', '#', '[', ']', '@'];

/// A container kind from a term's `@container` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContainerKind {
    List,
    Set,
    Language,
    Index,
    Id,
    Graph,
}

impl ContainerKind {
    /// Parse a `@container` keyword. Unknown values yield `None` and are
    /// dropped by the caller.
    pub fn parse(s: &str) -> Option<ContainerKind> {
        match s {
            "@list" => Some(ContainerKind::List),
            "@set" => Some(ContainerKind::Set),
            "@language" => Some(ContainerKind::Language),
            "@index" => Some(ContainerKind::Index),
            "@id" => Some(ContainerKind::Id),
            "@graph" => Some(ContainerKind::Graph),
            _ => None,
        }
    }
}

/// A single term definition: a short name bound to an IRI plus optional
/// coercion, container kinds, language override and reverse flag.
#[derive(Debug, Clone)]
pub struct Term {
    /// Absolute IRI or blank-node reference; `None` for unmapped terms.
    pub id: Option<String>,
    pub name: String,
    /// `@type` coercion. The keywords `@id`, `@type` and `@vocab` are kept
    /// literal; anything else is an expanded IRI.
    pub coercion: Option<String>,
    pub container: BTreeSet<ContainerKind>,
    pub index: Option<String>,
    pub language: Option<String>,
    pub reverse: bool,
    /// Raw nested `@context` for later scoped activation.
    pub context: Option<Value>,
    /// Whether this term may be used as a CURIE prefix.
    pub prefix: bool,
}

/// Optional parts of a term registration. All default to "absent".
#[derive(Debug, Clone, Default)]
pub struct TermOptions {
    pub coercion: Option<String>,
    pub container: BTreeSet<ContainerKind>,
    pub index: Option<String>,
    pub language: Option<String>,
    pub reverse: bool,
    pub context: Option<Value>,
    /// Explicit `@prefix` flag; honored for version >= 1.1 only.
    pub prefix: Option<bool>,
}

/// Secondary index key: (idref, coercion-or-language, container
/// discriminator, reverse flag). Collisions resolve last-write-wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LookupKey {
    idref: Option<String>,
    coercion: Option<String>,
    container: Option<ContainerKind>,
    reverse: bool,
}

/// Term definitions plus the alias and prefix indexes, with exact and
/// fallback lookup for compaction.
#[derive(Debug, Clone, Default)]
pub struct TermTable {
    terms: HashMap<String, Term>,
    lookup: HashMap<LookupKey, Term>,
    prefixes: HashMap<String, String>,
    aliases: HashMap<Keyword, Vec<String>>,
}

impl TermTable {
    /// Register a term under `name`, overwriting any previous definition.
    ///
    /// The prefix flag defaults to "id ends in a URI generic delimiter"; an
    /// explicit `@prefix` value overrides that for version >= 1.1 contexts.
    pub fn add_term(&mut self, version: f64, name: &str, idref: Option<String>, opts: TermOptions) {
        let prefix = match opts.prefix {
            Some(explicit) if version >= 1.1 => explicit,
            _ => idref
                .as_deref()
                .is_some_and(|id| id.ends_with(URI_GEN_DELIMS)),
        };

        let term = Term {
            id: idref.clone(),
            name: name.to_string(),
            coercion: opts.coercion.clone(),
            container: opts.container,
            index: opts.index,
            language: opts.language.clone(),
            reverse: opts.reverse,
            context: opts.context,
            prefix,
        };

        // Only list, language and set containers discriminate lookups.
        let discriminator = [
            ContainerKind::List,
            ContainerKind::Language,
            ContainerKind::Set,
        ]
        .into_iter()
        .find(|kind| term.container.contains(kind));

        let key = LookupKey {
            idref: idref.clone(),
            coercion: opts.coercion.or(opts.language),
            container: discriminator,
            reverse: opts.reverse,
        };

        if prefix && let Some(id) = idref {
            self.prefixes.insert(id, name.to_string());
        }

        self.lookup.insert(key, term.clone());
        self.terms.insert(name.to_string(), term);
    }

    /// Record `name` as an alias for a reserved node keyword, after the
    /// aliases registered earlier.
    pub fn add_alias(&mut self, keyword: Keyword, name: &str) {
        self.aliases
            .entry(keyword)
            .or_default()
            .push(name.to_string());
    }

    /// Look up a term by name.
    pub fn get(&self, name: &str) -> Option<&Term> {
        self.terms.get(name)
    }

    /// Reverse lookup for the prefix registered against a namespace IRI.
    pub fn prefix_for(&self, namespace: &str) -> Option<&str> {
        self.prefixes.get(namespace).map(String::as_str)
    }

    /// Aliases declared for a keyword, earliest registration first.
    pub fn aliases(&self, keyword: Keyword) -> &[String] {
        self.aliases
            .get(&keyword)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Aliases for a keyword in registration order, then the canonical
    /// keyword itself.
    pub fn get_keys(&self, keyword: Keyword) -> impl Iterator<Item = &str> {
        self.aliases(keyword)
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(keyword.as_str()))
    }

    /// The preferred spelling of a keyword: its first alias, else itself.
    pub fn get_key(&self, keyword: Keyword) -> &str {
        self.get_keys(keyword).next().unwrap_or(keyword.as_str())
    }

    /// Compaction term selection. Tried in strict priority order, first hit
    /// wins, so an exact type+container match always beats a generic one:
    ///
    /// 1. (idref, coercion-or-language, container, reverse)
    /// 2. (idref, coercion-or-language, no container, reverse) when a
    ///    coercion or language was supplied
    /// 3. (idref, coercion-or-language, container, reverse) on the literal
    ///    container value alone
    /// 4. no container, but a language requested: (idref, -, language
    ///    container, reverse)
    /// 5. neither container nor language: (idref, coercion, set container,
    ///    reverse)
    /// 6. fully generic: (idref, -, -, reverse)
    pub fn find_term(
        &self,
        idref: Option<&str>,
        coercion: Option<&str>,
        container: Option<&str>,
        language: Option<&str>,
        reverse: bool,
    ) -> Option<&Term> {
        let effective = coercion.or(language);
        let container_key = container.and_then(ContainerKind::parse);

        if let Some(c) = effective {
            if container.is_some()
                && let Some(term) = self.probe(idref, Some(c), container_key, reverse)
            {
                return Some(term);
            }
            if let Some(term) = self.probe(idref, Some(c), None, reverse) {
                return Some(term);
            }
        }

        if container.is_some() {
            if let Some(term) = self.probe(idref, effective, container_key, reverse) {
                return Some(term);
            }
        } else if language.is_some() {
            if let Some(term) = self.probe(idref, None, Some(ContainerKind::Language), reverse) {
                return Some(term);
            }
        } else if let Some(term) = self.probe(idref, effective, Some(ContainerKind::Set), reverse) {
            return Some(term);
        }

        self.probe(idref, None, None, reverse)
    }

    fn probe(
        &self,
        idref: Option<&str>,
        coercion: Option<&str>,
        container: Option<ContainerKind>,
        reverse: bool,
    ) -> Option<&Term> {
        self.lookup.get(&LookupKey {
            idref: idref.map(str::to_string),
            coercion: coercion.map(str::to_string),
            container,
            reverse,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(name: &str, id: &str, opts: TermOptions) -> TermTable {
        let mut table = TermTable::default();
        table.add_term(1.0, name, Some(id.to_string()), opts);
        table
    }

    #[test]
    fn prefix_flag_defaults_from_gen_delims() {
        let table = table_with("ex", "http://example.org/ns#", TermOptions::default());
        assert!(table.get("ex").unwrap().prefix);
        assert_eq!(table.prefix_for("http://example.org/ns#"), Some("ex"));

        let table = table_with("name", "http://example.org/name", TermOptions::default());
        assert!(!table.get("name").unwrap().prefix);
        assert_eq!(table.prefix_for("http://example.org/name"), None);
    }

    #[test]
    fn explicit_prefix_flag_requires_1_1() {
        let opts = TermOptions {
            prefix: Some(true),
            ..Default::default()
        };
        let mut table = TermTable::default();
        table.add_term(1.0, "compact", Some("http://example.org/compact".to_string()), opts.clone());
        assert!(!table.get("compact").unwrap().prefix);

        let mut table = TermTable::default();
        table.add_term(1.1, "compact", Some("http://example.org/compact".to_string()), opts);
        assert!(table.get("compact").unwrap().prefix);
    }

    #[test]
    fn redefinition_overwrites_by_name() {
        let mut table = TermTable::default();
        table.add_term(1.0, "t", Some("http://a/".to_string()), TermOptions::default());
        table.add_term(1.0, "t", Some("http://b/".to_string()), TermOptions::default());
        assert_eq!(table.get("t").unwrap().id.as_deref(), Some("http://b/"));
    }

    #[test]
    fn find_term_prefers_exact_coercion_and_container() {
        let mut table = TermTable::default();
        let iri = "http://example.org/knows";
        table.add_term(1.0, "generic", Some(iri.to_string()), TermOptions::default());
        table.add_term(
            1.0,
            "knowsList",
            Some(iri.to_string()),
            TermOptions {
                coercion: Some("@id".to_string()),
                container: BTreeSet::from([ContainerKind::List]),
                ..Default::default()
            },
        );
        table.add_term(
            1.0,
            "knowsId",
            Some(iri.to_string()),
            TermOptions {
                coercion: Some("@id".to_string()),
                ..Default::default()
            },
        );

        let hit = table
            .find_term(Some(iri), Some("@id"), Some("@list"), None, false)
            .unwrap();
        assert_eq!(hit.name, "knowsList");

        let hit = table
            .find_term(Some(iri), Some("@id"), None, None, false)
            .unwrap();
        assert_eq!(hit.name, "knowsId");

        let hit = table.find_term(Some(iri), None, None, None, false).unwrap();
        assert_eq!(hit.name, "generic");
    }

    #[test]
    fn find_term_language_container_fallback() {
        let mut table = TermTable::default();
        let iri = "http://example.org/label";
        table.add_term(
            1.0,
            "labelByLang",
            Some(iri.to_string()),
            TermOptions {
                container: BTreeSet::from([ContainerKind::Language]),
                ..Default::default()
            },
        );

        // Stored under the language discriminator with no coercion, so a
        // language-only request finds it through step 4.
        let hit = table
            .find_term(Some(iri), None, None, Some("en"), false)
            .unwrap();
        assert_eq!(hit.name, "labelByLang");
    }

    #[test]
    fn find_term_generic_fallback_when_container_misses() {
        let mut table = TermTable::default();
        let iri = "http://example.org/tags";
        table.add_term(1.0, "tags", Some(iri.to_string()), TermOptions::default());

        // A container request with no matching entry still lands on the
        // generic entry.
        let hit = table
            .find_term(Some(iri), None, Some("@list"), None, false)
            .unwrap();
        assert_eq!(hit.name, "tags");
    }

    #[test]
    fn find_term_respects_reverse_flag() {
        let mut table = TermTable::default();
        let iri = "http://example.org/childOf";
        table.add_term(
            1.0,
            "parentOf",
            Some(iri.to_string()),
            TermOptions {
                reverse: true,
                ..Default::default()
            },
        );

        assert!(table.find_term(Some(iri), None, None, None, false).is_none());
        let hit = table.find_term(Some(iri), None, None, None, true).unwrap();
        assert_eq!(hit.name, "parentOf");
    }

    #[test]
    fn keyword_aliases_in_registration_order() {
        let mut table = TermTable::default();
        table.add_alias(Keyword::Id, "identifier");
        table.add_alias(Keyword::Id, "uid");

        let keys: Vec<&str> = table.get_keys(Keyword::Id).collect();
        assert_eq!(keys, vec!["identifier", "uid", "@id"]);
        assert_eq!(table.get_key(Keyword::Id), "identifier");
        assert_eq!(table.get_key(Keyword::Type), "@type");
    }
}
