//! IRI expansion: compact terms, CURIEs and relative references to
//! absolute IRIs.

use crate::context::Context;
use crate::iri;

impl Context {
    /// Expand a term, CURIE or IRI reference to an absolute IRI.
    ///
    /// With `use_vocab`, a registered term always wins and a bare word falls
    /// back to the `@vocab` prefix; without a vocab mapping, expansion of a
    /// bare word is undefined (`None`). Blank-node identifiers come back
    /// unchanged. Anything else is resolved against the active base IRI.
    pub fn expand(&self, value: &str, use_vocab: bool) -> Option<String> {
        if use_vocab && let Some(term) = self.get_term(value) {
            return term.id.clone();
        }

        let (is_bare, prefix, rest) = iri::prep_expand(value);
        if prefix == Some("_") {
            return Some(value.to_string());
        }

        if let Some(pfx) = prefix {
            if let Some(namespace) = self.get_term(pfx)
                && namespace.prefix
                && let Some(id) = &namespace.id
            {
                return Some(format!("{id}{rest}"));
            }
        } else if is_bare && use_vocab {
            return self.vocab.as_ref().map(|vocab| format!("{vocab}{value}"));
        }

        Some(self.resolve_iri(value))
    }

    /// Resolve a CURIE or IRI reference without consulting term names or
    /// the vocab mapping. Blank-node identifiers pass through unresolved.
    pub fn resolve(&self, curie_or_iri: &str) -> String {
        let expanded = self
            .expand(curie_or_iri, false)
            .unwrap_or_else(|| curie_or_iri.to_string());
        if iri::is_blank(&expanded) {
            return expanded;
        }
        self.resolve_iri(&expanded)
    }

    /// Standard relative-reference resolution against the active base IRI.
    pub fn resolve_iri(&self, reference: &str) -> String {
        iri::resolve(self.base(), reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loaded(source: serde_json::Value) -> Context {
        let mut ctx = Context::new(None);
        ctx.load(&source, None).unwrap();
        ctx
    }

    #[test]
    fn registered_term_beats_everything() {
        let ctx = loaded(json!({
            "@vocab": "http://vocab.example/",
            "name": "http://example.org/name"
        }));
        assert_eq!(
            ctx.expand("name", true).as_deref(),
            Some("http://example.org/name")
        );
    }

    #[test]
    fn curie_expands_through_prefix_terms() {
        let ctx = loaded(json!({"ex": "http://example.org/"}));
        assert_eq!(
            ctx.expand("ex:thing", true).as_deref(),
            Some("http://example.org/thing")
        );
    }

    #[test]
    fn non_prefix_terms_do_not_expand_curies() {
        // "name" does not end in a gen-delim, so it is not a prefix; the
        // whole value reads as an IRI with scheme "name".
        let ctx = loaded(json!({"name": "http://example.org/name"}));
        assert_eq!(ctx.expand("name:x", true).as_deref(), Some("name:x"));
    }

    #[test]
    fn blank_nodes_pass_through() {
        let ctx = loaded(json!({"ex": "http://example.org/"}));
        assert_eq!(ctx.expand("_:b0", true).as_deref(), Some("_:b0"));
        assert_eq!(ctx.resolve("_:b0"), "_:b0");
    }

    #[test]
    fn bare_word_without_vocab_is_undefined() {
        let ctx = Context::new(None);
        assert_eq!(ctx.expand("loose", true), None);
    }

    #[test]
    fn resolve_ignores_terms_and_vocab() {
        let mut ctx = Context::new(Some("http://example.org/dir/doc"));
        ctx.load(&json!({"@vocab": "http://vocab.example/"}), None)
            .unwrap();
        assert_eq!(ctx.resolve("other"), "http://example.org/dir/other");
        assert_eq!(ctx.resolve("#frag"), "http://example.org/dir/doc#frag");
    }
}
