//! IRI compaction: absolute IRIs back to the shortest known form.

use crate::context::Context;
use crate::iri;

impl Context {
    /// Compact an IRI using the prefix table and the base IRI.
    ///
    /// An exact reverse-term match wins outright. Otherwise the namespace
    /// half is tried against registered prefixes, then the IRI against the
    /// base (an exact base match compacts to the empty string, and an IRI
    /// under the base's scheme+authority compacts to the remaining suffix).
    /// Unknown IRIs come back unchanged.
    pub fn shrink_iri(&self, iri: &str) -> String {
        if let Some(term) = self.find_term(Some(iri), None, None, None, false) {
            return term.name.clone();
        }

        let (namespace, local) = iri::split_iri(iri);
        if let Some(prefix) = self.table.prefix_for(namespace) {
            return format!("{prefix}:{local}");
        }

        if let Some(base) = self.base() {
            if iri == base {
                return String::new();
            }
            if let Some(domain) = self.base_domain()
                && let Some(suffix) = iri.strip_prefix(domain)
            {
                return suffix.to_string();
            }
        }

        iri.to_string()
    }

    /// Compact an IRI to a symbol: an exact term name, a bare local name
    /// under `@vocab`, a prefixed form, or the IRI unchanged.
    pub fn to_symbol(&self, iri: &str) -> String {
        if let Some(term) = self.find_term(Some(iri), None, None, None, false) {
            return term.name.clone();
        }

        let (namespace, local) = iri::split_iri(iri);
        if self.vocab.as_deref() == Some(namespace) {
            return local.to_string();
        }
        if let Some(prefix) = self.table.prefix_for(namespace) {
            return format!("{prefix}:{local}");
        }

        iri.to_string()
    }
}
