//! The active context: term tables, processing flags and scope chain.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::iri;
use crate::keywords::Keyword;
use crate::loader::{ContextFetcher, NoRemoteContexts};
use crate::term::{Term, TermTable};

/// An active mapping from term names to IRIs plus processing flags.
///
/// A root context is created per document entry point and loads an initial
/// context value. Subcontexts branch off during node traversal; they copy
/// the tables at branch time and never mutate an ancestor, so parent, child
/// and sibling contexts coexist without synchronization once loading is done.
#[derive(Clone)]
pub struct Context {
    /// JSON-LD processing version; 1.1 enables scoped contexts and the
    /// explicit `@prefix` flag.
    pub version: f64,
    pub language: Option<String>,
    pub vocab: Option<String>,
    base: Option<String>,
    base_domain: Option<String>,
    /// The document's own base IRI; unlike `base` it is never moved by a
    /// `@base` declaration.
    pub doc_base: Option<String>,
    pub(crate) table: TermTable,
    /// Set once the context has loaded at least one source.
    pub active: bool,
    /// Whether this scope remains active beyond the node that introduced it.
    pub propagate: bool,
    parent: Option<Arc<Context>>,
    pub(crate) fetcher: Arc<dyn ContextFetcher>,
}

impl Context {
    /// Create an empty context with remote context references disabled.
    pub fn new(base: Option<&str>) -> Self {
        Self::with_fetcher(base, Arc::new(NoRemoteContexts))
    }

    /// Create an empty context using `fetcher` for remote context references.
    pub fn with_fetcher(base: Option<&str>, fetcher: Arc<dyn ContextFetcher>) -> Self {
        let base = base.map(|b| iri::strip_fragment(b).to_string());
        let base_domain = base.as_deref().and_then(iri::scheme_authority);
        Context {
            version: 1.0,
            language: None,
            vocab: None,
            doc_base: base.clone(),
            base,
            base_domain,
            table: TermTable::default(),
            active: false,
            propagate: true,
            parent: None,
            fetcher,
        }
    }

    /// The active base IRI.
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub(crate) fn base_domain(&self) -> Option<&str> {
        self.base_domain.as_deref()
    }

    /// Move the base IRI, resolving `value` against the current base and
    /// dropping any fragment.
    pub(crate) fn rebase(&mut self, value: &str) {
        let resolved = self.resolve_iri(iri::strip_fragment(value));
        self.base_domain = iri::scheme_authority(&resolved);
        self.base = Some(resolved);
    }

    pub(crate) fn clear_base(&mut self) {
        self.base = None;
        self.base_domain = None;
    }

    /// The fallback ancestor for scope selection, if any.
    pub fn parent(&self) -> Option<&Context> {
        self.parent.as_deref()
    }

    /// Look up a term definition by name.
    pub fn get_term(&self, name: &str) -> Option<&Term> {
        self.table.get(name)
    }

    /// Compaction term selection; see [`TermTable::find_term`].
    pub fn find_term(
        &self,
        idref: Option<&str>,
        coercion: Option<&str>,
        container: Option<&str>,
        language: Option<&str>,
        reverse: bool,
    ) -> Option<&Term> {
        self.table
            .find_term(idref, coercion, container, language, reverse)
    }

    /// Create a child context scoped under this one.
    ///
    /// The child copies this context's settings and tables, then commits
    /// `source` on top. Its fallback parent reference skips a
    /// non-propagating current scope in favor of that scope's own parent, so
    /// a non-propagating scope stays transparent to further nesting.
    pub fn subcontext(&self, source: &Value, propagate: bool) -> Result<Context> {
        let fallback = if self.propagate {
            Arc::new(self.clone())
        } else {
            self.parent
                .clone()
                .unwrap_or_else(|| Arc::new(self.clone()))
        };

        let mut child = self.clone();
        child.parent = Some(fallback);
        child.propagate = propagate;
        child.active = false;
        child.load(source, None)?;
        Ok(child)
    }

    /// Select the effective context for processing property `key` of `node`
    /// under version 1.1 scoped-context rules.
    ///
    /// Type-scoped contexts win over property-scoped ones: the node's types
    /// are sorted lexicographically and the first type whose term carries a
    /// nested context activates it with `propagate = false` (it never
    /// outlives the node). A property-scoped context activates with
    /// `propagate = true` and persists into nested values. With neither,
    /// the nearest propagating context is returned.
    pub fn get_context_for(&self, key: &str, node: &Value) -> Result<Context> {
        if self.version >= 1.1 {
            let mut types: Vec<String> = match self.get_type(node) {
                Some(Value::String(s)) => vec![s.clone()],
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
                _ => Vec::new(),
            };
            types.sort();

            for rtype in &types {
                if let Some(term) = self.table.get(rtype)
                    && let Some(scoped) = term.context.as_ref()
                {
                    tracing::debug!(node_type = %rtype, "activating type-scoped context");
                    return self.subcontext(scoped, false);
                }
            }

            if let Some(term) = self.table.get(key)
                && let Some(scoped) = term.context.as_ref()
            {
                return self.subcontext(scoped, true);
            }
        }

        if self.propagate {
            Ok(self.clone())
        } else {
            Ok(self
                .parent
                .as_deref()
                .cloned()
                .unwrap_or_else(|| self.clone()))
        }
    }

    /// The `@id` entry of `node`, honoring declared aliases.
    pub fn get_id<'a>(&self, node: &'a Value) -> Option<&'a Value> {
        self.get_entry(node, Keyword::Id)
    }

    pub fn get_type<'a>(&self, node: &'a Value) -> Option<&'a Value> {
        self.get_entry(node, Keyword::Type)
    }

    pub fn get_language<'a>(&self, node: &'a Value) -> Option<&'a Value> {
        self.get_entry(node, Keyword::Language)
    }

    pub fn get_value<'a>(&self, node: &'a Value) -> Option<&'a Value> {
        self.get_entry(node, Keyword::Value)
    }

    pub fn get_graph<'a>(&self, node: &'a Value) -> Option<&'a Value> {
        self.get_entry(node, Keyword::Graph)
    }

    pub fn get_list<'a>(&self, node: &'a Value) -> Option<&'a Value> {
        self.get_entry(node, Keyword::List)
    }

    pub fn get_set<'a>(&self, node: &'a Value) -> Option<&'a Value> {
        self.get_entry(node, Keyword::Set)
    }

    pub fn get_rev<'a>(&self, node: &'a Value) -> Option<&'a Value> {
        self.get_entry(node, Keyword::Reverse)
    }

    /// Fetch a keyword entry from a node object, trying user-declared
    /// aliases in registration order before the canonical keyword.
    fn get_entry<'a>(&self, node: &'a Value, keyword: Keyword) -> Option<&'a Value> {
        let obj = node.as_object()?;
        for alias in self.table.aliases(keyword) {
            if let Some(value) = obj.get(alias) {
                return Some(value);
            }
        }
        obj.get(keyword.as_str())
    }

    /// Aliases for a keyword in registration order, then the keyword itself.
    pub fn get_keys(&self, keyword: Keyword) -> impl Iterator<Item = &str> {
        self.table.get_keys(keyword)
    }

    /// The preferred spelling of a keyword: its first alias, else itself.
    pub fn get_key(&self, keyword: Keyword) -> &str {
        self.table.get_key(keyword)
    }

    pub fn id_key(&self) -> &str {
        self.get_key(Keyword::Id)
    }

    pub fn type_key(&self) -> &str {
        self.get_key(Keyword::Type)
    }

    pub fn language_key(&self) -> &str {
        self.get_key(Keyword::Language)
    }

    pub fn value_key(&self) -> &str {
        self.get_key(Keyword::Value)
    }

    pub fn list_key(&self) -> &str {
        self.get_key(Keyword::List)
    }

    pub fn rev_key(&self) -> &str {
        self.get_key(Keyword::Reverse)
    }

    pub fn graph_key(&self) -> &str {
        self.get_key(Keyword::Graph)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("version", &self.version)
            .field("language", &self.language)
            .field("vocab", &self.vocab)
            .field("base", &self.base)
            .field("doc_base", &self.doc_base)
            .field("active", &self.active)
            .field("propagate", &self.propagate)
            .field("has_parent", &self.parent.is_some())
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
