//! Context source loading: flattening, remote fetching and term commits.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde_json::{Map, Value};

use crate::context::Context;
use crate::error::{ContextError, Result};
use crate::iri;
use crate::keywords::{self, Keyword, rdf};
use crate::term::{ContainerKind, TermOptions};

/// Injected fetch capability for remote context references.
///
/// Implementations return the parsed JSON document at `iri` or fail with
/// their own error message. Fetching is treated as blocking; the loader
/// performs no retries.
pub trait ContextFetcher: Send + Sync {
    fn fetch(&self, iri: &str) -> Result<Value>;
}

/// Default fetch capability: refuses every remote context reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRemoteContexts;

impl ContextFetcher for NoRemoteContexts {
    fn fetch(&self, iri: &str) -> Result<Value> {
        Err(ContextError::fetch(format!(
            "remote contexts are disabled: {iri}"
        )))
    }
}

/// In-memory fetch capability mapping IRIs to pre-parsed documents.
///
/// Useful for bundled well-known contexts and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticContexts {
    documents: HashMap<String, Value>,
}

impl StaticContexts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, iri: impl Into<String>, document: Value) {
        self.documents.insert(iri.into(), document);
    }
}

impl ContextFetcher for StaticContexts {
    fn fetch(&self, iri: &str) -> Result<Value> {
        self.documents
            .get(iri)
            .cloned()
            .ok_or_else(|| ContextError::fetch(format!("no document registered for {iri}")))
    }
}

/// A flattened raw context body paired with the IRI it was fetched from
/// (`None` for inline bodies).
type RawBody = (Option<String>, Map<String, Value>);

impl Context {
    /// Load a context value: a single object, a string reference, or an
    /// ordered list mixing both. Later entries override earlier ones on
    /// name collision.
    ///
    /// All sources are flattened (and remote references fetched) before any
    /// term is committed, so a failure mid-flattening leaves the term table
    /// exactly as it was before the call.
    pub fn load(&mut self, source: &Value, base: Option<&str>) -> Result<()> {
        self.active = true;
        let mut bodies: Vec<RawBody> = Vec::new();
        let mut visited: HashSet<String> = HashSet::new();
        self.flatten(base, source, None, &mut visited, &mut bodies)?;

        tracing::debug!(bodies = bodies.len(), "committing flattened context sources");
        for (source_iri, body) in bodies {
            self.commit(&body, source_iri.as_deref());
        }
        Ok(())
    }

    fn flatten(
        &self,
        base: Option<&str>,
        source: &Value,
        in_source_iri: Option<&str>,
        visited: &mut HashSet<String>,
        out: &mut Vec<RawBody>,
    ) -> Result<()> {
        match source {
            Value::Null => Ok(()),
            Value::Array(items) => {
                for item in items {
                    self.flatten(base, item, in_source_iri, visited, out)?;
                }
                Ok(())
            }
            Value::String(reference) => {
                let source_iri = iri::resolve(base, reference);
                if !visited.insert(source_iri.clone()) {
                    return Err(ContextError::recursive(&source_iri));
                }
                let document = self.fetcher.fetch(&source_iri)?;
                let Some(wrapped) = document.get(keywords::CONTEXT) else {
                    return Err(ContextError::invalid_remote(&source_iri));
                };
                self.flatten(base, wrapped, Some(&source_iri), visited, out)
            }
            Value::Object(body) => {
                // An inline wrapper object is unwrapped before its value
                // (possibly itself a list) is flattened.
                if let Some(wrapped) = body.get(keywords::CONTEXT) {
                    self.flatten(base, wrapped, in_source_iri, visited, out)
                } else {
                    out.push((in_source_iri.map(str::to_string), body.clone()));
                    Ok(())
                }
            }
            // Other scalars are tolerated and contribute nothing.
            _ => Ok(()),
        }
    }

    /// Commit one raw body: `@vocab` and `@version` first, then `@base`
    /// (inline bodies only), `@propagate`, `@language`, and every remaining
    /// key as a term definition.
    fn commit(&mut self, body: &Map<String, Value>, source_iri: Option<&str>) {
        match body.get(keywords::VOCAB) {
            Some(Value::String(vocab)) => self.vocab = Some(vocab.clone()),
            Some(Value::Null) => self.vocab = None,
            _ => {}
        }
        if let Some(version) = body.get(keywords::VERSION).and_then(Value::as_f64) {
            self.version = version;
        }

        for (key, value) in body {
            match key.as_str() {
                keywords::VOCAB | keywords::VERSION => {}
                keywords::BASE => {
                    // A remote context never moves the local base IRI.
                    if source_iri.is_none() {
                        match value {
                            Value::String(new_base) => self.rebase(new_base),
                            Value::Null => self.clear_base(),
                            _ => {}
                        }
                    }
                }
                keywords::PROPAGATE => {
                    if let Some(flag) = value.as_bool() {
                        self.propagate = flag;
                    }
                }
                keywords::LANGUAGE => {
                    self.language = value.as_str().map(str::to_string);
                }
                _ => self.read_term(body, key, value),
            }
        }
    }

    /// Read one term definition out of a raw body and register it.
    fn read_term(&mut self, body: &Map<String, Value>, name: &str, dfn: &Value) {
        let version = self.version;

        if let Some(dfn) = dfn.as_object() {
            let rev = dfn.get(keywords::REVERSE).and_then(Value::as_str);
            let raw_id = rev.or_else(|| dfn.get(keywords::ID).and_then(Value::as_str));
            let id_present = rev.is_some() || dfn.contains_key(keywords::ID);

            let idref = if let Some(raw) = raw_id {
                if raw == keywords::TYPE {
                    Some(rdf::TYPE.to_string())
                } else {
                    Some(self.rec_expand(body, raw))
                }
            } else if id_present {
                // An explicit null (or malformed) @id leaves the term unmapped.
                None
            } else if name.contains(':') {
                Some(self.rec_expand(body, name))
            } else {
                self.vocab.as_ref().map(|vocab| format!("{vocab}{name}"))
            };

            let coercion = dfn.get(keywords::TYPE).and_then(Value::as_str).map(|t| {
                if matches!(t, keywords::ID | keywords::TYPE | keywords::VOCAB) {
                    t.to_string()
                } else {
                    self.rec_expand(body, t)
                }
            });

            let options = TermOptions {
                coercion,
                container: parse_container(dfn.get(keywords::CONTAINER)),
                index: dfn
                    .get(keywords::INDEX)
                    .and_then(Value::as_str)
                    .map(str::to_string),
                language: dfn
                    .get(keywords::LANGUAGE)
                    .and_then(Value::as_str)
                    .map(str::to_string),
                reverse: rev.is_some(),
                context: dfn.get(keywords::CONTEXT).cloned(),
                prefix: dfn.get(keywords::PREFIX).and_then(Value::as_bool),
            };
            self.table.add_term(version, name, idref.clone(), options);
            self.register_alias(idref.as_deref(), name);
        } else {
            let idref = dfn.as_str().map(|s| self.rec_expand(body, s));
            self.table
                .add_term(version, name, idref.clone(), TermOptions::default());
            self.register_alias(idref.as_deref(), name);
        }
    }

    fn register_alias(&mut self, idref: Option<&str>, name: &str) {
        if let Some(keyword) = idref.and_then(Keyword::parse) {
            self.table.add_alias(keyword, name);
        }
    }

    /// Expand a raw idref/type expression that may reference another term
    /// defined earlier in the same raw body (not yet committed) or an
    /// already-committed term.
    ///
    /// Runs as an explicit fixed-point loop: stop when the expansion stops
    /// changing or reaches a reserved keyword.
    fn rec_expand(&self, body: &Map<String, Value>, expr: &str) -> String {
        let mut expr = expr.to_string();
        let mut prev: Option<String> = None;
        // Each productive step consumes a term reference, so a cycle of
        // mutual references is exhausted within one pass over the body.
        let mut remaining = body.len().max(8);

        loop {
            if prev.as_deref() == Some(expr.as_str()) || Keyword::parse(&expr).is_some() {
                return expr;
            }
            if remaining == 0 {
                return expr;
            }
            remaining -= 1;

            let (_, prefix, rest) = iri::prep_expand(&expr);
            let next = if let Some(pfx) = prefix {
                match self.source_id(body, pfx) {
                    Some(namespace) => format!("{namespace}{rest}"),
                    // A "prefix" that is just the vocab minus its colon is
                    // left alone.
                    None if self
                        .vocab
                        .as_deref()
                        .is_some_and(|vocab| vocab.strip_suffix(':') == Some(pfx)) =>
                    {
                        return expr;
                    }
                    None => expr.clone(),
                }
            } else {
                let word = self
                    .source_id(body, rest)
                    .unwrap_or_else(|| rest.to_string());
                if !word.contains(':')
                    && let Some(vocab) = &self.vocab
                {
                    return format!("{vocab}{word}");
                }
                word
            };

            prev = Some(std::mem::replace(&mut expr, next));
        }
    }

    /// Resolve a referenced name against the in-progress raw body first,
    /// then against already-committed terms.
    fn source_id(&self, body: &Map<String, Value>, key: &str) -> Option<String> {
        match body.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Object(dfn)) => dfn
                .get(keywords::ID)
                .and_then(Value::as_str)
                .map(str::to_string),
            Some(_) => None,
            None => self.table.get(key).and_then(|term| term.id.clone()),
        }
    }
}

fn parse_container(value: Option<&Value>) -> BTreeSet<ContainerKind> {
    match value {
        Some(Value::String(s)) => ContainerKind::parse(s).into_iter().collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(ContainerKind::parse)
            .collect(),
        _ => BTreeSet::new(),
    }
}
