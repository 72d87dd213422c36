//! IRI splitting and relative-reference helpers.

use url::{Position, Url};

/// Split an expression into `(is_bare_word, prefix, rest)` on the first
/// colon not followed by `//`.
///
/// A bare word has no colon at all; an expression whose colon introduces
/// `//` is a full IRI and carries no prefix.
pub(crate) fn prep_expand(expr: &str) -> (bool, Option<&str>, &str) {
    match expr.split_once(':') {
        None => (true, None, expr),
        Some((prefix, local)) if !local.starts_with("//") => (false, Some(prefix), local),
        Some(_) => (false, None, expr),
    }
}

/// Split an IRI into (namespace, local name) after the last `#`, `/` or `:`.
pub(crate) fn split_iri(iri: &str) -> (&str, &str) {
    match iri.rfind(['#', '/', ':']) {
        Some(idx) => iri.split_at(idx + 1),
        None => (iri, ""),
    }
}

/// Whether `reference` is a blank-node identifier.
pub fn is_blank(reference: &str) -> bool {
    reference.starts_with("_:")
}

/// Drop a trailing fragment, if any.
pub(crate) fn strip_fragment(iri: &str) -> &str {
    match iri.find('#') {
        Some(idx) => &iri[..idx],
        None => iri,
    }
}

/// The `scheme://authority` part of an absolute IRI, when it has one.
pub(crate) fn scheme_authority(iri: &str) -> Option<String> {
    let url = Url::parse(iri).ok()?;
    if !url.has_authority() {
        return None;
    }
    Some(url[..Position::BeforePath].to_string())
}

/// Standard relative-reference resolution of `reference` against `base`.
///
/// Already-absolute references and references without a usable base come
/// back unchanged.
pub(crate) fn resolve(base: Option<&str>, reference: &str) -> String {
    if Url::parse(reference).is_ok() {
        return reference.to_string();
    }
    let Some(base) = base else {
        return reference.to_string();
    };
    match Url::parse(base).and_then(|b| b.join(reference)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => reference.to_string(),
    }
}
