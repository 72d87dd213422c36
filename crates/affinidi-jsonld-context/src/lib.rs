/*!
 * JSON-LD context processing (versions 1.0 and 1.1).
 *
 * Resolves a JSON-LD `@context` document into a queryable term dictionary:
 * loading and merging context sources, expanding compact terms and CURIEs to
 * absolute IRIs, compacting IRIs back to short names, and selecting
 * type-scoped and property-scoped contexts during node traversal.
 *
 * Raw context bodies and node objects are plain [`serde_json::Value`]s;
 * remote context references go through an injected [`ContextFetcher`], so
 * the crate performs no IO of its own. JSON tokenizing and RDF graph
 * construction are left to the caller.
 *
 * # Example
 *
 * ```
 * use affinidi_jsonld_context::Context;
 * use serde_json::json;
 *
 * let mut ctx = Context::new(None);
 * ctx.load(
 *     &json!({
 *         "schema": "http://schema.example/",
 *         "name": "schema:name"
 *     }),
 *     None,
 * )
 * .unwrap();
 *
 * assert_eq!(
 *     ctx.expand("name", true).as_deref(),
 *     Some("http://schema.example/name")
 * );
 * assert_eq!(ctx.to_symbol("http://schema.example/name"), "name");
 * assert_eq!(ctx.shrink_iri("http://schema.example/other"), "schema:other");
 * ```
 */

pub mod context;
pub mod error;
pub mod keywords;
pub mod loader;
pub mod term;

mod compact;
mod expand;
mod iri;

pub use context::Context;
pub use error::{ContextError, Result};
pub use iri::is_blank;
pub use keywords::Keyword;
pub use loader::{ContextFetcher, NoRemoteContexts, StaticContexts};
pub use term::{ContainerKind, Term, TermOptions, TermTable};
