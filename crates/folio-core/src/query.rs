//! Search operator parsing and FTS5 query compilation.
//!
//! Centralizing operator→query translation in one pure function means
//! engine-specific syntax lives in exactly one place, and each operator can
//! be unit-tested without a live index.

use serde::{Deserialize, Serialize};

use crate::defaults::MAX_QUERY_LENGTH;
use crate::error::{Error, Result};

/// Placeholder emitted when a token sanitizes down to nothing; matches no
/// real document.
const EMPTY_TOKEN: &str = "__empty_token__";

/// Placeholder emitted for tokens that look like injection attempts.
const INVALID_TOKEN: &str = "__invalid_token__";

/// Relational search operator, parsed from its symbolic form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchOperator {
    /// `=` — exact phrase.
    ExactPhrase,
    /// `*=*` — contains all tokens (unordered AND).
    ContainsAll,
    /// `!=` — contains none of the tokens.
    NotContains,
    /// `*=` — ends-with. Approximated as a prefix search: FTS5 has no
    /// native suffix matching, so this is documented best-effort, not a
    /// true suffix test.
    EndsWith,
    /// `=*` — starts-with.
    StartsWith,
    /// `~=` — fuzzy: match any one token.
    FuzzyAny,
    /// `~*` — fuzzy contains: match any one token.
    FuzzyContains,
}

impl SearchOperator {
    /// Parse the symbolic operator form. Unrecognized operators default to
    /// contains-all.
    pub fn parse(s: &str) -> Self {
        match s {
            "=" => SearchOperator::ExactPhrase,
            "*=*" => SearchOperator::ContainsAll,
            "!=" => SearchOperator::NotContains,
            "*=" => SearchOperator::EndsWith,
            "=*" => SearchOperator::StartsWith,
            "~=" => SearchOperator::FuzzyAny,
            "~*" => SearchOperator::FuzzyContains,
            _ => SearchOperator::ContainsAll,
        }
    }

    /// Whether this operator negates its tokens. Negation cannot be
    /// evaluated by an FTS5 MATCH alone (the grammar has no unary NOT), so
    /// the executor routes it through the normalized side table instead.
    pub fn is_negation(&self) -> bool {
        matches!(self, SearchOperator::NotContains)
    }
}

/// Sanitize a token for safe embedding in an FTS5 MATCH expression.
///
/// FTS5 metacharacters are stripped and whitespace collapsed. Tokens that
/// end up empty, or that carry SQL comment/statement separators, are
/// replaced with inert placeholders rather than rejected, so one bad token
/// cannot fail the whole query.
pub fn sanitize_fts_token(token: &str) -> String {
    let sanitized: String = token
        .chars()
        .filter(|c| !matches!(c, '"' | '(' | ')' | '*'))
        .collect();
    let sanitized = sanitized.split_whitespace().collect::<Vec<_>>().join(" ");

    if sanitized.is_empty() {
        tracing::debug!(
            subsystem = "search",
            component = "query_compiler",
            token,
            "token became empty after sanitization"
        );
        return EMPTY_TOKEN.to_string();
    }

    if sanitized.contains(';') || sanitized.contains("--") {
        tracing::warn!(
            subsystem = "search",
            component = "query_compiler",
            token,
            "suspicious token rejected"
        );
        return INVALID_TOKEN.to_string();
    }

    sanitized
}

/// Compile a token list and operator into an FTS5 MATCH expression.
///
/// | operator | compiled form |
/// |----------|---------------|
/// | `=`      | tokens joined into one quoted phrase |
/// | `*=*`    | quoted tokens joined by AND |
/// | `!=`     | `NOT "tok"` per token, joined by AND |
/// | `*=`     | `tok*` joined by AND (prefix approximation) |
/// | `=*`     | `tok*` joined by AND |
/// | `~=`/`~*`| quoted tokens joined by OR |
pub fn compile_fts_query(tokens: &[String], operator: SearchOperator) -> Result<String> {
    if tokens.is_empty() {
        return Err(Error::QuerySyntax {
            query: String::new(),
            message: "no search tokens provided".to_string(),
        });
    }

    let sanitized: Vec<String> = tokens.iter().map(|t| sanitize_fts_token(t)).collect();

    let query = match operator {
        SearchOperator::ExactPhrase => format!("\"{}\"", sanitized.join(" ")),
        SearchOperator::ContainsAll => sanitized
            .iter()
            .map(|t| format!("\"{}\"", t))
            .collect::<Vec<_>>()
            .join(" AND "),
        SearchOperator::NotContains => sanitized
            .iter()
            .map(|t| format!("NOT \"{}\"", t))
            .collect::<Vec<_>>()
            .join(" AND "),
        SearchOperator::EndsWith | SearchOperator::StartsWith => sanitized
            .iter()
            .map(|t| format!("{}*", t))
            .collect::<Vec<_>>()
            .join(" AND "),
        SearchOperator::FuzzyAny | SearchOperator::FuzzyContains => sanitized
            .iter()
            .map(|t| format!("\"{}\"", t))
            .collect::<Vec<_>>()
            .join(" OR "),
    };

    if query.len() > MAX_QUERY_LENGTH {
        return Err(Error::QuerySyntax {
            query: query[..MAX_QUERY_LENGTH].to_string(),
            message: format!(
                "compiled query too long: {} characters (max {})",
                query.len(),
                MAX_QUERY_LENGTH
            ),
        });
    }

    Ok(query)
}
