//! Static highlight-definition generator
//!
//! Keyed off the token vocabulary alone; it knows nothing about analysis.
//! Editors consume the serialized form to build their own theme tables.

use serde::Serialize;

use crate::syntax::TokenKind;

/// One token kind mapped to a highlight scope and default color
#[derive(Debug, Clone, Serialize)]
pub struct HighlightRule {
    pub token: &'static str,
    pub scope: &'static str,
    pub color: &'static str,
}

/// Full highlight definition for plan documents
#[derive(Debug, Clone, Serialize)]
pub struct HighlightDefinition {
    pub name: &'static str,
    pub rules: Vec<HighlightRule>,
}

/// Builds the highlight definition covering every token kind
pub fn definition() -> HighlightDefinition {
    let rules = TokenKind::all()
        .iter()
        .map(|kind| HighlightRule {
            token: kind.name(),
            scope: scope_for(*kind),
            color: color_for(*kind),
        })
        .collect();

    HighlightDefinition {
        name: "dayplan",
        rules,
    }
}

fn scope_for(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Marker => "punctuation.definition.list.dayplan",
        TokenKind::DirectiveMarker => "punctuation.definition.keyword.dayplan",
        TokenKind::Comma => "punctuation.separator.dayplan",
        TokenKind::Equals => "punctuation.separator.key-value.dayplan",
        TokenKind::PathStart => "punctuation.definition.tag.begin.dayplan",
        TokenKind::PathSep => "punctuation.separator.tag.dayplan",
        TokenKind::Comment => "comment.line.number-sign.dayplan",
        TokenKind::Duration => "constant.numeric.duration.dayplan",
        TokenKind::ClockTime => "constant.numeric.time.dayplan",
        TokenKind::NamedTime => "constant.language.time.dayplan",
        TokenKind::Word => "string.unquoted.title.dayplan",
        TokenKind::Run => "invalid.illegal.dayplan",
        TokenKind::Eol => "meta.eol.dayplan",
    }
}

fn color_for(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Marker | TokenKind::DirectiveMarker => "#c678dd",
        TokenKind::Comma | TokenKind::Equals => "#abb2bf",
        TokenKind::PathStart | TokenKind::PathSep => "#56b6c2",
        TokenKind::Comment => "#5c6370",
        TokenKind::Duration => "#d19a66",
        TokenKind::ClockTime | TokenKind::NamedTime => "#61afef",
        TokenKind::Word => "#e5c07b",
        TokenKind::Run => "#e06c75",
        TokenKind::Eol => "#abb2bf",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_covers_every_token_kind() {
        let def = definition();
        assert_eq!(def.rules.len(), TokenKind::all().len());
        for kind in TokenKind::all() {
            assert!(def.rules.iter().any(|r| r.token == kind.name()));
        }
    }

    #[test]
    fn definition_serializes() {
        let json = serde_json::to_string_pretty(&definition()).unwrap();
        assert!(json.contains("constant.numeric.duration.dayplan"));
    }
}
