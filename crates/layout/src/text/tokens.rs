//! Flattening of content units into a breakable token stream.

use serde::Serialize;
use verso_types::{ContentUnit, FootnoteId, TextRun, TextStyle};

/// What a token is rendered as; decides its face and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Body,
    Heading,
    VerseNumber,
    Marker,
    Footnote,
    FootnoteLabel,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Body,
        Role::Heading,
        Role::VerseNumber,
        Role::Marker,
        Role::Footnote,
        Role::FootnoteLabel,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Non-whitespace text. Adjacent words and markers glue into one cluster.
    Word,
    /// A whitespace run; the only place a line may break without hyphenation.
    Space,
    /// Zero-width footnote anchor.
    Marker(FootnoteId),
    /// Verse number label; a cluster of its own.
    Verse(u32),
    /// Footnote label at the head of a footnote body.
    Label,
    /// Forced line end.
    Break,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub role: Role,
    pub style: TextStyle,
    /// Index of the content unit (or footnote run) the token came from.
    pub unit: usize,
    /// Byte offset of `text` within that unit's text.
    pub offset: usize,
}

impl Token {
    fn glues(&self) -> bool {
        matches!(self.kind, TokenKind::Word | TokenKind::Marker(_))
    }
}

/// Position in a [`TokenStream`]: a token index plus a byte offset into that
/// token's text, non-zero only inside a word split by hyphenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Cursor {
    pub token: usize,
    pub offset: usize,
}

impl Cursor {
    pub const START: Cursor = Cursor {
        token: 0,
        offset: 0,
    };

    pub fn at(token: usize) -> Self {
        Self { token, offset: 0 }
    }
}

// Non-breaking spaces keep their neighbours in one cluster.
fn is_break_space(c: char) -> bool {
    c.is_whitespace() && !matches!(c, '\u{00A0}' | '\u{2007}' | '\u{202F}')
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Tokenizes a chapter body.
    pub fn from_units(units: &[ContentUnit]) -> Self {
        let mut stream = Self::default();
        for (unit, content) in units.iter().enumerate() {
            match content {
                ContentUnit::Heading { text } => {
                    stream.push_break(unit);
                    stream.push_text(text, Role::Heading, TextStyle::Regular, unit);
                    stream.push_break(unit);
                }
                ContentUnit::VerseStart { number } => {
                    stream.push_break(unit);
                    stream.tokens.push(Token {
                        kind: TokenKind::Verse(*number),
                        text: number.to_string(),
                        role: Role::VerseNumber,
                        style: TextStyle::Regular,
                        unit,
                        offset: 0,
                    });
                }
                ContentUnit::TextRun(run) => {
                    stream.push_text(&run.text, Role::Body, run.style, unit);
                }
                ContentUnit::FootnoteMarker { id } => {
                    stream.tokens.push(Token {
                        kind: TokenKind::Marker(id.clone()),
                        text: String::new(),
                        role: Role::Marker,
                        style: TextStyle::Regular,
                        unit,
                        offset: 0,
                    });
                }
            }
        }
        stream
    }

    /// Tokenizes one footnote: its label followed by the body runs.
    /// Run `i` of the body is recorded as unit `i`.
    pub fn from_footnote(label: &str, body: &[TextRun]) -> Self {
        let mut stream = Self::default();
        stream.tokens.push(Token {
            kind: TokenKind::Label,
            text: label.to_string(),
            role: Role::FootnoteLabel,
            style: TextStyle::Regular,
            unit: 0,
            offset: 0,
        });
        for (unit, run) in body.iter().enumerate() {
            stream.push_text(&run.text, Role::Footnote, run.style, unit);
        }
        stream
    }

    fn push_break(&mut self, unit: usize) {
        let needed = self
            .tokens
            .last()
            .is_some_and(|last| last.kind != TokenKind::Break);
        if needed {
            self.tokens.push(Token {
                kind: TokenKind::Break,
                text: String::new(),
                role: Role::Body,
                style: TextStyle::Regular,
                unit,
                offset: 0,
            });
        }
    }

    fn push_text(&mut self, text: &str, role: Role, style: TextStyle, unit: usize) {
        let mut push = |kind: TokenKind, start: usize, end: usize| {
            self.tokens.push(Token {
                kind,
                text: text[start..end].to_string(),
                role,
                style,
                unit,
                offset: start,
            });
        };

        if text.is_empty() {
            // Empty runs still occupy a slot so the unit sequence survives layout.
            push(TokenKind::Word, 0, 0);
            return;
        }

        let mut start = 0;
        let mut in_space = None;
        for (i, c) in text.char_indices() {
            let space = is_break_space(c);
            match in_space {
                Some(current) if current != space => {
                    let kind = if current { TokenKind::Space } else { TokenKind::Word };
                    push(kind, start, i);
                    start = i;
                }
                _ => {}
            }
            in_space = Some(space);
        }
        let kind = if in_space == Some(true) {
            TokenKind::Space
        } else {
            TokenKind::Word
        };
        push(kind, start, text.len());
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Moves past forced breaks; a line never starts with one.
    pub fn skip_breaks(&self, mut cursor: Cursor) -> Cursor {
        while let Some(token) = self.tokens.get(cursor.token) {
            if token.kind != TokenKind::Break {
                break;
            }
            cursor = Cursor::at(cursor.token + 1);
        }
        cursor
    }

    /// `true` when nothing but forced breaks remains at or after `cursor`.
    pub fn is_exhausted(&self, cursor: Cursor) -> bool {
        self.skip_breaks(cursor).token >= self.tokens.len()
    }

    /// One past the last token of the cluster starting at `start`.
    pub fn cluster_end(&self, start: usize) -> usize {
        let Some(first) = self.tokens.get(start) else {
            return start;
        };
        if !first.glues() {
            return start + 1;
        }
        let mut end = start + 1;
        while self.tokens.get(end).is_some_and(Token::glues) {
            end += 1;
        }
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(stream: &TokenStream) -> Vec<&TokenKind> {
        stream.tokens().iter().map(|t| &t.kind).collect()
    }

    #[test]
    fn test_text_splits_on_whitespace_with_offsets() {
        let stream = TokenStream::from_units(&[ContentUnit::text("In the  beginning")]);
        let texts: Vec<&str> = stream.tokens().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["In", " ", "the", "  ", "beginning"]);
        assert_eq!(stream.tokens()[4].offset, 8);
        assert_eq!(stream.tokens()[3].kind, TokenKind::Space);
    }

    #[test]
    fn test_headings_and_verses_force_breaks() {
        let stream = TokenStream::from_units(&[
            ContentUnit::heading("Chapter 1"),
            ContentUnit::verse(1),
            ContentUnit::text("Text."),
            ContentUnit::verse(2),
        ]);
        assert_eq!(
            kinds(&stream),
            vec![
                &TokenKind::Word,
                &TokenKind::Space,
                &TokenKind::Word,
                &TokenKind::Break,
                &TokenKind::Verse(1),
                &TokenKind::Word,
                &TokenKind::Break,
                &TokenKind::Verse(2),
            ]
        );
    }

    #[test]
    fn test_markers_glue_into_clusters() {
        let stream = TokenStream::from_units(&[
            ContentUnit::text("the Lord"),
            ContentUnit::marker("n1"),
            ContentUnit::text(", and"),
        ]);
        // "Lord" + marker + "," form one cluster.
        assert_eq!(stream.cluster_end(2), 5);
        assert_eq!(stream.cluster_end(0), 1);
    }

    #[test]
    fn test_empty_run_keeps_a_token_and_nbsp_glues() {
        let stream = TokenStream::from_units(&[ContentUnit::text(""), ContentUnit::text("a\u{A0}b")]);
        assert_eq!(stream.len(), 2);
        assert_eq!(stream.tokens()[0].text, "");
        assert_eq!(stream.tokens()[1].text, "a\u{A0}b");
    }

    #[test]
    fn test_exhaustion_ignores_trailing_breaks() {
        let stream = TokenStream::from_units(&[ContentUnit::text("x"), ContentUnit::heading("")]);
        assert!(!stream.is_exhausted(Cursor::START));
        assert!(stream.is_exhausted(Cursor::at(4)));
    }
}
