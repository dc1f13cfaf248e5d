use super::tokens::{Cursor, Role, Token, TokenKind, TokenStream};
use crate::config::{ResolvedFont, Typography};
use crate::hyphenation::HyphenationPolicy;
use crate::util::fits_within;
use serde::Serialize;
use verso_traits::{Hyphenator, MeasurementOracle};
use verso_types::{FootnoteId, TextStyle};

const HYPHEN: &str = "-";
const SOFT_HYPHEN: char = '\u{00AD}';
const STYLES: [TextStyle; 4] = [
    TextStyle::Regular,
    TextStyle::Italic,
    TextStyle::Bold,
    TextStyle::BoldItalic,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ItemKind {
    Text,
    Space,
    Marker { id: FootnoteId },
    Verse { number: u32 },
    Label,
}

/// One positioned piece of a fitted line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(flatten)]
    pub kind: ItemKind,
    pub text: String,
    pub x: f32,
    /// Advance of the item; for a hyphenated fragment this includes the hyphen.
    pub width: f32,
    pub role: Role,
    pub style: TextStyle,
    pub unit: usize,
    pub offset: usize,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hyphenated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FittedLine {
    pub items: Vec<LineItem>,
    /// Width of the content, excluding trailing spaces.
    pub width: f32,
    pub height: f32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub overfull: bool,
    #[serde(skip)]
    pub start: Cursor,
    #[serde(skip)]
    pub end: Cursor,
}

impl FittedLine {
    /// Footnote anchors on this line, in reading order.
    pub fn markers(&self) -> impl Iterator<Item = &FootnoteId> {
        self.items.iter().filter_map(|item| match &item.kind {
            ItemKind::Marker { id } => Some(id),
            _ => None,
        })
    }

    pub fn verses(&self) -> impl Iterator<Item = u32> + '_ {
        self.items.iter().filter_map(|item| match item.kind {
            ItemKind::Verse { number } => Some(number),
            _ => None,
        })
    }

    /// The line's text as it would be read, hyphens included.
    ///
    /// Item texts keep the source characters; only this rendering drops a
    /// soft hyphen that ends a hyphenated fragment.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for item in &self.items {
            match item.kind {
                ItemKind::Verse { number } => {
                    text.push_str(&number.to_string());
                    text.push(' ');
                }
                ItemKind::Label => {
                    text.push_str(&item.text);
                    text.push(' ');
                }
                _ if item.hyphenated => {
                    // A soft hyphen at the break is shown as the hyphen itself.
                    let shown = item.text.strip_suffix(SOFT_HYPHEN).unwrap_or(&item.text);
                    text.push_str(shown);
                }
                _ => text.push_str(&item.text),
            }
            if item.hyphenated {
                text.push_str(HYPHEN);
            }
        }
        text
    }
}

struct Piece {
    token: usize,
    start: usize,
    end: usize,
    width: f32,
    hyphenated: bool,
}

#[derive(Default)]
struct LineBuilder {
    items: Vec<LineItem>,
    width: f32,
    pending: f32,
    has_content: bool,
    overfull: bool,
}

impl LineBuilder {
    fn advance(&self) -> f32 {
        self.width + self.pending
    }

    fn push(&mut self, token: &Token, piece: &Piece) {
        let kind = match &token.kind {
            TokenKind::Space => ItemKind::Space,
            TokenKind::Marker(id) => ItemKind::Marker { id: id.clone() },
            TokenKind::Verse(number) => ItemKind::Verse { number: *number },
            TokenKind::Label => ItemKind::Label,
            TokenKind::Word | TokenKind::Break => ItemKind::Text,
        };
        let x = self.advance();
        if kind == ItemKind::Space {
            self.pending += piece.width;
        } else {
            self.width = x + piece.width;
            self.pending = 0.0;
            self.has_content = true;
        }
        self.items.push(LineItem {
            kind,
            text: token.text[piece.start..piece.end].to_string(),
            x,
            width: piece.width,
            role: token.role,
            style: token.style,
            unit: token.unit,
            offset: token.offset + piece.start,
            hyphenated: piece.hyphenated,
        });
    }
}

/// Greedy line fitting over a [`TokenStream`].
///
/// [`fit`](LineBreaker::fit) is a pure function of `(stream, cursor, width)`:
/// it never mutates the stream and always returns a cursor strictly past the
/// one it was given.
#[derive(Debug)]
pub struct LineBreaker<'a> {
    oracle: &'a dyn MeasurementOracle,
    hyphenator: &'a dyn Hyphenator,
    policy: HyphenationPolicy,
    // Indexed by role, then style.
    fonts: Vec<ResolvedFont>,
    line_heights: Vec<f32>,
}

impl<'a> LineBreaker<'a> {
    pub fn new(
        oracle: &'a dyn MeasurementOracle,
        hyphenator: &'a dyn Hyphenator,
        typography: &Typography,
        policy: HyphenationPolicy,
    ) -> Self {
        let fonts: Vec<ResolvedFont> = Role::ALL
            .iter()
            .flat_map(|role| STYLES.iter().map(|style| typography.resolve(*role, *style)))
            .collect();
        let line_heights = fonts
            .iter()
            .map(|font| oracle.line_height(&font.spec, font.size))
            .collect();
        Self {
            oracle,
            hyphenator,
            policy,
            fonts,
            line_heights,
        }
    }

    fn slot(role: Role, style: TextStyle) -> usize {
        let role = Role::ALL.iter().position(|r| *r == role).unwrap_or(0);
        let style = STYLES.iter().position(|s| *s == style).unwrap_or(0);
        role * STYLES.len() + style
    }

    pub fn font(&self, role: Role, style: TextStyle) -> &ResolvedFont {
        &self.fonts[Self::slot(role, style)]
    }

    pub fn line_height(&self, role: Role, style: TextStyle) -> f32 {
        self.line_heights[Self::slot(role, style)]
    }

    pub fn oracle(&self) -> &dyn MeasurementOracle {
        self.oracle
    }

    fn text_width(&self, text: &str, role: Role, style: TextStyle) -> f32 {
        let font = self.font(role, style);
        self.oracle.width(text, &font.spec, font.size)
    }

    /// Advance of `token` from byte `start` of its text to the end.
    pub fn token_width(&self, token: &Token, start: usize) -> f32 {
        match token.kind {
            TokenKind::Word | TokenKind::Space => {
                self.text_width(&token.text[start..], token.role, token.style)
            }
            // Labels carry a trailing gap in their own face.
            TokenKind::Verse(_) | TokenKind::Label => {
                self.text_width(&token.text, token.role, token.style)
                    + self.text_width(" ", token.role, token.style)
            }
            TokenKind::Marker(_) | TokenKind::Break => 0.0,
        }
    }

    /// Fits the next line of `stream` starting at `from` into `width`.
    ///
    /// Returns `None` once only forced breaks (or nothing) remain.
    pub fn fit(&self, stream: &TokenStream, from: Cursor, width: f32) -> Option<(FittedLine, Cursor)> {
        let tokens = stream.tokens();
        let start = stream.skip_breaks(from);
        if start.token >= tokens.len() {
            return None;
        }

        let mut line = LineBuilder::default();
        let mut cursor = start;
        while let Some(token) = tokens.get(cursor.token) {
            match token.kind {
                TokenKind::Break => {
                    cursor = Cursor::at(cursor.token + 1);
                    break;
                }
                TokenKind::Space => {
                    let piece = Piece {
                        token: cursor.token,
                        start: 0,
                        end: token.text.len(),
                        width: self.token_width(token, 0),
                        hyphenated: false,
                    };
                    line.push(token, &piece);
                    cursor = Cursor::at(cursor.token + 1);
                }
                _ => {
                    let end = stream.cluster_end(cursor.token);
                    let pieces = self.cluster_pieces(tokens, cursor, end);
                    let cluster_width: f32 = pieces.iter().map(|p| p.width).sum();

                    if fits_within(line.advance() + cluster_width, width) {
                        for piece in &pieces {
                            line.push(&tokens[piece.token], piece);
                        }
                        cursor = Cursor::at(end);
                        continue;
                    }

                    if let Some((pieces, resume)) =
                        self.split_cluster(tokens, cursor, end, width - line.advance())
                    {
                        for piece in &pieces {
                            line.push(&tokens[piece.token], piece);
                        }
                        cursor = resume;
                    } else if !line.has_content {
                        // Alone and still too wide: place it anyway. Following
                        // spaces stay on this line; the next cluster cannot fit.
                        for piece in &pieces {
                            line.push(&tokens[piece.token], piece);
                        }
                        line.overfull = true;
                        cursor = Cursor::at(end);
                        continue;
                    }
                    break;
                }
            }
        }

        let height = self.height_of(&line.items);
        let fitted = FittedLine {
            items: line.items,
            width: line.width,
            height,
            overfull: line.overfull,
            start,
            end: cursor,
        };
        Some((fitted, cursor))
    }

    /// Fits every line of `stream` at `width`.
    pub fn layout_all(&self, stream: &TokenStream, width: f32) -> Vec<FittedLine> {
        let mut lines = Vec::new();
        let mut cursor = Cursor::START;
        while let Some((line, next)) = self.fit(stream, cursor, width) {
            cursor = next;
            lines.push(line);
        }
        lines
    }

    fn height_of(&self, items: &[LineItem]) -> f32 {
        let tallest = |include_markers: bool| {
            items
                .iter()
                .filter(|item| include_markers || item.role != Role::Marker)
                .map(|item| self.line_height(item.role, item.style))
                .fold(None, |acc: Option<f32>, h| Some(acc.map_or(h, |a| a.max(h))))
        };
        tallest(false).or_else(|| tallest(true)).unwrap_or(0.0)
    }

    fn cluster_pieces(&self, tokens: &[Token], from: Cursor, end: usize) -> Vec<Piece> {
        (from.token..end)
            .map(|index| {
                let token = &tokens[index];
                let start = if index == from.token { from.offset } else { 0 };
                Piece {
                    token: index,
                    start,
                    end: token.text.len(),
                    width: self.token_width(token, start),
                    hyphenated: false,
                }
            })
            .collect()
    }

    /// Finds the longest hyphenated prefix of the cluster that fits in `available`.
    fn split_cluster(
        &self,
        tokens: &[Token],
        from: Cursor,
        end: usize,
        available: f32,
    ) -> Option<(Vec<Piece>, Cursor)> {
        let mut consumed = 0.0;
        let mut best: Option<(usize, usize, f32)> = None;

        for index in from.token..end {
            let token = &tokens[index];
            let start = if index == from.token { from.offset } else { 0 };
            if token.kind == TokenKind::Word {
                let rest = &token.text[start..];
                let hyphen = self.text_width(HYPHEN, token.role, token.style);
                for point in self.policy.break_points(self.hyphenator, rest) {
                    let fragment = self.text_width(&rest[..point], token.role, token.style) + hyphen;
                    if !fits_within(consumed + fragment, available) {
                        break;
                    }
                    best = Some((index, start + point, fragment));
                }
            }
            consumed += self.token_width(token, start);
            if !fits_within(consumed, available) {
                break;
            }
        }

        let (split_token, split_offset, fragment_width) = best?;
        let mut pieces = self.cluster_pieces(tokens, from, split_token);
        pieces.push(Piece {
            token: split_token,
            start: if split_token == from.token { from.offset } else { 0 },
            end: split_offset,
            width: fragment_width,
            hyphenated: true,
        });
        Some((
            pieces,
            Cursor {
                token: split_token,
                offset: split_offset,
            },
        ))
    }
}
