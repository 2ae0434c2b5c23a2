//! Tokens: lexemes with their atmosphere attached.
//!
//! A [`Token`] owns the atmosphere on each side of itself. The sum of
//! leading, inner and trailing sizes over all tokens in source order equals
//! the original byte span, which is the basis of the round-trip guarantee.
//!
//! Tokens are `Copy`: text is interned and atmosphere lists are arena
//! slices, so tokens can live inside arena-allocated syntax nodes whose
//! destructors never run.

use ely_base::{Span, Symbol};

use crate::atmosphere::{atmosphere_size, Atmosphere};
use crate::lexeme::LexemeKind;

/// The kind of a real (non-atmosphere) token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum TokenKind {
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Slash,
    Quote,
    Quasiquote,
    Unquote,
    UnquoteSplicing,
    SyntaxQuote,
    QuasiSyntax,
    Unsyntax,
    UnsyntaxSplicing,
    Colon,
    Exclamation,
    Question,
    Ampersand,
    At,
    Identifier,
    IntegerLit,
    DecimalLit,
    StringLit,
    CharLit,
    KeywordLit,
    BoolLit,
    UnterminatedStringLit,
    InvalidNumberSign,
    Unknown,
    Eof,
}

impl TokenKind {
    /// Converts a non-atmosphere lexeme kind.
    ///
    /// # Panics
    ///
    /// Panics on atmosphere kinds, which never become tokens.
    pub fn from_lexeme(kind: LexemeKind) -> TokenKind {
        use LexemeKind as L;
        match kind {
            L::LParen => TokenKind::LParen,
            L::RParen => TokenKind::RParen,
            L::LBracket => TokenKind::LBracket,
            L::RBracket => TokenKind::RBracket,
            L::LBrace => TokenKind::LBrace,
            L::RBrace => TokenKind::RBrace,
            L::Slash => TokenKind::Slash,
            L::Quote => TokenKind::Quote,
            L::Quasiquote => TokenKind::Quasiquote,
            L::Unquote => TokenKind::Unquote,
            L::UnquoteSplicing => TokenKind::UnquoteSplicing,
            L::SyntaxQuote => TokenKind::SyntaxQuote,
            L::QuasiSyntax => TokenKind::QuasiSyntax,
            L::Unsyntax => TokenKind::Unsyntax,
            L::UnsyntaxSplicing => TokenKind::UnsyntaxSplicing,
            L::Colon => TokenKind::Colon,
            L::Exclamation => TokenKind::Exclamation,
            L::Question => TokenKind::Question,
            L::Ampersand => TokenKind::Ampersand,
            L::At => TokenKind::At,
            L::Identifier => TokenKind::Identifier,
            L::IntegerLit => TokenKind::IntegerLit,
            L::DecimalLit => TokenKind::DecimalLit,
            L::StringLit => TokenKind::StringLit,
            L::CharLit => TokenKind::CharLit,
            L::KeywordLit => TokenKind::KeywordLit,
            L::BoolLit => TokenKind::BoolLit,
            L::UnterminatedStringLit => TokenKind::UnterminatedStringLit,
            L::InvalidNumberSign => TokenKind::InvalidNumberSign,
            L::Unknown => TokenKind::Unknown,
            L::Eof => TokenKind::Eof,
            kind => panic!("atmosphere lexeme {:?} is not a token", kind),
        }
    }

    /// The fixed source text of glyph tokens, `None` for text-carrying ones.
    pub fn glyph(self) -> Option<&'static str> {
        use TokenKind::*;
        match self {
            LParen => Some("("),
            RParen => Some(")"),
            LBracket => Some("["),
            RBracket => Some("]"),
            LBrace => Some("{"),
            RBrace => Some("}"),
            Slash => Some("/"),
            Quote => Some("'"),
            Quasiquote => Some("`"),
            Unquote => Some(","),
            UnquoteSplicing => Some(",@"),
            SyntaxQuote => Some("#'"),
            QuasiSyntax => Some("#`"),
            Unsyntax => Some("#,"),
            UnsyntaxSplicing => Some("#,@"),
            Colon => Some(":"),
            Exclamation => Some("!"),
            Question => Some("?"),
            Ampersand => Some("&"),
            At => Some("@"),
            Eof => Some(""),
            _ => None,
        }
    }

    pub fn is_opener(self) -> bool {
        matches!(self, TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace)
    }

    pub fn is_closer(self) -> bool {
        matches!(self, TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace)
    }

    /// The closer matching an opener.
    ///
    /// # Panics
    ///
    /// Panics if `self` is not an opener.
    pub fn matching_closer(self) -> TokenKind {
        match self {
            TokenKind::LParen => TokenKind::RParen,
            TokenKind::LBracket => TokenKind::RBracket,
            TokenKind::LBrace => TokenKind::RBrace,
            kind => panic!("{:?} is not an opener", kind),
        }
    }

    /// Literal kinds, including the unterminated-string poison literal.
    pub fn is_literal(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            IntegerLit | DecimalLit | StringLit | CharLit | KeywordLit | BoolLit
                | UnterminatedStringLit
        )
    }

    /// Kinds that carry a lexical error in-band.
    pub fn is_lexical_poison(self) -> bool {
        use TokenKind::*;
        matches!(self, UnterminatedStringLit | InvalidNumberSign | Unknown)
    }
}

/// A token with its atmosphere and interned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Interned source text for identifiers, literals and unknown bytes;
    /// [`Symbol::EMPTY`] for glyph tokens.
    pub text: Symbol,
    /// Source length of the token itself, excluding atmosphere.
    pub len: u32,
    /// Absolute byte offset of the token's first byte.
    pub offset: u32,
    pub leading: &'a [Atmosphere],
    pub trailing: &'a [Atmosphere],
}

impl<'a> Token<'a> {
    /// A zero-length token with no atmosphere, used for synthesized forms.
    pub fn synthetic(kind: TokenKind) -> Token<'a> {
        Token {
            kind,
            text: Symbol::EMPTY,
            len: 0,
            offset: 0,
            leading: &[],
            trailing: &[],
        }
    }

    pub fn leading_size(&self) -> usize {
        atmosphere_size(self.leading)
    }

    pub fn trailing_size(&self) -> usize {
        atmosphere_size(self.trailing)
    }

    /// Size of the token text alone.
    pub fn inner_size(&self) -> usize {
        self.len as usize
    }

    /// Full size: leading atmosphere, token text, trailing atmosphere.
    pub fn size(&self) -> usize {
        self.leading_size() + self.inner_size() + self.trailing_size()
    }

    /// Byte span of the token text in the source.
    pub fn span(&self) -> Span {
        Span::new(self.offset as usize, (self.offset + self.len) as usize)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}
