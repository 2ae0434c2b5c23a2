//! Interner-aware display.
//!
//! Tokens and syntax nodes store interned symbols, so they cannot print
//! themselves. [`DisplayWith`] threads the interner through formatting; the
//! implementations write the exact source text, atmosphere included, which
//! makes rendering a whole tree a byte-for-byte round trip of the input.

use std::fmt;

use ely_base::Interner;

use crate::atmosphere::Atmosphere;
use crate::syntax::{CloseDelim, Syntax};
use crate::token::Token;

/// Formatting that needs an [`Interner`] to resolve symbols.
pub trait DisplayWith {
    fn fmt_with(&self, interner: &Interner, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// Pairs the value with an interner for use with `format!`.
    fn with<'x>(&'x self, interner: &'x Interner) -> WithInterner<'x, Self> {
        WithInterner {
            target: self,
            interner,
        }
    }
}

/// Adapter implementing [`fmt::Display`] for a [`DisplayWith`] value.
pub struct WithInterner<'x, T: ?Sized> {
    pub target: &'x T,
    pub interner: &'x Interner,
}

impl<'x, T: DisplayWith + ?Sized> fmt::Display for WithInterner<'x, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.target.fmt_with(self.interner, f)
    }
}

impl DisplayWith for Atmosphere {
    fn fmt_with(&self, interner: &Interner, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Atmosphere::Whitespace(len) => {
                for _ in 0..len {
                    f.write_str(" ")?;
                }
                Ok(())
            }
            Atmosphere::Tab(len) => {
                for _ in 0..len {
                    f.write_str("\t")?;
                }
                Ok(())
            }
            Atmosphere::NewlineCr => f.write_str("\r"),
            Atmosphere::NewlineLf => f.write_str("\n"),
            Atmosphere::NewlineCrlf => f.write_str("\r\n"),
            Atmosphere::Comment { text, .. } => f.write_str(interner.resolve(text)),
        }
    }
}

impl<'a> DisplayWith for Token<'a> {
    fn fmt_with(&self, interner: &Interner, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for atmosphere in self.leading {
            atmosphere.fmt_with(interner, f)?;
        }
        match self.kind.glyph() {
            Some(glyph) => f.write_str(glyph)?,
            None => f.write_str(interner.resolve(self.text))?,
        }
        for atmosphere in self.trailing {
            atmosphere.fmt_with(interner, f)?;
        }
        Ok(())
    }
}

impl<'a> DisplayWith for Syntax<'a> {
    fn fmt_with(&self, interner: &Interner, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Syntax::List(list) => {
                list.open.fmt_with(interner, f)?;
                for child in list.children {
                    child.fmt_with(interner, f)?;
                }
                match list.close {
                    CloseDelim::Token(token) => token.fmt_with(interner, f),
                    CloseDelim::Poison => Ok(()),
                }
            }
            Syntax::Identifier(identifier) => identifier.token.fmt_with(interner, f),
            Syntax::Literal(literal) => literal.token.fmt_with(interner, f),
            Syntax::Eof(token) => token.fmt_with(interner, f),
        }
    }
}

impl<'a> Syntax<'a> {
    /// Renders this node back to source text, atmosphere included.
    pub fn to_source_string(&self, interner: &Interner) -> String {
        self.with(interner).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Reader;
    use crate::source::SliceSource;
    use crate::syntax::SyntaxContext;
    use ely_base::Arena;

    fn round_trip(src: &str) -> String {
        let syntax = Arena::new();
        let atmos = Arena::new();
        let scopes = Arena::new();
        let ctx = SyntaxContext::new(&syntax, &atmos, &scopes);
        let mut interner = Interner::new();
        let mut reader = Reader::new(SliceSource::new(src.as_bytes()), ctx, &mut interner);
        let mut out = String::new();
        loop {
            let form = reader.next();
            let eof = form.is_eof();
            out.push_str(&form.to_source_string(reader.interner()));
            if eof {
                return out;
            }
        }
    }

    #[test]
    fn simple_form_round_trips() {
        let src = "(def (f x) (* x x))\n";
        assert_eq!(round_trip(src), src);
    }

    #[test]
    fn atmosphere_round_trips() {
        let src = "  (a\t b) ; comment\r\n\n42.5 #t \"s\"";
        assert_eq!(round_trip(src), src);
    }

    #[test]
    fn quote_family_round_trips() {
        let src = "'x `(a ,b ,@c) #'(d #,e #,@f)";
        assert_eq!(round_trip(src), src);
    }

    #[test]
    fn unterminated_list_round_trips_without_closer() {
        let src = "(a (b c";
        assert_eq!(round_trip(src), src);
    }
}
