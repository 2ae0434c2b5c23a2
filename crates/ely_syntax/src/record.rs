//! The token-record byte encoding shared by the lexer and its consumers.
//!
//! The lexer writes a dense stream of records, each 1-3 bytes:
//!
//! | Form | Bytes | Layout |
//! |------|-------|--------|
//! | Atom | 1 | `[kind]` |
//! | Length-tagged | 2 | `[kind][len <= 255]` |
//! | Block comment | 3 | `[kind][len][newline_count]` |
//! | Spill | 3 | `[consumed][cont][SPILL]` |
//!
//! The spill record carries its kind tag *last* so a consumer can detect
//! an interrupted stream by inspecting the final byte of the returned
//! region. Runs longer than 255 bytes are written as consecutive records
//! of the same kind; a full record (`len == 255`) is always followed by
//! another record of the same kind (possibly of length zero), which is the
//! signal consumers use to merge parts back into one token.
//!
//! Block comments are part of the encoding contract but are never emitted
//! by the current scanner.

use crate::cont::Cont;

/// Stable `u8` tags for every record the lexer can emit.
///
/// The numeric values are an implementation contract between [`crate::lexer::lex`]
/// and the decoding side; they are not part of the source-level stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RecordKind {
    Eof = 0,

    // Atoms: single-byte records with a fixed source span.
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Slash,
    NewlineLf,
    NewlineCr,
    NewlineCrlf,
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
    Unknown,
    BufferFull,

    // Length-tagged: two-byte records carrying a span length.
    Whitespace,
    Tab,
    LineComment,
    Identifier,
    IntegerLit,
    DecimalLit,
    StringLit,
    CharLit,
    KeywordLit,
    BoolLit,
    UnterminatedStringLit,
    InvalidNumberSign,
    UnknownRun,

    // Three-byte records.
    BlockComment,
    Spill,
}

impl RecordKind {
    /// Decodes a raw tag byte.
    pub fn from_u8(byte: u8) -> Option<RecordKind> {
        if byte <= RecordKind::Spill as u8 {
            // SAFETY: RecordKind is a dense repr(u8) enum starting at 0 and
            // the bound above is its last discriminant.
            Some(unsafe { std::mem::transmute::<u8, RecordKind>(byte) })
        } else {
            None
        }
    }

    /// The source span, in bytes, covered by an atom record of this kind.
    ///
    /// Returns `None` for length-tagged and three-byte kinds.
    pub fn fixed_span(self) -> Option<usize> {
        use RecordKind::*;
        match self {
            Eof | BufferFull => Some(0),
            LParen | RParen | LBracket | RBracket | LBrace | RBrace | Slash | NewlineLf
            | NewlineCr | Quote | Quasiquote | Unquote | Colon | Exclamation | Question
            | Ampersand | At | Unknown => Some(1),
            NewlineCrlf | UnquoteSplicing | SyntaxQuote | QuasiSyntax | Unsyntax => Some(2),
            UnsyntaxSplicing => Some(3),
            _ => None,
        }
    }

    /// Returns `true` for two-byte records carrying a span length.
    pub fn is_length_tagged(self) -> bool {
        use RecordKind::*;
        matches!(
            self,
            Whitespace
                | Tab
                | LineComment
                | Identifier
                | IntegerLit
                | DecimalLit
                | StringLit
                | CharLit
                | KeywordLit
                | BoolLit
                | UnterminatedStringLit
                | InvalidNumberSign
                | UnknownRun
        )
    }

    /// Encoded size of one record of this kind, in bytes.
    pub fn encoded_len(self) -> usize {
        use RecordKind::*;
        match self {
            BlockComment | Spill => 3,
            kind if kind.is_length_tagged() => 2,
            _ => 1,
        }
    }
}

/// Writes an atom record. Returns the encoded length (1).
#[inline]
pub fn encode_atom(out: &mut [u8], kind: RecordKind) -> usize {
    debug_assert!(kind.fixed_span().is_some());
    out[0] = kind as u8;
    1
}

/// Writes a length-tagged record. Returns the encoded length (2).
#[inline]
pub fn encode_len(out: &mut [u8], kind: RecordKind, len: u8) -> usize {
    debug_assert!(kind.is_length_tagged());
    out[0] = kind as u8;
    out[1] = len;
    2
}

/// Writes a block-comment record. Returns the encoded length (3).
#[inline]
pub fn encode_block_comment(out: &mut [u8], len: u8, newlines: u8) -> usize {
    out[0] = RecordKind::BlockComment as u8;
    out[1] = len;
    out[2] = newlines;
    3
}

/// Writes a spill record with its tag in the final byte. Returns 3.
#[inline]
pub fn encode_spill(out: &mut [u8], consumed: u8, cont: Cont) -> usize {
    out[0] = consumed;
    out[1] = cont as u8;
    out[2] = RecordKind::Spill as u8;
    3
}

/// A decoded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub kind: RecordKind,
    /// Span length for length-tagged kinds, consumed-byte count for spill,
    /// comment length for block comments; zero otherwise.
    pub len: u8,
    /// Continuation id for spill, newline count for block comments.
    pub extra: u8,
}

impl Record {
    /// Source bytes covered by this record within its chunk.
    pub fn span(&self) -> usize {
        match self.kind {
            RecordKind::Spill => self.len as usize,
            kind => kind.fixed_span().unwrap_or(self.len as usize),
        }
    }
}

/// Iterator over the records in an encoded buffer region.
///
/// The iterator stops after yielding a terminal record (eof, buffer-full or
/// spill); anything past it in the buffer is stale.
pub struct Records<'b> {
    buf: &'b [u8],
    pos: usize,
    finished: bool,
}

/// Decodes the `len`-byte region at the start of `buf` as written by one
/// [`crate::lexer::lex`] call.
pub fn decode(buf: &[u8], len: usize) -> Records<'_> {
    Records {
        buf: &buf[..len],
        pos: 0,
        finished: false,
    }
}

impl<'b> Iterator for Records<'b> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        if self.finished || self.pos >= self.buf.len() {
            return None;
        }
        // A spill tags its final byte, so it is recognized by position: it
        // is always the last three bytes of the region.
        if self.pos + 3 == self.buf.len()
            && self.buf[self.buf.len() - 1] == RecordKind::Spill as u8
        {
            let rec = Record {
                kind: RecordKind::Spill,
                len: self.buf[self.pos],
                extra: self.buf[self.pos + 1],
            };
            self.pos += 3;
            self.finished = true;
            return Some(rec);
        }
        let kind = RecordKind::from_u8(self.buf[self.pos])?;
        let rec = match kind.encoded_len() {
            1 => Record {
                kind,
                len: 0,
                extra: 0,
            },
            2 => Record {
                kind,
                len: self.buf[self.pos + 1],
                extra: 0,
            },
            _ => Record {
                kind,
                len: self.buf[self.pos + 1],
                extra: self.buf[self.pos + 2],
            },
        };
        self.pos += kind.encoded_len();
        if matches!(kind, RecordKind::Eof | RecordKind::BufferFull) {
            self.finished = true;
        }
        Some(rec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_from_u8() {
        for byte in 0..=RecordKind::Spill as u8 {
            let kind = RecordKind::from_u8(byte).unwrap();
            assert_eq!(kind as u8, byte);
        }
        assert_eq!(RecordKind::from_u8(RecordKind::Spill as u8 + 1), None);
    }

    #[test]
    fn atom_encoding_is_one_byte() {
        let mut buf = [0u8; 4];
        let n = encode_atom(&mut buf, RecordKind::LParen);
        assert_eq!(n, 1);
        assert_eq!(buf[0], RecordKind::LParen as u8);
    }

    #[test]
    fn length_tagged_encoding_carries_len() {
        let mut buf = [0u8; 4];
        let n = encode_len(&mut buf, RecordKind::Identifier, 11);
        assert_eq!(n, 2);
        assert_eq!(buf[0], RecordKind::Identifier as u8);
        assert_eq!(buf[1], 11);
    }

    #[test]
    fn spill_tag_is_last_byte() {
        let mut buf = [0u8; 4];
        let n = encode_spill(&mut buf, 7, Cont::Identifier);
        assert_eq!(n, 3);
        assert_eq!(buf[0], 7);
        assert_eq!(buf[1], Cont::Identifier as u8);
        assert_eq!(buf[2], RecordKind::Spill as u8);
    }

    #[test]
    fn decode_walks_mixed_records() {
        let mut buf = [0u8; 16];
        let mut n = 0;
        n += encode_len(&mut buf[n..], RecordKind::Whitespace, 4);
        n += encode_atom(&mut buf[n..], RecordKind::LParen);
        n += encode_len(&mut buf[n..], RecordKind::Identifier, 3);
        n += encode_atom(&mut buf[n..], RecordKind::Eof);

        let records: Vec<Record> = decode(&buf, n).collect();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].kind, RecordKind::Whitespace);
        assert_eq!(records[0].span(), 4);
        assert_eq!(records[1].kind, RecordKind::LParen);
        assert_eq!(records[1].span(), 1);
        assert_eq!(records[2].kind, RecordKind::Identifier);
        assert_eq!(records[3].kind, RecordKind::Eof);
        assert_eq!(records[3].span(), 0);
    }

    #[test]
    fn decode_detects_trailing_spill() {
        let mut buf = [0u8; 16];
        let mut n = 0;
        n += encode_len(&mut buf[n..], RecordKind::Whitespace, 2);
        n += encode_spill(&mut buf[n..], 5, Cont::StringLit);

        let records: Vec<Record> = decode(&buf, n).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].kind, RecordKind::Spill);
        assert_eq!(records[1].len, 5);
        assert_eq!(records[1].extra, Cont::StringLit as u8);
    }

    #[test]
    fn decode_stops_after_eof() {
        let mut buf = [0u8; 8];
        let mut n = 0;
        n += encode_atom(&mut buf[n..], RecordKind::Eof);
        // garbage past the terminal record must not be decoded
        buf[n] = 0xFF;
        let records: Vec<Record> = decode(&buf, n + 1).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, RecordKind::Eof);
    }

    #[test]
    fn block_comment_encoding_reserved() {
        let mut buf = [0u8; 4];
        let n = encode_block_comment(&mut buf, 40, 2);
        assert_eq!(n, 3);
        let records: Vec<Record> = decode(&buf, n).collect();
        assert_eq!(records[0].kind, RecordKind::BlockComment);
        assert_eq!(records[0].len, 40);
        assert_eq!(records[0].extra, 2);
    }
}
