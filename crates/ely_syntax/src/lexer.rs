//! The resumable, buffer-chunked byte lexer.
//!
//! [`lex`] consumes bytes from a source chunk and writes token records into
//! an output buffer until one side runs out. All terminating conditions are
//! signaled in-band by the final record:
//!
//! - `Eof` — the logical input ended (the source contained a `\0` sentinel).
//! - `BufferFull` — the output is exhausted before the input; drain and
//!   re-invoke on the remaining bytes.
//! - `Spill(consumed, cont)` — the chunk ended mid-token; re-invoke with the
//!   next chunk and the carried continuation id.
//!
//! The state machine is dispatched on the leading byte of each token, with
//! one [`Cont`] state per in-progress token class so any chunk boundary can
//! be resumed. The lexer never fails: every error condition is a token kind
//! and every input byte lands in exactly one record's span.
//!
//! ## Run clamping
//!
//! Record lengths are single bytes. A token longer than 255 bytes is
//! written as consecutive records of the same kind; a full record
//! (`len == 255`) is always followed by a continuation record, so consumers
//! can stitch parts back together unambiguously.

use crate::cont::Cont;
use crate::record::{encode_atom, encode_len, encode_spill, RecordKind};

#[inline]
fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

/// The canonical delimiter set: bytes that terminate identifiers, numbers
/// and the `#` literal bodies.
#[inline]
pub fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b' ' | b'\t'
            | b'\r'
            | b'\n'
            | 0
            | b';'
            | b'/'
            | b'('
            | b')'
            | b'['
            | b']'
            | b'{'
            | b'}'
            | b'"'
    )
}

#[inline]
fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || matches!(b, b'_' | b'.' | b'*' | b'=' | b'<' | b'>')
}

/// Lexes `src` into `out`, resuming from the continuation id `cont`.
///
/// Returns the number of record bytes written. Returns 0 only when `out`
/// is smaller than the 4-byte minimum headroom.
///
/// Lengths emitted for a resumed token cover only the bytes consumed from
/// the current chunk; the spill records of earlier chunks account for the
/// rest. The spill `consumed` byte saturates at 255; a consumer tracking
/// exact positions derives them from the spans of the drained records.
pub fn lex(src: &[u8], out: &mut [u8], cont: u8) -> usize {
    if out.len() < 4 {
        return 0;
    }
    let state = Cont::from_u8(cont).unwrap_or(Cont::Start);
    Machine {
        src,
        out,
        pos: 0,
        tok_start: 0,
        written: 0,
    }
    .run(state)
}

struct Machine<'s, 'o> {
    src: &'s [u8],
    out: &'o mut [u8],
    pos: usize,
    tok_start: usize,
    written: usize,
}

impl<'s, 'o> Machine<'s, 'o> {
    #[inline]
    fn free(&self) -> usize {
        self.out.len() - self.written
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.pos == self.src.len()
    }

    fn spill(&mut self, cont: Cont) -> usize {
        let consumed = (self.pos - self.tok_start).min(255) as u8;
        self.written += encode_spill(&mut self.out[self.written..], consumed, cont);
        self.written
    }

    fn buffer_full(&mut self) -> usize {
        self.written += encode_atom(&mut self.out[self.written..], RecordKind::BufferFull);
        self.written
    }

    fn atom(&mut self, kind: RecordKind) {
        self.written += encode_atom(&mut self.out[self.written..], kind);
    }

    /// Emits the current token as clamped length-tagged records.
    ///
    /// When the output cannot hold every part plus spill headroom, emits
    /// `BufferFull` instead and reports failure; no part of the token is
    /// written, so the drained record spans still identify where the caller
    /// must resume.
    fn emit_run(&mut self, kind: RecordKind) -> Result<(), ()> {
        let mut len = self.pos - self.tok_start;
        let needed = (len / 255 + 2) * 2;
        if self.free() < needed + 3 {
            self.buffer_full();
            return Err(());
        }
        loop {
            let part = len.min(255);
            self.written += encode_len(&mut self.out[self.written..], kind, part as u8);
            len -= part;
            if part < 255 {
                break;
            }
            if len == 0 {
                self.written += encode_len(&mut self.out[self.written..], kind, 0);
                break;
            }
        }
        Ok(())
    }

    fn advance_to_delimiter(&mut self) {
        while self.pos < self.src.len() && !is_delimiter(self.src[self.pos]) {
            self.pos += 1;
        }
    }

    fn run(mut self, mut state: Cont) -> usize {
        macro_rules! emit {
            ($machine:expr, $kind:expr) => {
                match $machine.emit_run($kind) {
                    Ok(()) => Cont::Start,
                    Err(()) => return $machine.written,
                }
            };
        }

        loop {
            state = match state {
                Cont::Start => {
                    self.tok_start = self.pos;
                    if self.at_end() {
                        return self.spill(Cont::Start);
                    }
                    if self.free() < 4 {
                        return self.buffer_full();
                    }
                    let b = self.src[self.pos];
                    self.pos += 1;
                    match b {
                        0 => {
                            self.atom(RecordKind::Eof);
                            return self.written;
                        }
                        b' ' => Cont::Whitespace,
                        b'\t' => Cont::Tab,
                        b'\n' => {
                            self.atom(RecordKind::NewlineLf);
                            Cont::Start
                        }
                        b'\r' => Cont::NewlineCr,
                        b';' => Cont::LineComment,
                        b'(' => {
                            self.atom(RecordKind::LParen);
                            Cont::Start
                        }
                        b')' => {
                            self.atom(RecordKind::RParen);
                            Cont::Start
                        }
                        b'[' => {
                            self.atom(RecordKind::LBracket);
                            Cont::Start
                        }
                        b']' => {
                            self.atom(RecordKind::RBracket);
                            Cont::Start
                        }
                        b'{' => {
                            self.atom(RecordKind::LBrace);
                            Cont::Start
                        }
                        b'}' => {
                            self.atom(RecordKind::RBrace);
                            Cont::Start
                        }
                        b'/' => {
                            self.atom(RecordKind::Slash);
                            Cont::Start
                        }
                        b'"' => Cont::StringLit,
                        b'#' => Cont::NumberSign,
                        b',' => Cont::Unquote,
                        b'\'' => {
                            self.atom(RecordKind::Quote);
                            Cont::Start
                        }
                        b'`' => {
                            self.atom(RecordKind::Quasiquote);
                            Cont::Start
                        }
                        b':' => {
                            self.atom(RecordKind::Colon);
                            Cont::Start
                        }
                        b'!' => {
                            self.atom(RecordKind::Exclamation);
                            Cont::Start
                        }
                        b'?' => {
                            self.atom(RecordKind::Question);
                            Cont::Start
                        }
                        b'&' => {
                            self.atom(RecordKind::Ampersand);
                            Cont::Start
                        }
                        b'@' => {
                            self.atom(RecordKind::At);
                            Cont::Start
                        }
                        b'+' | b'-' => Cont::Sign,
                        b'0'..=b'9' => Cont::IntegerLit,
                        0xC0..=0xDF => Cont::Unicode2,
                        0xE0..=0xEF => Cont::Unicode3,
                        0xF0..=0xF7 => Cont::Unicode4,
                        b if is_identifier_start(b) => Cont::Identifier,
                        _ => {
                            self.atom(RecordKind::Unknown);
                            Cont::Start
                        }
                    }
                }

                Cont::Whitespace => {
                    while self.pos < self.src.len() && self.src[self.pos] == b' ' {
                        self.pos += 1;
                    }
                    if self.at_end() {
                        return self.spill(Cont::Whitespace);
                    }
                    emit!(self, RecordKind::Whitespace)
                }

                Cont::Tab => {
                    while self.pos < self.src.len() && self.src[self.pos] == b'\t' {
                        self.pos += 1;
                    }
                    if self.at_end() {
                        return self.spill(Cont::Tab);
                    }
                    emit!(self, RecordKind::Tab)
                }

                Cont::NewlineCr => {
                    if self.at_end() {
                        return self.spill(Cont::NewlineCr);
                    }
                    if self.src[self.pos] == b'\n' {
                        self.pos += 1;
                        self.atom(RecordKind::NewlineCrlf);
                    } else {
                        self.atom(RecordKind::NewlineCr);
                    }
                    Cont::Start
                }

                Cont::LineComment => {
                    while self.pos < self.src.len()
                        && !matches!(self.src[self.pos], b'\r' | b'\n' | 0)
                    {
                        self.pos += 1;
                    }
                    if self.at_end() {
                        return self.spill(Cont::LineComment);
                    }
                    emit!(self, RecordKind::LineComment)
                }

                Cont::Identifier => {
                    self.advance_to_delimiter();
                    if self.at_end() {
                        return self.spill(Cont::Identifier);
                    }
                    emit!(self, RecordKind::Identifier)
                }

                Cont::IntegerLit => {
                    let mut next = None;
                    while self.pos < self.src.len() {
                        let b = self.src[self.pos];
                        if is_digit(b) {
                            self.pos += 1;
                        } else if b == b'.' {
                            self.pos += 1;
                            next = Some(Cont::DecimalLit);
                            break;
                        } else if is_delimiter(b) {
                            next = Some(emit!(self, RecordKind::IntegerLit));
                            break;
                        } else {
                            self.pos += 1;
                            next = Some(Cont::Identifier);
                            break;
                        }
                    }
                    match next {
                        Some(s) => s,
                        None => return self.spill(Cont::IntegerLit),
                    }
                }

                Cont::DecimalLit => {
                    let mut next = None;
                    while self.pos < self.src.len() {
                        let b = self.src[self.pos];
                        if is_digit(b) {
                            self.pos += 1;
                        } else if is_delimiter(b) {
                            next = Some(emit!(self, RecordKind::DecimalLit));
                            break;
                        } else {
                            self.pos += 1;
                            next = Some(Cont::Identifier);
                            break;
                        }
                    }
                    match next {
                        Some(s) => s,
                        None => return self.spill(Cont::DecimalLit),
                    }
                }

                Cont::StringLit => {
                    let mut next = None;
                    while self.pos < self.src.len() {
                        let b = self.src[self.pos];
                        if b == 0 {
                            // sentinel before the closing quote; leave it
                            // for the next dispatch
                            next = Some(emit!(self, RecordKind::UnterminatedStringLit));
                            break;
                        }
                        self.pos += 1;
                        if b == b'\\' {
                            next = Some(Cont::StringLitEscape);
                            break;
                        }
                        if b == b'"' {
                            next = Some(emit!(self, RecordKind::StringLit));
                            break;
                        }
                    }
                    match next {
                        Some(s) => s,
                        None => return self.spill(Cont::StringLit),
                    }
                }

                Cont::StringLitEscape => {
                    if self.at_end() {
                        return self.spill(Cont::StringLitEscape);
                    }
                    if self.src[self.pos] == 0 {
                        emit!(self, RecordKind::UnterminatedStringLit)
                    } else {
                        // the escaped byte is consumed blind; a second
                        // backslash toggles the flag back off
                        self.pos += 1;
                        Cont::StringLit
                    }
                }

                Cont::NumberSign => {
                    if self.at_end() {
                        return self.spill(Cont::NumberSign);
                    }
                    let b = self.src[self.pos];
                    match b {
                        b't' | b'f' => {
                            self.pos += 1;
                            Cont::BoolLit
                        }
                        b':' => {
                            self.pos += 1;
                            Cont::KeywordLit
                        }
                        b'\\' => {
                            self.pos += 1;
                            Cont::CharLit
                        }
                        b'\'' => {
                            self.pos += 1;
                            self.atom(RecordKind::SyntaxQuote);
                            Cont::Start
                        }
                        b'`' => {
                            self.pos += 1;
                            self.atom(RecordKind::QuasiSyntax);
                            Cont::Start
                        }
                        b',' => {
                            self.pos += 1;
                            Cont::Unsyntax
                        }
                        b if is_delimiter(b) => Cont::InvalidNumberSign,
                        _ => {
                            self.pos += 1;
                            Cont::InvalidNumberSign
                        }
                    }
                }

                Cont::BoolLit => {
                    if self.at_end() {
                        return self.spill(Cont::BoolLit);
                    }
                    if is_delimiter(self.src[self.pos]) {
                        emit!(self, RecordKind::BoolLit)
                    } else {
                        self.pos += 1;
                        Cont::InvalidNumberSign
                    }
                }

                Cont::KeywordLit => {
                    self.advance_to_delimiter();
                    if self.at_end() {
                        return self.spill(Cont::KeywordLit);
                    }
                    emit!(self, RecordKind::KeywordLit)
                }

                Cont::CharLit => {
                    self.advance_to_delimiter();
                    if self.at_end() {
                        return self.spill(Cont::CharLit);
                    }
                    emit!(self, RecordKind::CharLit)
                }

                Cont::InvalidNumberSign => {
                    self.advance_to_delimiter();
                    if self.at_end() {
                        return self.spill(Cont::InvalidNumberSign);
                    }
                    emit!(self, RecordKind::InvalidNumberSign)
                }

                Cont::Sign => {
                    if self.at_end() {
                        return self.spill(Cont::Sign);
                    }
                    let b = self.src[self.pos];
                    if is_digit(b) {
                        self.pos += 1;
                        Cont::IntegerLit
                    } else if is_delimiter(b) {
                        // a bare sign is an identifier
                        emit!(self, RecordKind::Identifier)
                    } else {
                        self.pos += 1;
                        Cont::Identifier
                    }
                }

                Cont::Unquote => {
                    if self.at_end() {
                        return self.spill(Cont::Unquote);
                    }
                    if self.src[self.pos] == b'@' {
                        self.pos += 1;
                        self.atom(RecordKind::UnquoteSplicing);
                    } else {
                        self.atom(RecordKind::Unquote);
                    }
                    Cont::Start
                }

                Cont::Unsyntax => {
                    if self.at_end() {
                        return self.spill(Cont::Unsyntax);
                    }
                    if self.src[self.pos] == b'@' {
                        self.pos += 1;
                        self.atom(RecordKind::UnsyntaxSplicing);
                    } else {
                        self.atom(RecordKind::Unsyntax);
                    }
                    Cont::Start
                }

                Cont::Unicode4 => {
                    if self.at_end() {
                        return self.spill(Cont::Unicode4);
                    }
                    if self.src[self.pos] == 0 {
                        // truncated sequence at end of input; the sentinel
                        // is not part of the token
                        Cont::Identifier
                    } else {
                        self.pos += 1;
                        Cont::Unicode3
                    }
                }

                Cont::Unicode3 => {
                    if self.at_end() {
                        return self.spill(Cont::Unicode3);
                    }
                    if self.src[self.pos] == 0 {
                        Cont::Identifier
                    } else {
                        self.pos += 1;
                        Cont::Unicode2
                    }
                }

                Cont::Unicode2 => {
                    if self.at_end() {
                        return self.spill(Cont::Unicode2);
                    }
                    if self.src[self.pos] != 0 {
                        self.pos += 1;
                    }
                    Cont::Identifier
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{decode, Record};

    fn expected(parts: &[(RecordKind, Option<u8>)]) -> Vec<u8> {
        let mut buf = vec![0u8; 64];
        let mut n = 0;
        for &(kind, len) in parts {
            n += match len {
                Some(len) => encode_len(&mut buf[n..], kind, len),
                None => encode_atom(&mut buf[n..], kind),
            };
        }
        buf.truncate(n);
        buf
    }

    fn expected_spill(consumed: u8, cont: Cont) -> Vec<u8> {
        let mut buf = vec![0u8; 4];
        let n = encode_spill(&mut buf, consumed, cont);
        buf.truncate(n);
        buf
    }

    #[test]
    fn whitespace_then_eof() {
        let mut buf = [0u8; 1024];
        let n = lex(b"    \0", &mut buf, 0);
        assert_eq!(
            &buf[..n],
            expected(&[
                (RecordKind::Whitespace, Some(4)),
                (RecordKind::Eof, None)
            ])
            .as_slice()
        );
    }

    #[test]
    fn tabs_then_eof() {
        let mut buf = [0u8; 1024];
        let n = lex(b"\t\t\t\t\0", &mut buf, 0);
        assert_eq!(
            &buf[..n],
            expected(&[(RecordKind::Tab, Some(4)), (RecordKind::Eof, None)]).as_slice()
        );
    }

    #[test]
    fn empty_output_buffer_returns_zero() {
        let mut buf = [0u8; 0];
        assert_eq!(lex(b"    ", &mut buf, 0), 0);
    }

    #[test]
    fn empty_chunk_spills_at_start() {
        let mut buf = [0u8; 1024];
        let n = lex(b"", &mut buf, 0);
        assert_eq!(&buf[..n], expected_spill(0, Cont::Start).as_slice());
    }

    #[test]
    fn whitespace_spills_and_resumes() {
        let mut buf = [0u8; 1024];
        let n = lex(b"    ", &mut buf, 0);
        assert_eq!(&buf[..n], expected_spill(4, Cont::Whitespace).as_slice());

        let cont = buf[n - 2];
        let n = lex(b"    \0", &mut buf, cont);
        assert_eq!(
            &buf[..n],
            expected(&[
                (RecordKind::Whitespace, Some(4)),
                (RecordKind::Eof, None)
            ])
            .as_slice()
        );
    }

    #[test]
    fn resumed_whitespace_before_tabs_emits_zero_length_run() {
        let mut buf = [0u8; 1024];
        let n = lex(b"    ", &mut buf, 0);
        let cont = buf[n - 2];

        let n = lex(b"\t\t\t\t\0", &mut buf, cont);
        assert_eq!(
            &buf[..n],
            expected(&[
                (RecordKind::Whitespace, Some(0)),
                (RecordKind::Tab, Some(4)),
                (RecordKind::Eof, None)
            ])
            .as_slice()
        );
    }

    #[test]
    fn identifier_with_terminator() {
        let mut buf = [0u8; 1024];
        let n = lex(b"hello_world\0", &mut buf, 0);
        assert_eq!(
            &buf[..n],
            expected(&[
                (RecordKind::Identifier, Some(11)),
                (RecordKind::Eof, None)
            ])
            .as_slice()
        );
    }

    #[test]
    fn slash_separates_identifiers() {
        let mut buf = [0u8; 1024];
        let n = lex(b"var123/other/more\0", &mut buf, 0);
        assert_eq!(
            &buf[..n],
            expected(&[
                (RecordKind::Identifier, Some(6)),
                (RecordKind::Slash, None),
                (RecordKind::Identifier, Some(5)),
                (RecordKind::Slash, None),
                (RecordKind::Identifier, Some(4)),
                (RecordKind::Eof, None)
            ])
            .as_slice()
        );
    }

    #[test]
    fn identifier_spills_across_many_chunks() {
        let mut buf = [0u8; 1024];
        let chunks: [&[u8]; 4] = [b"hello", b"world", b"this_is_a_test", b"variant123"];

        let mut cont = 0;
        for chunk in chunks {
            let n = lex(chunk, &mut buf, cont);
            assert_eq!(
                &buf[..n],
                expected_spill(chunk.len() as u8, Cont::Identifier).as_slice()
            );
            cont = buf[n - 2];
        }

        let n = lex(b"\0", &mut buf, cont);
        assert_eq!(
            &buf[..n],
            expected(&[
                (RecordKind::Identifier, Some(0)),
                (RecordKind::Eof, None)
            ])
            .as_slice()
        );
    }

    #[test]
    fn decimal_spills_after_dot() {
        let mut buf = [0u8; 1024];
        let n = lex(b"123.", &mut buf, 0);
        assert_eq!(&buf[..n], expected_spill(4, Cont::DecimalLit).as_slice());

        let cont = buf[n - 2];
        let n = lex(b"45", &mut buf, cont);
        assert_eq!(&buf[..n], expected_spill(2, Cont::DecimalLit).as_slice());

        let cont = buf[n - 2];
        let n = lex(b"\0", &mut buf, cont);
        assert_eq!(
            &buf[..n],
            expected(&[
                (RecordKind::DecimalLit, Some(0)),
                (RecordKind::Eof, None)
            ])
            .as_slice()
        );
    }

    #[test]
    fn string_spills_and_closes_in_next_chunk() {
        let mut buf = [0u8; 1024];
        let n = lex(b"\"Hello, ", &mut buf, 0);
        assert_eq!(&buf[..n], expected_spill(8, Cont::StringLit).as_slice());

        let cont = buf[n - 2];
        let n = lex(b"world!\"", &mut buf, cont);
        let mut want = expected(&[(RecordKind::StringLit, Some(7))]);
        want.extend(expected_spill(0, Cont::Start));
        assert_eq!(&buf[..n], want.as_slice());
    }

    #[test]
    fn lone_sentinel_is_eof() {
        let mut buf = [0u8; 1024];
        let n = lex(b"\0", &mut buf, 0);
        assert_eq!(&buf[..n], expected(&[(RecordKind::Eof, None)]).as_slice());
    }

    #[test]
    fn numbers_classify_int_float_and_degraded_identifier() {
        let mut buf = [0u8; 1024];
        let n = lex(b"123 45.6 7x\0", &mut buf, 0);
        assert_eq!(
            &buf[..n],
            expected(&[
                (RecordKind::IntegerLit, Some(3)),
                (RecordKind::Whitespace, Some(1)),
                (RecordKind::DecimalLit, Some(4)),
                (RecordKind::Whitespace, Some(1)),
                (RecordKind::Identifier, Some(2)),
                (RecordKind::Eof, None)
            ])
            .as_slice()
        );
    }

    #[test]
    fn signs_classify_number_or_identifier() {
        let mut buf = [0u8; 1024];
        let n = lex(b"-12 + -x\0", &mut buf, 0);
        assert_eq!(
            &buf[..n],
            expected(&[
                (RecordKind::IntegerLit, Some(3)),
                (RecordKind::Whitespace, Some(1)),
                (RecordKind::Identifier, Some(1)),
                (RecordKind::Whitespace, Some(1)),
                (RecordKind::Identifier, Some(2)),
                (RecordKind::Eof, None)
            ])
            .as_slice()
        );
    }

    #[test]
    fn number_sign_forms() {
        let mut buf = [0u8; 1024];
        let n = lex(b"#t #f #:key #\\a #'x\0", &mut buf, 0);
        assert_eq!(
            &buf[..n],
            expected(&[
                (RecordKind::BoolLit, Some(2)),
                (RecordKind::Whitespace, Some(1)),
                (RecordKind::BoolLit, Some(2)),
                (RecordKind::Whitespace, Some(1)),
                (RecordKind::KeywordLit, Some(5)),
                (RecordKind::Whitespace, Some(1)),
                (RecordKind::CharLit, Some(3)),
                (RecordKind::Whitespace, Some(1)),
                (RecordKind::SyntaxQuote, None),
                (RecordKind::Identifier, Some(1)),
                (RecordKind::Eof, None)
            ])
            .as_slice()
        );
    }

    #[test]
    fn bool_without_delimiter_degrades_to_invalid_number_sign() {
        let mut buf = [0u8; 1024];
        let n = lex(b"#true\0", &mut buf, 0);
        assert_eq!(
            &buf[..n],
            expected(&[
                (RecordKind::InvalidNumberSign, Some(5)),
                (RecordKind::Eof, None)
            ])
            .as_slice()
        );
    }

    #[test]
    fn quote_family() {
        let mut buf = [0u8; 1024];
        let n = lex(b"'`,x ,@y #`a #,b #,@c\0", &mut buf, 0);
        assert_eq!(
            &buf[..n],
            expected(&[
                (RecordKind::Quote, None),
                (RecordKind::Quasiquote, None),
                (RecordKind::Unquote, None),
                (RecordKind::Identifier, Some(1)),
                (RecordKind::Whitespace, Some(1)),
                (RecordKind::UnquoteSplicing, None),
                (RecordKind::Identifier, Some(1)),
                (RecordKind::Whitespace, Some(1)),
                (RecordKind::QuasiSyntax, None),
                (RecordKind::Identifier, Some(1)),
                (RecordKind::Whitespace, Some(1)),
                (RecordKind::Unsyntax, None),
                (RecordKind::Identifier, Some(1)),
                (RecordKind::Whitespace, Some(1)),
                (RecordKind::UnsyntaxSplicing, None),
                (RecordKind::Identifier, Some(1)),
                (RecordKind::Eof, None)
            ])
            .as_slice()
        );
    }

    #[test]
    fn unterminated_string_stops_at_sentinel() {
        let mut buf = [0u8; 1024];
        let n = lex(b"\"hello\0", &mut buf, 0);
        assert_eq!(
            &buf[..n],
            expected(&[
                (RecordKind::UnterminatedStringLit, Some(6)),
                (RecordKind::Eof, None)
            ])
            .as_slice()
        );
    }

    #[test]
    fn escaped_quote_does_not_terminate() {
        let mut buf = [0u8; 1024];
        let n = lex(b"\"a\\\"b\"\0", &mut buf, 0);
        assert_eq!(
            &buf[..n],
            expected(&[
                (RecordKind::StringLit, Some(6)),
                (RecordKind::Eof, None)
            ])
            .as_slice()
        );
    }

    #[test]
    fn escape_state_survives_chunk_boundary() {
        let mut buf = [0u8; 1024];
        let n = lex(b"\"a\\", &mut buf, 0);
        assert_eq!(&buf[..n], expected_spill(3, Cont::StringLitEscape).as_slice());

        let cont = buf[n - 2];
        let n = lex(b"\"b\"\0", &mut buf, cont);
        assert_eq!(
            &buf[..n],
            expected(&[
                (RecordKind::StringLit, Some(3)),
                (RecordKind::Eof, None)
            ])
            .as_slice()
        );
    }

    #[test]
    fn crlf_folds_across_chunks() {
        let mut buf = [0u8; 1024];
        let n = lex(b"\r", &mut buf, 0);
        assert_eq!(&buf[..n], expected_spill(1, Cont::NewlineCr).as_slice());

        let cont = buf[n - 2];
        let n = lex(b"\n\0", &mut buf, cont);
        assert_eq!(
            &buf[..n],
            expected(&[
                (RecordKind::NewlineCrlf, None),
                (RecordKind::Eof, None)
            ])
            .as_slice()
        );
    }

    #[test]
    fn line_comment_leaves_newline_to_its_own_record() {
        let mut buf = [0u8; 1024];
        let n = lex(b"; hi\nx\0", &mut buf, 0);
        assert_eq!(
            &buf[..n],
            expected(&[
                (RecordKind::LineComment, Some(4)),
                (RecordKind::NewlineLf, None),
                (RecordKind::Identifier, Some(1)),
                (RecordKind::Eof, None)
            ])
            .as_slice()
        );
    }

    #[test]
    fn long_run_emits_multiple_records() {
        let src: Vec<u8> = std::iter::repeat(b' ')
            .take(300)
            .chain([b'\0'])
            .collect();
        let mut buf = [0u8; 1024];
        let n = lex(&src, &mut buf, 0);
        let records: Vec<Record> = decode(&buf, n).collect();
        assert_eq!(records[0].kind, RecordKind::Whitespace);
        assert_eq!(records[0].len, 255);
        assert_eq!(records[1].kind, RecordKind::Whitespace);
        assert_eq!(records[1].len, 45);
        assert_eq!(records[2].kind, RecordKind::Eof);
    }

    #[test]
    fn exact_255_run_is_followed_by_empty_continuation() {
        let src: Vec<u8> = std::iter::repeat(b'a')
            .take(255)
            .chain([b'\0'])
            .collect();
        let mut buf = [0u8; 1024];
        let n = lex(&src, &mut buf, 0);
        let records: Vec<Record> = decode(&buf, n).collect();
        assert_eq!(records[0].kind, RecordKind::Identifier);
        assert_eq!(records[0].len, 255);
        assert_eq!(records[1].kind, RecordKind::Identifier);
        assert_eq!(records[1].len, 0);
        assert_eq!(records[2].kind, RecordKind::Eof);
    }

    #[test]
    fn small_buffer_reports_full_at_token_boundary() {
        let mut buf = [0u8; 5];
        let n = lex(b"(a b c)\0", &mut buf, 0);
        let records: Vec<Record> = decode(&buf, n).collect();
        assert_eq!(records.last().unwrap().kind, RecordKind::BufferFull);
        // everything before the terminator decoded cleanly
        assert!(records
            .iter()
            .take(records.len() - 1)
            .all(|r| r.kind != RecordKind::BufferFull));
    }

    #[test]
    fn utf8_lead_bytes_classify_as_identifier() {
        let mut buf = [0u8; 1024];
        // "λx" is a two-byte sequence followed by an ASCII continuation
        let n = lex("λx\0".as_bytes(), &mut buf, 0);
        assert_eq!(
            &buf[..n],
            expected(&[
                (RecordKind::Identifier, Some(3)),
                (RecordKind::Eof, None)
            ])
            .as_slice()
        );
    }

    #[test]
    fn utf8_sequence_split_across_chunks() {
        let bytes = "λ".as_bytes();
        let mut buf = [0u8; 1024];
        let n = lex(&bytes[..1], &mut buf, 0);
        assert_eq!(&buf[..n], expected_spill(1, Cont::Unicode2).as_slice());

        let cont = buf[n - 2];
        let n = lex(&bytes[1..], &mut buf, cont);
        assert_eq!(&buf[..n], expected_spill(1, Cont::Identifier).as_slice());

        let cont = buf[n - 2];
        let n = lex(b"\0", &mut buf, cont);
        assert_eq!(
            &buf[..n],
            expected(&[
                (RecordKind::Identifier, Some(0)),
                (RecordKind::Eof, None)
            ])
            .as_slice()
        );
    }

    #[test]
    fn unknown_byte_is_a_single_record() {
        let mut buf = [0u8; 1024];
        let n = lex(b"|\0", &mut buf, 0);
        assert_eq!(
            &buf[..n],
            expected(&[(RecordKind::Unknown, None), (RecordKind::Eof, None)]).as_slice()
        );
    }
}
