use alloc::borrow::Cow;
use alloc::string::String;

use crate::parse::ignored::{is_disallowed_control, skip_until};
use crate::Value;

use winnow::{
    error::{ContextError, ErrMode, ErrorKind},
    stream::Stream as _,
    Parser,
};

type PResult<'i> = winnow::PResult<Value<'i>, ContextError>;

/// Parses a string value enclosed in quotes.
pub(crate) fn parse<'i>(input: &mut &'i str) -> PResult<'i> {
    winnow::combinator::alt((
        parse_multiline_basic,
        parse_basic,
        parse_multiline_literal,
        parse_literal,
    ))
    .parse_next(input)
}

fn cut<'i, T>(input: &&'i str) -> winnow::PResult<T, ContextError> {
    Err(ErrMode::from_error_kind(input, ErrorKind::Verify).cut())
}

/// Parses a basic string value enclosed in double quotes.
pub(crate) fn parse_basic<'i>(input: &mut &'i str) -> PResult<'i> {
    '"'.parse_next(input)?;
    let s = scan_basic(input, false)?;
    '"'.parse_next(input)?;
    Ok(Value::String(s))
}

/// Parses a multi-line basic string value enclosed in triple double quotes.
pub(crate) fn parse_multiline_basic<'i>(input: &mut &'i str) -> PResult<'i> {
    "\"\"\"".parse_next(input)?;
    trim_leading_newline(input);
    let s = scan_basic(input, true)?;
    "\"\"\"".parse_next(input)?;
    Ok(Value::String(s))
}

fn trim_leading_newline(input: &mut &str) {
    if let Some(rest) = input.strip_prefix("\r\n") {
        *input = rest;
    } else if let Some(rest) = input.strip_prefix('\n') {
        *input = rest;
    }
}

/// Scans a (possibly multi-line) basic string body, up to but not including the closing
/// delimiter. Tries a zero-copy scan first; falls back to building an owned `String` as soon as
/// it hits anything that needs transforming (an escape sequence or a `\r\n` pair).
fn scan_basic<'i>(input: &mut &'i str, multiline: bool) -> winnow::PResult<Cow<'i, str>, ContextError> {
    let start = *input;
    match fast_scan_basic(start, multiline)? {
        Some(end) => {
            *input = &start[end..];
            Ok(Cow::Borrowed(&start[..end]))
        }
        None => slow_scan_basic(input, multiline).map(Cow::Owned),
    }
}

/// Returns `Ok(Some(end))` if the string closes at byte offset `end` with no character needing
/// transformation, `Ok(None)` if a `\\` or `\r` was encountered (defer to the slow path), or an
/// error for a disallowed control character or an unterminated string.
fn fast_scan_basic(s: &str, multiline: bool) -> winnow::PResult<Option<usize>, ContextError> {
    let mut rest = s;
    loop {
        let Some(c) = rest.chars().next() else {
            return cut(&rest);
        };
        match c {
            '"' if !multiline => return Ok(Some(s.len() - rest.len())),
            '"' if multiline => {
                let quotes = rest.chars().take_while(|&c| c == '"').count();
                if quotes >= 3 {
                    if quotes - 3 > 2 {
                        return cut(&rest);
                    }
                    return Ok(Some(s.len() - rest.len() + (quotes - 3)));
                }
                rest = &rest[quotes..];
            }
            '\\' | '\r' => return Ok(None),
            c if is_disallowed_control(c) && !(multiline && c == '\n') => {
                return cut(&rest);
            }
            c => rest = &rest[c.len_utf8()..],
        }
    }
}

fn slow_scan_basic(input: &mut &str, multiline: bool) -> winnow::PResult<String, ContextError> {
    let mut out = String::new();
    loop {
        let Some(c) = input.chars().next() else {
            return cut(input);
        };
        match c {
            '"' if !multiline => return Ok(out),
            '"' if multiline => {
                let quotes = input.chars().take_while(|&c| c == '"').count();
                if quotes >= 3 {
                    let trailing = quotes - 3;
                    if trailing > 2 {
                        return cut(input);
                    }
                    out.push_str(&input[..trailing]);
                    *input = &input[trailing..];
                    return Ok(out);
                }
                out.push_str(&input[..quotes]);
                *input = &input[quotes..];
            }
            '\r' => {
                if !input[1..].starts_with('\n') {
                    return cut(input);
                }
                if multiline {
                    out.push('\n');
                    let _ = input.next_slice(2);
                } else {
                    return cut(input);
                }
            }
            '\\' => {
                let _ = input.next_slice(1);
                match input.chars().next() {
                    Some(w) if multiline && matches!(w, ' ' | '\t' | '\n' | '\r') => {
                        if !skip_line_continuation(input) {
                            return cut(input);
                        }
                    }
                    _ => match decode_escape(input)? {
                        Escaped::Char(c) => out.push(c),
                        Escaped::Str(s) => out.push_str(s),
                    },
                }
            }
            c if is_disallowed_control(c) && !(multiline && c == '\n') => {
                return cut(input);
            }
            c => {
                out.push(c);
                let _ = input.next_slice(c.len_utf8());
            }
        }
    }
}

/// Consumes a line continuation (`\` already consumed): optional trailing whitespace, a newline,
/// then any further whitespace/newlines. Returns `false` if no newline is actually found before
/// the whitespace runs out, meaning `\` was followed by a bare space/tab with no line break.
fn skip_line_continuation(input: &mut &str) -> bool {
    let ws_len = input
        .char_indices()
        .find(|(_, c)| *c != ' ' && *c != '\t')
        .map(|(i, _)| i)
        .unwrap_or(input.len());
    if !(input[ws_len..].starts_with('\n') || input[ws_len..].starts_with("\r\n")) {
        return false;
    }
    *input = &input[ws_len..];
    loop {
        if let Some(rest) = input.strip_prefix("\r\n") {
            *input = rest;
        } else if let Some(rest) = input.strip_prefix('\n') {
            *input = rest;
        } else if let Some(rest) = input.strip_prefix(' ').or_else(|| input.strip_prefix('\t')) {
            *input = rest;
        } else {
            break;
        }
    }
    true
}

enum Escaped<'i> {
    Char(char),
    Str(&'i str),
}

fn decode_escape<'i>(input: &mut &'i str) -> winnow::PResult<Escaped<'i>, ContextError> {
    let Some(c) = input.chars().next() else {
        return cut(input);
    };
    let out = match c {
        '"' => Escaped::Str("\""),
        '\\' => Escaped::Str("\\"),
        'b' => Escaped::Char('\x08'),
        't' => Escaped::Char('\t'),
        'n' => Escaped::Char('\n'),
        'f' => Escaped::Char('\x0C'),
        'r' => Escaped::Char('\r'),
        'u' => {
            let _ = input.next_slice(1);
            return decode_unicode_escape(input, 4).map(Escaped::Char);
        }
        'U' => {
            let _ = input.next_slice(1);
            return decode_unicode_escape(input, 8).map(Escaped::Char);
        }
        _ => return cut(input),
    };
    let _ = input.next_slice(1);
    Ok(out)
}

fn decode_unicode_escape(input: &mut &str, len: usize) -> winnow::PResult<char, ContextError> {
    if input.len() < len || !input.as_bytes()[..len].iter().all(u8::is_ascii_hexdigit) {
        return cut(input);
    }
    let hex = &input[..len];
    let cp =
        u32::from_str_radix(hex, 16).map_err(|_| ErrMode::from_error_kind(input, ErrorKind::Verify).cut())?;
    let c = char::from_u32(cp).ok_or_else(|| ErrMode::from_error_kind(input, ErrorKind::Verify).cut())?;
    *input = &input[len..];
    Ok(c)
}

/// Parses a literal string value enclosed in single quotes.
///
/// Literal strings have no escapes, so the whole body is just the span up to the closing quote:
/// a direct `skip_until` scan, erroring on any disallowed control character (which already covers
/// a bare `\r`, since TOML forbids it here the same as any other stray control character).
pub(crate) fn parse_literal<'i>(input: &mut &'i str) -> PResult<'i> {
    '\''.parse_next(input)?;
    let s = skip_until(input, '\'', is_disallowed_control)?;
    '\''.parse_next(input)?;
    Ok(Value::String(Cow::Borrowed(s)))
}

/// Parses a literal multiline string value enclosed in triple single quotes (`'''`).
pub(crate) fn parse_multiline_literal<'i>(input: &mut &'i str) -> PResult<'i> {
    "'''".parse_next(input)?;
    trim_leading_newline(input);
    let s = scan_literal(input)?;
    "'''".parse_next(input)?;
    Ok(Value::String(s))
}

/// Scans a multi-line literal string body, up to but not including the closing `'''`.
fn scan_literal<'i>(input: &mut &'i str) -> winnow::PResult<Cow<'i, str>, ContextError> {
    let start = *input;
    match fast_scan_literal(start)? {
        Some(end) => {
            *input = &start[end..];
            Ok(Cow::Borrowed(&start[..end]))
        }
        None => slow_scan_literal(input).map(Cow::Owned),
    }
}

fn fast_scan_literal(s: &str) -> winnow::PResult<Option<usize>, ContextError> {
    let mut rest = s;
    loop {
        let Some(c) = rest.chars().next() else {
            return cut(&rest);
        };
        match c {
            '\'' => {
                let quotes = rest.chars().take_while(|&c| c == '\'').count();
                if quotes >= 3 {
                    if quotes - 3 > 2 {
                        return cut(&rest);
                    }
                    return Ok(Some(s.len() - rest.len() + (quotes - 3)));
                }
                rest = &rest[quotes..];
            }
            '\r' => return Ok(None),
            c if is_disallowed_control(c) && c != '\n' => {
                return cut(&rest);
            }
            c => rest = &rest[c.len_utf8()..],
        }
    }
}

fn slow_scan_literal(input: &mut &str) -> winnow::PResult<String, ContextError> {
    let mut out = String::new();
    loop {
        let Some(c) = input.chars().next() else {
            return cut(input);
        };
        match c {
            '\'' => {
                let quotes = input.chars().take_while(|&c| c == '\'').count();
                if quotes >= 3 {
                    let trailing = quotes - 3;
                    if trailing > 2 {
                        return cut(input);
                    }
                    out.push_str(&input[..trailing]);
                    *input = &input[trailing..];
                    return Ok(out);
                }
                out.push_str(&input[..quotes]);
                *input = &input[quotes..];
            }
            '\r' => {
                if !input[1..].starts_with('\n') {
                    return cut(input);
                }
                out.push('\n');
                let _ = input.next_slice(2);
            }
            c if is_disallowed_control(c) && c != '\n' => {
                return cut(input);
            }
            c => {
                out.push(c);
                let _ = input.next_slice(c.len_utf8());
            }
        }
    }
}
