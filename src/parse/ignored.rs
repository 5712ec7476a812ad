use winnow::{
    ascii::space0,
    combinator::{alt, cut_err, empty, eof, fail, opt, peek, preceded},
    dispatch,
    error::{ContextError, ErrMode, ErrorKind, StrContext, StrContextValue},
    stream::Stream as _,
    token::{any, one_of, take_while},
    PResult, Parser,
};

/// Control characters forbidden in comments and strings wherever tab, and (inside multi-line
/// strings) a recognised newline, are not separately permitted.
///
/// A lone `\r` not part of a `\r\n` pair falls in this range, so it is rejected here rather than
/// given special-case handling: [`newline`] always consumes a well-formed `\r\n` pair before this
/// predicate ever sees the characters that follow it.
pub(crate) fn is_disallowed_control(c: char) -> bool {
    matches!(c, '\0'..='\u{08}' | '\u{0a}'..='\u{1f}' | '\u{7f}')
}

/// Parse a comment, w/o the trailing newline.
pub(crate) fn parse_comment(input: &mut &str) -> PResult<()> {
    preceded(
        '#',
        // > Control characters other than tab (U+0000 to U+0008, U+000A to U+001F, U+007F) are
        // > not permitted in comments.
        take_while(0.., |c| !is_disallowed_control(c)),
    )
    .void()
    .parse_next(input)
}

/// Parses a comment and newline (unless at EOF).
pub(crate) fn parse_comment_newline(input: &mut &str) -> PResult<()> {
    (parse_comment, alt((newline, eof.void())))
        .void()
        .parse_next(input)
}

/// Parse all whitespace (including newlines) and comments.
pub(crate) fn parse_whitespace_n_comments(input: &mut &str) -> PResult<()> {
    let mut start = input.checkpoint();
    loop {
        let _ = space0.parse_next(input)?;

        let next_token = opt(peek(any)).parse_next(input)?;
        match next_token {
            Some('#') => (parse_comment, newline).void().parse_next(input)?,
            Some('\n') | Some('\r') => newline.parse_next(input)?,
            _ => break,
        }

        let end = input.checkpoint();
        if start == end {
            break;
        }
        start = end;
    }

    Ok(())
}

/// Parse a newline: either `\n` or `\r\n`. A bare `\r` not followed by `\n` fails.
pub(crate) fn newline(input: &mut &str) -> PResult<()> {
    dispatch! {any;
        '\n' => empty,
        '\r' => cut_err(one_of('\n'))
            .context(StrContext::Expected(StrContextValue::Description("line feed after carriage return")))
            .void(),
        _ => fail,
    }
    .parse_next(input)
}

/// Advance `input` up to (not including) the next occurrence of `expect`, failing with a cut
/// error if any character matching `error_on` is seen first or the input runs out.
///
/// Used by single-line literal strings (`parse::strings::parse_literal`), which have no escapes
/// to process: the whole body is just this scan to the closing `'`, erroring on any disallowed
/// control character, rather than letting the enclosing `alt` fall through to a generic "expected
/// value" message.
pub(crate) fn skip_until<'i>(
    input: &mut &'i str,
    expect: char,
    error_on: impl Fn(char) -> bool,
) -> PResult<&'i str, ContextError> {
    let start = *input;
    loop {
        match input.chars().next() {
            Some(c) if c == expect => {
                let consumed = start.len() - input.len();
                return Ok(&start[..consumed]);
            }
            Some(c) if error_on(c) => {
                return Err(ErrMode::from_error_kind(input, ErrorKind::Verify).cut());
            }
            Some(c) => {
                let _ = input.next_slice(c.len_utf8());
            }
            None => {
                return Err(ErrMode::from_error_kind(input, ErrorKind::Eof).cut());
            }
        }
    }
}
