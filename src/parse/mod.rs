mod assembler;
mod datetime;
mod ignored;
mod numbers;
mod strings;

use crate::{Array, Error, ParseError, Table, Value};
use assembler::{Document, InlineTableBuilder};

use alloc::{borrow::Cow, vec::Vec};
use ignored::{newline, parse_comment_newline, parse_whitespace_n_comments};
use winnow::{
    ascii::space0,
    combinator::{alt, cut_err, delimited, opt, peek},
    error::{ContextError, ErrMode, ErrorKind, StrContext, StrContextValue},
    token::{any, take_while},
    PResult, Parser,
};

/// Parse a TOML document.
///
/// Strings, table keys and array elements borrow from `input` when no escape processing was
/// needed, and own a new allocation otherwise.
pub fn parse(input: &str) -> Result<Table<'_>, Error> {
    parse_with(input, |text| {
        numbers::default_parse_float(text).map(Value::Float)
    })
}

/// Parse a TOML document from bytes, validating that it is UTF-8 and has no leading byte-order
/// mark (TOML documents must not have one).
pub fn parse_bytes(input: &[u8]) -> Result<Table<'_>, Error> {
    if input.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return Err(Error::Semantic(crate::error::SemanticError::new(
            "a TOML document must not start with a byte-order mark".into(),
        )));
    }
    let s = core::str::from_utf8(input).map_err(|_| {
        Error::Semantic(crate::error::SemanticError::new(
            "document is not valid UTF-8".into(),
        ))
    })?;
    parse(s)
}

/// Parse a TOML document, converting float literals with `parse_float` instead of the default
/// `f64::from_str`-based conversion.
///
/// `parse_float` is called once per lexical float, with its exact source text except that
/// underscores are stripped beforehand (so `1_000.5` is seen as `"1000.5"`). It must not return a
/// `Value::Table` or `Value::Array`; doing so is reported as `Error::Convert`.
pub fn parse_with<'i>(
    input: &'i str,
    parse_float: impl Fn(&str) -> Result<Value<'i>, Error>,
) -> Result<Table<'i>, Error> {
    if input.contains('\0') {
        return Err(Error::Semantic(crate::error::SemanticError::new(
            "a TOML document must not contain a null byte".into(),
        )));
    }

    let parse_float = move |text: &str| -> Result<Value<'i>, Error> {
        let stripped;
        let text = if text.contains('_') {
            stripped = text.replace('_', "");
            stripped.as_str()
        } else {
            text
        };
        let value = parse_float(text)?;
        if value.is_table_or_array() {
            return Err(Error::Convert {
                from: "parse_float result",
                to: "float",
            });
        }
        Ok(value)
    };

    let mut doc = Document::new();
    let mut rest = input;
    parse_document(&mut rest, &mut doc, &parse_float)
        .map_err(|e| match e {
            ErrMode::Backtrack(c) | ErrMode::Cut(c) => {
                let offset = input.len() - rest.len();
                // `offset` above points at where the failing combinator was entered; winnow's
                // own offset tracking (via `e.offset()`-style helpers) isn't available on a bare
                // `ContextError`, so this is the best approximation available without re-running
                // the parse.
                ParseError::new(c, offset)
            }
            ErrMode::Incomplete(_) => ParseError::new(ContextError::new(), input.len()),
        })
        .map_err(Error::Parse)?;
    Ok(doc.finish())
}

fn to_cut(input: &mut &str, e: Error) -> ErrMode<ContextError> {
    ErrMode::from_external_error(input, ErrorKind::Verify, e).cut()
}

/// Drives the whole document: table/array-of-tables headers and key/value lines, each followed by
/// an optional comment and a newline (or EOF).
fn parse_document<'i>(
    input: &mut &'i str,
    doc: &mut Document<'i>,
    parse_float: &dyn Fn(&str) -> Result<Value<'i>, Error>,
) -> PResult<(), ContextError> {
    parse_whitespace_n_comments.parse_next(input)?;
    while !input.is_empty() {
        if input.starts_with("[[") {
            let parts = delimited("[[", cut_err(parse_dotted_key), cut_err("]]")).parse_next(input)?;
            doc.open_array_of_tables(parts)
                .map_err(|e| to_cut(input, e))?;
        } else if input.starts_with('[') {
            let parts = delimited('[', cut_err(parse_dotted_key), cut_err(']')).parse_next(input)?;
            doc.open_table(parts).map_err(|e| to_cut(input, e))?;
        } else {
            let keys = parse_dotted_key(input)?;
            space0.void().parse_next(input)?;
            cut_err('=')
                .context(StrContext::Expected(StrContextValue::CharLiteral('=')))
                .parse_next(input)?;
            let value = cut_err(|i: &mut &'i str| parse_value(i, parse_float)).parse_next(input)?;
            doc.assign(keys, value).map_err(|e| to_cut(input, e))?;
        }
        parse_end_of_line(input)?;
        parse_whitespace_n_comments.parse_next(input)?;
    }
    Ok(())
}

/// The rest of a header or key/value line: optional whitespace, an optional comment, then a
/// newline or end of input.
fn parse_end_of_line(input: &mut &str) -> PResult<(), ContextError> {
    space0.void().parse_next(input)?;
    cut_err(alt((parse_comment_newline, newline, winnow::combinator::eof.void())))
        .context(StrContext::Label("end of line"))
        .parse_next(input)
}

/// Parses a dotted or single key.
fn parse_dotted_key<'i>(input: &mut &'i str) -> PResult<Vec<Cow<'i, str>>, ContextError> {
    winnow::combinator::separated(1.., parse_key, '.').parse_next(input)
}

/// Parses a single key segment: a bare key or a quoted (basic/literal, single-line only) key.
fn parse_key<'i>(input: &mut &'i str) -> PResult<Cow<'i, str>, ContextError> {
    let string_key = alt((strings::parse_basic, strings::parse_literal)).map(|s| match s {
        Value::String(s) => s,
        _ => unreachable!("string parsers only ever produce Value::String"),
    });
    delimited(
        space0,
        alt((
            string_key,
            take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')
                .map(Cow::Borrowed),
        )),
        space0,
    )
    .context(StrContext::Label("key"))
    .parse_next(input)
}

/// Parses a value: string, date-time, number, boolean, array, or inline table.
fn parse_value<'i>(
    input: &mut &'i str,
    parse_float: &dyn Fn(&str) -> Result<Value<'i>, Error>,
) -> PResult<Value<'i>, ContextError> {
    space0.void().parse_next(input)?;
    let c = peek(any).parse_next(input)?;
    let value = match c {
        '"' | '\'' => strings::parse(input)?,
        '[' => parse_array(input, parse_float)?,
        '{' => parse_inline_table(input, parse_float)?,
        _ => parse_number_or_datetime(input, parse_float)?,
    };
    space0.void().parse_next(input)?;
    Ok(value)
}

/// Date-times, floats and integers all start with a digit or sign, so they share a dispatch
/// point: date-time is tried first since any input shaped like one (4 digits then `-`, or 2
/// digits then `:`) can never validly be anything else in TOML.
fn parse_number_or_datetime<'i>(
    input: &mut &'i str,
    parse_float: &dyn Fn(&str) -> Result<Value<'i>, Error>,
) -> PResult<Value<'i>, ContextError> {
    if let Some(dt) = opt(datetime::date_time).parse_next(input)? {
        return Ok(Value::Datetime(dt));
    }
    if let Some(text) = opt(numbers::float_text).parse_next(input)? {
        return parse_float(text).map_err(|e| to_cut(input, e));
    }
    numbers::integer(input).map(Value::Integer)
}

/// Parses an array of values.
fn parse_array<'i>(
    input: &mut &'i str,
    parse_float: &dyn Fn(&str) -> Result<Value<'i>, Error>,
) -> PResult<Value<'i>, ContextError> {
    '['.parse_next(input)?;
    let arr = cut_err(|i: &mut &'i str| parse_array_values(i, parse_float)).parse_next(input)?;
    cut_err(']').parse_next(input)?;
    Ok(Value::Array(arr))
}

fn parse_array_values<'i>(
    input: &mut &'i str,
    parse_float: &dyn Fn(&str) -> Result<Value<'i>, Error>,
) -> PResult<Array<'i>, ContextError> {
    parse_whitespace_n_comments.parse_next(input)?;
    let mut array = Array::new();
    if peek(opt(']')).parse_next(input)?.is_some() {
        return Ok(array);
    }
    loop {
        let value = parse_value(input, parse_float)?;
        array.push(value);
        parse_whitespace_n_comments.parse_next(input)?;
        if opt(',').parse_next(input)?.is_none() {
            break;
        }
        parse_whitespace_n_comments.parse_next(input)?;
        if peek(opt(']')).parse_next(input)?.is_some() {
            break;
        }
    }
    parse_whitespace_n_comments.parse_next(input)?;
    Ok(array)
}

/// Parses an inline table. Dotted keys inside one are resolved against their own throwaway table,
/// separately from the document's table tree (see [`InlineTableBuilder`]).
fn parse_inline_table<'i>(
    input: &mut &'i str,
    parse_float: &dyn Fn(&str) -> Result<Value<'i>, Error>,
) -> PResult<Value<'i>, ContextError> {
    '{'.parse_next(input)?;
    space0.void().parse_next(input)?;
    let mut builder = InlineTableBuilder::new();
    if peek(opt('}')).parse_next(input)?.is_none() {
        loop {
            let keys = parse_dotted_key(input)?;
            space0.void().parse_next(input)?;
            cut_err('=')
                .context(StrContext::Expected(StrContextValue::CharLiteral('=')))
                .parse_next(input)?;
            let value = cut_err(|i: &mut &'i str| parse_value(i, parse_float)).parse_next(input)?;
            builder.assign(keys, value).map_err(|e| to_cut(input, e))?;
            space0.void().parse_next(input)?;
            if opt(',').parse_next(input)?.is_none() {
                break;
            }
            space0.void().parse_next(input)?;
        }
    }
    space0.void().parse_next(input)?;
    cut_err('}')
        .context(StrContext::Expected(StrContextValue::CharLiteral('}')))
        .parse_next(input)?;
    Ok(Value::Table(builder.finish()))
}
