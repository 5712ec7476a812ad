use winnow::error::ContextError;

/// The error type of this library.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// An error occurred while parsing the TOML.
    Parse(ParseError),
    #[cfg(feature = "serde")]
    /// An error occurred while deserializing the TOML.
    ///
    /// This variant is only available when the `serde` feature is enabled.
    Deserialize(DeserializeError),
    /// Type conversion error.
    Convert {
        /// The type from which the conversion was attempted.
        from: &'static str,
        /// The type to which the conversion was attempted.
        to: &'static str,
    },
    /// Invalid date and time encoding.
    Datetime,
    /// A document-structure error raised while assembling parsed key/value pairs and table
    /// headers into the final document: a redefined table, an attempt to extend a table that is
    /// frozen or was implicitly created by a dotted key, an array-of-tables collision with a
    /// non-array, and the like.
    Semantic(SemanticError),
}

// TODO: Implement core::error::Error instead when we can bump the MSRV to 1.81.
#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(p) => Some(p),
            #[cfg(feature = "serde")]
            Error::Deserialize(d) => Some(d),
            Error::Convert { .. } => None,
            Error::Datetime => None,
            Error::Semantic(_) => None,
        }
    }
}

impl alloc::fmt::Display for Error {
    fn fmt(&self, f: &mut alloc::fmt::Formatter<'_>) -> alloc::fmt::Result {
        match self {
            Error::Parse(p) => write!(f, "{p}"),
            #[cfg(feature = "serde")]
            Error::Deserialize(s) => write!(f, "{s}"),
            Error::Convert { from, to } => write!(f, "cannot convert from {from} to {to}"),
            Error::Datetime => write!(f, "invalid date and time encoding"),
            Error::Semantic(s) => write!(f, "{s}"),
        }
    }
}

/// A document-structure error. See [`Error::Semantic`].
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticError {
    pub(crate) message: alloc::string::String,
}

impl SemanticError {
    pub(crate) fn new(message: alloc::string::String) -> Self {
        Self { message }
    }
}

impl alloc::fmt::Display for SemanticError {
    fn fmt(&self, f: &mut alloc::fmt::Formatter<'_>) -> alloc::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SemanticError {}

/// The context of the `Error::Parse`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub(crate) context: ContextError,
    pub(crate) offset: usize,
}

impl ParseError {
    /// Create a new parse error at the given byte offset into the source.
    pub(crate) fn new(context: ContextError, offset: usize) -> Self {
        Self { context, offset }
    }

    /// The byte offset into the source at which parsing failed.
    ///
    /// Rendering this into a 1-based line/column pair for a human-facing message is left to the
    /// caller (this crate does not format positions into text).
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Convert this error's byte offset into a 0-based `(line, column)` pair, given the original
    /// source the error was produced from.
    ///
    /// Both parts are counted in `char`s, not bytes. Returns `(0, 0)` if `source` is not the
    /// document this error came from.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let mut line = 0;
        let mut col = 0;
        for (i, ch) in source.char_indices() {
            if i >= self.offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (line, col)
    }
}

impl alloc::fmt::Display for ParseError {
    fn fmt(&self, f: &mut alloc::fmt::Formatter<'_>) -> alloc::fmt::Result {
        write!(f, "{}", self.context)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        // For some reason `winnow::error::ContextError` doesn't implement `std::error::Error`.
        None
    }
}

#[cfg(feature = "serde")]
#[derive(Debug, Clone, PartialEq)]
pub struct DeserializeError {
    pub(crate) de: serde::de::value::Error,
}

#[cfg(feature = "serde")]
impl serde::de::Error for Error {
    fn custom<T: alloc::fmt::Display>(msg: T) -> Self {
        Self::Deserialize(DeserializeError {
            de: serde::de::value::Error::custom(msg),
        })
    }
}

#[cfg(feature = "serde")]
impl From<serde::de::value::Error> for Error {
    fn from(e: serde::de::value::Error) -> Self {
        Self::Deserialize(DeserializeError { de: e })
    }
}

#[cfg(feature = "serde")]
impl alloc::fmt::Display for DeserializeError {
    fn fmt(&self, f: &mut alloc::fmt::Formatter<'_>) -> alloc::fmt::Result {
        write!(f, "{}", self.de)
    }
}

#[cfg(all(feature = "std", feature = "serde"))]
impl std::error::Error for DeserializeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.de)
    }
}
