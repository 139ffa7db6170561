use thiserror::Error;

use super::token::{Token, TokenKind};

/// A fatal SDP parse failure.
///
/// The parse stops at the first of these. `trace` holds the tokens read on
/// the failing line, up to and including the one that failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("SDP parse: line {line}: {kind}")]
pub struct SdpError {
    pub line: usize,
    pub kind: ErrorKind,
    pub trace: Vec<Token>,
}

impl SdpError {
    /// The tokens of the failing line, one per line of output.
    pub fn trace_string(&self) -> String {
        let mut s = String::new();
        for t in &self.trace {
            s.push_str(&format!("  {:>3}:{:<5} {}\n", t.line, t.start, t));
        }
        s
    }
}

/// What went wrong in an [`SdpError`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The grammar required another kind of token.
    #[error("expected {expected}, found {found} {text:?}")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        text: String,
    },

    /// A separator token other than the one the grammar required.
    #[error("expected '{expected}', found {found:?}")]
    UnexpectedSeparator { expected: char, found: String },

    /// An integer that doesn't fit its target.
    #[error("invalid {target}: {text:?}")]
    InvalidInteger { text: String, target: &'static str },

    /// `a=rtpmap`, `a=fmtp` or `a=rtcp-fb` for a payload type that isn't on the m= line.
    #[error("payload type {0} not on the m= line")]
    PayloadTypeNotRegistered(u8),

    /// The m= line lists a payload type twice.
    #[error("payload type {0} repeated on the m= line")]
    DuplicatePayloadType(u8),

    /// A TTL on a connection address that isn't IPv4.
    #[error("TTL not allowed for non-IPv4 address {0:?}")]
    TtlNotAllowed(String),

    /// A field letter that can't appear in the current section.
    #[error("{field} not allowed in {section} section")]
    FieldNotAllowed { field: char, section: &'static str },

    /// An attribute that needs an m= section, found before the first one.
    #[error("a={0} before the first m= line")]
    MediaOnlyAttribute(String),

    /// A media scoped line without a current media.
    #[error("no m= section")]
    MissingMedia,

    /// A candidate without the `typ` keyword before its type.
    #[error("candidate expected \"typ\", found {0:?}")]
    CandidateMissingTyp(String),
}
