use std::fmt;

/// The closed set of token kinds produced by the [`Lexer`](super::Lexer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A field letter at the start of a line, `v`, `o`, `a` etc. The `=` that
    /// follows the letter has been verified when this token is emitted.
    Field,
    /// A run of ASCII digits.
    AttrInt,
    /// A run of word characters, alphanumerics plus a per-site symbol set.
    AttrWord,
    /// Free text up to the end of the line.
    AttrString,
    /// Grammar punctuation inside a value, `:`, `/`, `;` or `=`.
    Separator,
    /// End of a line. A run of CR/LF is one EOL.
    Eol,
    /// A lexical failure. The text is a diagnostic, not input.
    Error,
    /// End of input. Never produced by the lexer, synthesized by the reader.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        let s = match self {
            Field => "Field",
            AttrInt => "AttrInt",
            AttrWord => "AttrWord",
            AttrString => "AttrString",
            Separator => "Separator",
            Eol => "EOL",
            Error => "Error",
            Eof => "EOF",
        };
        write!(f, "{s}")
    }
}

/// One scanned token. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character in the input.
    pub start: usize,
    /// The scanned text, or a diagnostic for [`TokenKind::Error`].
    pub text: String,
    /// 1-based line number.
    pub line: usize,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, start: usize, text: impl Into<String>, line: usize) -> Self {
        Token {
            kind,
            start,
            text: text.into(),
            line,
        }
    }

    pub(crate) fn eof(start: usize, line: usize) -> Self {
        Token::new(TokenKind::Eof, start, "", line)
    }

    /// Whether the token is of this kind.
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Whether the token is the separator `c`.
    pub fn is_separator(&self, c: char) -> bool {
        self.kind == TokenKind::Separator && self.text.len() == 1 && self.text.starts_with(c)
    }

    /// EOL or EOF, both terminate a line.
    pub fn is_line_end(&self) -> bool {
        matches!(self.kind, TokenKind::Eol | TokenKind::Eof)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eol | TokenKind::Eof => write!(f, "{}", self.kind),
            _ => write!(f, "{} {:?}", self.kind, self.text),
        }
    }
}

/// The field letters of RFC 4566, resolved once when a line is recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Version,
    Origin,
    SessionName,
    Information,
    Uri,
    Email,
    Phone,
    Connection,
    Bandwidth,
    Timing,
    Repeat,
    TimeZone,
    EncryptionKey,
    Attribute,
    Media,
}

impl FieldKind {
    /// The letter before the `=`.
    pub fn letter(&self) -> char {
        use FieldKind::*;
        match self {
            Version => 'v',
            Origin => 'o',
            SessionName => 's',
            Information => 'i',
            Uri => 'u',
            Email => 'e',
            Phone => 'p',
            Connection => 'c',
            Bandwidth => 'b',
            Timing => 't',
            Repeat => 'r',
            TimeZone => 'z',
            EncryptionKey => 'k',
            Attribute => 'a',
            Media => 'm',
        }
    }
}

impl TryFrom<char> for FieldKind {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        use FieldKind::*;
        let kind = match c {
            'v' => Version,
            'o' => Origin,
            's' => SessionName,
            'i' => Information,
            'u' => Uri,
            'e' => Email,
            'p' => Phone,
            'c' => Connection,
            'b' => Bandwidth,
            't' => Timing,
            'r' => Repeat,
            'z' => TimeZone,
            'k' => EncryptionKey,
            'a' => Attribute,
            'm' => Media,
            _ => return Err(c),
        };
        Ok(kind)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.letter())
    }
}

/// Attribute names with their own sub-grammar. Everything else is generic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    IceUfrag,
    IcePwd,
    Fingerprint,
    RtpMap,
    Fmtp,
    RtcpFb,
    Candidate,
    EndOfCandidates,
    Ssrc,
    SsrcGroup,
    Generic,
}

impl AttributeKind {
    /// Resolve an attribute name, unknown names are [`AttributeKind::Generic`].
    pub fn from_name(name: &str) -> Self {
        use AttributeKind::*;
        match name {
            "ice-ufrag" => IceUfrag,
            "ice-pwd" => IcePwd,
            "fingerprint" => Fingerprint,
            "rtpmap" => RtpMap,
            "fmtp" => Fmtp,
            "rtcp-fb" => RtcpFb,
            "candidate" => Candidate,
            "end-of-candidates" => EndOfCandidates,
            "ssrc" => Ssrc,
            "ssrc-group" => SsrcGroup,
            _ => Generic,
        }
    }

    /// Attributes that only make sense inside an m= section.
    pub fn is_media_only(&self) -> bool {
        use AttributeKind::*;
        matches!(self, RtpMap | Fmtp | RtcpFb | Candidate | Ssrc | SsrcGroup)
    }
}
