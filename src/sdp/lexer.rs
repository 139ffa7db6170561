use std::collections::VecDeque;

use combine::parser::char::digit;
use combine::{many1, satisfy};
use combine::{ParseError, Parser, Stream};

use super::data::is_rtp_proto;
use super::token::{AttributeKind, FieldKind, Token, TokenKind};
use crate::util::Pii;

/// Symbols accepted in a word besides alphanumerics, unless the call site narrows it.
const WORD: &str = "-_/:.=";

/// Connection addresses. No `/`, that starts the TTL.
const ADDR: &str = "-_:.";

/// Scan the whole input into tokens, without the EOF that a reader synthesizes.
pub fn lex(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}

/// Contextual SDP scanner.
///
/// Works one line at a time. Every line is `<field>=<payload>` and the payload is
/// scanned with a sub-grammar picked by the field letter, and for `a=` lines, by
/// the attribute name.
///
/// A line that fails to scan yields the tokens scanned so far followed by one
/// [`TokenKind::Error`]. The rest of that line, including its line break, is
/// skipped and scanning resumes on the next line.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    pending: VecDeque<Token>,
}

impl<'a> Lexer<'a> {
    /// A lexer at the start of `input`, on line 1.
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            line: 1,
            pending: VecDeque::new(),
        }
    }

    fn scan_line(&mut self) {
        let rest = &self.input[self.pos..];

        if rest.starts_with(is_line_break) {
            let start = self.pos;
            let breaks = self.skip_line_breaks();
            let text = &self.input[start..self.pos];
            self.pending
                .push_back(Token::new(TokenKind::Eol, start, text, self.line));
            self.line += breaks;
            return;
        }

        let end = rest
            .find(is_line_break)
            .map(|i| self.pos + i)
            .unwrap_or(self.input.len());

        let text = &self.input[self.pos..end];
        let mut scanner = LineScanner::new(text, self.pos, self.line);

        let result = scan_fields(&mut scanner);
        let error_at = self.pos + scanner.pos;
        self.pending.extend(scanner.tokens);
        self.pos = end;

        if let Err(expected) = result {
            let diagnostic = format!("line {}: expected {}: {:?}", self.line, expected, text);
            warn!(line = self.line, "SDP line dropped: {}", Pii(&diagnostic));
            self.pending.push_back(Token::new(
                TokenKind::Error,
                error_at,
                diagnostic,
                self.line,
            ));

            // The line break belongs to the dropped line, no EOL for it.
            self.line += self.skip_line_breaks();
        }
    }

    /// Consume a run of CR/LF. Returns how many lines the run ends.
    fn skip_line_breaks(&mut self) -> usize {
        let rest = &self.input[self.pos..];
        let run = rest
            .find(|c| !is_line_break(c))
            .unwrap_or(rest.len());
        let newlines = rest[..run].matches('\n').count();
        self.pos += run;

        if run == 0 {
            0
        } else {
            // A lone \r still ends a line.
            newlines.max(1)
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(t) = self.pending.pop_front() {
                return Some(t);
            }
            if self.pos >= self.input.len() {
                return None;
            }
            self.scan_line();
        }
    }
}

fn is_line_break(c: char) -> bool {
    c == '\r' || c == '\n'
}

type Scan<T = ()> = Result<T, String>;

/// Scans a single line, without its line break.
struct LineScanner<'a> {
    text: &'a str,
    offset: usize,
    line: usize,
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> LineScanner<'a> {
    fn new(text: &'a str, offset: usize, line: usize) -> Self {
        LineScanner {
            text,
            offset,
            line,
            pos: 0,
            tokens: vec![],
        }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn emit(&mut self, kind: TokenKind, start: usize, text: &str) {
        self.tokens
            .push(Token::new(kind, self.offset + start, text, self.line));
    }

    fn spaces(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start_matches(|c| c == ' ' || c == '\t');
        self.pos += rest.len() - trimmed.len();
    }

    /// Run `parser` at the cursor and emit what it matched as one token.
    fn take<P>(&mut self, kind: TokenKind, mut parser: P, what: &str) -> Scan<&'a str>
    where
        P: Parser<&'a str, Output = String>,
    {
        let rest = self.rest();
        match parser.parse(rest) {
            Ok((_, remaining)) => {
                let start = self.pos;
                self.pos = self.text.len() - remaining.len();
                let matched = &self.text[start..self.pos];
                self.emit(kind, start, matched);
                Ok(matched)
            }
            Err(_) => Err(what.to_string()),
        }
    }

    fn int(&mut self, what: &str) -> Scan<&'a str> {
        self.spaces();
        self.take(TokenKind::AttrInt, digits(), what)
    }

    fn word(&mut self, extra: &'static str, what: &str) -> Scan<&'a str> {
        self.spaces();
        self.take(TokenKind::AttrWord, word_of(extra), what)
    }

    fn word_until(&mut self, stop: &'static str, what: &str) -> Scan<&'a str> {
        self.spaces();
        self.take(TokenKind::AttrWord, none_of(stop), what)
    }

    /// Free text to the end of the line. Leading spaces are part of the text.
    fn text(&mut self, what: &str) -> Scan<&'a str> {
        self.take(TokenKind::AttrString, any_value(), what)
    }

    fn opt_sep(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            let start = self.pos;
            self.pos += c.len_utf8();
            let text = &self.text[start..self.pos];
            self.emit(TokenKind::Separator, start, text);
            true
        } else {
            false
        }
    }

    fn sep(&mut self, c: char) -> Scan {
        if self.opt_sep(c) {
            Ok(())
        } else {
            Err(format!("'{c}'"))
        }
    }

    fn finish(&mut self) -> Scan {
        self.spaces();
        if self.at_end() {
            Ok(())
        } else {
            Err("end of line".into())
        }
    }
}

/// `<field>=` followed by the field's sub-grammar.
fn scan_fields(s: &mut LineScanner<'_>) -> Scan {
    let letter = s.peek().unwrap_or(' ');
    let field =
        FieldKind::try_from(letter).map_err(|c| format!("field letter, found {c:?}"))?;

    let after = letter.len_utf8();
    if !s.text[after..].starts_with('=') {
        return Err(format!("'=' after {letter}"));
    }
    s.emit(TokenKind::Field, 0, &s.text[..after]);
    s.pos = after + 1;

    use FieldKind::*;
    match field {
        // v=0
        Version => s.int("version").map(|_| ()),
        Origin => origin(s),
        SessionName | Information | Uri | Email | Phone | Repeat | TimeZone => {
            s.text("text").map(|_| ())
        }
        Connection => connection(s),
        // b=AS:256
        Bandwidth => {
            s.word("-", "bandwidth type")?;
            s.sep(':')?;
            s.int("bandwidth").map(|_| ())
        }
        // t=0 0
        Timing => {
            s.int("start time")?;
            s.int("stop time").map(|_| ())
        }
        // k=prompt
        // k=base64:<encoded encryption key>
        EncryptionKey => {
            s.word("", "encryption method")?;
            if s.opt_sep(':') {
                s.text("encryption key")?;
            }
            Ok(())
        }
        Attribute => attribute(s),
        Media => media(s),
    }?;

    s.finish()
}

/// `o=<username> <sess-id> <sess-version> <nettype> <addrtype> <unicast-address>`
fn origin(s: &mut LineScanner<'_>) -> Scan {
    s.word(WORD, "username")?;
    s.int("session id")?;
    s.int("session version")?;
    s.word(WORD, "network type")?;
    s.word(WORD, "address type")?;
    s.word(WORD, "unicast address")?;
    Ok(())
}

/// `c=<nettype> <addrtype> <connection-address>`
fn connection(s: &mut LineScanner<'_>) -> Scan {
    s.word(WORD, "network type")?;
    s.word(WORD, "address type")?;
    connection_address(s)
}

/// `<address>[/<ttl>][/<number of addresses>]`
fn connection_address(s: &mut LineScanner<'_>) -> Scan {
    s.word(ADDR, "connection address")?;
    if s.opt_sep('/') {
        s.int("ttl or address count")?;
        if s.opt_sep('/') {
            s.int("address count")?;
        }
    }
    Ok(())
}

/// `m=<media> <port>[/<number of ports>] <proto> <fmt> ...`
fn media(s: &mut LineScanner<'_>) -> Scan {
    s.word(WORD, "media type")?;
    s.int("port")?;
    if s.opt_sep('/') {
        s.int("number of ports")?;
    }
    let proto = s.word(WORD, "protocol")?;

    if is_rtp_proto(proto) {
        // m=video 9 UDP/TLS/RTP/SAVPF 96 97 125 107
        loop {
            s.spaces();
            if s.at_end() {
                break;
            }
            s.int("payload type")?;
        }
    } else {
        // m=application 9 UDP/DTLS/SCTP webrtc-datachannel
        s.spaces();
        s.text("media format")?;
    }

    Ok(())
}

/// `a=<attribute>` or `a=<attribute>:<value>`
fn attribute(s: &mut LineScanner<'_>) -> Scan {
    let name = s.word("-", "attribute name")?;

    if !s.opt_sep(':') {
        // a=sendrecv
        return Ok(());
    }

    use AttributeKind::*;
    match AttributeKind::from_name(name) {
        // a=ice-ufrag:IdNYTNL1fjvjyEzL
        // a=ice-pwd:4d64pT3T1xfwbZvi9fQKjoPb
        IceUfrag | IcePwd => s.text("ice credential").map(|_| ()),
        // a=fingerprint:sha-256 45:AD:5C:82:F8:BE:B5:2A:D1:74:A6:16:D0:50:CD:86:9C:97:9D:BD
        Fingerprint => {
            s.word("-", "hash function")?;
            s.spaces();
            s.text("fingerprint").map(|_| ())
        }
        // a=rtpmap:111 opus/48000/2
        RtpMap => {
            s.int("payload type")?;
            s.word_until(" /", "encoding name")?;
            s.sep('/')?;
            s.int("clock rate")?;
            if s.opt_sep('/') {
                s.text("encoding parameters")?;
            }
            Ok(())
        }
        Fmtp => fmtp(s),
        // a=rtcp-fb:96 nack pli
        // a=rtcp-fb:* ccm fir
        RtcpFb => {
            s.spaces();
            if s.peek() == Some('*') {
                s.word_until(" ", "payload type")?;
            } else {
                s.int("payload type")?;
            }
            s.spaces();
            s.text("feedback type").map(|_| ())
        }
        Candidate => candidate(s),
        // a=ssrc:3948621874 cname:xeXs3aE9AOBn00yJ
        Ssrc => {
            s.int("ssrc id")?;
            s.word_until(" :", "ssrc attribute")?;
            if s.opt_sep(':') {
                s.text("ssrc attribute value")?;
            }
            Ok(())
        }
        // a=ssrc-group:FID 1111 2222
        SsrcGroup => {
            s.word("-", "group semantics")?;
            loop {
                s.spaces();
                if s.at_end() {
                    break;
                }
                s.int("ssrc id")?;
            }
            Ok(())
        }
        EndOfCandidates | Generic => s.text("attribute value").map(|_| ()),
    }
}

/// `a=fmtp:<format> <param>[=<value>][;<param>[=<value>]]*`
///
/// a=fmtp:111 minptime=10;useinbandfec=1
/// a=fmtp:111 minptime=10; useinbandfec=1
/// a=fmtp:101 0-15
fn fmtp(s: &mut LineScanner<'_>) -> Scan {
    s.int("payload type")?;

    loop {
        s.word_until(" ;=", "format parameter")?;
        if s.opt_sep('=') {
            s.word_until(" ;", "format parameter value")?;
        }
        s.spaces();
        s.opt_sep(';');
        s.spaces();
        if s.at_end() {
            break;
        }
    }

    Ok(())
}

/// RFC 5245 section 15.1
///
/// ```text
/// candidate-attribute   = "candidate" ":" foundation SP component-id SP
///                         transport SP
///                         priority SP
///                         connection-address SP     ;from RFC 4566
///                         port         ;port from RFC 4566
///                         SP cand-type
///                         [SP rel-addr]
///                         [SP rel-port]
///                         *(SP extension-att-name SP
///                              extension-att-value)
/// ```
fn candidate(s: &mut LineScanner<'_>) -> Scan {
    s.word_until(" ", "foundation")?;
    s.int("component id")?;
    s.word(WORD, "transport")?;
    s.int("priority")?;
    connection_address(s)?;
    s.int("port")?;
    s.word(WORD, "typ")?;
    s.word(WORD, "candidate type")?;

    // raddr 203.0.113.100 rport 10100 generation 0 network-id 1
    loop {
        s.spaces();
        if s.at_end() {
            break;
        }
        s.word_until(" ", "extension name")?;
        s.word_until(" ", "extension value")?;
    }

    Ok(())
}

/// One or more ASCII digits.
fn digits<Input>() -> impl Parser<Input, Output = String>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    many1(digit())
}

/// Alphanumerics and the given symbols.
fn word_of<Input>(extra: &'static str) -> impl Parser<Input, Output = String>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    many1(satisfy(move |c: char| c.is_alphanumeric() || extra.contains(c)))
}

/// Anything but the given characters, \r or \n.
fn none_of<Input>(stop: &'static str) -> impl Parser<Input, Output = String>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    many1(satisfy(move |c: char| {
        !stop.contains(c) && !is_line_break(c)
    }))
}

/// Any value that isn't \r or \n.
fn any_value<Input>() -> impl Parser<Input, Output = String>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    many1(satisfy(|c| !is_line_break(c)))
}
