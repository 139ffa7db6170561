use std::str::FromStr;
use std::time::SystemTime;

use crate::id::{Pt, Ssrc};
use crate::util::{ntp_to_time, Pii};

use super::data::*;
use super::error::{ErrorKind, SdpError};
use super::stream::TokenStream;
use super::token::{AttributeKind, FieldKind, Token, TokenKind};

/// Where we are in the document. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    /// Before the first t= line.
    Session,
    /// After the first t= line, before the first m= line.
    Time,
    /// After an m= line.
    Media,
}

impl Section {
    fn name(&self) -> &'static str {
        match self {
            Section::Session => "session",
            Section::Time => "time",
            Section::Media => "media",
        }
    }
}

/// Why a field handler stopped before finishing its line.
enum Interrupt {
    /// The lexer gave up on the line. Drop it and carry on.
    Lexical(Token),
    /// The line doesn't fit the grammar. Stop the parse.
    Fatal(ErrorKind),
}

impl From<ErrorKind> for Interrupt {
    fn from(v: ErrorKind) -> Self {
        Interrupt::Fatal(v)
    }
}

type Step<T = ()> = Result<T, Interrupt>;

/// Builds a [`Data`] from a token stream.
///
/// Each field handler reads its whole line into locals and only writes to the
/// document once the line end is seen. A line that is interrupted leaves no
/// trace in the document.
pub(crate) struct SdpParser<'s, 'a> {
    tokens: &'s mut TokenStream<'a>,
    data: Data,
    section: Section,
}

impl<'s, 'a> SdpParser<'s, 'a> {
    pub fn new(tokens: &'s mut TokenStream<'a>) -> Self {
        SdpParser {
            tokens,
            data: Data::default(),
            section: Section::Session,
        }
    }

    pub fn parse(mut self) -> Result<Data, SdpError> {
        loop {
            let t = self.tokens.next();

            match t.kind {
                TokenKind::Field => match self.field(&t) {
                    Ok(()) => {}
                    Err(Interrupt::Lexical(e)) => {
                        warn!(line = e.line, "Partial line dropped: {}", Pii(&e.text));
                    }
                    Err(Interrupt::Fatal(kind)) => {
                        let err = SdpError {
                            line: t.line,
                            kind,
                            trace: self.tokens.line_trace(),
                        };
                        error!(fatal = true, line = err.line, "{}", Pii(&err));
                        debug!("Tokens of failed line:\n{}", Pii(err.trace_string()));
                        return Err(err);
                    }
                },
                TokenKind::Eof => break,
                _ => {
                    debug!(line = t.line, "Skip {} between lines", t.kind);
                }
            }
        }

        debug!(
            "Parsed SDP with {} media section(s)",
            self.data.media.len()
        );

        Ok(self.data)
    }

    fn field(&mut self, t: &Token) -> Step {
        let letter = t.text.chars().next().unwrap_or(' ');
        let field = FieldKind::try_from(letter).map_err(|_| ErrorKind::UnexpectedToken {
            expected: TokenKind::Field,
            found: t.kind,
            text: t.text.clone(),
        })?;

        use FieldKind::*;

        if self.section == Section::Media
            && !matches!(
                field,
                Information | Connection | Bandwidth | EncryptionKey | Attribute | Media
            )
        {
            return Err(ErrorKind::FieldNotAllowed {
                field: letter,
                section: self.section.name(),
            }
            .into());
        }

        match field {
            Version => self.version(),
            Origin => self.origin(),
            SessionName => self.session_name(),
            Information => self.information(),
            Uri | Email | Phone | Repeat | TimeZone => self.session_text(field),
            Connection => self.connection(),
            Bandwidth => self.bandwidth(),
            Timing => self.timing(),
            EncryptionKey => self.encryption_key(),
            Attribute => self.attribute(),
            Media => self.media(),
        }
    }

    // /////////////////////////////////////////////////// Session description

    /// `v=0`
    fn version(&mut self) -> Step {
        let version = self.int("version")?;
        self.eol()?;

        self.data.version = version;
        Ok(())
    }

    /// `o=<username> <sess-id> <sess-version> <nettype> <addrtype> <unicast-address>`
    fn origin(&mut self) -> Step {
        let username = self.word()?;
        let session_id = self.int("session id")?;
        let session_version = self.int("session version")?;
        let net_type = self.word()?;
        let addr_type = self.word()?;
        let address = self.word()?;
        self.eol()?;

        self.data.origin = Origin {
            username,
            session_id,
            session_version,
            net_type,
            addr_type,
            address,
        };
        Ok(())
    }

    /// `s=<session name>`
    fn session_name(&mut self) -> Step {
        let name = self.text()?;
        self.eol()?;

        self.data.name = name;
        Ok(())
    }

    /// `i=<session description>`, the media title in a media section.
    fn information(&mut self) -> Step {
        let info = self.text()?;
        self.eol()?;

        if self.section == Section::Media {
            self.media_mut()?.title = Some(info);
        } else {
            self.data.info = Some(info);
        }
        Ok(())
    }

    /// `u=`, `e=`, `p=`, `r=` and `z=`, kept as text.
    fn session_text(&mut self, field: FieldKind) -> Step {
        let value = self.text()?;
        self.eol()?;

        let target = match field {
            FieldKind::Uri => &mut self.data.uri,
            FieldKind::Email => &mut self.data.email,
            FieldKind::Phone => &mut self.data.phone,
            FieldKind::Repeat => &mut self.data.repeat,
            _ => &mut self.data.time_zones,
        };
        *target = Some(value);
        Ok(())
    }

    /// `c=<nettype> <addrtype> <connection-address>`
    fn connection(&mut self) -> Step {
        let net_type = self.word()?;
        let addr_type = self.word()?;
        let (address, ttl, count) = self.connection_address()?;
        self.eol()?;

        let c = Connection {
            net_type,
            addr_type,
            address,
            ttl,
            count,
        };

        if self.section == Section::Media {
            self.media_mut()?.connection = Some(c);
        } else {
            self.data.connection = Some(c);
        }
        Ok(())
    }

    /// `<address>[/<ttl>][/<number of addresses>]`
    ///
    /// Only IPv4 addresses have a TTL. For others a single number is the count.
    fn connection_address(&mut self) -> Step<(String, u8, u32)> {
        let address = self.word()?;
        let mut ttl = 0;
        let mut count = 0;

        if self.opt_sep('/')? {
            if is_ipv4(&address) {
                ttl = self.int("ttl")?;
                if self.opt_sep('/')? {
                    count = self.int("address count")?;
                }
            } else {
                count = self.int("address count")?;
                if self.opt_sep('/')? {
                    return Err(ErrorKind::TtlNotAllowed(address).into());
                }
            }
        }

        Ok((address, ttl, count))
    }

    /// `b=<bwtype>:<bandwidth>`
    fn bandwidth(&mut self) -> Step {
        let typ = self.word()?;
        self.sep(':')?;
        let value = self.int("bandwidth")?;
        self.eol()?;

        let b = Bandwidth { typ, value };

        if self.section == Section::Media {
            self.media_mut()?.bandwidth = Some(b);
        } else {
            self.data.bandwidth = Some(b);
        }
        Ok(())
    }

    /// `t=<start-time> <stop-time>`
    fn timing(&mut self) -> Step {
        let start = self.ntp_time("start time")?;
        let stop = self.ntp_time("stop time")?;
        self.eol()?;

        if self.section == Section::Session {
            self.section = Section::Time;
        }
        self.data.timing = Timing { start, stop };
        Ok(())
    }

    /// `k=<method>` or `k=<method>:<encryption key>`
    fn encryption_key(&mut self) -> Step {
        let method = self.word()?;
        let key = if self.opt_sep(':')? {
            Some(self.text()?)
        } else {
            None
        };
        self.eol()?;

        let e = Encryption { method, key };

        if self.section == Section::Media {
            self.media_mut()?.encryption = Some(e);
        } else {
            self.data.encryption = Some(e);
        }
        Ok(())
    }

    // /////////////////////////////////////////////////// Attributes

    /// `a=<attribute>` or `a=<attribute>:<value>`
    fn attribute(&mut self) -> Step {
        let name = self.word()?;
        let kind = AttributeKind::from_name(&name);

        if kind.is_media_only() && self.section != Section::Media {
            return Err(ErrorKind::MediaOnlyAttribute(name).into());
        }

        if !self.opt_sep(':')? {
            self.eol()?;
            return self.flag_attribute(name, kind);
        }

        use AttributeKind::*;
        match kind {
            IceUfrag | IcePwd => self.ice_credential(kind),
            Fingerprint => self.fingerprint(),
            RtpMap => self.rtp_map(),
            Fmtp => self.fmtp(),
            RtcpFb => self.rtcp_fb(),
            Candidate => self.candidate(),
            Ssrc => self.ssrc(),
            SsrcGroup => self.ssrc_group(),
            EndOfCandidates | Generic => {
                let value = self.text()?;
                self.eol()?;
                self.push_attribute(Attribute::new(name, value))
            }
        }
    }

    /// `a=sendrecv`
    fn flag_attribute(&mut self, name: String, kind: AttributeKind) -> Step {
        if kind == AttributeKind::EndOfCandidates && self.section == Section::Media {
            // Terminates the candidate list. Written back after the candidates.
            trace!("End of candidates for media {}", self.data.media.len() - 1);
            return Ok(());
        }
        self.push_attribute(Attribute::flag(name))
    }

    fn push_attribute(&mut self, a: Attribute) -> Step {
        if self.section == Section::Media {
            self.media_mut()?.attributes.push(a);
        } else {
            self.data.attributes.push(a);
        }
        Ok(())
    }

    /// `a=ice-ufrag:<ufrag>` and `a=ice-pwd:<pwd>`
    fn ice_credential(&mut self, kind: AttributeKind) -> Step {
        let value = self.text()?;
        self.eol()?;

        let media = self.section == Section::Media;
        let target = match (kind, media) {
            (AttributeKind::IceUfrag, true) => &mut self.media_mut()?.ice_ufrag,
            (AttributeKind::IceUfrag, false) => &mut self.data.ice_ufrag,
            (_, true) => &mut self.media_mut()?.ice_pwd,
            (_, false) => &mut self.data.ice_pwd,
        };
        *target = Some(value);
        Ok(())
    }

    /// `a=fingerprint:<hash-func> <hash>`
    fn fingerprint(&mut self) -> Step {
        let hash_func = self.word()?;
        let hash = self.text()?;
        self.eol()?;

        let fp = Fingerprint { hash_func, hash };

        if self.section == Section::Media {
            self.media_mut()?.fingerprint = Some(fp);
        } else {
            self.data.fingerprint = Some(fp);
        }
        Ok(())
    }

    /// `a=rtpmap:<payload type> <encoding name>/<clock rate>[/<encoding parameters>]`
    fn rtp_map(&mut self) -> Step {
        let pt: u8 = self.int("payload type")?;
        let codec = self.word()?;
        self.sep('/')?;
        let clock_rate = self.int("clock rate")?;
        let params = if self.opt_sep('/')? {
            Some(self.text()?)
        } else {
            None
        };
        self.eol()?;

        let rtp = self.registered(pt)?;
        rtp.codec = codec;
        rtp.clock_rate = clock_rate;
        rtp.params = params;
        Ok(())
    }

    /// `a=fmtp:<payload type> <param>[=<value>][;<param>[=<value>]]*`
    fn fmtp(&mut self) -> Step {
        let pt: u8 = self.int("payload type")?;

        let mut params: Vec<Attribute> = vec![];
        loop {
            let t = self.next()?;
            match t.kind {
                TokenKind::AttrWord => {
                    if self.opt_sep('=')? {
                        let value = self.word()?;
                        params.push(Attribute::new(t.text, value));
                    } else {
                        if !params.is_empty() {
                            // a=fmtp:96 apt=95;x-google-flag from lenient generators.
                            warn!(line = t.line, "fmtp parameter without value: {}", t.text);
                        }
                        params.push(Attribute::flag(t.text));
                    }
                    self.opt_sep(';')?;
                }
                _ if t.is_line_end() => {
                    self.tokens.unread(t);
                    break;
                }
                _ => return Err(unexpected(TokenKind::AttrWord, t)),
            }
        }
        self.eol()?;

        self.registered(pt)?.fmtp.extend(params);
        Ok(())
    }

    /// `a=rtcp-fb:<payload type> <value>` or `a=rtcp-fb:* <value>`
    fn rtcp_fb(&mut self) -> Step {
        let t = self.next()?;
        let pt = match t.kind {
            TokenKind::AttrWord if t.text == "*" => None,
            TokenKind::AttrInt => Some(parse_int::<u8>(t, "payload type")?),
            _ => return Err(unexpected(TokenKind::AttrInt, t)),
        };
        let value = self.text()?;
        self.eol()?;

        match pt {
            Some(pt) => self.registered(pt)?.rtcp_fb.push(value),
            None => self.media_mut()?.rtcp_fb.push(value),
        }
        Ok(())
    }

    /// `a=candidate:<foundation> <component> <transport> <priority> <address> <port> typ <type> ...`
    fn candidate(&mut self) -> Step {
        let foundation = self.word()?;
        let component = self.int("component id")?;
        let transport = self.word()?;
        let priority = self.int("priority")?;
        let (address, ttl, count) = self.connection_address()?;
        let port = self.int("port")?;

        let typ = self.word()?;
        if typ != "typ" {
            return Err(ErrorKind::CandidateMissingTyp(typ).into());
        }
        let kind = CandidateKind::from(self.word()?.as_str());

        let mut raddr = None;
        let mut rport = None;
        let mut extensions = vec![];

        loop {
            let t = self.next()?;
            if t.is_line_end() {
                self.tokens.unread(t);
                break;
            }
            if !t.is(TokenKind::AttrWord) {
                return Err(unexpected(TokenKind::AttrWord, t));
            }
            let value = self.word()?;
            match t.text.as_str() {
                "raddr" => raddr = Some(value),
                "rport" => {
                    let port = value.parse::<u16>().map_err(|_| ErrorKind::InvalidInteger {
                        text: value.clone(),
                        target: "rport",
                    })?;
                    rport = Some(port);
                }
                _ => extensions.push(Attribute::new(t.text, value)),
            }
        }
        self.eol()?;

        let c = Candidate {
            foundation,
            component,
            transport,
            priority,
            address,
            ttl,
            count,
            port,
            kind,
            raddr,
            rport,
            extensions,
        };

        self.media_mut()?.candidates.push(c);
        Ok(())
    }

    /// `a=ssrc:<ssrc-id> <attribute>` or `a=ssrc:<ssrc-id> <attribute>:<value>`
    fn ssrc(&mut self) -> Step {
        let id: u32 = self.int("ssrc id")?;
        let key = self.word()?;
        let value = if self.opt_sep(':')? {
            self.text()?
        } else {
            String::new()
        };
        self.eol()?;

        self.media_mut()?
            .ssrcs
            .entry(Ssrc::from(id))
            .or_default()
            .push(Attribute::new(key, value));
        Ok(())
    }

    /// `a=ssrc-group:<semantics> <ssrc-id> ...`
    fn ssrc_group(&mut self) -> Step {
        let typ = self.word()?;

        let mut ids = vec![];
        loop {
            let t = self.next()?;
            match t.kind {
                TokenKind::AttrInt => ids.push(Ssrc::from(parse_int::<u32>(t, "ssrc id")?)),
                _ if t.is_line_end() => {
                    self.tokens.unread(t);
                    break;
                }
                _ => return Err(unexpected(TokenKind::AttrInt, t)),
            }
        }
        self.eol()?;

        let media = self.media_mut()?;
        if let Some(prev) = &media.ssrc_group {
            warn!(
                "a=ssrc-group:{} replaces a=ssrc-group:{}, only one group per media is kept",
                typ, prev.typ
            );
        }
        media.ssrc_group = Some(SsrcGroup { typ, ids });
        Ok(())
    }

    // /////////////////////////////////////////////////// Media description

    /// `m=<media> <port>[/<number of ports>] <proto> <fmt> ...`
    ///
    /// For RTP the payload types are registered here, in order, so later
    /// rtpmap/fmtp/rtcp-fb lines can refer to them.
    fn media(&mut self) -> Step {
        let typ = self.word()?;
        let port = self.int("port")?;
        let port_count = if self.opt_sep('/')? {
            self.int("number of ports")?
        } else {
            0
        };
        let proto = self.word()?;

        let mut media = Media {
            typ: MediaType::from(typ.as_str()),
            port,
            port_count,
            proto,
            ..Default::default()
        };

        if media.is_rtp() {
            loop {
                let t = self.next()?;
                match t.kind {
                    TokenKind::AttrInt => {
                        let pt: u8 = parse_int(t, "payload type")?;
                        let order = media.rtp_map.len();
                        let rtp = Rtp::new(order, Pt::from(pt));
                        if media.rtp_map.insert(pt.into(), rtp).is_some() {
                            return Err(ErrorKind::DuplicatePayloadType(pt).into());
                        }
                    }
                    _ if t.is_line_end() => {
                        self.tokens.unread(t);
                        break;
                    }
                    _ => return Err(unexpected(TokenKind::AttrInt, t)),
                }
            }
        } else {
            media.format = self.text()?;
        }
        self.eol()?;

        self.section = Section::Media;
        self.data.media.push(media);
        Ok(())
    }

    // /////////////////////////////////////////////////// Token helpers

    fn media_mut(&mut self) -> Step<&mut Media> {
        Ok(self.data.media.last_mut().ok_or(ErrorKind::MissingMedia)?)
    }

    /// The [`Rtp`] of a payload type from the current m= line.
    fn registered(&mut self, pt: u8) -> Step<&mut Rtp> {
        let media = self.media_mut()?;
        Ok(media
            .rtp_map
            .get_mut(&Pt::from(pt))
            .ok_or(ErrorKind::PayloadTypeNotRegistered(pt))?)
    }

    fn next(&mut self) -> Step<Token> {
        let t = self.tokens.next();
        if t.is(TokenKind::Error) {
            return Err(Interrupt::Lexical(t));
        }
        Ok(t)
    }

    fn expect(&mut self, kind: TokenKind) -> Step<Token> {
        let t = self.next()?;
        if !t.is(kind) {
            return Err(unexpected(kind, t));
        }
        Ok(t)
    }

    fn word(&mut self) -> Step<String> {
        Ok(self.expect(TokenKind::AttrWord)?.text)
    }

    fn text(&mut self) -> Step<String> {
        Ok(self.expect(TokenKind::AttrString)?.text)
    }

    fn int<T: FromStr>(&mut self, target: &'static str) -> Step<T> {
        let t = self.expect(TokenKind::AttrInt)?;
        parse_int(t, target)
    }

    /// NTP seconds, `0` is unbounded.
    fn ntp_time(&mut self, target: &'static str) -> Step<Option<SystemTime>> {
        let t = self.expect(TokenKind::AttrInt)?;
        let text = t.text.clone();
        let ntp: u64 = parse_int(t, target)?;
        if ntp == 0 {
            return Ok(None);
        }
        match ntp_to_time(ntp) {
            Some(v) => Ok(Some(v)),
            None => Err(ErrorKind::InvalidInteger { text, target }.into()),
        }
    }

    fn sep(&mut self, c: char) -> Step {
        let t = self.next()?;
        if t.is_separator(c) {
            Ok(())
        } else if t.is(TokenKind::Separator) {
            Err(ErrorKind::UnexpectedSeparator {
                expected: c,
                found: t.text,
            }
            .into())
        } else {
            Err(unexpected(TokenKind::Separator, t))
        }
    }

    fn opt_sep(&mut self, c: char) -> Step<bool> {
        let t = self.next()?;
        if t.is_separator(c) {
            Ok(true)
        } else {
            self.tokens.unread(t);
            Ok(false)
        }
    }

    /// End of the line. EOF counts, and is left for the main loop.
    fn eol(&mut self) -> Step {
        let t = self.next()?;
        match t.kind {
            TokenKind::Eol => Ok(()),
            TokenKind::Eof => {
                self.tokens.unread(t);
                Ok(())
            }
            _ => Err(unexpected(TokenKind::Eol, t)),
        }
    }
}

fn unexpected(expected: TokenKind, t: Token) -> Interrupt {
    ErrorKind::UnexpectedToken {
        expected,
        found: t.kind,
        text: t.text,
    }
    .into()
}

fn parse_int<T: FromStr>(t: Token, target: &'static str) -> Step<T> {
    t.text.parse().map_err(|_| {
        ErrorKind::InvalidInteger {
            text: t.text.clone(),
            target,
        }
        .into()
    })
}
