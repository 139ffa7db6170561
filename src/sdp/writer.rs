use std::fmt;

use crate::id::Ssrc;
use crate::util::time_to_ntp;

use super::data::*;

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v={}\r\n", self.version)?;
        write!(f, "o={}\r\n", self.origin)?;
        write!(f, "s={}\r\n", self.name)?;
        if let Some(v) = &self.info {
            write!(f, "i={v}\r\n")?;
        }
        if let Some(v) = &self.uri {
            write!(f, "u={v}\r\n")?;
        }
        if let Some(v) = &self.email {
            write!(f, "e={v}\r\n")?;
        }
        if let Some(v) = &self.phone {
            write!(f, "p={v}\r\n")?;
        }
        if let Some(c) = &self.connection {
            write!(f, "c={c}\r\n")?;
        }
        if let Some(b) = &self.bandwidth {
            write!(f, "b={b}\r\n")?;
        }
        write!(f, "t={}\r\n", self.timing)?;
        if let Some(v) = &self.repeat {
            write!(f, "r={v}\r\n")?;
        }
        if let Some(v) = &self.time_zones {
            write!(f, "z={v}\r\n")?;
        }
        if let Some(k) = &self.encryption {
            write!(f, "k={k}\r\n")?;
        }
        write_ice_and_fingerprint(f, &self.ice_ufrag, &self.ice_pwd, &self.fingerprint)?;
        for a in &self.attributes {
            write!(f, "a={a}\r\n")?;
        }
        for m in &self.media {
            write!(f, "{m}")?;
        }
        Ok(())
    }
}

fn write_ice_and_fingerprint(
    f: &mut fmt::Formatter<'_>,
    ufrag: &Option<String>,
    pwd: &Option<String>,
    fingerprint: &Option<Fingerprint>,
) -> fmt::Result {
    if let Some(v) = ufrag {
        write!(f, "a=ice-ufrag:{v}\r\n")?;
    }
    if let Some(v) = pwd {
        write!(f, "a=ice-pwd:{v}\r\n")?;
    }
    if let Some(v) = fingerprint {
        write!(f, "a=fingerprint:{} {}\r\n", v.hash_func, v.hash)?;
    }
    Ok(())
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.username,
            self.session_id,
            self.session_version,
            self.net_type,
            self.addr_type,
            self.address
        )
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.net_type,
            self.addr_type,
            AddressFmt(&self.address, self.ttl, self.count)
        )
    }
}

/// `<address>[/<ttl>][/<number of addresses>]`
///
/// A TTL is only written for IPv4. A count without a TTL is written as TTL 0
/// for IPv4, so it reads back as a count.
struct AddressFmt<'a>(&'a str, u8, u32);

impl fmt::Display for AddressFmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let AddressFmt(address, ttl, count) = *self;
        write!(f, "{address}")?;
        if is_ipv4(address) {
            if count > 0 {
                write!(f, "/{ttl}/{count}")?;
            } else if ttl > 0 {
                write!(f, "/{ttl}")?;
            }
        } else if count > 0 {
            write!(f, "/{count}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.typ, self.value)
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            time_to_ntp(self.start),
            time_to_ntp(self.stop)
        )
    }
}

impl fmt::Display for Encryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.method)?;
        if let Some(k) = &self.key {
            write!(f, ":{k}")?;
        }
        Ok(())
    }
}

/// `key` or `key:value`, the part after `a=`.
impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_flag() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}:{}", self.key, self.value)
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Audio => write!(f, "audio"),
            MediaType::Video => write!(f, "video"),
            MediaType::Application => write!(f, "application"),
            MediaType::Other(v) => write!(f, "{v}"),
        }
    }
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = match self {
            CandidateKind::Host => "host",
            CandidateKind::PeerReflexive => "prflx",
            CandidateKind::ServerReflexive => "srflx",
            CandidateKind::Relayed => "relay",
            CandidateKind::Other(v) => v.as_str(),
        };
        write!(f, "{x}")
    }
}

/// The part after `a=`.
impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "candidate:{} {} {} {} {} {} typ {}",
            self.foundation,
            self.component,
            self.transport,
            self.priority,
            AddressFmt(&self.address, self.ttl, self.count),
            self.port,
            self.kind
        )?;
        if let Some(v) = &self.raddr {
            write!(f, " raddr {v}")?;
        }
        if let Some(v) = &self.rport {
            write!(f, " rport {v}")?;
        }
        for e in &self.extensions {
            write!(f, " {} {}", e.key, e.value)?;
        }
        Ok(())
    }
}

impl fmt::Display for Media {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m={} {}", self.typ, self.port)?;
        if self.port_count > 0 {
            write!(f, "/{}", self.port_count)?;
        }
        write!(f, " {}", self.proto)?;
        if self.is_rtp() {
            for pt in self.payload_types() {
                write!(f, " {pt}")?;
            }
        } else if !self.format.is_empty() {
            write!(f, " {}", self.format)?;
        }
        write!(f, "\r\n")?;

        if let Some(v) = &self.title {
            write!(f, "i={v}\r\n")?;
        }
        if let Some(c) = &self.connection {
            write!(f, "c={c}\r\n")?;
        }
        if let Some(b) = &self.bandwidth {
            write!(f, "b={b}\r\n")?;
        }
        if let Some(k) = &self.encryption {
            write!(f, "k={k}\r\n")?;
        }
        write_ice_and_fingerprint(f, &self.ice_ufrag, &self.ice_pwd, &self.fingerprint)?;

        for rtp in self.rtps() {
            write!(f, "{rtp}")?;
        }
        for fb in &self.rtcp_fb {
            write!(f, "a=rtcp-fb:* {fb}\r\n")?;
        }

        for a in &self.attributes {
            write!(f, "a={a}\r\n")?;
        }

        for c in &self.candidates {
            write!(f, "a={c}\r\n")?;
        }
        if !self.candidates.is_empty() {
            write!(f, "a=end-of-candidates\r\n")?;
        }

        self.write_ssrcs(f)
    }
}

impl Media {
    /// The group line first. A FID pair goes before the rest, primary then
    /// retransmission, other SSRCs follow in ascending order.
    fn write_ssrcs(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(g) = &self.ssrc_group {
            write!(f, "a=ssrc-group:{}", g.typ)?;
            for id in &g.ids {
                write!(f, " {id}")?;
            }
            write!(f, "\r\n")?;
        }

        let mut order: Vec<Ssrc> = vec![];
        if let Some((primary, rtx)) = self.fid() {
            order.push(primary);
            if rtx != primary {
                order.push(rtx);
            }
        }
        let rest: Vec<Ssrc> = self
            .ssrcs
            .keys()
            .filter(|id| !order.contains(id))
            .copied()
            .collect();
        order.extend(rest);

        for id in order {
            let Some(attrs) = self.ssrcs.get(&id) else {
                continue;
            };
            for a in attrs {
                write!(f, "a=ssrc:{id} {a}\r\n")?;
            }
        }
        Ok(())
    }
}

/// `a=rtpmap`, `a=fmtp` and `a=rtcp-fb` lines of one payload type.
impl fmt::Display for Rtp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pt = self.payload_type;

        if !self.codec.is_empty() {
            write!(f, "a=rtpmap:{pt} {}/{}", self.codec, self.clock_rate)?;
            if let Some(p) = &self.params {
                write!(f, "/{p}")?;
            }
            write!(f, "\r\n")?;
        }

        if !self.fmtp.is_empty() {
            write!(f, "a=fmtp:{pt} ")?;
            for (idx, a) in self.fmtp.iter().enumerate() {
                if idx > 0 {
                    write!(f, ";")?;
                }
                if a.is_flag() {
                    write!(f, "{}", a.key)?;
                } else {
                    write!(f, "{}={}", a.key, a.value)?;
                }
            }
            write!(f, "\r\n")?;
        }

        for fb in &self.rtcp_fb {
            write!(f, "a=rtcp-fb:{pt} {fb}\r\n")?;
        }
        Ok(())
    }
}
