use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::net::Ipv4Addr;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::id::{Pt, Ssrc};
use crate::util::time_to_ntp;

/// A parsed SDP document.
///
/// Created empty with [`Data::new`] or populated by [`Data::parse`]. Serialized
/// back to wire text with `to_string()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Data {
    /// `v=`, always 0 in practice.
    pub version: u32,
    pub origin: Origin,
    /// `s=`
    pub name: String,
    /// `i=`
    pub info: Option<String>,
    /// `u=`
    pub uri: Option<String>,
    /// `e=`
    pub email: Option<String>,
    /// `p=`
    pub phone: Option<String>,
    pub connection: Option<Connection>,
    pub bandwidth: Option<Bandwidth>,
    pub timing: Timing,
    /// `r=`, kept verbatim.
    pub repeat: Option<String>,
    /// `z=`, kept verbatim.
    pub time_zones: Option<String>,
    pub encryption: Option<Encryption>,
    pub ice_ufrag: Option<String>,
    pub ice_pwd: Option<String>,
    pub fingerprint: Option<Fingerprint>,
    /// Session level attributes without a dedicated field, in input order.
    pub attributes: Vec<Attribute>,
    /// The m= sections in input order.
    pub media: Vec<Media>,
}

impl Data {
    /// An empty document with the origin seeded from `now`.
    ///
    /// Session id and version are both `now` as NTP seconds.
    pub fn new(now: SystemTime) -> Self {
        let ntp = time_to_ntp(Some(now));
        Data {
            origin: Origin {
                username: "-".into(),
                session_id: ntp,
                session_version: ntp,
                net_type: "IN".into(),
                addr_type: "IP4".into(),
                address: "0.0.0.0".into(),
            },
            name: "-".into(),
            ..Default::default()
        }
    }

    /// Parse with the default [`SdpConfig`](crate::SdpConfig).
    pub fn parse(input: &str) -> Result<Data, crate::SdpError> {
        crate::SdpConfig::default().parse(input)
    }

    /// Session level ICE credentials, falling back on the first media that has them.
    pub fn ice_creds(&self) -> Option<IceCreds> {
        IceCreds::from_parts(&self.ice_ufrag, &self.ice_pwd)
            .or_else(|| self.media.iter().find_map(|m| m.ice_creds()))
    }

    /// Session level fingerprint, falling back on the first media that has one.
    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.fingerprint
            .as_ref()
            .or_else(|| self.media.iter().find_map(|m| m.fingerprint.as_ref()))
    }
}

/// `o=<username> <sess-id> <sess-version> <nettype> <addrtype> <unicast-address>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    pub username: String,
    pub session_id: u64,
    pub session_version: u64,
    pub net_type: String,
    pub addr_type: String,
    pub address: String,
}

/// `c=<nettype> <addrtype> <connection-address>`
///
/// Also used for the address part of ICE candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub net_type: String,
    pub addr_type: String,
    pub address: String,
    /// Multicast TTL. 0 when absent. Only valid for IPv4.
    pub ttl: u8,
    /// Number of addresses. 0 when absent.
    pub count: u32,
}

impl Connection {
    /// Whether the address is a literal IPv4 address.
    pub fn is_ipv4(&self) -> bool {
        is_ipv4(&self.address)
    }
}

pub(crate) fn is_ipv4(address: &str) -> bool {
    address.parse::<Ipv4Addr>().is_ok()
}

/// `b=<bwtype>:<bandwidth>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bandwidth {
    pub typ: String,
    pub value: u64,
}

/// `t=<start-time> <stop-time>`
///
/// `None` is written as `0`, which means unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    pub start: Option<SystemTime>,
    pub stop: Option<SystemTime>,
}

/// `k=<method>` or `k=<method>:<encryption key>`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encryption {
    pub method: String,
    pub key: Option<String>,
}

impl fmt::Debug for Encryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encryption")
            .field("method", &self.method)
            .field("key", &self.key.as_ref().map(crate::util::Pii))
            .finish()
    }
}

/// `a=fingerprint:<hash-func> <hash>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Hash function, like "sha-256".
    pub hash_func: String,
    /// The colon separated hex digest, as written.
    pub hash: String,
}

impl Fingerprint {
    /// Decode the hex digest. `None` if it isn't colon separated hex.
    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.hash
            .split(':')
            .map(|h| {
                if h.len() == 2 {
                    u8::from_str_radix(h, 16).ok()
                } else {
                    None
                }
            })
            .collect()
    }
}

/// ICE username fragment and password.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IceCreds {
    pub ufrag: String,
    pub pass: String,
}

impl IceCreds {
    fn from_parts(ufrag: &Option<String>, pass: &Option<String>) -> Option<Self> {
        Some(IceCreds {
            ufrag: ufrag.clone()?,
            pass: pass.clone()?,
        })
    }
}

/// Generic `a=<key>` or `a=<key>:<value>`. Also used for fmtp parameters and
/// ssrc attributes. An empty value means a flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    /// A `key:value` attribute.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A value-less attribute, like `sendrecv`.
    pub fn flag(key: impl Into<String>) -> Self {
        Attribute::new(key, "")
    }

    /// Whether the attribute has no value.
    pub fn is_flag(&self) -> bool {
        self.value.is_empty()
    }
}

/// Type of media in an m= line.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    #[default]
    Audio,
    Video,
    Application,
    Other(String),
}

impl From<&str> for MediaType {
    fn from(v: &str) -> Self {
        match v {
            "audio" => MediaType::Audio,
            "video" => MediaType::Video,
            "application" => MediaType::Application,
            _ => MediaType::Other(v.to_string()),
        }
    }
}

/// One m= section and everything that follows it up to the next m= line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub typ: MediaType,
    pub port: u16,
    /// `<port>/<number of ports>`. 0 when absent.
    pub port_count: u16,
    pub proto: String,
    /// The fmt part of a non-RTP m= line, like "webrtc-datachannel".
    pub format: String,
    /// Payload type to codec. Keys are the payload types of the m= line.
    pub rtp_map: HashMap<Pt, Rtp>,
    /// `a=rtcp-fb:* <value>`, feedback for every payload type.
    pub rtcp_fb: Vec<String>,
    /// `i=`
    pub title: Option<String>,
    pub connection: Option<Connection>,
    pub bandwidth: Option<Bandwidth>,
    pub encryption: Option<Encryption>,
    pub ice_ufrag: Option<String>,
    pub ice_pwd: Option<String>,
    pub fingerprint: Option<Fingerprint>,
    pub candidates: Vec<Candidate>,
    /// Attributes without a dedicated field, in input order.
    pub attributes: Vec<Attribute>,
    /// `a=ssrc:<id> <attribute>[:<value>]` grouped per id.
    pub ssrcs: BTreeMap<Ssrc, Vec<Attribute>>,
    pub ssrc_group: Option<SsrcGroup>,
}

impl Media {
    /// Whether the protocol carries RTP and the m= line lists payload types.
    pub fn is_rtp(&self) -> bool {
        is_rtp_proto(&self.proto)
    }

    /// Payload types in m= line order.
    pub fn payload_types(&self) -> Vec<Pt> {
        let mut rtps: Vec<&Rtp> = self.rtp_map.values().collect();
        rtps.sort_by_key(|r| r.order);
        rtps.into_iter().map(|r| r.payload_type).collect()
    }

    /// Payload types with their codec, in m= line order.
    pub fn rtps(&self) -> impl Iterator<Item = &Rtp> {
        let mut rtps: Vec<&Rtp> = self.rtp_map.values().collect();
        rtps.sort_by_key(|r| r.order);
        rtps.into_iter()
    }

    /// The payload type's codec and parameters, if it is on the m= line.
    pub fn rtp(&self, pt: Pt) -> Option<&Rtp> {
        self.rtp_map.get(&pt)
    }

    /// Media level ICE credentials, when both ufrag and pwd are set.
    pub fn ice_creds(&self) -> Option<IceCreds> {
        IceCreds::from_parts(&self.ice_ufrag, &self.ice_pwd)
    }

    /// Primary and retransmission SSRC of an `a=ssrc-group:FID` pair.
    pub fn fid(&self) -> Option<(Ssrc, Ssrc)> {
        let group = self.ssrc_group.as_ref()?;
        if group.is_fid() {
            Some((group.ids[0], group.ids[1]))
        } else {
            None
        }
    }

    /// Values of all `a=<key>` attributes, in input order.
    pub fn attributes_named<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.attributes
            .iter()
            .filter(move |a| a.key == key)
            .map(|a| a.value.as_str())
    }
}

/// Protocols whose m= line lists RTP payload types.
pub(crate) fn is_rtp_proto(proto: &str) -> bool {
    proto.contains("RTP/AVP") || proto.contains("RTP/SAVP")
}

/// One payload type of an RTP media.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rtp {
    /// Position of the payload type on the m= line.
    pub order: usize,
    pub payload_type: Pt,
    /// Encoding name from `a=rtpmap`. Empty until an rtpmap is seen.
    pub codec: String,
    pub clock_rate: u32,
    /// Encoding parameters, like the channel count for audio.
    pub params: Option<String>,
    /// `a=fmtp` parameters in input order.
    pub fmtp: Vec<Attribute>,
    /// `a=rtcp-fb:<pt> <value>`
    pub rtcp_fb: Vec<String>,
}

impl Rtp {
    pub(crate) fn new(order: usize, payload_type: Pt) -> Self {
        Rtp {
            order,
            payload_type,
            ..Default::default()
        }
    }

    /// Value of the first fmtp parameter named `key`. Empty for a flag.
    pub fn fmtp_value(&self, key: &str) -> Option<&str> {
        self.fmtp
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }
}

/// `a=ssrc-group:<semantics> <ssrc-id> ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsrcGroup {
    /// Semantics, like "FID" or "SIM".
    pub typ: String,
    pub ids: Vec<Ssrc>,
}

impl SsrcGroup {
    /// A FID group of exactly two, primary then retransmission.
    pub fn is_fid(&self) -> bool {
        self.typ == "FID" && self.ids.len() == 2
    }
}

/// Type of candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateKind {
    /// Host (local network interface)
    Host,
    /// Prflx (Peer reflexive)
    PeerReflexive,
    /// Srflx (STUN)
    ServerReflexive,
    /// Relay (TURN)
    Relayed,
    Other(String),
}

impl From<&str> for CandidateKind {
    fn from(v: &str) -> Self {
        match v {
            "host" => CandidateKind::Host,
            "prflx" => CandidateKind::PeerReflexive,
            "srflx" => CandidateKind::ServerReflexive,
            "relay" => CandidateKind::Relayed,
            _ => CandidateKind::Other(v.to_string()),
        }
    }
}

/// An `a=candidate` line (RFC 5245 section 15.1).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    pub foundation: String,
    pub component: u16,
    /// "udp", "tcp". Case is kept as written.
    pub transport: String,
    pub priority: u32,
    pub address: String,
    pub ttl: u8,
    pub count: u32,
    pub port: u16,
    pub kind: CandidateKind,
    /// Related address.
    pub raddr: Option<String>,
    /// Related port.
    pub rport: Option<u16>,
    /// Extension pairs other than raddr/rport, like generation and ufrag.
    pub extensions: Vec<Attribute>,
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("foundation", &self.foundation)
            .field("component", &self.component)
            .field("transport", &self.transport)
            .field("priority", &self.priority)
            .field("address", &crate::util::Pii(&self.address))
            .field("port", &self.port)
            .field("kind", &self.kind)
            .field("raddr", &self.raddr.as_ref().map(crate::util::Pii))
            .field("rport", &self.rport)
            .field("extensions", &self.extensions)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::*;

    #[test]
    fn new_seeds_origin() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let d = Data::new(now);
        assert_eq!(d.origin.session_id, 1_700_000_000 + crate::util::NTP_DELTA);
        assert_eq!(d.origin.session_id, d.origin.session_version);
        assert_eq!(d.origin.username, "-");
        assert_eq!(d.name, "-");
        assert!(d.media.is_empty());
    }

    #[test]
    fn connection_ipv4_is_derived() {
        let mut c = Connection {
            address: "203.0.113.1".into(),
            ..Default::default()
        };
        assert!(c.is_ipv4());
        c.address = "ff15::101".into();
        assert!(!c.is_ipv4());
        c.address = "example.com".into();
        assert!(!c.is_ipv4());
    }

    #[test]
    fn fingerprint_bytes() {
        let fp = Fingerprint {
            hash_func: "sha-256".into(),
            hash: "45:AD:5C:0f".into(),
        };
        assert_eq!(fp.bytes(), Some(vec![0x45, 0xad, 0x5c, 0x0f]));

        let bad = Fingerprint {
            hash_func: "sha-256".into(),
            hash: "45AD".into(),
        };
        assert_eq!(bad.bytes(), None);
    }

    #[test]
    fn fid_needs_exactly_two() {
        let mut m = Media::default();
        m.ssrc_group = Some(SsrcGroup {
            typ: "FID".into(),
            ids: vec![100.into(), 200.into()],
        });
        assert_eq!(m.fid(), Some((100.into(), 200.into())));

        m.ssrc_group = Some(SsrcGroup {
            typ: "FID".into(),
            ids: vec![100.into()],
        });
        assert_eq!(m.fid(), None);

        m.ssrc_group = Some(SsrcGroup {
            typ: "SIM".into(),
            ids: vec![100.into(), 200.into()],
        });
        assert_eq!(m.fid(), None);
    }

    #[test]
    fn payload_types_in_order() {
        let mut m = Media::default();
        for (i, pt) in [111_u8, 9, 0].into_iter().enumerate() {
            m.rtp_map.insert(pt.into(), Rtp::new(i, pt.into()));
        }
        assert_eq!(m.payload_types(), vec![111.into(), 9.into(), 0.into()]);
    }

    #[test]
    fn rtp_proto() {
        assert!(is_rtp_proto("RTP/AVP"));
        assert!(is_rtp_proto("UDP/TLS/RTP/SAVPF"));
        assert!(!is_rtp_proto("UDP/DTLS/SCTP"));
    }

    #[test]
    fn media_type_names() {
        assert_eq!(MediaType::from("video"), MediaType::Video);
        assert_eq!(MediaType::from("text"), MediaType::Other("text".into()));
    }
}
