//! SDP (Session Description Protocol) lexer, parser and writer.
//!
//! Parses RFC 4566 session descriptions, including the extensions WebRTC
//! peers send (ICE candidates, RTCP feedback, format parameters and SSRC
//! groups), into a [`Data`] document, and writes the document back to SDP
//! text.
//!
//! ```
//! let offer = "v=0\r\n\
//!     o=- 4611731400430051336 2 IN IP4 127.0.0.1\r\n\
//!     s=-\r\n\
//!     t=0 0\r\n\
//!     m=audio 9 UDP/TLS/RTP/SAVPF 111\r\n\
//!     c=IN IP4 0.0.0.0\r\n\
//!     a=rtpmap:111 opus/48000/2\r\n\
//!     a=fmtp:111 minptime=10;useinbandfec=1\r\n";
//!
//! let mut data = sdpwire::parse(offer).unwrap();
//!
//! let opus = data.media[0].rtp(111.into()).unwrap();
//! assert_eq!(opus.codec, "opus");
//! assert_eq!(opus.fmtp_value("useinbandfec"), Some("1"));
//!
//! // Change and write it back.
//! data.origin.session_version += 1;
//! let answer = sdpwire::write(Some(&data));
//! assert!(answer.starts_with("v=0\r\no=- 4611731400430051336 3 IN IP4 127.0.0.1\r\n"));
//! ```
//!
//! # Pipeline
//!
//! * The [`Lexer`] scans one line at a time into [`Token`]s. Each field letter,
//!   and within `a=` lines each known attribute, has its own sub-grammar.
//!   A line it can't scan becomes a single [`TokenKind::Error`] token and
//!   lexing continues on the next line.
//! * The parser reads the tokens with one token of pushback and builds the
//!   [`Data`]. It tracks whether it is in the session, time or media section
//!   since `c=`, `b=` and `a=` mean different things in each. A line that
//!   doesn't fit the grammar stops the parse with an [`SdpError`].
//! * The writer is the [`Display`](std::fmt::Display) impl of [`Data`]. Fields
//!   are always written in the same order with CRLF line endings.
//!
//! By default the lexer runs on a scoped thread and hands tokens to the
//! parser through a zero capacity channel. [`SdpConfig`] can turn that off.
//!
//! # Logging
//!
//! Diagnostics go through [`tracing`]. Use [`SdpConfig::set_dispatch`] to send
//! them to a specific subscriber, otherwise the default subscriber of the
//! calling thread is used, also on the lexer thread. A parse failure is logged
//! at error level with the field `fatal = true`.
//!
//! # Crate features
//!
//! * `pii` replaces addresses, credentials and raw SDP lines in logs at debug
//!   level and above with `{REDACTED}`.

#![forbid(unsafe_code)]
#![allow(clippy::new_without_default)]

#[macro_use]
extern crate tracing;

mod config;
pub use config::SdpConfig;

mod id;
pub use id::{Pt, Ssrc};

mod sdp;
pub use sdp::{lex, Lexer};
pub use sdp::{Attribute, Bandwidth, Candidate, CandidateKind, Connection, Data};
pub use sdp::{AttributeKind, FieldKind, Token, TokenKind};
pub use sdp::{Encryption, Fingerprint, IceCreds, Media, MediaType, Origin, Rtp};
pub use sdp::{ErrorKind, SdpError};
pub use sdp::{SsrcGroup, Timing};

mod util;
pub use util::{ntp_to_time, time_to_ntp, NTP_DELTA};

/// Parse one SDP document with the default [`SdpConfig`].
pub fn parse(input: &str) -> Result<Data, SdpError> {
    SdpConfig::default().parse(input)
}

/// Write a document as SDP text. `None` gives an empty string.
pub fn write(data: Option<&Data>) -> String {
    data.map(|d| d.to_string()).unwrap_or_default()
}
