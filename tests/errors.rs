mod common;
use common::{init_log, OK01};

use sdpwire::{ErrorKind, SdpConfig, SdpError, TokenKind};

const HEAD: &str = "v=0\r\no=- 1 2 IN IP4 127.0.0.1\r\ns=-\r\nt=0 0\r\n";

fn parse_err(input: &str) -> SdpError {
    let err = sdpwire::parse(input).unwrap_err();

    // The inline lexer must agree.
    let inline = SdpConfig::new()
        .set_concurrent_lexer(false)
        .parse(input)
        .unwrap_err();
    assert_eq!(err, inline);

    err
}

#[test]
fn rtpmap_for_unlisted_payload_type() {
    init_log();
    let input = format!("{HEAD}m=audio 9 RTP/AVP 0\r\na=rtpmap:8 PCMA/8000\r\n");
    let err = parse_err(&input);

    assert_eq!(err.line, 6);
    assert_eq!(err.kind, ErrorKind::PayloadTypeNotRegistered(8));
    assert_eq!(
        err.to_string(),
        "SDP parse: line 6: payload type 8 not on the m= line"
    );
}

#[test]
fn fmtp_and_rtcp_fb_are_gated_too() {
    init_log();
    let fmtp = format!("{HEAD}m=video 9 RTP/AVP 96\r\na=fmtp:97 apt=96\r\n");
    assert_eq!(
        parse_err(&fmtp).kind,
        ErrorKind::PayloadTypeNotRegistered(97)
    );

    let fb = format!("{HEAD}m=video 9 RTP/AVP 96\r\na=rtcp-fb:98 nack\r\n");
    assert_eq!(parse_err(&fb).kind, ErrorKind::PayloadTypeNotRegistered(98));
}

#[test]
fn rtpmap_in_non_rtp_media() {
    init_log();
    let input = format!(
        "{HEAD}m=application 9 UDP/DTLS/SCTP webrtc-datachannel\r\na=rtpmap:96 VP8/90000\r\n"
    );
    assert_eq!(
        parse_err(&input).kind,
        ErrorKind::PayloadTypeNotRegistered(96)
    );
}

#[test]
fn payload_type_repeated() {
    init_log();
    let input = format!("{HEAD}m=audio 9 RTP/AVP 0 8 0\r\n");
    assert_eq!(parse_err(&input).kind, ErrorKind::DuplicatePayloadType(0));
}

#[test]
fn ttl_on_ipv6() {
    init_log();
    let input = format!("{HEAD}c=IN IP6 ff15::101/3/2\r\n");
    let err = parse_err(&input);
    assert_eq!(err.line, 5);
    assert_eq!(err.kind, ErrorKind::TtlNotAllowed("ff15::101".into()));
}

#[test]
fn ipv4_ttl_and_count() {
    init_log();
    let input = format!("{HEAD}c=IN IP4 224.2.36.42/127\r\n");
    let data = sdpwire::parse(&input).unwrap();
    let c = data.connection.unwrap();
    assert_eq!((c.ttl, c.count), (127, 0));

    let input = format!("{HEAD}c=IN IP4 224.2.36.42/300\r\n");
    assert!(matches!(
        parse_err(&input).kind,
        ErrorKind::InvalidInteger { target: "ttl", .. }
    ));
}

#[test]
fn session_field_in_media_section() {
    init_log();
    let input = format!("{HEAD}m=audio 9 RTP/AVP 0\r\nt=0 0\r\n");
    let err = parse_err(&input);
    assert_eq!(
        err.kind,
        ErrorKind::FieldNotAllowed {
            field: 't',
            section: "media"
        }
    );
    assert_eq!(err.to_string(), "SDP parse: line 6: t not allowed in media section");
}

#[test]
fn media_attribute_at_session_level() {
    init_log();
    let input = format!("{HEAD}a=ssrc:1 cname:x\r\n");
    assert_eq!(
        parse_err(&input).kind,
        ErrorKind::MediaOnlyAttribute("ssrc".into())
    );
}

#[test]
fn candidate_without_typ() {
    init_log();
    let input = format!(
        "{HEAD}m=audio 9 RTP/AVP 0\r\na=candidate:1 1 udp 2130706431 10.0.0.1 9 type host\r\n"
    );
    assert_eq!(
        parse_err(&input).kind,
        ErrorKind::CandidateMissingTyp("type".into())
    );
}

#[test]
fn trace_holds_failing_line() {
    init_log();
    let input = format!("{HEAD}m=audio 9 RTP/AVP 0\r\na=rtpmap:8 PCMA/8000\r\n");
    let err = parse_err(&input);

    assert!(err.trace.iter().all(|t| t.line == 6));
    assert_eq!(err.trace[0].kind, TokenKind::Field);
    assert_eq!(err.trace[0].text, "a");
    assert!(err.trace.iter().any(|t| t.text == "PCMA"));

    let trace = err.trace_string();
    assert_eq!(trace.lines().count(), err.trace.len());
    assert!(trace.contains("AttrInt \"8000\""));
}

#[test]
fn lexical_error_drops_only_that_line() {
    init_log();
    // Missing clock rate, the lexer gives up on the rtpmap line.
    let input = format!(
        "{HEAD}m=video 9 RTP/AVP 96 97\r\n\
         a=rtpmap:96 VP8\r\n\
         a=rtpmap:97 rtx/90000\r\n"
    );
    let data = sdpwire::parse(&input).unwrap();
    let m = &data.media[0];
    assert_eq!(m.rtp(96.into()).unwrap().codec, "");
    assert_eq!(m.rtp(97.into()).unwrap().codec, "rtx");
}

#[test]
fn garbage_lines_are_skipped() {
    init_log();
    let input = OK01
        .replace("t=0 0\r\n", "t=0 0\r\n\r\nthis is not sdp\r\n")
        .replace("a=rtpmap:0", "=oops\r\na=rtpmap:0");
    assert_eq!(sdpwire::parse(&input).unwrap(), sdpwire::parse(OK01).unwrap());
}

#[test]
fn timing_out_of_range_is_an_error() {
    init_log();
    let input = format!("v=0\r\nt={} 0\r\n", u64::MAX);
    let err = parse_err(&input);
    assert_eq!(err.line, 2);
    assert!(matches!(
        err.kind,
        ErrorKind::InvalidInteger { target: "start time", .. }
    ));
}
