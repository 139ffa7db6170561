#![allow(unused)]
use std::sync::Once;

pub fn init_log() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    static START: Once = Once::new();

    START.call_once(|| {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(env_filter)
            .init();
    });
}

/// RFC 4566 style offer with two RTP media.
pub const OK01: &str = "v=0\r\n\
    o=jdoe 2890844526 2890842807 IN IP4 10.47.16.5\r\n\
    s=-\r\n\
    t=0 0\r\n\
    c=IN IP4 192.0.2.4\r\n\
    m=audio 49170 RTP/AVP 0 8 97\r\n\
    a=rtpmap:0 PCMU/8000\r\n\
    a=rtpmap:8 PCMA/8000\r\n\
    a=rtpmap:97 iLBC/8000\r\n\
    m=video 51372 RTP/AVP 31 32\r\n\
    a=rtpmap:31 H261/90000\r\n\
    a=rtpmap:32 MPV/90000\r\n";

/// WebRTC offer with ICE, fingerprint, candidates and format parameters.
pub const OK02: &str = "v=0\r\n\
    o=- 4611731400430051336 2 IN IP4 127.0.0.1\r\n\
    s=-\r\n\
    t=0 0\r\n\
    a=ice-ufrag:F7gI\r\n\
    a=ice-pwd:x9cml/YzichV2+XlhiMu8g\r\n\
    a=fingerprint:sha-256 D2:FA:0E:C3:22:59:5E:14:95:69:92:3D:13:B4:84:24:2C:C2:A2:C0:3E:FD:34:8E:5E:EA:6F:AF:52:CE:E6:0F\r\n\
    m=audio 9 UDP/TLS/RTP/SAVPF 111 0\r\n\
    c=IN IP4 0.0.0.0\r\n\
    a=rtpmap:111 opus/48000/2\r\n\
    a=fmtp:111 minptime=10;useinbandfec=1\r\n\
    a=rtpmap:0 PCMU/8000\r\n\
    a=candidate:1 1 UDP 2130706431 10.0.1.1 8998 typ host\r\n\
    a=candidate:2 1 UDP 1694498815 192.0.2.3 45664 typ srflx raddr 10.0.1.1 rport 8998\r\n\
    a=end-of-candidates\r\n\
    m=video 9 UDP/TLS/RTP/SAVPF 96 97\r\n\
    a=rtpmap:96 VP8/90000\r\n\
    a=rtcp-fb:96 nack pli\r\n\
    a=rtpmap:97 rtx/90000\r\n\
    a=fmtp:97 apt=96\r\n\
    a=ssrc-group:FID 100 200\r\n\
    a=sendrecv\r\n";

pub const FIREFOX_OFFER: &str = "v=0\r\n\
    o=mozilla...THIS_IS_SDPARTA-84.0 9033133899747520364 1 IN IP4 0.0.0.0\r\n\
    s=-\r\n\
    t=0 0\r\n\
    a=fingerprint:sha-256 AE:DC:49:AE:CA:55:35:CB:4E:FA:FE:70:99:30:C0:14:C3:B8:06:80:1F:A9:DA:9A:7C:FB:B7:20:AB:83:60:45\r\n\
    a=group:BUNDLE 0\r\n\
    a=ice-options:trickle\r\n\
    a=msid-semantic:WMS *\r\n\
    m=audio 9 UDP/TLS/RTP/SAVPF 109 9 0 8 101\r\n\
    c=IN IP4 0.0.0.0\r\n\
    a=sendonly\r\n\
    a=extmap:1 urn:ietf:params:rtp-hdrext:ssrc-audio-level\r\n\
    a=extmap:2/recvonly urn:ietf:params:rtp-hdrext:csrc-audio-level\r\n\
    a=extmap:3 urn:ietf:params:rtp-hdrext:sdes:mid\r\n\
    a=fmtp:109 maxplaybackrate=48000;stereo=1;useinbandfec=1\r\n\
    a=fmtp:101 0-15\r\n\
    a=ice-pwd:cd25258044061ec2ecc73378eb3dc6a3\r\n\
    a=ice-ufrag:c1e284ad\r\n\
    a=mid:0\r\n\
    a=msid:- {5c7f12e5-b4bd-7142-9a06-2885a2d1cb66}\r\n\
    a=rtcp-mux\r\n\
    a=rtpmap:109 opus/48000/2\r\n\
    a=rtpmap:9 G722/8000/1\r\n\
    a=rtpmap:0 PCMU/8000\r\n\
    a=rtpmap:8 PCMA/8000\r\n\
    a=rtpmap:101 telephone-event/8000/1\r\n\
    a=setup:actpass\r\n\
    a=ssrc:1481683531 cname:{326ec0d2-d1ae-974c-b1ad-aea85cdfa0ad}\r\n";

pub const CHROME_OFFER: &str = "v=0\r\n\
    o=- 5058682828002148772 3 IN IP4 127.0.0.1\r\n\
    s=-\r\n\
    t=0 0\r\n\
    a=group:BUNDLE 0 1\r\n\
    a=msid-semantic: WMS 5UUdwiuY7OML2EkQtF38pJtNP5v7In1LhjEK\r\n\
    m=audio 9 UDP/TLS/RTP/SAVPF 111 9 0 8 126\r\n\
    c=IN IP4 0.0.0.0\r\n\
    a=rtcp:9 IN IP4 0.0.0.0\r\n\
    a=ice-ufrag:S5hk\r\n\
    a=ice-pwd:0zV/Yu3y8aDzbHgqWhnVQhqP\r\n\
    a=ice-options:trickle\r\n\
    a=fingerprint:sha-256 8C:64:ED:03:76:D0:3D:B4:88:08:91:64:08:80:A8:C6:5A:BF:8B:4E:38:27:96:CA:08:49:25:73:46:60:20:DC\r\n\
    a=setup:actpass\r\n\
    a=mid:0\r\n\
    a=extmap:1 urn:ietf:params:rtp-hdrext:ssrc-audio-level\r\n\
    a=extmap:3 http://www.ietf.org/id/draft-holmer-rmcat-transport-wide-cc-extensions-01\r\n\
    a=sendrecv\r\n\
    a=msid:5UUdwiuY7OML2EkQtF38pJtNP5v7In1LhjEK f78dde68-7055-4e20-bb37-433803dd1ed1\r\n\
    a=rtcp-mux\r\n\
    a=rtpmap:111 opus/48000/2\r\n\
    a=rtcp-fb:111 transport-cc\r\n\
    a=fmtp:111 minptime=10;useinbandfec=1\r\n\
    a=rtpmap:9 G722/8000\r\n\
    a=rtpmap:0 PCMU/8000\r\n\
    a=rtpmap:8 PCMA/8000\r\n\
    a=rtpmap:126 telephone-event/8000\r\n\
    a=ssrc:3948621874 cname:xeXs3aE9AOBn00yJ\r\n\
    a=ssrc:3948621874 msid:5UUdwiuY7OML2EkQtF38pJtNP5v7In1LhjEK f78dde68-7055-4e20-bb37-433803dd1ed1\r\n\
    m=video 9 UDP/TLS/RTP/SAVPF 96 97 125\r\n\
    c=IN IP4 0.0.0.0\r\n\
    a=ice-ufrag:S5hk\r\n\
    a=ice-pwd:0zV/Yu3y8aDzbHgqWhnVQhqP\r\n\
    a=mid:1\r\n\
    a=sendrecv\r\n\
    a=rtcp-mux\r\n\
    a=rtcp-rsize\r\n\
    a=rtpmap:96 VP8/90000\r\n\
    a=rtcp-fb:96 goog-remb\r\n\
    a=rtcp-fb:96 transport-cc\r\n\
    a=rtcp-fb:96 ccm fir\r\n\
    a=rtcp-fb:96 nack\r\n\
    a=rtcp-fb:96 nack pli\r\n\
    a=rtpmap:97 rtx/90000\r\n\
    a=fmtp:97 apt=96\r\n\
    a=rtpmap:125 H264/90000\r\n\
    a=rtcp-fb:125 nack\r\n\
    a=fmtp:125 level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=42e01f\r\n\
    a=ssrc-group:FID 2404235415 3890588016\r\n\
    a=ssrc:2404235415 cname:xeXs3aE9AOBn00yJ\r\n\
    a=ssrc:2404235415 msid:5UUdwiuY7OML2EkQtF38pJtNP5v7In1LhjEK 9a6e4d1c\r\n\
    a=ssrc:3890588016 cname:xeXs3aE9AOBn00yJ\r\n\
    a=ssrc:3890588016 msid:5UUdwiuY7OML2EkQtF38pJtNP5v7In1LhjEK 9a6e4d1c\r\n\
    a=candidate:3322296962 1 udp 2122260223 192.168.1.23 52771 typ host generation 0 network-id 1\r\n\
    a=candidate:1545634038 1 tcp 1518280447 192.168.1.23 9 typ host tcptype active generation 0 network-id 1\r\n";

pub const DATA_CHANNEL: &str = "v=0\r\n\
    o=- 4611516372927609806 2 IN IP4 127.0.0.1\r\n\
    s=-\r\n\
    t=0 0\r\n\
    a=group:BUNDLE 0\r\n\
    m=application 9 UDP/DTLS/SCTP webrtc-datachannel\r\n\
    c=IN IP4 0.0.0.0\r\n\
    a=ice-ufrag:kLuo\r\n\
    a=ice-pwd:ObfZ6BwW2FeNmo1BvyXpe2c3\r\n\
    a=fingerprint:sha-256 4F:8C:6E:64:2A:34:01:3D:6C:0A:AB:8C:B3:47:9C:31:D2:24:D4:B3:F3:B1:7A:7A:11:92:DA:A6:C4:60:5E:EC\r\n\
    a=setup:actpass\r\n\
    a=mid:0\r\n\
    a=sctp-port:5000\r\n\
    a=max-message-size:262144\r\n";
