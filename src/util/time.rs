use std::time::{Duration, SystemTime};

// SDP t= values use NTP time, which starts at 1900-01-01.
//
// https://tools.ietf.org/html/rfc868
//
// 365 days * 70 years + 17 leap year days
// (365 * 70 + 17) * 86400 = 2208988800

/// Seconds between the NTP epoch (1900) and the UNIX epoch (1970).
pub const NTP_DELTA: u64 = 2_208_988_800;

/// Convert an absolute time to NTP seconds, as used in `t=` lines.
///
/// The absent time (`None`) is encoded as `0`, which in SDP means "unbounded".
/// Sub-second precision is truncated.
pub fn time_to_ntp(t: Option<SystemTime>) -> u64 {
    let Some(t) = t else {
        return 0;
    };

    match t.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(since) => since.as_secs() + NTP_DELTA,
        Err(e) => {
            // Before 1970. Round towards the earlier second.
            let before = e.duration();
            let mut secs = before.as_secs();
            if before.subsec_nanos() > 0 {
                secs += 1;
            }
            NTP_DELTA.saturating_sub(secs)
        }
    }
}

/// Convert NTP seconds to an absolute time.
///
/// `0` decodes to `None`, the inverse of [`time_to_ntp`]. A value too large for
/// this platform's [`SystemTime`] is also `None`.
pub fn ntp_to_time(ntp: u64) -> Option<SystemTime> {
    if ntp == 0 {
        return None;
    }

    if ntp >= NTP_DELTA {
        SystemTime::UNIX_EPOCH.checked_add(Duration::from_secs(ntp - NTP_DELTA))
    } else {
        SystemTime::UNIX_EPOCH.checked_sub(Duration::from_secs(NTP_DELTA - ntp))
    }
}
