mod pii;
pub(crate) use pii::Pii;

mod time;
pub use time::{ntp_to_time, time_to_ntp, NTP_DELTA};
