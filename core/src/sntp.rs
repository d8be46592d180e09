//! SNTP request/reply handling
//!
//! A single fixed 48-byte exchange in the RFC 4330 framing:
//! - the request carries only the header flags in bytes 0-3
//! - the reply's transmit timestamp seconds (bytes 40-43, big-endian) is the
//!   only field consumed; its fraction and every header field are ignored
//!
//! There is no retry, no backoff and no validation of the reply's mode,
//! version, stratum or source address. Any datagram of at least 48 bytes
//! that arrives on the bound port before the deadline is taken as the answer.

use core::fmt;

use embassy_futures::select::{select, Either};
use embedded_hal_async::delay::DelayNs;
use hal_abstractions::net::{Error, ErrorKind};
use hal_abstractions::DatagramSocket;

use crate::config::SntpConfig;

/// SNTP port (UDP 123)
pub const SNTP_PORT: u16 = 123;

/// Size of an NTP packet without extension fields
pub const NTP_PACKET_LEN: usize = 48;

/// NTP epoch offset (1900-01-01 to 1970-01-01 in seconds)
pub const NTP_UNIX_OFFSET: u32 = 2_208_988_800;

const SECS_PER_HOUR: i64 = 3600;

/// LI=0, VN=4, Mode=3 (client)
const REQUEST_FLAGS: u8 = 0b0010_0011;
/// Poll interval exponent (2^6 s)
const REQUEST_POLL: u8 = 6;
/// Peer clock precision exponent
const REQUEST_PRECISION: u8 = 0xEC;

/// Byte offset of the transmit timestamp seconds field
const TRANSMIT_SECS_OFFSET: usize = 40;

/// Room for replies that carry extension fields
const REPLY_BUFFER_LEN: usize = 128;

/// SNTP exchange errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SntpError {
    /// Server hostname did not resolve
    Dns,
    /// Request datagram could not be sent
    Send,
    /// Socket failed while waiting for the reply
    Receive,
    /// No qualifying reply before the deadline
    Timeout,
}

impl fmt::Display for SntpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dns => write!(f, "DNS resolution failed"),
            Self::Send => write!(f, "Request send failed"),
            Self::Receive => write!(f, "Reply receive failed"),
            Self::Timeout => write!(f, "No reply before deadline"),
        }
    }
}

impl core::error::Error for SntpError {}

/// Build the client request packet
pub fn build_request() -> [u8; NTP_PACKET_LEN] {
    let mut packet = [0u8; NTP_PACKET_LEN];
    packet[0] = REQUEST_FLAGS;
    packet[1] = 0; // stratum unspecified
    packet[2] = REQUEST_POLL;
    packet[3] = REQUEST_PRECISION;
    packet
}

/// Extract the transmit timestamp seconds (since 1900) from a reply
///
/// Returns `None` for anything shorter than a full packet; such replies are
/// never partially parsed.
pub fn parse_reply(reply: &[u8]) -> Option<u32> {
    if reply.len() < NTP_PACKET_LEN {
        return None;
    }
    let field = &reply[TRANSMIT_SECS_OFFSET..TRANSMIT_SECS_OFFSET + 4];
    Some(u32::from_be_bytes([field[0], field[1], field[2], field[3]]))
}

/// Convert NTP seconds to Unix seconds shifted by a whole-hour UTC offset
///
/// NTP era rollover (2036) is not handled.
pub fn ntp_to_local_epoch(ntp_secs: u32, utc_offset_hours: i8) -> i64 {
    i64::from(ntp_secs) - i64::from(NTP_UNIX_OFFSET)
        + i64::from(utc_offset_hours) * SECS_PER_HOUR
}

/// Perform one SNTP exchange over an already addressed socket
///
/// Sends the request once, then waits up to `config.timeout_ms` for a reply.
/// Undersized datagrams are dropped and waiting continues. The deadline is
/// measured by `delay`, never by the clock being set.
///
/// A send error of kind `ErrorKind::NotFound` means the socket could not
/// resolve the server and is reported as `SntpError::Dns`.
pub async fn request_time<S, D>(
    socket: &mut S,
    delay: &mut D,
    config: &SntpConfig,
) -> Result<i64, SntpError>
where
    S: DatagramSocket,
    D: DelayNs,
{
    let request = build_request();
    socket.send(&request).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => SntpError::Dns,
        _ => SntpError::Send,
    })?;

    match select(delay.delay_ms(config.timeout_ms), receive_reply(socket)).await {
        Either::First(()) => Err(SntpError::Timeout),
        Either::Second(result) => {
            result.map(|ntp_secs| ntp_to_local_epoch(ntp_secs, config.utc_offset_hours))
        }
    }
}

/// Wait until a full-size reply arrives, dropping anything shorter
async fn receive_reply<S: DatagramSocket>(socket: &mut S) -> Result<u32, SntpError> {
    let mut reply = [0u8; REPLY_BUFFER_LEN];
    loop {
        let len = socket
            .receive(&mut reply)
            .await
            .map_err(|_| SntpError::Receive)?;
        if let Some(ntp_secs) = parse_reply(&reply[..len]) {
            return Ok(ntp_secs);
        }
    }
}
