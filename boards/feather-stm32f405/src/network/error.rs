#![deny(unsafe_code)]
#![deny(warnings)]
//! Network error types

use defmt::Format;

/// Network operation errors
#[derive(Debug, Clone, Copy, Format)]
pub enum NetworkError {
    /// W5500 did not respond during bring-up
    ChipInit,
    /// Failed to bind socket to local port
    Bind,
    /// Server name did not resolve
    Dns,
    /// Datagram could not be queued for sending
    Send,
}

impl core::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ChipInit => write!(f, "W5500 initialization failed"),
            Self::Bind => write!(f, "Socket bind failed"),
            Self::Dns => write!(f, "DNS lookup failed"),
            Self::Send => write!(f, "Send failed"),
        }
    }
}

// Implement core::error::Error for no_std compatibility
impl core::error::Error for NetworkError {}

impl embedded_io::Error for NetworkError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            // clock-core reports this kind as a DNS failure
            Self::Dns => embedded_io::ErrorKind::NotFound,
            Self::Send => embedded_io::ErrorKind::BrokenPipe,
            Self::Bind => embedded_io::ErrorKind::AddrInUse,
            Self::ChipInit => embedded_io::ErrorKind::Other,
        }
    }
}
