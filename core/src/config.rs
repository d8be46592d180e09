//! Build-time configuration structures

/// SNTP client configuration
#[derive(Debug, Clone)]
pub struct SntpConfig {
    /// NTP server hostname, resolved before every attempt
    pub server: &'static str,
    /// Remote UDP port
    pub server_port: u16,
    /// Local UDP port the reply is received on
    pub local_port: u16,
    /// Upper bound on waiting for a reply, in milliseconds
    pub timeout_ms: u32,
    /// Fixed offset from UTC applied to every synced time
    pub utc_offset_hours: i8,
}

impl Default for SntpConfig {
    fn default() -> Self {
        Self {
            server: "pool.ntp.org",
            server_port: crate::sntp::SNTP_PORT,
            local_port: 2390,
            timeout_ms: 1000,
            utc_offset_hours: 8,
        }
    }
}

/// Display multiplexing timing
#[derive(Debug, Clone, Copy)]
pub struct DisplayTiming {
    /// How long each digit stays selected during a render pass
    pub digit_hold_us: u32,
}

impl Default for DisplayTiming {
    fn default() -> Self {
        Self {
            digit_hold_us: 1000,
        }
    }
}
