#![deny(unsafe_code)]
#![deny(warnings)]
//! Build-time network settings

/// Link-layer identity and stack seed
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Locally administered MAC, programmed into the W5500
    pub mac_addr: [u8; 6],
    /// Seeds embassy-net's port and DHCP transaction randomness
    pub seed: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            mac_addr: [0x02, 0x00, 0x00, 0x12, 0x34, 0x56],
            seed: 0x1234_5678_u64,
        }
    }
}
