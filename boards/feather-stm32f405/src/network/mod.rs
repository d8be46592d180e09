#![deny(warnings)]
//! Ethernet and UDP plumbing for the clock
//!
//! - **`w5500`**: resets the FeatherWing and creates the embassy-net device
//! - **`manager`**: holds the clock loop until DHCP has configured the stack
//! - **`socket`**: `NtpSocket`, the board's `DatagramSocket`
//! - **`config`** / **`error`**: `NetworkConfig` and `NetworkError`
//!
//! The stack and both runners are `!Send`, so the clock task receives the raw
//! peripherals in `W5500Pins` and builds everything itself.

pub mod config;
pub mod error;
pub mod manager;
pub mod socket;
pub mod w5500;

pub use config::NetworkConfig;
pub use error::NetworkError;
pub use socket::NtpSocket;
pub use w5500::W5500Pins;
