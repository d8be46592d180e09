//! Platform-agnostic core logic for the NTP clock firmware
//!
//! This crate contains the clock's behaviour with NO hardware dependencies:
//! - **`sntp`**: 48-byte SNTP request/reply codec and the one-shot exchange
//! - **`clock`**: clock state, time-of-day and digit extraction
//! - **`display`**: segment table and the 4-digit multiplexer, generic over
//!   `embedded-hal` output pins and an async delay
//! - **`pass`**: one clock loop pass: sync if unset, render, blink the colon
//! - **`config`**: build-time configuration with `Default` values
//!
//! Boards supply the pins, the delay and a `hal_abstractions::DatagramSocket`.

#![no_std]
#![deny(unsafe_code)]
#![deny(warnings)]

pub mod clock;
pub mod config;
pub mod display;
pub mod pass;
pub mod sntp;

#[cfg(test)]
mod mock;

pub use clock::{ClockState, TimeOfDay, TimeStatus};
pub use config::{DisplayTiming, SntpConfig};
pub use display::{DisplayError, DisplayPins, Multiplexer};
pub use pass::{run_pass, PassReport};
pub use sntp::{request_time, SntpError};
