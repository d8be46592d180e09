//! Hardware abstraction traits for the NTP clock firmware
//!
//! This crate defines traits that abstract over hardware differences
//! between boards. BSPs implement these traits; `clock-core` consumes them.

#![no_std]
#![deny(unsafe_code)]
#![deny(warnings)]

pub mod net;

pub use net::DatagramSocket;
