#![deny(unsafe_code)]
#![deny(warnings)]
//! Clock loop
//!
//! Brings up the display and the SNTP socket, then runs
//! `clock_core::run_pass` forever and logs what each pass did.

use clock_core::{run_pass, ClockState, PassReport, SntpConfig};
use core::convert::Infallible;
use defmt::{info, warn, Display2Format};
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::Stack;
use embassy_time::Delay;

use crate::display::ClockDisplay;
use crate::network::{manager, NtpSocket};
use crate::uptime_ms;

/// Run the clock forever
pub async fn run(stack: Stack<'static>, mut display: ClockDisplay, config: SntpConfig) -> ! {
    if let Err(e) = display.init() {
        warn!("Display init failed: {}", Display2Format(&e));
    }

    manager::wait_for_network(&stack, &mut display).await;

    // NTP replies are 48 bytes; leave room for a few queued datagrams
    let mut rx_meta = [PacketMetadata::EMPTY; 4];
    let mut rx_buffer = [0u8; 256];
    let mut tx_meta = [PacketMetadata::EMPTY; 2];
    let mut tx_buffer = [0u8; 64];
    let udp = UdpSocket::new(
        stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );
    let mut socket = match NtpSocket::bind(stack, udp, &config) {
        Ok(socket) => socket,
        Err(e) => defmt::panic!("UDP port {} unavailable: {}", config.local_port, e),
    };

    let mut clock = ClockState::new();
    info!(
        "Clock running (server {}, UTC offset {} h)",
        config.server, config.utc_offset_hours
    );

    loop {
        let report = run_pass(
            &mut clock,
            &mut socket,
            &mut Delay,
            &mut display,
            &config,
            uptime_ms,
        )
        .await;
        log_pass(&clock, &report);
    }
}

fn log_pass(clock: &ClockState, report: &PassReport<Infallible>) {
    match report.sync {
        Some(Ok(epoch_secs)) => info!("Time set: {} local epoch seconds", epoch_secs),
        Some(Err(e)) => warn!("SNTP sync failed: {}, status {}", e, clock.status()),
        None => {}
    }
    if let Err(e) = report.display {
        warn!("Display update failed: {}", Display2Format(&e));
    }
}
