#![deny(unsafe_code)]
#![deny(warnings)]
//! Network bring-up wait
//!
//! Blocks the clock loop until the W5500 has link and DHCP has configured the
//! stack. There is no timeout and no fallback.

use defmt::{debug, info, warn, Display2Format};
use embassy_net::Stack;
use rtic_monotonics::fugit::ExtU64;
use rtic_monotonics::Monotonic;

use crate::display::ClockDisplay;
use crate::{uptime_ms, Mono};

/// Poll interval while waiting; also the colon blink step
const WAIT_POLL_MS: u64 = 500;

/// Wait for network configuration (DHCP) and log IP address
///
/// The colon keeps blinking so the display shows the board is alive.
pub async fn wait_for_network(stack: &Stack<'_>, display: &mut ClockDisplay) {
    info!("Waiting for link and DHCP...");
    while !stack.is_config_up() {
        if let Err(e) = display.blink_colon(uptime_ms()) {
            warn!("Colon update failed: {}", Display2Format(&e));
        }
        debug!("link up: {}", stack.is_link_up());
        Mono::delay(WAIT_POLL_MS.millis()).await;
    }
    info!("Network is UP!");

    if let Some(config) = stack.config_v4() {
        let ip = config.address.address();
        let octets = ip.octets();
        info!(
            "IP: {}.{}.{}.{}",
            octets[0], octets[1], octets[2], octets[3]
        );

        if let Some(gateway) = config.gateway {
            let gw_octets = gateway.octets();
            info!(
                "Gateway: {}.{}.{}.{}",
                gw_octets[0], gw_octets[1], gw_octets[2], gw_octets[3]
            );
        }
    }
}
