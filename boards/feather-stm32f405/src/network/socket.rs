#![deny(unsafe_code)]
#![deny(warnings)]
//! UDP socket adapter for the SNTP exchange
//!
//! Wraps `embassy_net::udp::UdpSocket` and implements
//! `hal_abstractions::DatagramSocket` so `clock_core` can drive it without
//! knowing about embassy-net. The server name is resolved on every send.

use clock_core::SntpConfig;
use defmt::{debug, warn, Debug2Format};
use embassy_net::dns::DnsQueryType;
use embassy_net::udp::UdpSocket;
use embassy_net::{IpEndpoint, Stack};
use hal_abstractions::DatagramSocket;

use super::error::NetworkError;

/// Bound UDP socket talking to one named server
pub struct NtpSocket<'a> {
    socket: UdpSocket<'a>,
    stack: Stack<'a>,
    server: &'static str,
    server_port: u16,
}

impl<'a> NtpSocket<'a> {
    /// Bind `socket` to `config.local_port`
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::Bind` if the port is taken or invalid
    pub fn bind(
        stack: Stack<'a>,
        mut socket: UdpSocket<'a>,
        config: &SntpConfig,
    ) -> Result<Self, NetworkError> {
        socket.bind(config.local_port).map_err(|e| {
            warn!("UDP bind failed: {}", Debug2Format(&e));
            NetworkError::Bind
        })?;
        debug!("UDP socket bound to port {}", config.local_port);
        Ok(Self {
            socket,
            stack,
            server: config.server,
            server_port: config.server_port,
        })
    }

    /// DNS A lookup of the server, first address wins
    async fn resolve(&self) -> Result<IpEndpoint, NetworkError> {
        let addrs = self
            .stack
            .dns_query(self.server, DnsQueryType::A)
            .await
            .map_err(|e| {
                warn!("DNS query for {} failed: {}", self.server, Debug2Format(&e));
                NetworkError::Dns
            })?;
        let addr = addrs.first().copied().ok_or(NetworkError::Dns)?;
        let endpoint = IpEndpoint::new(addr, self.server_port);
        debug!("Resolved {} to {}", self.server, Debug2Format(&endpoint));
        Ok(endpoint)
    }
}

impl DatagramSocket for NtpSocket<'_> {
    type Error = NetworkError;

    async fn send(&mut self, payload: &[u8]) -> Result<(), NetworkError> {
        let remote = self.resolve().await?;
        self.socket.send_to(payload, remote).await.map_err(|e| {
            warn!("UDP send failed: {}", Debug2Format(&e));
            NetworkError::Send
        })
    }

    /// Any sender is accepted; oversized datagrams are cut to `buf`
    async fn receive(&mut self, buf: &mut [u8]) -> Result<usize, NetworkError> {
        let (len, received, from) = self
            .socket
            .recv_from_with(|data, meta| {
                let len = data.len().min(buf.len());
                buf[..len].copy_from_slice(&data[..len]);
                (len, data.len(), meta.endpoint)
            })
            .await;
        debug!("Received {} bytes from {}", received, Debug2Format(&from));
        Ok(len)
    }
}
