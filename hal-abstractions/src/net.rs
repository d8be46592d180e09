//! Network transport traits

use core::future::Future;

pub use embedded_io::{Error, ErrorKind};

/// A bound UDP socket with a fixed remote peer
///
/// The board decides where datagrams go, including any name lookup; protocol
/// code only sends and receives payloads.
///
/// # Example Implementation
/// ```ignore
/// struct BoardSocket { socket: UdpSocket<'static>, remote: IpEndpoint }
///
/// impl DatagramSocket for BoardSocket {
///     type Error = SocketError;
///     async fn send(&mut self, payload: &[u8]) -> Result<(), SocketError> { /* ... */ }
///     async fn receive(&mut self, buf: &mut [u8]) -> Result<usize, SocketError> { /* ... */ }
/// }
/// ```
pub trait DatagramSocket {
    /// Transport error, classified with `embedded_io::ErrorKind`
    type Error: Error;

    /// Send `payload` as a single datagram to the remote peer
    ///
    /// Fails with an error of kind `ErrorKind::NotFound` when the peer's
    /// address could not be resolved.
    fn send(&mut self, payload: &[u8]) -> impl Future<Output = Result<(), Self::Error>>;

    /// Wait for the next inbound datagram
    ///
    /// Returns the number of bytes written into `buf`. A datagram longer than
    /// `buf` is not an error: its first `buf.len()` bytes are returned and the
    /// rest is dropped. Datagrams from any source on the bound port are
    /// returned.
    fn receive(&mut self, buf: &mut [u8]) -> impl Future<Output = Result<usize, Self::Error>>;
}
