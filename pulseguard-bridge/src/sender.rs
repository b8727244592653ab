//! Outbound correction transport

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use crate::BridgeError;

/// Destination for corrected readings
pub trait CorrectionSink {
    /// Send one encoded correction to `dest`
    fn send(&mut self, payload: &[u8], dest: SocketAddr) -> Result<(), BridgeError>;
}

/// Fire-and-forget UDP sender
///
/// Non-blocking: a full socket buffer surfaces as a send error instead of
/// stalling the receive loop.
#[derive(Debug)]
pub struct UdpCorrectionSender {
    socket: UdpSocket,
}

impl UdpCorrectionSender {
    /// Bind to a specific local address
    pub fn bind(addr: impl ToSocketAddrs) -> Result<Self, BridgeError> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_nonblocking(true)?;
        Ok(Self { socket })
    }

    /// Bind to an ephemeral port on all interfaces
    pub fn unbound() -> Result<Self, BridgeError> {
        Self::bind("0.0.0.0:0")
    }

    /// Local address the sender bound to
    pub fn local_addr(&self) -> Result<SocketAddr, BridgeError> {
        Ok(self.socket.local_addr()?)
    }
}

impl CorrectionSink for UdpCorrectionSender {
    fn send(&mut self, payload: &[u8], dest: SocketAddr) -> Result<(), BridgeError> {
        self.socket
            .send_to(payload, dest)
            .map(|_| ())
            .map_err(|source| BridgeError::Send { dest, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn delivers_payload() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        let dest = receiver.local_addr().unwrap();

        let mut sender = UdpCorrectionSender::bind("127.0.0.1:0").unwrap();
        sender.send(b"1000,72\n", dest).unwrap();

        let mut buf = [0u8; 64];
        let (len, from) = receiver.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"1000,72\n");
        assert_eq!(from, sender.local_addr().unwrap());
    }

    #[test]
    fn ephemeral_port_assigned() {
        let sender = UdpCorrectionSender::unbound().unwrap();
        assert_ne!(sender.local_addr().unwrap().port(), 0);
    }
}
