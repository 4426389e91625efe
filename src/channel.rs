//! Blocking, length-prefixed byte framing between two endpoints.
//!
//! Every frame on the wire is a 4-byte big-endian length followed by the
//! payload. The protocols in this crate never interpret partial frames;
//! reads and writes block until a whole frame has moved.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream, ToSocketAddrs};
use std::sync::mpsc::{self, Receiver, SyncSender};

use tracing::trace;

use crate::{Error, Result};

/// Upper bound on a single frame's payload length.
const MAX_FRAME_LEN: usize = 1 << 24;

/// An ordered, reliable, blocking byte channel between two endpoints.
pub trait Channel {
    /// Writes a 4-byte big-endian length prefix followed by `data`.
    fn write_with_size(&mut self, data: &[u8]) -> Result<()>;

    /// Reads one length-prefixed frame and returns its payload.
    fn read_with_size(&mut self) -> Result<Vec<u8>>;
}

/// A [`Channel`] over a TCP stream.
pub struct TcpChannel {
    stream: TcpStream,
}

impl TcpChannel {
    /// Connects to a listening peer.
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        Ok(Self { stream })
    }

    /// Binds `addr` and accepts a single inbound connection.
    pub fn accept<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let listener = TcpListener::bind(addr)?;
        let (stream, peer) = listener.accept()?;
        trace!(%peer, "accepted connection");
        stream.set_nodelay(true)?;
        Ok(Self { stream })
    }

    /// Wraps an already-connected stream.
    pub fn from_stream(stream: TcpStream) -> Result<Self> {
        stream.set_nodelay(true)?;
        Ok(Self { stream })
    }
}

impl Channel for TcpChannel {
    fn write_with_size(&mut self, data: &[u8]) -> Result<()> {
        if data.len() > MAX_FRAME_LEN {
            return Err(Error::BadInput(format!(
                "Frame of {} bytes exceeds the {} byte limit",
                data.len(),
                MAX_FRAME_LEN
            )));
        }
        let len = data.len() as u32;
        self.stream.write_all(&len.to_be_bytes())?;
        self.stream.write_all(data)?;
        self.stream.flush()?;
        trace!(bytes = data.len(), "wrote frame");
        Ok(())
    }

    fn read_with_size(&mut self) -> Result<Vec<u8>> {
        let mut prefix = [0u8; 4];
        self.stream.read_exact(&mut prefix)?;
        let len = u32::from_be_bytes(prefix) as usize;
        if len > MAX_FRAME_LEN {
            return Err(Error::BadInput(format!(
                "Peer announced a frame of {len} bytes, over the {MAX_FRAME_LEN} byte limit"
            )));
        }
        let mut payload = vec![0u8; len];
        self.stream.read_exact(&mut payload)?;
        trace!(bytes = len, "read frame");
        Ok(payload)
    }
}

/// One end of an in-process channel pair created by [`pair`].
pub struct PairChannel {
    tx: SyncSender<Vec<u8>>,
    rx: Receiver<Vec<u8>>,
}

/// Creates two connected in-process channel endpoints.
///
/// Frames written on one endpoint are read, in order, on the other. Used by
/// tests and demos to drive both protocol roles inside a single process on
/// two threads.
pub fn pair() -> (PairChannel, PairChannel) {
    let (a_tx, b_rx) = mpsc::sync_channel(64);
    let (b_tx, a_rx) = mpsc::sync_channel(64);
    (
        PairChannel { tx: a_tx, rx: a_rx },
        PairChannel { tx: b_tx, rx: b_rx },
    )
}

impl Channel for PairChannel {
    fn write_with_size(&mut self, data: &[u8]) -> Result<()> {
        self.tx
            .send(data.to_vec())
            .map_err(|_| Error::Channel(std::io::ErrorKind::BrokenPipe.into()))
    }

    fn read_with_size(&mut self) -> Result<Vec<u8>> {
        self.rx
            .recv()
            .map_err(|_| Error::Channel(std::io::ErrorKind::UnexpectedEof.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_roundtrips_frames_in_order() {
        let (mut left, mut right) = pair();
        left.write_with_size(b"first").unwrap();
        left.write_with_size(b"second").unwrap();
        assert_eq!(right.read_with_size().unwrap(), b"first");
        assert_eq!(right.read_with_size().unwrap(), b"second");
    }

    #[test]
    fn pair_is_bidirectional() {
        let (mut left, mut right) = pair();
        right.write_with_size(b"pong").unwrap();
        assert_eq!(left.read_with_size().unwrap(), b"pong");
    }

    #[test]
    fn dropped_peer_surfaces_as_channel_error() {
        let (mut left, right) = pair();
        drop(right);
        assert!(matches!(left.read_with_size(), Err(Error::Channel(_))));
    }

    #[test]
    fn tcp_frames_are_length_prefixed() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut chan = TcpChannel::from_stream(stream).unwrap();
            let frame = chan.read_with_size().unwrap();
            chan.write_with_size(&frame).unwrap();
        });

        let mut chan = TcpChannel::connect(addr).unwrap();
        chan.write_with_size(b"echo me").unwrap();
        assert_eq!(chan.read_with_size().unwrap(), b"echo me");
        handle.join().unwrap();
    }
}
