//! Byte transport between the interrupt worker and the async wire

use std::io::{self, Read};

use serial_link::{Transport, TX_BUFFER_SIZE};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

use crate::error::NodeError;
use crate::settings::LinkConfig;

/// Received bytes buffered between the wire reader and the receive interrupt
const RX_CHANNEL_DEPTH: usize = 256;

/// UART peripheral backed by channels to async reader/writer tasks
///
/// The writer channel plays the transmit FIFO: once it holds `fifo_depth`
/// bytes, [`Transport::tx_full`] reports full until the writer catches up.
#[derive(Debug)]
pub struct ChannelTransport {
    inbound: mpsc::Receiver<u8>,
    outbound: mpsc::Sender<u8>,
}

impl Transport for ChannelTransport {
    fn send_byte(&mut self, byte: u8) {
        if let Err(e) = self.outbound.try_send(byte) {
            debug!("Wire writer dropped a byte: {}", e);
        }
    }

    fn try_receive_byte(&mut self) -> Option<u8> {
        self.inbound.try_recv().ok()
    }

    fn tx_full(&self) -> bool {
        self.outbound.capacity() == 0
    }
}

/// A running wire: the interrupt-side transport plus its I/O tasks
pub struct Wire {
    pub transport: ChannelTransport,
    /// `None` when input is read on a dedicated thread
    pub reader: Option<JoinHandle<()>>,
    pub writer: JoinHandle<()>,
}

fn channels(fifo_depth: usize) -> (ChannelTransport, mpsc::Sender<u8>, mpsc::Receiver<u8>) {
    let (received_tx, received_rx) = mpsc::channel(RX_CHANNEL_DEPTH);
    let (outbound_tx, outbound_rx) = mpsc::channel(fifo_depth.max(1));
    let transport = ChannelTransport {
        inbound: received_rx,
        outbound: outbound_tx,
    };
    (transport, received_tx, outbound_rx)
}

/// Open the configured serial device, or stdin/stdout when none is set
pub fn open(link: &LinkConfig) -> Result<Wire, NodeError> {
    match link.device.as_deref() {
        Some(path) => {
            let port = tokio_serial::new(path, link.baud_rate).open_native_async()?;
            info!("Opened {} at {} baud", path, link.baud_rate);
            let (reader, writer) = tokio::io::split(port);
            Ok(bridge(reader, writer, link.fifo_depth))
        }
        None => {
            info!("No serial device configured, using stdin/stdout");
            bridge_blocking(io::stdin(), tokio::io::stdout(), link.fifo_depth)
        }
    }
}

/// Spawn reader/writer tasks for an async byte stream
pub fn bridge<R, W>(reader: R, writer: W, fifo_depth: usize) -> Wire
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (transport, received, outbound) = channels(fifo_depth);

    Wire {
        transport,
        reader: Some(tokio::spawn(read_wire(reader, received))),
        writer: tokio::spawn(write_wire(writer, outbound)),
    }
}

/// Read a blocking source on its own thread and write through an async task
///
/// The reader thread is detached: a read that never returns (an idle terminal
/// on stdin) must not hold up runtime shutdown.
pub fn bridge_blocking<R, W>(reader: R, writer: W, fifo_depth: usize) -> Result<Wire, NodeError>
where
    R: Read + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (transport, received, outbound) = channels(fifo_depth);

    std::thread::Builder::new()
        .name("wire-reader".to_string())
        .spawn(move || read_wire_blocking(reader, received))?;

    Ok(Wire {
        transport,
        reader: None,
        writer: tokio::spawn(write_wire(writer, outbound)),
    })
}

fn read_wire_blocking<R: Read>(mut reader: R, received: mpsc::Sender<u8>) {
    let mut buf = [0u8; 64];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => {
                info!("Wire input closed");
                return;
            }
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("Wire read failed: {}", e);
                return;
            }
        };

        for &byte in &buf[..n] {
            if received.blocking_send(byte).is_err() {
                debug!("Receive side gone, stopping wire reader");
                return;
            }
        }
    }
}

async fn read_wire<R: AsyncRead + Unpin>(mut reader: R, received: mpsc::Sender<u8>) {
    let mut buf = [0u8; 64];
    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => {
                info!("Wire input closed");
                return;
            }
            Ok(n) => n,
            Err(e) => {
                warn!("Wire read failed: {}", e);
                return;
            }
        };

        for &byte in &buf[..n] {
            if received.send(byte).await.is_err() {
                debug!("Receive side gone, stopping wire reader");
                return;
            }
        }
    }
}

async fn write_wire<W: AsyncWrite + Unpin>(mut writer: W, mut outbound: mpsc::Receiver<u8>) {
    let mut chunk = Vec::with_capacity(TX_BUFFER_SIZE);
    while let Some(byte) = outbound.recv().await {
        chunk.push(byte);
        while let Ok(byte) = outbound.try_recv() {
            chunk.push(byte);
        }

        let written = async {
            writer.write_all(&chunk).await?;
            writer.flush().await
        };
        if let Err(e) = written.await {
            warn!("Wire write failed: {}", e);
            return;
        }
        chunk.clear();
    }
    debug!("Transmit side gone, stopping wire writer");
}
