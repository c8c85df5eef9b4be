//! UART interrupt handlers and the worker that runs them

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::LinkError;
use crate::link::SerialLink;
use crate::transport::Transport;

/// Receive interrupt: move every byte the peripheral holds into the inbound buffer
pub fn on_receive<T: Transport + ?Sized>(link: &SerialLink, transport: &mut T) -> usize {
    let mut received = 0;
    while let Some(byte) = transport.try_receive_byte() {
        link.isr_receive(byte);
        received += 1;
    }
    received
}

/// Transmit interrupt: feed the FIFO until it is full or nothing is left to send
pub fn on_transmit<T: Transport + ?Sized>(link: &SerialLink, transport: &mut T) -> usize {
    let mut sent = 0;
    while !transport.tx_full() {
        let Some(byte) = link.isr_next_outbound() else {
            break;
        };
        transport.send_byte(byte);
        sent += 1;
    }
    sent
}

/// Thread standing in for the UART interrupt context
///
/// Services receive on every poll and transmit whenever the main loop raises
/// a request or unsent bytes remain. Stops when dropped.
pub struct IsrWorker {
    shutdown: Arc<AtomicBool>,
    link: Arc<SerialLink>,
    handle: Option<JoinHandle<()>>,
}

impl IsrWorker {
    /// Start servicing `transport` for `link`
    pub fn spawn<T>(
        link: Arc<SerialLink>,
        mut transport: T,
        poll_interval: Duration,
    ) -> Result<Self, LinkError>
    where
        T: Transport + Send + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let worker_shutdown = Arc::clone(&shutdown);
        let worker_link = Arc::clone(&link);

        let handle = std::thread::Builder::new()
            .name("serial-isr".to_string())
            .spawn(move || {
                debug!("Serial interrupt worker running, poll every {:?}", poll_interval);
                while !worker_shutdown.load(Ordering::Acquire) {
                    on_receive(&worker_link, &mut transport);
                    worker_link.wait_tx_request(poll_interval);
                    if worker_link.outbound_pending() {
                        on_transmit(&worker_link, &mut transport);
                    }
                }
                debug!("Serial interrupt worker exiting");
            })?;

        info!("Serial interrupt worker started");
        Ok(Self {
            shutdown,
            link,
            handle: Some(handle),
        })
    }

    /// Stop the worker and wait for it to exit
    pub fn stop(mut self) -> Result<(), LinkError> {
        self.shutdown_and_join()
    }

    fn shutdown_and_join(&mut self) -> Result<(), LinkError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        self.shutdown.store(true, Ordering::Release);
        self.link.request_tx();
        handle.join().map_err(|_| LinkError::WorkerPanicked)
    }
}

impl Drop for IsrWorker {
    fn drop(&mut self) {
        let _ = self.shutdown_and_join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;
    use std::sync::Mutex;
    use std::time::Instant;

    #[test]
    fn test_on_receive_drains_peripheral() {
        let link = SerialLink::new();
        let mut transport = MemoryTransport::new();
        transport.inject(b"$RATE,10*");

        assert_eq!(on_receive(&link, &mut transport), 9);
        assert!(transport.rx.is_empty());
        assert_eq!(&*link.drain_inbound(), b"$RATE,10*");
    }

    #[test]
    fn test_on_transmit_respects_fifo_depth() {
        let link = SerialLink::new();
        let mut transport = MemoryTransport {
            fifo_depth: Some(4),
            ..Default::default()
        };
        link.transmit(b"$YAW,12.50*\n");

        assert_eq!(on_transmit(&link, &mut transport), 4);
        assert_eq!(transport.take_sent(), b"$YAW".to_vec());
        assert!(link.outbound_pending());

        assert_eq!(on_transmit(&link, &mut transport), 4);
        // FIFO stays full until the wire takes the bytes
        assert_eq!(on_transmit(&link, &mut transport), 0);
        assert_eq!(transport.take_sent(), b",12.".to_vec());

        assert_eq!(on_transmit(&link, &mut transport), 4);
        assert_eq!(transport.take_sent(), b"50*\n".to_vec());
        assert_eq!(on_transmit(&link, &mut transport), 0);
        assert!(!link.outbound_pending());
    }

    /// Transport whose sent bytes stay visible to the test while the worker owns it
    struct SharedTransport(Arc<Mutex<MemoryTransport>>);

    impl Transport for SharedTransport {
        fn send_byte(&mut self, byte: u8) {
            self.0.lock().unwrap().send_byte(byte);
        }

        fn try_receive_byte(&mut self) -> Option<u8> {
            self.0.lock().unwrap().try_receive_byte()
        }
    }

    #[test]
    fn test_worker_moves_bytes_both_ways() {
        let link = Arc::new(SerialLink::new());
        let wire = Arc::new(Mutex::new(MemoryTransport::new()));
        wire.lock().unwrap().inject(b"$RATE,2*");

        let worker = IsrWorker::spawn(
            Arc::clone(&link),
            SharedTransport(Arc::clone(&wire)),
            Duration::from_millis(1),
        )
        .unwrap();

        link.transmit(b"$ERR,1*");

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut inbound = Vec::new();
        while Instant::now() < deadline {
            inbound.extend_from_slice(&link.drain_inbound());
            if inbound.len() == 8 && wire.lock().unwrap().tx.len() == 7 {
                break;
            }
            std::thread::sleep(Duration::from_millis(1));
        }

        worker.stop().unwrap();
        assert_eq!(inbound, b"$RATE,2*".to_vec());
        assert_eq!(wire.lock().unwrap().take_sent(), b"$ERR,1*".to_vec());
    }
}
