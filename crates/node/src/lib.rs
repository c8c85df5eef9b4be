//! Telemetry Node
//!
//! Host process for the magnetometer telemetry loop: loads configuration,
//! installs logging, opens the wire and runs the scheduler against a
//! simulated sensor until interrupted.

mod error;
mod settings;
mod sim;
mod wire;

use std::sync::Arc;

use serial_link::{IsrWorker, SerialLink};
use telemetry_scheduler::{LedIndicators, Scheduler};
use tick_timer::MonotonicClock;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub use error::NodeError;
pub use settings::{LinkConfig, NodeConfig};
pub use sim::SimulatedMagnetometer;
pub use wire::{bridge, bridge_blocking, ChannelTransport, Wire};

/// Initialize logging on stderr; stdout may be carrying the wire
pub fn init_logging(level: &str) -> Result<(), NodeError> {
    let level: Level = level
        .parse()
        .map_err(|_| NodeError::LogLevel(level.to_string()))?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Run the node until Ctrl-C
pub async fn run(config: NodeConfig) -> Result<(), NodeError> {
    info!("=== Magnetometer Telemetry Node v{} ===", env!("CARGO_PKG_VERSION"));

    let link = Arc::new(SerialLink::new());
    let Wire {
        transport,
        reader,
        writer,
    } = wire::open(&config.link)?;
    let isr = IsrWorker::spawn(Arc::clone(&link), transport, config.link.poll_interval())?;

    let mut scheduler = Scheduler::new(
        config.scheduler,
        Arc::clone(&link),
        SimulatedMagnetometer::new(),
        LedIndicators::new(),
        MonotonicClock::new(),
    )?;
    std::thread::Builder::new()
        .name("telemetry-loop".to_string())
        .spawn(move || scheduler.run())?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");

    let overflow = link.overflow_status();
    if overflow.inbound || overflow.outbound {
        warn!("Serial buffers overflowed during run: {:?}", overflow);
    }

    if let Some(reader) = reader {
        reader.abort();
    }
    writer.abort();
    isr.stop()?;
    Ok(())
}
