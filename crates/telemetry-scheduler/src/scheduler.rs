//! Main Loop Implementation

use std::sync::Arc;

use frame_protocol::{heading_frame, mag_frame, FrameParser, Request, SampleRate, ERROR_FRAME};
use mag_filter::{AverageWindow, MagSample, MAG_AVG_WINDOW};
use metrics::counter;
use ring_buffer::CriticalCell;
use serial_link::SerialLink;
use tick_timer::{Clock, TimerBank, TimerConfig};
use tracing::{debug, info, trace, warn};

use crate::cadence::Cadence;
use crate::config::{SchedulerConfig, Thresholds};
use crate::error::SchedulerError;
use crate::indicators::Indicators;
use crate::source::MagSource;
use crate::{TICK_TIMER, WORKLOAD_TIMER};

/// What one tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Heartbeat indicator toggled
    pub heartbeat: bool,
    /// Valid `RATE` commands applied
    pub rate_changes: u8,
    /// Commands answered with the error frame
    pub rejected: u8,
    /// A magnetometer sample entered the window
    pub acquired: bool,
    /// `$MAG` frame queued
    pub data_sent: bool,
    /// `$YAW` frame queued
    pub heading_sent: bool,
    /// The tick finished after its period boundary
    pub overrun: bool,
}

/// Cooperative tick-driven telemetry loop
///
/// Owns every piece of per-loop state (cadence counters, parser, averaging
/// window, timers, sample rate). Only the serial link is shared with the
/// interrupt context.
pub struct Scheduler<S, I, C>
where
    S: MagSource,
    I: Indicators,
    C: Clock,
{
    config: SchedulerConfig,
    thresholds: Thresholds,
    timers: TimerBank<C>,
    link: Arc<SerialLink>,
    rate: CriticalCell<SampleRate>,
    parser: FrameParser,
    window: AverageWindow<MAG_AVG_WINDOW>,
    source: S,
    indicators: I,
    heartbeat: Cadence,
    acquire: Cadence,
    data_send: Cadence,
    heading_send: Cadence,
    ticks: u64,
}

impl<S, I, C> Scheduler<S, I, C>
where
    S: MagSource,
    I: Indicators,
    C: Clock,
{
    /// Validate the configuration and start the tick timer
    pub fn new(
        config: SchedulerConfig,
        link: Arc<SerialLink>,
        source: S,
        indicators: I,
        clock: C,
    ) -> Result<Self, SchedulerError> {
        let thresholds = config.thresholds()?;
        TimerConfig::for_duration(config.tick_period_ms)?;
        if config.workload_ms > 0 {
            TimerConfig::for_duration(config.workload_ms)?;
        }

        let mut timers = TimerBank::new(clock);
        timers.configure(TICK_TIMER, config.tick_period_ms);

        info!(
            "Scheduler ready: {}ms tick, rate {}, acquire every {} ticks, heading every {} ticks",
            config.tick_period_ms, config.default_rate, thresholds.acquire, thresholds.heading
        );

        Ok(Self {
            rate: CriticalCell::new(config.default_rate),
            config,
            thresholds,
            timers,
            link,
            parser: FrameParser::new(),
            window: AverageWindow::new(),
            source,
            indicators,
            heartbeat: Cadence::new(),
            acquire: Cadence::new(),
            data_send: Cadence::new(),
            heading_send: Cadence::new(),
            ticks: 0,
        })
    }

    /// Run ticks forever
    pub fn run(&mut self) -> ! {
        info!("Telemetry loop running");
        loop {
            self.tick();
        }
    }

    /// Run one tick, including the wait for its period boundary
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();

        if self.config.workload_ms > 0 {
            self.timers.wait_ms(WORKLOAD_TIMER, self.config.workload_ms);
        }

        if self.heartbeat.tick(self.thresholds.heartbeat) {
            self.indicators.toggle_heartbeat();
            report.heartbeat = true;
        }

        self.service_commands(&mut report);

        if self.acquire.tick(self.thresholds.acquire) {
            let sample = self.source.acquire_raw_sample();
            trace!("Sample {:?}", sample);
            self.window.update(sample);
            report.acquired = true;
        }

        let rate = self.rate.get();
        if let Some(ticks_per_send) = rate.ticks_per_send(self.thresholds.ticks_per_second) {
            if self.data_send.tick(ticks_per_send) {
                report.data_sent = self.send_average();
            }
        }

        if self.heading_send.tick(self.thresholds.heading) {
            report.heading_sent = self.send_heading();
        }

        report.overrun = self.timers.wait_period(TICK_TIMER).is_overrun();
        if report.overrun {
            self.indicators.toggle_overrun();
            counter!("telemetry_tick_overruns_total").increment(1);
        }

        self.ticks = self.ticks.wrapping_add(1);
        report
    }

    fn service_commands(&mut self, report: &mut TickReport) {
        let inbound = self.link.drain_inbound();

        for &byte in inbound.iter() {
            let Some(command) = self.parser.feed(byte) else {
                continue;
            };

            match Request::decode(&command) {
                Ok(Some(Request::SetRate(rate))) => {
                    let previous = self.rate.get();
                    self.rate.set(rate);
                    info!("Sample rate changed: {} -> {}", previous, rate);
                    report.rate_changes = report.rate_changes.saturating_add(1);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Rejected command: {}", e);
                    self.link.transmit(ERROR_FRAME);
                    counter!("telemetry_commands_rejected_total").increment(1);
                    report.rejected = report.rejected.saturating_add(1);
                }
            }
        }
    }

    fn send_average(&mut self) -> bool {
        let Some(frame) = mag_frame(&self.window.average()) else {
            debug!("Dropped oversized MAG frame");
            return false;
        };
        self.link.transmit(frame.as_bytes());
        counter!("telemetry_frames_sent_total", "frame" => "mag").increment(1);
        true
    }

    fn send_heading(&mut self) -> bool {
        let heading = self.window.average().heading_degrees();
        let Some(frame) = heading_frame(heading) else {
            debug!("Dropped oversized YAW frame");
            return false;
        };
        self.link.transmit(frame.as_bytes());
        counter!("telemetry_frames_sent_total", "frame" => "yaw").increment(1);
        true
    }

    /// Active data frame rate
    pub fn rate(&self) -> SampleRate {
        self.rate.get()
    }

    /// Current moving average
    pub fn average(&self) -> MagSample {
        self.window.average()
    }

    /// Ticks completed since startup
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Diagnostic indicators
    pub fn indicators(&self) -> &I {
        &self.indicators
    }

    /// Timer bank driving the loop
    pub fn timers(&self) -> &TimerBank<C> {
        &self.timers
    }
}
