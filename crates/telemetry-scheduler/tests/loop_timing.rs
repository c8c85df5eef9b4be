use std::sync::Arc;
use std::time::Duration;

use frame_protocol::SampleRate;
use mag_filter::MagSample;
use serial_link::SerialLink;
use telemetry_scheduler::{LedIndicators, MagSource, Scheduler, SchedulerConfig, TickReport};
use tick_timer::{Clock, ManualClock};

struct Rig<S: MagSource> {
    link: Arc<SerialLink>,
    clock: ManualClock,
    scheduler: Scheduler<S, LedIndicators, ManualClock>,
    sent: String,
}

impl<S: MagSource> Rig<S> {
    fn with_source(source: S, clock: ManualClock) -> Self {
        let link = Arc::new(SerialLink::new());
        let scheduler = Scheduler::new(
            SchedulerConfig::default(),
            Arc::clone(&link),
            source,
            LedIndicators::new(),
            clock.clone(),
        )
        .unwrap();
        Self {
            link,
            clock,
            scheduler,
            sent: String::new(),
        }
    }

    fn inject(&self, bytes: &[u8]) {
        for &byte in bytes {
            self.link.isr_receive(byte);
        }
    }

    /// Run `n` ticks, collecting transmitted bytes after each one
    fn run(&mut self, n: usize) -> Vec<TickReport> {
        (0..n)
            .map(|_| {
                let report = self.scheduler.tick();
                while let Some(byte) = self.link.isr_next_outbound() {
                    self.sent.push(byte as char);
                }
                report
            })
            .collect()
    }

    fn take_sent(&mut self) -> String {
        std::mem::take(&mut self.sent)
    }
}

fn rig() -> Rig<impl FnMut() -> MagSample> {
    Rig::with_source(|| MagSample::new(3.0, 4.0, 0.0), ManualClock::new())
}

#[test]
fn test_invalid_rate_answers_error_frame() {
    let mut rig = rig();
    rig.inject(b"$RATE,7*");

    let reports = rig.run(1);

    assert_eq!(reports[0].rejected, 1);
    assert_eq!(rig.take_sent(), "$ERR,1*");
    assert_eq!(rig.scheduler.rate(), SampleRate::DEFAULT);
}

#[test]
fn test_default_rate_sends_every_twenty_ticks() {
    let mut rig = rig();
    let reports = rig.run(60);

    let sent_on: Vec<usize> = reports
        .iter()
        .enumerate()
        .filter(|(_, r)| r.data_sent)
        .map(|(i, _)| i + 1)
        .collect();
    assert_eq!(sent_on, vec![20, 40, 60]);
}

#[test]
fn test_window_full_by_first_frames() {
    let mut rig = rig();
    rig.run(20);

    assert_eq!(rig.take_sent(), "$MAG,3.00,4.00,0.00*$YAW,53.13*\n");
}

#[test]
fn test_rate_ten_doubles_data_frames() {
    let mut rig = rig();
    rig.inject(b"$RATE,10*");

    let reports = rig.run(40);

    assert_eq!(reports[0].rate_changes, 1);
    assert_eq!(rig.scheduler.rate().hz(), 10);
    assert_eq!(reports.iter().filter(|r| r.data_sent).count(), 4);
    assert_eq!(rig.take_sent().matches("$MAG,").count(), 4);
}

#[test]
fn test_rate_zero_stops_data_frames_only() {
    let mut rig = rig();
    rig.inject(b"$RATE,0*");

    let reports = rig.run(60);

    assert!(!rig.scheduler.rate().is_enabled());
    assert!(reports.iter().all(|r| !r.data_sent));
    let sent = rig.take_sent();
    assert_eq!(sent.matches("$MAG,").count(), 0);
    assert_eq!(sent.matches("$YAW,").count(), 3);
}

#[test]
fn test_rate_change_mid_stream() {
    let mut rig = rig();
    rig.run(20);
    rig.inject(b"$RATE,1*");

    let reports = rig.run(100);

    assert_eq!(reports.iter().filter(|r| r.data_sent).count(), 1);
    assert!(reports[99].data_sent);
}

#[test]
fn test_rate_five_restores_twenty_tick_cadence() {
    let mut rig = rig();
    rig.inject(b"$RATE,1*");
    let slow = rig.run(100);
    assert_eq!(rig.scheduler.rate().hz(), 1);
    assert_eq!(slow.iter().filter(|r| r.data_sent).count(), 1);
    rig.take_sent();

    rig.inject(b"$RATE,5*");
    let reports = rig.run(60);

    assert_eq!(reports[0].rate_changes, 1);
    assert_eq!(rig.scheduler.rate().hz(), 5);
    let sent_on: Vec<usize> = reports
        .iter()
        .enumerate()
        .filter(|(_, r)| r.data_sent)
        .map(|(i, _)| i + 1)
        .collect();
    assert_eq!(sent_on, vec![20, 40, 60]);
    assert_eq!(rig.take_sent().matches("$MAG,").count(), 3);
}

#[test]
fn test_command_split_across_ticks() {
    let mut rig = rig();
    rig.inject(b"$RA");
    rig.run(1);
    rig.inject(b"TE,10*");

    let reports = rig.run(1);

    assert_eq!(reports[0].rate_changes, 1);
    assert_eq!(rig.scheduler.rate().hz(), 10);
}

#[test]
fn test_unknown_command_ignored() {
    let mut rig = rig();
    rig.inject(b"$PING,1*");

    let reports = rig.run(1);

    assert_eq!(reports[0], TickReport::default());
    assert!(rig.take_sent().is_empty());
    assert_eq!(rig.scheduler.rate(), SampleRate::DEFAULT);
}

#[test]
fn test_acquisition_every_fourth_tick() {
    let mut rig = rig();
    let reports = rig.run(12);

    let acquired_on: Vec<usize> = reports
        .iter()
        .enumerate()
        .filter(|(_, r)| r.acquired)
        .map(|(i, _)| i + 1)
        .collect();
    assert_eq!(acquired_on, vec![4, 8, 12]);
}

#[test]
fn test_heading_every_twenty_ticks() {
    let mut rig = rig();
    let reports = rig.run(100);
    assert_eq!(reports.iter().filter(|r| r.heading_sent).count(), 5);
}

#[test]
fn test_heartbeat_every_fifty_ticks() {
    let mut rig = rig();
    let reports = rig.run(100);

    assert!(reports[49].heartbeat);
    assert!(reports[99].heartbeat);
    assert_eq!(reports.iter().filter(|r| r.heartbeat).count(), 2);
    assert!(!rig.scheduler.indicators().heartbeat);
}

#[test]
fn test_ticks_keep_fixed_period() {
    let mut rig = rig();
    let reports = rig.run(10);

    assert!(reports.iter().all(|r| !r.overrun));
    assert_eq!(rig.clock.now(), Duration::from_millis(100));
}

#[test]
fn test_slow_sensor_overruns_tick() {
    let clock = ManualClock::new();
    let sensor_clock = clock.clone();
    // 7ms workload plus a 5ms read does not fit a 10ms tick
    let slow_sensor = move || {
        sensor_clock.advance(Duration::from_millis(5));
        MagSample::new(1.0, 0.0, 0.0)
    };
    let mut rig = Rig::with_source(slow_sensor, clock);

    let reports = rig.run(20);

    let overrun_on: Vec<usize> = reports
        .iter()
        .enumerate()
        .filter(|(_, r)| r.overrun)
        .map(|(i, _)| i + 1)
        .collect();
    assert_eq!(overrun_on, vec![4, 8, 12, 16, 20]);
    assert_eq!(rig.scheduler.indicators().overrun_count, 5);
    assert!(rig.scheduler.indicators().overrun);
    assert_eq!(rig.clock.now(), Duration::from_millis(202));

    // The late tick does not shift the schedule
    rig.run(1);
    assert_eq!(rig.clock.now(), Duration::from_millis(210));
}
