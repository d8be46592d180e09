//! One pass of the clock loop
//!
//! Order within a pass: sync while the clock is not set, render HH:MM once,
//! then set the colon. A time synced in a pass is shown in that same pass.
//! A failed sync is retried on the next pass with no backoff; once set the
//! clock is never resynced.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use hal_abstractions::DatagramSocket;

use crate::clock::ClockState;
use crate::config::SntpConfig;
use crate::display::{DisplayError, Multiplexer};
use crate::sntp::{request_time, SntpError};

/// What a pass did, for the caller to log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport<E> {
    /// Outcome of the sync attempt; `None` when the clock was already set
    pub sync: Option<Result<i64, SntpError>>,
    /// First display error of the pass
    pub display: Result<(), DisplayError<E>>,
}

/// Run one pass
///
/// `timer` bounds the reply wait. `uptime_ms` is read at the sync instant and
/// again for rendering and the colon.
pub async fn run_pass<S, T, P, D, U>(
    clock: &mut ClockState,
    socket: &mut S,
    timer: &mut T,
    display: &mut Multiplexer<P, D>,
    config: &SntpConfig,
    uptime_ms: U,
) -> PassReport<P::Error>
where
    S: DatagramSocket,
    T: DelayNs,
    P: OutputPin,
    D: DelayNs,
    U: Fn() -> u64,
{
    let sync = if clock.is_set() {
        None
    } else {
        let result = request_time(socket, timer, config).await;
        match result {
            Ok(epoch_secs) => clock.set(epoch_secs, uptime_ms()),
            Err(_) => clock.mark_sync_failed(),
        }
        Some(result)
    };

    let rendered = display.render_time(clock.time_of_day(uptime_ms())).await;
    let colon = display.blink_colon(uptime_ms()).map(|_| ());

    PassReport {
        sync,
        display: rendered.and(colon),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TimeStatus;
    use crate::config::DisplayTiming;
    use crate::display::{ACTIVE, DIGIT_PATTERNS, NUM_SEGMENTS};
    use crate::mock::{display_pins, Event, EventLog, Expiry, Line, MockDelay, MockPin, MockSocket};
    use crate::sntp::NTP_UNIX_OFFSET;
    use core::convert::Infallible;
    use embassy_futures::block_on;

    type TestMux<'a> = Multiplexer<MockPin<'a>, MockDelay<'a>>;

    fn multiplexer(log: &EventLog) -> TestMux<'_> {
        Multiplexer::new(
            display_pins(log),
            MockDelay::recording(log, Expiry::Immediate),
            DisplayTiming::default(),
        )
    }

    fn utc_config() -> SntpConfig {
        SntpConfig {
            utc_offset_hours: 0,
            ..SntpConfig::default()
        }
    }

    /// One pass at a fixed uptime, UTC
    fn pass(
        clock: &mut ClockState,
        socket: &mut MockSocket,
        timer: &mut MockDelay<'_>,
        mux: &mut TestMux<'_>,
        now_ms: u64,
    ) -> PassReport<Infallible> {
        block_on(run_pass(clock, socket, timer, mux, &utc_config(), || now_ms))
    }

    fn reply_for(unix_secs: u32) -> [u8; 48] {
        let mut reply = [0u8; 48];
        reply[0] = 0x24;
        reply[40..44].copy_from_slice(&(NTP_UNIX_OFFSET + unix_secs).to_be_bytes());
        reply
    }

    /// Decode the value shown each time a digit line was selected
    fn shown_digits(log: &EventLog) -> heapless::Vec<u8, 8> {
        let mut lit = [false; NUM_SEGMENTS];
        let mut shown = heapless::Vec::new();
        for event in log.borrow().iter() {
            match *event {
                Event::Drive(Line::Segment(s), state) => lit[usize::from(s)] = state == ACTIVE,
                Event::Drive(Line::Digit(_), state) if state == ACTIVE => {
                    let digit = DIGIT_PATTERNS
                        .iter()
                        .position(|pattern| *pattern == lit)
                        .expect("segments match no digit");
                    shown.push(digit as u8).expect("too many digits");
                }
                _ => {}
            }
        }
        shown
    }

    #[test]
    fn test_failed_sync_is_retried_next_pass() {
        let log = EventLog::default();
        let mut mux = multiplexer(&log);
        let mut socket = MockSocket::new();
        let mut timer = MockDelay::new(Expiry::AfterPolls(2));
        let mut clock = ClockState::new();

        let report = pass(&mut clock, &mut socket, &mut timer, &mut mux, 0);
        assert_eq!(report.sync, Some(Err(SntpError::Timeout)));
        assert_eq!(report.display, Ok(()));
        assert_eq!(clock.status(), TimeStatus::NeedsSync);
        assert_eq!(shown_digits(&log).as_slice(), &[0, 0, 0, 0]);
        assert_eq!(socket.sent().len(), 1);

        log.borrow_mut().clear();
        socket.queue_reply(&reply_for(12 * 3600 + 34 * 60));
        let report = pass(&mut clock, &mut socket, &mut timer, &mut mux, 0);
        assert_eq!(report.sync, Some(Ok(12 * 3600 + 34 * 60)));
        assert!(clock.is_set());
        assert_eq!(socket.sent().len(), 2);
    }

    #[test]
    fn test_synced_time_is_shown_in_same_pass() {
        let log = EventLog::default();
        let mut mux = multiplexer(&log);
        let mut socket = MockSocket::new();
        socket.queue_reply(&reply_for(9 * 3600 + 5 * 60));
        let mut timer = MockDelay::new(Expiry::Never);
        let mut clock = ClockState::new();

        let report = pass(&mut clock, &mut socket, &mut timer, &mut mux, 250);

        assert_eq!(report.sync, Some(Ok(9 * 3600 + 5 * 60)));
        assert_eq!(shown_digits(&log).as_slice(), &[0, 9, 0, 5]);
        // Colon lit at 250 ms
        let events = log.borrow();
        assert_eq!(
            &events[events.len() - 2..],
            &[
                Event::Drive(Line::Colon(0), ACTIVE),
                Event::Drive(Line::Colon(1), ACTIVE),
            ]
        );
    }

    #[test]
    fn test_set_clock_sends_no_further_requests() {
        let log = EventLog::default();
        let mut mux = multiplexer(&log);
        let mut socket = MockSocket::new();
        socket.queue_reply(&reply_for(23 * 3600 + 59 * 60));
        let mut timer = MockDelay::new(Expiry::AfterPolls(1));
        let mut clock = ClockState::new();

        pass(&mut clock, &mut socket, &mut timer, &mut mux, 0);
        assert!(clock.is_set());

        // One minute later the display rolls over without a resync
        log.borrow_mut().clear();
        let report = pass(&mut clock, &mut socket, &mut timer, &mut mux, 60_000);
        assert_eq!(report.sync, None);
        assert_eq!(socket.sent().len(), 1);
        assert_eq!(shown_digits(&log).as_slice(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_short_reply_leaves_clock_unset() {
        let log = EventLog::default();
        let mut mux = multiplexer(&log);
        let mut socket = MockSocket::new();
        socket.queue_reply(&reply_for(9 * 3600)[..47]);
        let mut timer = MockDelay::new(Expiry::AfterPolls(2));
        let mut clock = ClockState::new();

        let report = pass(&mut clock, &mut socket, &mut timer, &mut mux, 0);

        assert_eq!(report.sync, Some(Err(SntpError::Timeout)));
        assert!(!clock.is_set());
        assert_eq!(shown_digits(&log).as_slice(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_failed_lookup_reported_and_retried() {
        let log = EventLog::default();
        let mut mux = multiplexer(&log);
        let mut socket = MockSocket::new();
        socket.fail_lookups();
        let mut timer = MockDelay::new(Expiry::Never);
        let mut clock = ClockState::new();

        for _ in 0..2 {
            let report = pass(&mut clock, &mut socket, &mut timer, &mut mux, 0);
            assert_eq!(report.sync, Some(Err(SntpError::Dns)));
        }
        assert_eq!(clock.status(), TimeStatus::NeedsSync);
    }
}
