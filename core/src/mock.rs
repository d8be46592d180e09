//! Recording test doubles for pins, delays and sockets

#![allow(dead_code)]

use core::cell::RefCell;
use core::convert::Infallible;
use core::future::{pending, Future};
use core::pin::Pin;
use core::task::{Context, Poll};

use embedded_hal::digital::{ErrorType, OutputPin, PinState};
use embedded_hal_async::delay::DelayNs;
use hal_abstractions::net::ErrorKind;
use hal_abstractions::DatagramSocket;
use heapless::{Deque, Vec};

use crate::display::DisplayPins;

/// Display line role, as seen by the mock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Digit(u8),
    Segment(u8),
    Colon(u8),
    ColonGrid,
}

/// Something the driver did, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Drive(Line, PinState),
    Hold(u32),
}

pub type EventLog = RefCell<Vec<Event, 256>>;

fn record(log: &EventLog, event: Event) {
    log.borrow_mut().push(event).expect("event log full");
}

/// Output pin that appends every level change to a shared log
pub struct MockPin<'a> {
    line: Line,
    log: &'a EventLog,
}

impl<'a> MockPin<'a> {
    pub fn new(line: Line, log: &'a EventLog) -> Self {
        Self { line, log }
    }
}

impl ErrorType for MockPin<'_> {
    type Error = Infallible;
}

impl OutputPin for MockPin<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        record(self.log, Event::Drive(self.line, PinState::Low));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        record(self.log, Event::Drive(self.line, PinState::High));
        Ok(())
    }
}

/// Full set of display pins wired to one log
pub fn display_pins(log: &EventLog) -> DisplayPins<MockPin<'_>> {
    DisplayPins {
        digits: core::array::from_fn(|i| MockPin::new(Line::Digit(i as u8), log)),
        segments: core::array::from_fn(|i| MockPin::new(Line::Segment(i as u8), log)),
        colon: core::array::from_fn(|i| MockPin::new(Line::Colon(i as u8), log)),
        colon_grid: MockPin::new(Line::ColonGrid, log),
    }
}

/// How long a mock delay takes, counted in executor polls
#[derive(Debug, Clone, Copy)]
pub enum Expiry {
    Immediate,
    AfterPolls(u32),
    Never,
}

/// Delay that completes after a scripted number of polls
pub struct MockDelay<'a> {
    log: Option<&'a EventLog>,
    expiry: Expiry,
}

impl<'a> MockDelay<'a> {
    pub fn new(expiry: Expiry) -> Self {
        Self { log: None, expiry }
    }

    pub fn recording(log: &'a EventLog, expiry: Expiry) -> Self {
        Self {
            log: Some(log),
            expiry,
        }
    }
}

impl DelayNs for MockDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        if let Some(log) = self.log {
            record(log, Event::Hold(ns));
        }
        match self.expiry {
            Expiry::Immediate => {}
            Expiry::AfterPolls(polls) => Countdown(polls).await,
            Expiry::Never => pending::<()>().await,
        }
    }
}

/// Pending for `n` polls, then ready
struct Countdown(u32);

impl Future for Countdown {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 == 0 {
            return Poll::Ready(());
        }
        self.0 -= 1;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

type Datagram = Vec<u8, 256>;

/// Socket with a scripted inbox; waits forever once the inbox is empty
pub struct MockSocket {
    sent: Vec<Datagram, 4>,
    inbox: Deque<Datagram, 4>,
    fail_send: bool,
    fail_lookup: bool,
}

impl MockSocket {
    pub fn new() -> Self {
        Self {
            sent: Vec::new(),
            inbox: Deque::new(),
            fail_send: false,
            fail_lookup: false,
        }
    }

    pub fn queue_reply(&mut self, payload: &[u8]) {
        let datagram = Vec::from_slice(payload).expect("datagram too large");
        self.inbox.push_back(datagram).expect("inbox full");
    }

    pub fn fail_sends(&mut self) {
        self.fail_send = true;
    }

    /// Sends fail as if the server name did not resolve
    pub fn fail_lookups(&mut self) {
        self.fail_lookup = true;
    }

    pub fn sent(&self) -> &[Datagram] {
        &self.sent
    }
}

impl DatagramSocket for MockSocket {
    type Error = ErrorKind;

    async fn send(&mut self, payload: &[u8]) -> Result<(), ErrorKind> {
        if self.fail_lookup {
            return Err(ErrorKind::NotFound);
        }
        if self.fail_send {
            return Err(ErrorKind::BrokenPipe);
        }
        let datagram = Vec::from_slice(payload).map_err(|_| ErrorKind::OutOfMemory)?;
        self.sent.push(datagram).map_err(|_| ErrorKind::OutOfMemory)
    }

    /// Datagrams larger than `buf` are cut to its length
    async fn receive(&mut self, buf: &mut [u8]) -> Result<usize, ErrorKind> {
        match self.inbox.pop_front() {
            Some(datagram) => {
                let len = datagram.len().min(buf.len());
                buf[..len].copy_from_slice(&datagram[..len]);
                Ok(len)
            }
            None => pending().await,
        }
    }
}
