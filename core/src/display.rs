//! Multiplexed 4-digit 7-segment display driver
//!
//! The seven segment lines are shared by all four digit positions. A render
//! pass pulses one digit at a time: every digit line is released, the segment
//! lines are set for the next value, the target digit line is selected for a
//! short hold, then released again. Brightness comes from repeating the pass
//! fast enough for visual persistence.
//!
//! Every line is active-low: `PinState::Low` lights a segment, selects a
//! digit, or shows the colon.
//!
//! ## Invariant
//! At most one digit line is active at any instant. A digit line is only
//! driven active after all four have been released, and it is released
//! before the pulse returns.

use core::fmt;

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal_async::delay::DelayNs;

use crate::clock::TimeOfDay;
use crate::config::DisplayTiming;

pub const NUM_DIGITS: usize = 4;
pub const NUM_SEGMENTS: usize = 7;

/// Segment-lit flags in a, b, c, d, e, f, g order
pub type SegmentPattern = [bool; NUM_SEGMENTS];

/// Line level that lights/selects
pub const ACTIVE: PinState = PinState::Low;
/// Line level that darkens/releases
pub const INACTIVE: PinState = PinState::High;

/// Lit segments for digits 0-9
///
/// ```text
///    aaa
///   f   b
///    ggg
///   e   c
///    ddd
/// ```
pub const DIGIT_PATTERNS: [SegmentPattern; 10] = [
    [true, true, true, true, true, true, false],     // 0
    [false, true, true, false, false, false, false], // 1
    [true, true, false, true, true, false, true],    // 2
    [true, true, true, true, false, false, true],    // 3
    [false, true, true, false, false, true, true],   // 4
    [true, false, true, true, false, true, true],    // 5
    [true, false, true, true, true, true, true],     // 6
    [true, true, true, false, false, false, false],  // 7
    [true, true, true, true, true, true, true],      // 8
    [true, true, true, true, false, true, true],     // 9
];

/// Pattern for a decimal digit, `None` above 9
pub fn segment_pattern(digit: u8) -> Option<&'static SegmentPattern> {
    DIGIT_PATTERNS.get(usize::from(digit))
}

/// Colon state for a monotonic instant: 1 Hz, 50% duty
pub fn colon_active(now_ms: u64) -> bool {
    now_ms % 1000 < 500
}

fn level(active: bool) -> PinState {
    if active {
        ACTIVE
    } else {
        INACTIVE
    }
}

/// Display driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError<E> {
    /// Digit position outside 0..=3
    InvalidPosition(u8),
    /// Value outside 0..=9
    InvalidDigit(u8),
    /// Output pin failed to switch
    Pin(E),
}

impl<E: fmt::Debug> fmt::Display for DisplayError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPosition(p) => write!(f, "Invalid digit position {}", p),
            Self::InvalidDigit(d) => write!(f, "Invalid digit value {}", d),
            Self::Pin(e) => write!(f, "Pin error: {:?}", e),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for DisplayError<E> {}

/// Output lines of the display, by role
pub struct DisplayPins<P> {
    /// Digit-position select lines, leftmost first
    pub digits: [P; NUM_DIGITS],
    /// Segment lines a..g
    pub segments: [P; NUM_SEGMENTS],
    /// The two colon dot lines
    pub colon: [P; 2],
    /// Grid select for the colon; held active once initialized
    pub colon_grid: P,
}

/// Time-division multiplexer over `DisplayPins`
pub struct Multiplexer<P, D> {
    pins: DisplayPins<P>,
    delay: D,
    timing: DisplayTiming,
}

impl<P, D> Multiplexer<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(pins: DisplayPins<P>, delay: D, timing: DisplayTiming) -> Self {
        Self {
            pins,
            delay,
            timing,
        }
    }

    /// Darken every line, then select the colon grid
    pub fn init(&mut self) -> Result<(), DisplayError<P::Error>> {
        let pins = &mut self.pins;
        for pin in pins
            .digits
            .iter_mut()
            .chain(pins.segments.iter_mut())
            .chain(pins.colon.iter_mut())
        {
            pin.set_state(INACTIVE).map_err(DisplayError::Pin)?;
        }
        pins.colon_grid
            .set_state(ACTIVE)
            .map_err(DisplayError::Pin)
    }

    /// Pulse one digit position with `value` for the configured hold
    pub async fn render_digit(
        &mut self,
        position: u8,
        value: u8,
    ) -> Result<(), DisplayError<P::Error>> {
        let pattern = segment_pattern(value).ok_or(DisplayError::InvalidDigit(value))?;
        let index = usize::from(position);
        if index >= NUM_DIGITS {
            return Err(DisplayError::InvalidPosition(position));
        }

        self.release_digits()?;
        for (pin, &lit) in self.pins.segments.iter_mut().zip(pattern.iter()) {
            pin.set_state(level(lit)).map_err(DisplayError::Pin)?;
        }

        self.pins.digits[index]
            .set_state(ACTIVE)
            .map_err(DisplayError::Pin)?;
        self.delay.delay_us(self.timing.digit_hold_us).await;
        self.pins.digits[index]
            .set_state(INACTIVE)
            .map_err(DisplayError::Pin)
    }

    /// One full pass over positions 0..=3
    pub async fn render_time(&mut self, time: TimeOfDay) -> Result<(), DisplayError<P::Error>> {
        for (position, value) in (0u8..).zip(time.digits()) {
            self.render_digit(position, value).await?;
        }
        Ok(())
    }

    /// Drive both colon lines from the monotonic clock; returns the new state
    pub fn blink_colon(&mut self, now_ms: u64) -> Result<bool, DisplayError<P::Error>> {
        let active = colon_active(now_ms);
        for pin in self.pins.colon.iter_mut() {
            pin.set_state(level(active)).map_err(DisplayError::Pin)?;
        }
        Ok(active)
    }

    fn release_digits(&mut self) -> Result<(), DisplayError<P::Error>> {
        for pin in self.pins.digits.iter_mut() {
            pin.set_state(INACTIVE).map_err(DisplayError::Pin)?;
        }
        Ok(())
    }
}
