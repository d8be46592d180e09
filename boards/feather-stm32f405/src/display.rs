#![deny(unsafe_code)]
#![deny(warnings)]
//! Display wiring for the Feather STM32F405 headers
//!
//! | Role | Lines | Headers |
//! |------|-------|---------|
//! | Digit grids 0-3 | PA4, PA5, PA6, PA7 | A0, A1, A2, A3 |
//! | Segments a-g | PC4, PC5, PB8, PB9, PC7, PB6, PB7 | A4, A5, D9, D10, D5, SCL, SDA |
//! | Colon dots | PB10, PB11 | TX, RX |
//! | Colon grid | PC1 | D13 |
//!
//! SPI2, PC2, PC3 and PC6 stay with the W5500 FeatherWing.

use clock_core::Multiplexer;
use embassy_stm32::gpio::{Level, Output, Pin, Speed};
use embassy_stm32::Peri;
use embassy_time::Delay;

/// One active-low display line
pub type DisplayLine = Output<'static>;

/// Multiplexer as wired on this board
pub type ClockDisplay = Multiplexer<DisplayLine, Delay>;

/// Configure `pin` as a display output, starting dark (high)
pub fn line(pin: Peri<'static, impl Pin>) -> DisplayLine {
    Output::new(pin, Level::High, Speed::Low)
}
