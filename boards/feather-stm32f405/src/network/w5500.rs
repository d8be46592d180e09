#![deny(unsafe_code)]
#![deny(warnings)]
//! W5500 Ethernet FeatherWing bring-up
//!
//! SPI2 at 10 MHz with DMA, chip select on PC6, reset on PC3 and the
//! interrupt line on PC2.

use defmt::info;
use embassy_embedded_hal::shared_bus::asynch::spi::SpiDevice as SpiDeviceBus;
use embassy_net_wiznet::chip::W5500;
use embassy_net_wiznet::{Device, Runner, State};
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Level, Output, Pull, Speed};
use embassy_stm32::mode::Async;
use embassy_stm32::spi::{self, Spi};
use embassy_stm32::time::Hertz;
use embassy_stm32::{peripherals, Peri};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::Timer;
use static_cell::StaticCell;

use super::error::NetworkError;

const SPI_FREQUENCY_HZ: u32 = 10_000_000;

type SpiBus = Mutex<CriticalSectionRawMutex, Spi<'static, Async>>;
type W5500Spi = SpiDeviceBus<'static, CriticalSectionRawMutex, Spi<'static, Async>, Output<'static>>;

/// Runner that must be polled for the device to move packets
pub type W5500Runner = Runner<'static, W5500, W5500Spi, ExtiInput<'static>, Output<'static>>;

/// Raw peripherals for the W5500, handed to the clock task
pub struct W5500Pins {
    pub spi: Peri<'static, peripherals::SPI2>,
    pub sck: Peri<'static, peripherals::PB13>,
    pub mosi: Peri<'static, peripherals::PB15>,
    pub miso: Peri<'static, peripherals::PB14>,
    pub cs: Peri<'static, peripherals::PC6>,
    pub reset: Peri<'static, peripherals::PC3>,
    pub int: Peri<'static, peripherals::PC2>,
    pub exti: Peri<'static, peripherals::EXTI2>,
    pub dma_tx: Peri<'static, peripherals::DMA1_CH4>,
    pub dma_rx: Peri<'static, peripherals::DMA1_CH3>,
}

/// Reset the W5500 and create its embassy-net device
///
/// Must be called once; the SPI bus and driver state live in statics.
pub async fn bring_up(
    pins: W5500Pins,
    mac_addr: [u8; 6],
) -> Result<(Device<'static>, W5500Runner), NetworkError> {
    let mut spi_config = spi::Config::default();
    spi_config.frequency = Hertz(SPI_FREQUENCY_HZ);

    let spi = Spi::new(
        pins.spi,
        pins.sck,
        pins.mosi,
        pins.miso,
        pins.dma_tx,
        pins.dma_rx,
        spi_config,
    );
    let cs = Output::new(pins.cs, Level::High, Speed::VeryHigh);
    let mut reset = Output::new(pins.reset, Level::High, Speed::Low);
    let int = ExtiInput::new(pins.int, pins.exti, Pull::Up);

    info!("Performing W5500 hardware reset...");
    reset.set_low();
    Timer::after_millis(1).await;
    reset.set_high();
    Timer::after_millis(2).await;

    static SPI_BUS: StaticCell<SpiBus> = StaticCell::new();
    let spi_bus = SPI_BUS.init(Mutex::new(spi));
    let spi_device = SpiDeviceBus::new(spi_bus, cs);

    info!(
        "MAC address: {:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
        mac_addr[0], mac_addr[1], mac_addr[2], mac_addr[3], mac_addr[4], mac_addr[5]
    );

    static STATE: StaticCell<State<8, 8>> = StaticCell::new();
    let state = STATE.init(State::<8, 8>::new());

    let (device, runner) = embassy_net_wiznet::new(mac_addr, state, spi_device, int, reset)
        .await
        .map_err(|_| NetworkError::ChipInit)?;

    info!("W5500 initialized");
    Ok((device, runner))
}
