#![deny(unsafe_code)]
#![deny(warnings)]
#![no_main]
#![no_std]

use defmt_rtt as _; // global logger
use panic_probe as _;
use rtic::app;
use rtic_monotonics::stm32::prelude::*;

mod clock;
mod display;
mod network;

stm32_tim2_monotonic!(Mono, 1_000_000);

/// Monotonic milliseconds since boot
///
/// Drives the colon blink and advances the synced time. Never derived from
/// the wall clock.
pub fn uptime_ms() -> u64 {
    Mono::now().ticks() / 1_000
}

#[app(device = embassy_stm32, peripherals = true, dispatchers = [USART1])]
mod app {
    use super::*;
    use defmt::info;
    use embassy_stm32::rcc::{Hse, HseMode};
    use embassy_stm32::time::Hertz;

    use clock_core::{DisplayPins, DisplayTiming, Multiplexer, SntpConfig};
    use display::{line, DisplayLine};
    use network::{NetworkConfig, W5500Pins};

    #[shared]
    struct Shared {}

    #[local]
    struct Local {}

    #[init]
    fn init(_cx: init::Context) -> (Shared, Local) {
        info!("NTP clock starting...");

        // Adafruit Feather STM32F405: 12 MHz HSE
        let mut config = embassy_stm32::Config::default();
        config.rcc.hse = Some(Hse {
            freq: Hertz(12_000_000),
            mode: HseMode::Oscillator,
        });

        // HSE (12 MHz) / PREDIV(6) = 2 MHz (PLL input)
        // 2 MHz * MUL(168) = 336 MHz (VCO)
        // VCO / DIVP(4) = 84 MHz (SYSCLK)
        config.rcc.pll_src = embassy_stm32::rcc::PllSource::HSE;
        config.rcc.pll = Some(embassy_stm32::rcc::Pll {
            prediv: embassy_stm32::rcc::PllPreDiv::DIV6,
            mul: embassy_stm32::rcc::PllMul::MUL168,
            divp: Some(embassy_stm32::rcc::PllPDiv::DIV4),
            divq: None,
            divr: None,
        });
        config.rcc.sys = embassy_stm32::rcc::Sysclk::PLL1_P;
        config.rcc.ahb_pre = embassy_stm32::rcc::AHBPrescaler::DIV1; // 84 MHz
        config.rcc.apb1_pre = embassy_stm32::rcc::APBPrescaler::DIV2; // 42 MHz
        config.rcc.apb2_pre = embassy_stm32::rcc::APBPrescaler::DIV1; // 84 MHz

        let p = embassy_stm32::init(config);
        info!("System clock: SYSCLK=84MHz from 12MHz HSE");

        // TIM2 on APB1: timer clock = 2*APB1 when prescaler != 1
        let timer_clock_hz = 84_000_000;
        Mono::start(timer_clock_hz);
        info!("TIM2 monotonic timer initialized at 1 MHz");

        // Every line starts high (dark) before the first render pass.
        // See `display` for the header pin map.
        let display_pins: DisplayPins<DisplayLine> = DisplayPins {
            digits: [line(p.PA4), line(p.PA5), line(p.PA6), line(p.PA7)],
            segments: [
                line(p.PC4),
                line(p.PC5),
                line(p.PB8),
                line(p.PB9),
                line(p.PC7),
                line(p.PB6),
                line(p.PB7),
            ],
            colon: [line(p.PB10), line(p.PB11)],
            colon_grid: line(p.PC1),
        };

        let w5500_pins = W5500Pins {
            spi: p.SPI2,
            sck: p.PB13,
            mosi: p.PB15,
            miso: p.PB14,
            cs: p.PC6,
            reset: p.PC3,
            int: p.PC2,
            exti: p.EXTI2,
            dma_tx: p.DMA1_CH4,
            dma_rx: p.DMA1_CH3,
        };

        clock_task::spawn(w5500_pins, display_pins).ok();

        (Shared {}, Local {})
    }

    /// Clock task - owns the network stack, the UDP socket and the display
    ///
    /// Stack is !Send and must remain within this task. The clock loop is
    /// joined with both network runners so every await in it (digit hold,
    /// SNTP wait) lets the stack make progress.
    #[task(priority = 1)]
    async fn clock_task(
        _cx: clock_task::Context,
        w5500_pins: W5500Pins,
        display_pins: DisplayPins<DisplayLine>,
    ) {
        use embassy_futures::join::join3;
        use embassy_net::{Config, StackResources};
        use static_cell::StaticCell;

        info!("Clock task started");

        let net_config = NetworkConfig::default();
        let (device, w5500_runner) =
            match network::w5500::bring_up(w5500_pins, net_config.mac_addr).await {
                Ok(parts) => parts,
                Err(e) => defmt::panic!("Ethernet bring-up failed: {}", e),
            };

        // DHCP, DNS and the SNTP socket
        static RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();
        let (stack, mut net_runner) = embassy_net::new(
            device,
            Config::dhcpv4(Default::default()),
            RESOURCES.init(StackResources::new()),
            net_config.seed,
        );
        info!("Network stack initialized with DHCP");

        let display = Multiplexer::new(display_pins, embassy_time::Delay, DisplayTiming::default());
        let clock_loop = clock::run(stack, display, SntpConfig::default());

        join3(w5500_runner.run(), net_runner.run(), clock_loop).await;
    }

    /// RTIC idle task - WFI sleep mode when no tasks active
    #[idle]
    fn idle(_cx: idle::Context) -> ! {
        info!("Idle task started - entering WFI loop");
        loop {
            cortex_m::asm::wfi();
        }
    }
}
