#![no_std]
#![no_main]

//! AD9850 signal generator on a Raspberry Pi Pico
//!
//! Wiring: W_CLK on GP10, FQ_UD on GP11, DATA on GP12, RESET on GP13.
//! Commands arrive on UART0 (TX GP0, RX GP1).

extern crate alloc;

use defmt_rtt as _;
use panic_probe as _;

use core::mem::MaybeUninit;

use dds_core::{default_config, Ad9850, EmbeddedHalDdsBus, EmbeddedHalSerial, SignalGenerator};
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::uart::{Config as UartConfig, Uart};
use embassy_time::{Duration, Timer};
use embedded_alloc::Heap;

#[global_allocator]
static HEAP: Heap = Heap::empty();

/// Room for the JSON tree of one command plus the queue
const HEAP_SIZE: usize = 32 * 1024;

/// Idle back-off, well inside what the 32-byte RX FIFO absorbs
const IDLE_POLL: Duration = Duration::from_micros(50);

fn init_heap() {
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    // Called once, before anything allocates
    unsafe { HEAP.init(core::ptr::addr_of_mut!(HEAP_MEM) as usize, HEAP_SIZE) }
}

/// Main firmware entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    init_heap();
    defmt::info!("🔧 Signal generator v{} starting...", dds_core::VERSION);

    let p = embassy_rp::init(Default::default());
    let config = default_config();
    defmt::info!("⚙️ Config: {}", config);
    defmt::info!(
        "📏 Step {} mHz, up to {} Hz",
        config.resolution_mhz(),
        config.nyquist_hz()
    );

    let bus = EmbeddedHalDdsBus::new(
        Output::new(p.PIN_10, Level::Low),
        Output::new(p.PIN_11, Level::Low),
        Output::new(p.PIN_12, Level::Low),
        Output::new(p.PIN_13, Level::Low),
    );
    let dds = Ad9850::new(bus, config.oscillator_hz);
    defmt::info!("✅ AD9850 in serial mode");

    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.baud_rate;
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let mut serial = EmbeddedHalSerial::new(uart);

    let mut generator = SignalGenerator::new(dds, config);
    defmt::info!("✨ Ready on UART0 at {} baud", config.baud_rate);

    loop {
        match generator.service(&mut serial) {
            Ok(Some(report)) => defmt::debug!("📡 {}", report),
            Ok(None) => Timer::after(IDLE_POLL).await,
            Err(error) => defmt::warn!("⚠️ Serial error: {}", error),
        }
    }
}
