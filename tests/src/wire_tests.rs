//! Pin-level traces of the AD9850 serial load protocol

use dds_core::{Ad9850, EmbeddedHalDdsBus, ProgramWord, DEFAULT_OSCILLATOR_HZ};
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};

/// Expected transactions of each pin, in wiring order
#[derive(Default)]
struct Expectations {
    w_clk: Vec<PinTransaction>,
    fq_ud: Vec<PinTransaction>,
    data: Vec<PinTransaction>,
    reset: Vec<PinTransaction>,
}

fn pulse(pin: &mut Vec<PinTransaction>) {
    pin.push(PinTransaction::set(PinState::High));
    pin.push(PinTransaction::set(PinState::Low));
}

impl Expectations {
    /// Reset, then W_CLK and FQ_UD once to enter serial mode
    fn reset(&mut self) {
        pulse(&mut self.reset);
        pulse(&mut self.w_clk);
        pulse(&mut self.fq_ud);
    }

    /// One 40-bit load, LSB first, latched by FQ_UD
    fn load(&mut self, word: ProgramWord) {
        for bit in word.bits() {
            let state = if bit { PinState::High } else { PinState::Low };
            self.data.push(PinTransaction::set(state));
            pulse(&mut self.w_clk);
        }
        pulse(&mut self.fq_ud);
    }
}

struct Pins {
    w_clk: PinMock,
    fq_ud: PinMock,
    data: PinMock,
    reset: PinMock,
}

impl Pins {
    fn new(expectations: &Expectations) -> Self {
        Self {
            w_clk: PinMock::new(&expectations.w_clk),
            fq_ud: PinMock::new(&expectations.fq_ud),
            data: PinMock::new(&expectations.data),
            reset: PinMock::new(&expectations.reset),
        }
    }

    fn bus(&self) -> EmbeddedHalDdsBus<PinMock, PinMock, PinMock, PinMock> {
        EmbeddedHalDdsBus::new(
            self.w_clk.clone(),
            self.fq_ud.clone(),
            self.data.clone(),
            self.reset.clone(),
        )
    }

    fn done(&mut self) {
        self.w_clk.done();
        self.fq_ud.done();
        self.data.done();
        self.reset.done();
    }
}

#[test]
fn test_power_up_trace() {
    let mut expected = Expectations::default();
    expected.reset();
    expected.load(ProgramWord::power_on());

    let mut pins = Pins::new(&expected);
    let dds = Ad9850::new(pins.bus(), DEFAULT_OSCILLATOR_HZ);
    assert!(!dds.enabled());

    drop(dds);
    pins.done();
}

#[test]
fn test_commit_trace() {
    let mut expected = Expectations::default();
    expected.reset();
    expected.load(ProgramWord::power_on());
    expected.load(ProgramWord::new(34_359, 2, true));

    let mut pins = Pins::new(&expected);
    let mut dds = Ad9850::new(pins.bus(), DEFAULT_OSCILLATOR_HZ);
    println!("Loading 1 kHz, 22.5 degrees, output on");
    dds.set_frequency(1_000);
    dds.set_phase(2250);
    dds.set_enabled(true);
    dds.commit();
    println!("✓ word {:#012x}", dds.last_word().to_raw());

    drop(dds);
    pins.done();
}

#[test]
fn test_disable_sets_power_down_bit() {
    let mut expected = Expectations::default();
    expected.reset();
    expected.load(ProgramWord::power_on());
    expected.load(ProgramWord::new(0, 0, true));
    expected.load(ProgramWord::new(0, 0, false));

    let mut pins = Pins::new(&expected);
    let mut dds = Ad9850::new(pins.bus(), DEFAULT_OSCILLATOR_HZ);
    dds.set_enabled(true);
    dds.commit();
    dds.set_enabled(false);
    dds.commit();

    // Bit 34 high
    assert_eq!(dds.last_word().to_raw(), 1 << 34);

    drop(dds);
    pins.done();
}

#[test]
fn test_phase_wraps_on_the_wire() {
    let mut expected = Expectations::default();
    expected.reset();
    expected.load(ProgramWord::power_on());
    // 359.99 degrees rounds up to a full turn
    expected.load(ProgramWord::new(0, 0, false));

    let mut pins = Pins::new(&expected);
    let mut dds = Ad9850::new(pins.bus(), DEFAULT_OSCILLATOR_HZ);
    dds.set_phase(35_999);
    dds.commit();
    assert_eq!(dds.phase(), 0);

    drop(dds);
    pins.done();
}
