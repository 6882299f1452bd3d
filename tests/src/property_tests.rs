//! Property tests for the encodings and the line assembler

use dds_core::{
    compute_frequency_register, compute_phase_register, decode_command, line::is_printable,
    phase_from_register, Command, Feed, LineAssembler, Update, MAX_COMMAND_LEN,
    PHASE_INCREMENT_CENTIDEG,
};
use proptest::prelude::*;

const FULL_TURN_CENTIDEG: i64 = 36_000;

proptest! {
    #[test]
    fn frequency_register_is_truncated_ratio(
        oscillator_hz in 1u32..,
        frequency_hz in any::<u32>(),
    ) {
        let expected = (((frequency_hz as u64) << 32) / oscillator_hz as u64) as u32;
        prop_assert_eq!(compute_frequency_register(oscillator_hz, frequency_hz), expected);
    }

    #[test]
    fn frequency_register_is_monotonic_below_oscillator(
        a in 0u32..125_000_000,
        b in 0u32..125_000_000,
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            compute_frequency_register(125_000_000, low)
                <= compute_frequency_register(125_000_000, high)
        );
    }

    #[test]
    fn phase_register_is_nearest_step(phase in 0u32..36_000) {
        let register = compute_phase_register(phase);
        prop_assert!(register < 32);

        // Distance to the reported phase, measured around the circle
        let reported = phase_from_register(register) as i64;
        let distance = (phase as i64 - reported).rem_euclid(FULL_TURN_CENTIDEG);
        let distance = distance.min(FULL_TURN_CENTIDEG - distance);
        prop_assert!(distance * 2 <= PHASE_INCREMENT_CENTIDEG as i64);
    }

    #[test]
    fn phase_register_is_periodic(phase in 0u32..1_000_000) {
        prop_assert_eq!(
            compute_phase_register(phase),
            compute_phase_register(phase + 36_000)
        );
    }

    #[test]
    fn assembler_never_exceeds_capacity(input in proptest::collection::vec(any::<u8>(), 0..4096)) {
        let mut assembler = LineAssembler::<MAX_COMMAND_LEN>::new();
        for character in input {
            match assembler.feed(character) {
                Feed::Terminated(Some(line)) => {
                    prop_assert!(!line.is_empty());
                    prop_assert!(line.len() <= MAX_COMMAND_LEN);
                    prop_assert!(line.iter().all(|&c| is_printable(c)));
                }
                Feed::Echo(echoed) => {
                    prop_assert_eq!(echoed, character);
                }
                _ => {}
            }
            prop_assert!(assembler.len() <= MAX_COMMAND_LEN);
        }
    }

    #[test]
    fn decoder_is_total(line in proptest::collection::vec(any::<u8>(), 0..256)) {
        // Every line yields exactly one command
        let command = decode_command(&line);
        prop_assert_eq!(command.is_rejected(), command.error().is_some());
    }

    #[test]
    fn bare_command_number_round_trips(command_number in any::<i64>()) {
        let line = format!("{{\"command_number\":{}}}", command_number);
        prop_assert_eq!(decode_command(line.as_bytes()), Command::Apply(Update::new(command_number)));
    }
}
