//! Command decoding cases

use dds_core::{decode_command, Command, DecodeError, Field, Report, Update};
use rstest::rstest;
use serde_json::json;

fn update(
    command_number: i64,
    frequency_hz: Option<u32>,
    phase_centideg: Option<u32>,
    enable_out: Option<bool>,
) -> Command {
    Command::Apply(Update {
        command_number,
        frequency_hz,
        phase_centideg,
        enable_out,
    })
}

fn reject(command_number: i64, error: DecodeError) -> Command {
    Command::Reject {
        command_number,
        error,
    }
}

#[rstest]
#[case::number_only(r#"{"command_number":1}"#, update(1, None, None, None))]
#[case::all_fields(
    r#"{"command_number":2,"frequency":1000,"phase":2250,"enable_out":true}"#,
    update(2, Some(1000), Some(2250), Some(true))
)]
#[case::spaced(
    r#"{ "command_number": 3, "enable_out": false }"#,
    update(3, None, None, Some(false))
)]
#[case::negative_number(r#"{"command_number":-4,"phase":0}"#, update(-4, None, Some(0), None))]
#[case::max_frequency(
    r#"{"command_number":5,"frequency":4294967295}"#,
    update(5, Some(u32::MAX), None, None)
)]
#[case::unknown_keys_ignored(r#"{"command_number":6,"amplitude":3}"#, update(6, None, None, None))]
#[case::negative_frequency_wraps(
    r#"{"command_number":10,"frequency":-1}"#,
    update(10, Some(u32::MAX), None, None)
)]
#[case::wide_frequency_wraps(
    r#"{"command_number":11,"frequency":4294967296}"#,
    update(11, Some(0), None, None)
)]
#[case::wide_phase_wraps(
    r#"{"command_number":2,"phase":4294967296}"#,
    update(2, None, Some(0), None)
)]
#[case::command_number_past_i64(
    r#"{"command_number":9223372036854775808}"#,
    update(i64::MIN, None, None, None)
)]
fn test_valid_commands(#[case] line: &str, #[case] expected: Command) {
    assert_eq!(decode_command(line.as_bytes()), expected);
}

#[rstest]
#[case::not_json("hello", reject(0, DecodeError::MalformedJson))]
#[case::truncated(r#"{"command_number":1"#, reject(0, DecodeError::MalformedJson))]
#[case::no_number(r#"{"frequency":1000}"#, reject(0, DecodeError::MissingCommandNumber))]
#[case::string_number(r#"{"command_number":"7"}"#, reject(0, DecodeError::MissingCommandNumber))]
#[case::float_number(r#"{"command_number":7.5}"#, reject(0, DecodeError::MissingCommandNumber))]
#[case::not_an_object("[1,2,3]", reject(0, DecodeError::MissingCommandNumber))]
#[case::enable_as_int(
    r#"{"command_number":8,"enable_out":1}"#,
    reject(8, DecodeError::InvalidField(Field::EnableOut))
)]
#[case::frequency_as_string(
    r#"{"command_number":9,"frequency":"1000"}"#,
    reject(9, DecodeError::InvalidField(Field::Frequency))
)]
#[case::phase_as_float(
    r#"{"command_number":12,"phase":22.5}"#,
    reject(12, DecodeError::InvalidField(Field::Phase))
)]
fn test_rejected_commands(#[case] line: &str, #[case] expected: Command) {
    assert_eq!(decode_command(line.as_bytes()), expected);
}

#[test]
fn test_first_invalid_field_wins() {
    // enable_out is checked before frequency, frequency before phase
    let line = json!({
        "command_number": 20,
        "phase": "x",
        "frequency": "y",
        "enable_out": "z"
    });
    assert_eq!(
        decode_command(line.to_string().as_bytes()),
        reject(20, DecodeError::InvalidField(Field::EnableOut))
    );

    let line = json!({ "command_number": 21, "phase": "x", "frequency": "y" });
    assert_eq!(
        decode_command(line.to_string().as_bytes()),
        reject(21, DecodeError::InvalidField(Field::Frequency))
    );
}

#[rstest]
#[case(DecodeError::MalformedJson, "Error creating json from command buffer")]
#[case(DecodeError::MissingCommandNumber, "Error parsing command number")]
#[case(DecodeError::InvalidField(Field::EnableOut), "Error parsing enable flag.")]
#[case(DecodeError::InvalidField(Field::Frequency), "Error parsing frequency.")]
#[case(DecodeError::InvalidField(Field::Phase), "Error parsing phase")]
fn test_error_report_lines(#[case] error: DecodeError, #[case] message: &str) {
    let report = Report::Error {
        command_number: 1,
        error,
    };
    assert_eq!(
        report.to_string(),
        format!("{{  \"command_number\":1,  \"error\":\"{}\"}}", message)
    );
}
