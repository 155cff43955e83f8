use crate::{
    ALPHABET, ALPHABET_LEN, CodeGenerator, Error, MAX_CODE_LENGTH, OsRandom, RandSource, Result,
    TimeSource, clamp_length,
};
use chrono::{DateTime, Duration, Local, TimeZone};
use std::collections::HashSet;

struct MockTime {
    now: DateTime<Local>,
}

impl TimeSource for MockTime {
    fn now(&self) -> DateTime<Local> {
        self.now
    }
}

fn mock_time(subsec_nanos: i64) -> MockTime {
    let base = Local.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    MockTime {
        now: base + Duration::nanoseconds(subsec_nanos),
    }
}

struct FixedRand(u32);

impl RandSource for FixedRand {
    fn try_next_u32(&self) -> Result<u32> {
        Ok(self.0)
    }
}

struct BrokenRand;

impl RandSource for BrokenRand {
    fn try_next_u32(&self) -> Result<u32> {
        Err(Error::CodeGeneration {
            reason: "entropy source unavailable".to_string(),
        })
    }
}

#[test]
fn alphabet_holds_open_syllables_then_digits() {
    assert_eq!(ALPHABET_LEN, 409);
    assert_eq!(ALPHABET[0], '가');
    assert_eq!(ALPHABET[1], '개');
    assert_eq!(ALPHABET[21], '까');
    assert_eq!(ALPHABET[398], '히');
    assert_eq!(ALPHABET[399], '0');
    assert_eq!(ALPHABET[408], '9');

    let distinct: HashSet<char> = ALPHABET.iter().copied().collect();
    assert_eq!(distinct.len(), ALPHABET_LEN);
}

#[test]
fn long_codes_start_with_time_prefix() {
    let generator = CodeGenerator::new(FixedRand(0), mock_time(123_456_789));
    let code = generator.generate(10).unwrap();
    assert_eq!(code, "789가가가가가가가");
}

#[test]
fn time_prefix_is_zero_padded() {
    let generator = CodeGenerator::new(FixedRand(399), mock_time(1_000_007));
    let code = generator.generate(6).unwrap();
    assert_eq!(code, "007000");
}

#[test]
fn short_codes_have_no_prefix() {
    let generator = CodeGenerator::new(FixedRand(398), mock_time(555));
    assert_eq!(generator.generate(5).unwrap(), "히히히히히");
    assert_eq!(generator.generate(1).unwrap(), "히");
}

#[test]
fn out_of_range_lengths_are_clamped() {
    assert_eq!(clamp_length(0), MAX_CODE_LENGTH);
    assert_eq!(clamp_length(11), MAX_CODE_LENGTH);
    assert_eq!(clamp_length(usize::MAX), MAX_CODE_LENGTH);
    assert_eq!(clamp_length(7), 7);

    let generator = CodeGenerator::new(FixedRand(0), mock_time(0));
    assert_eq!(generator.generate(0).unwrap().chars().count(), MAX_CODE_LENGTH);
    assert_eq!(generator.generate(64).unwrap().chars().count(), MAX_CODE_LENGTH);
}

#[test]
fn broken_random_source_is_reported() {
    let generator = CodeGenerator::new(BrokenRand, mock_time(0));
    let err = generator.generate(10).unwrap_err();
    assert!(matches!(err, Error::CodeGeneration { .. }));
    assert_eq!(
        err.to_string(),
        "failed to generate coupon code: entropy source unavailable"
    );
}

#[test]
fn os_random_codes_use_the_alphabet() {
    let generator = CodeGenerator::new(OsRandom, mock_time(42));
    let allowed: HashSet<char> = ALPHABET.iter().copied().collect();

    for _ in 0..256 {
        let code = generator.generate(MAX_CODE_LENGTH).unwrap();
        let symbols: Vec<char> = code.chars().collect();
        assert_eq!(symbols.len(), MAX_CODE_LENGTH);
        assert_eq!(&symbols[..3], &['0', '4', '2']);
        assert!(symbols[3..].iter().all(|c| allowed.contains(c)));
    }
}
