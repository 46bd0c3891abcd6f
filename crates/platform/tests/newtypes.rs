//! Type system enforcement tests for sensor newtypes.
//! An out-of-range gain must be unrepresentable before it reaches CONTROL.
#![allow(clippy::unwrap_used)]

// ── Gain ─────────────────────────────────────────────────────────────────────

#[test]
fn gain_accepts_each_register_value() {
    use platform::Gain;
    assert_eq!(Gain::try_from(0_i32), Ok(Gain::X1));
    assert_eq!(Gain::try_from(1_i32), Ok(Gain::X4));
    assert_eq!(Gain::try_from(2_i32), Ok(Gain::X16));
    assert_eq!(Gain::try_from(3_i32), Ok(Gain::X60));
}

#[test]
fn gain_rejects_four_and_above() {
    use platform::Gain;
    let err = Gain::try_from(4_i32).unwrap_err();
    assert_eq!((err.value, err.min, err.max), (4, 0, 3));
    assert!(Gain::try_from(i32::MAX).is_err());
}

#[test]
fn gain_rejects_negative_without_wrapping() {
    use platform::Gain;
    // -253 as u8 would be 3 (X60) if narrowed first
    let err = Gain::try_from(-253_i32).unwrap_err();
    assert_eq!(err.value, -253);
}

#[test]
fn gain_multipliers_match_datasheet() {
    use platform::Gain;
    let m: Vec<u8> = Gain::ALL.iter().map(|g| g.multiplier()).collect();
    assert_eq!(m, vec![1, 4, 16, 60]);
}

#[test]
fn gain_is_one_byte() {
    use platform::Gain;
    assert_eq!(core::mem::size_of::<Gain>(), 1);
}

#[test]
fn gain_display_shows_multiplier() {
    use platform::Gain;
    assert_eq!(Gain::X60.to_string(), "60x");
}

// ── Channel ──────────────────────────────────────────────────────────────────

#[test]
fn channel_registers_match_register_map() {
    use platform::tcs34725::{REG_BDATAL, REG_CDATAL, REG_GDATAL, REG_RDATAL};
    use platform::Channel;
    assert_eq!(Channel::Clear.low_register(), REG_CDATAL);
    assert_eq!(Channel::Red.low_register(), REG_RDATAL);
    assert_eq!(Channel::Green.low_register(), REG_GDATAL);
    assert_eq!(Channel::Blue.low_register(), REG_BDATAL);
}

#[test]
fn channel_register_pairs_do_not_overlap() {
    use platform::Channel;
    let mut regs: Vec<u8> = Channel::ALL
        .iter()
        .flat_map(|c| [c.low_register(), c.high_register()])
        .collect();
    regs.sort_unstable();
    regs.dedup();
    assert_eq!(regs.len(), 8);
}

// ── OutOfRangeError ──────────────────────────────────────────────────────────

#[test]
fn out_of_range_error_display_names_bounds() {
    use platform::Gain;
    let err = Gain::try_from(9_i32).unwrap_err();
    assert_eq!(err.to_string(), "9 is outside 0..=3");
}
