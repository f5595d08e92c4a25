//! Property coverage for arithmetic flags, register block transfers, the
//! call stack, and decoding.

#![allow(clippy::pedantic, clippy::nursery, clippy::cast_possible_truncation)]

use chip8_core::{
    step_one, CallStack, CoreConfig, CoreState, Decoder, FaultCode, HeadlessDisplay, Instruction,
    NoInput, Peripherals, Register, SeededRandom, StepOutcome, STACK_DEPTH_EXTENDED,
};
use log as _;
use proptest::prelude::*;
use rand as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

fn run_words(state: &mut CoreState, config: &CoreConfig, words: &[u16]) -> StepOutcome {
    let image: Vec<u8> = words.iter().flat_map(|word| word.to_be_bytes()).collect();
    state.load_program(&image).expect("program fits");

    let mut display = HeadlessDisplay;
    let mut input = NoInput;
    let mut random = SeededRandom::seeded(0);
    let mut io = Peripherals::new(&mut display, &mut input, &mut random);

    let mut last = StepOutcome::Halted;
    for _ in words {
        last = step_one(state, &mut io, config);
    }
    last
}

fn alu_word(x: u8, y: u8, op: u8) -> u16 {
    0x8000 | u16::from(x) << 8 | u16::from(y) << 4 | u16::from(op)
}

fn register() -> impl Strategy<Value = Register> {
    (0_u8..15).prop_map(Register::from_low_nibble)
}

fn distinct_pair() -> impl Strategy<Value = (Register, Register)> {
    (register(), register()).prop_filter("distinct registers", |(x, y)| x != y)
}

proptest! {
    #[test]
    fn add_reg_carry_matches_wide_sum((x, y) in distinct_pair(), a in any::<u8>(), b in any::<u8>()) {
        let mut state = CoreState::default();
        state.registers.set_v(x, a);
        state.registers.set_v(y, b);

        run_words(&mut state, &CoreConfig::default(), &[alu_word(x as u8, y as u8, 0x4)]);

        let wide = u16::from(a) + u16::from(b);
        prop_assert_eq!(state.registers.v(x), wide as u8);
        prop_assert_eq!(state.registers.flag(), u8::from(wide > 0xFF));
    }

    #[test]
    fn sub_reg_flag_is_no_borrow((x, y) in distinct_pair(), a in any::<u8>(), b in any::<u8>()) {
        let mut state = CoreState::default();
        state.registers.set_v(x, a);
        state.registers.set_v(y, b);

        run_words(&mut state, &CoreConfig::default(), &[alu_word(x as u8, y as u8, 0x5)]);

        prop_assert_eq!(state.registers.v(x), a.wrapping_sub(b));
        prop_assert_eq!(state.registers.flag(), u8::from(a >= b));
    }

    #[test]
    fn shifts_ignore_previous_vx((x, y) in distinct_pair(), vx in any::<u8>(), vy in any::<u8>()) {
        let mut state = CoreState::default();
        state.registers.set_v(x, vx);
        state.registers.set_v(y, vy);
        run_words(&mut state, &CoreConfig::default(), &[alu_word(x as u8, y as u8, 0x6)]);
        prop_assert_eq!(state.registers.v(x), vy >> 1);
        prop_assert_eq!(state.registers.flag(), vy & 1);

        let mut state = CoreState::default();
        state.registers.set_v(x, vx);
        state.registers.set_v(y, vy);
        run_words(&mut state, &CoreConfig::default(), &[alu_word(x as u8, y as u8, 0xE)]);
        prop_assert_eq!(state.registers.v(x), vy << 1);
        prop_assert_eq!(state.registers.flag(), vy >> 7);
    }

    #[test]
    fn flag_wins_when_vf_is_the_destination(
        y in register(),
        a in any::<u8>(),
        b in any::<u8>(),
        op in prop::sample::select(vec![0x4_u8, 0x5, 0x6, 0x7, 0xE]),
    ) {
        let mut state = CoreState::default();
        state.registers.set_v(Register::VF, a);
        state.registers.set_v(y, b);

        run_words(&mut state, &CoreConfig::default(), &[alu_word(0xF, y as u8, op)]);

        let expected = match op {
            0x4 => u8::from(u16::from(a) + u16::from(b) > 0xFF),
            0x5 => u8::from(a >= b),
            0x6 => b & 1,
            0x7 => u8::from(b >= a),
            _ => b >> 7,
        };
        prop_assert_eq!(state.registers.v(Register::VF), expected);
    }

    #[test]
    fn store_then_load_restores_registers(
        x in 0_u8..16,
        values in prop::array::uniform16(any::<u8>()),
        base in 0x300_u16..0xF00,
        increments in any::<bool>(),
    ) {
        let config = CoreConfig {
            store_load_increments_index: increments,
            ..CoreConfig::default()
        };
        let last = Register::from_low_nibble(x);
        let mut state = CoreState::with_config(&config);
        for (reg, value) in Register::ALL.into_iter().zip(values) {
            state.registers.set_v(reg, value);
        }
        state.registers.set_i(base);

        run_words(&mut state, &config, &[0xF055 | u16::from(x) << 8]);

        let stored = state.memory.read_range(base, u16::from(x) + 1).expect("in range").to_vec();
        prop_assert_eq!(&stored[..], &values[..=usize::from(x)]);
        let after_store = if increments { base + u16::from(x) + 1 } else { base };
        prop_assert_eq!(state.registers.i(), after_store);

        for reg in last.through() {
            state.registers.set_v(reg, 0);
        }
        state.registers.set_i(base);
        state.registers.set_pc(0x200);
        run_words(&mut state, &config, &[0xF065 | u16::from(x) << 8]);

        for reg in Register::ALL {
            prop_assert_eq!(state.registers.v(reg), values[reg.index()]);
        }
        prop_assert_eq!(state.registers.i(), after_store);
    }

    #[test]
    fn stack_push_pop_is_lifo(addrs in prop::collection::vec(any::<u16>(), 0..=STACK_DEPTH_EXTENDED)) {
        let mut stack = CallStack::with_capacity(STACK_DEPTH_EXTENDED);
        for &addr in &addrs {
            prop_assert!(stack.push(addr).is_ok());
        }
        prop_assert_eq!(stack.depth(), addrs.len());
        for &addr in addrs.iter().rev() {
            prop_assert_eq!(stack.pop(), Ok(addr));
        }
        prop_assert_eq!(stack.pop(), Err(FaultCode::StackUnderflow));
    }

    #[test]
    fn every_word_decodes_to_itself_or_unknown(word in any::<u16>()) {
        match Decoder::decode(word) {
            Instruction::Unknown(raw) => prop_assert_eq!(raw, word),
            known => {
                prop_assert!(known.encoding().is_some());
                prop_assert_eq!(known.encode(), word);
            }
        }
    }
}
