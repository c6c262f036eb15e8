use emuchip::{
    display::WIDTH,
    memory::{MAX_PROGRAM_SIZE, PROGRAM_START},
    registers::FLAG,
    DecodeError, Emulator, LoadError, StepError,
};
use test_log::test;

fn assemble(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

fn boot(words: &[u16]) -> Emulator {
    Emulator::with_seed(&assemble(words), 0).unwrap()
}

#[test]
fn program_image_size_limit() {
    assert!(Emulator::new(&vec![0x12; MAX_PROGRAM_SIZE]).is_ok());
    assert_eq!(
        Emulator::new(&vec![0x12; MAX_PROGRAM_SIZE + 1]).err(),
        Some(LoadError::ProgramTooLarge {
            size: MAX_PROGRAM_SIZE + 1,
            max_size: MAX_PROGRAM_SIZE,
        })
    );
}

#[test]
fn image_is_loaded_verbatim_after_the_font() {
    let emu = Emulator::new(&[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
    let start = PROGRAM_START as usize;
    assert_eq!(&emu.memory()[start..start + 4], &[0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(emu.memory()[0], 0xF0);
    assert!(emu.memory()[80..start].iter().all(|&b| b == 0));
}

#[test]
fn nested_subroutines_return_in_order() {
    // 200: CALL 208        208: V0 += 1
    // 202: V1 = 0xAA       20A: CALL 210
    // 204: JP 204          20C: RET
    // 206: -               20E: -
    //                      210: V0 += 1; RET
    let mut emu = boot(&[
        0x2208, 0x61AA, 0x1204, 0x0000, 0x7001, 0x2210, 0x00EE, 0x0000, 0x7001, 0x00EE,
    ]);
    for _ in 0..8 {
        emu.step().unwrap();
    }
    assert_eq!(emu.register(0), 2);
    assert_eq!(emu.register(1), 0xAA);
    assert_eq!(emu.pc(), 0x204);
    assert_eq!(emu.stack_depth(), 0);
}

#[test]
fn prints_a_digit_with_bcd_and_font() {
    // V0 = 137, store its digits at 0x300, load them into V0..V2,
    // then draw the hundreds digit at (0, 0)
    let mut emu = boot(&[
        0x6089, 0xA300, 0xF033, 0xF265, 0xF029, 0x6300, 0xD335,
    ]);
    for _ in 0..7 {
        emu.step().unwrap();
    }
    assert_eq!((emu.register(0), emu.register(1), emu.register(2)), (1, 3, 7));
    assert_eq!(emu.index(), 5);

    // glyph "1" is 0x20 0x60 0x20 0x20 0x70
    let fb = emu.framebuffer();
    let row = |y: usize| -> Vec<bool> { (0..8).map(|x| fb.pixel(x, y)).collect() };
    assert_eq!(row(0), [false, false, true, false, false, false, false, false]);
    assert_eq!(row(4), [false, true, true, true, false, false, false, false]);
    assert!(emu.draw_needed());
    assert_eq!(emu.register(FLAG), 0);
}

#[test]
fn sprite_at_the_corner_wraps_to_all_four_corners() {
    let mut emu = boot(&[0x603F, 0x611F, 0xA20A, 0xD012, 0x120A, 0xC0C0]);
    for _ in 0..4 {
        emu.step().unwrap();
    }
    let fb = emu.framebuffer();
    assert!(fb.pixel(WIDTH - 1, 31));
    assert!(fb.pixel(0, 31));
    assert!(fb.pixel(WIDTH - 1, 0));
    assert!(fb.pixel(0, 0));
    assert_eq!(fb.pixels().iter().filter(|&&p| p != 0).count(), 4);
}

#[test]
fn bad_words_are_skipped_and_execution_continues() {
    let mut emu = boot(&[0x0123, 0xE0FF, 0x6007]);
    assert_eq!(
        emu.step(),
        Err(StepError::Decode(DecodeError::UnknownOpcode {
            word: 0x0123,
            addr: 0x200,
        }))
    );
    let err = emu.step().unwrap_err();
    assert_eq!((err.word(), err.addr()), (0xE0FF, 0x202));
    emu.step().unwrap();
    assert_eq!(emu.register(0), 7);
    assert_eq!(emu.pc(), 0x206);
}

#[test]
fn key_wait_spans_steps() {
    // wait for a key into V5, then skip if it is still held
    let mut emu = boot(&[0xF50A, 0xE59E, 0x6101, 0x6202]);
    for _ in 0..10 {
        emu.step().unwrap();
    }
    assert_eq!(emu.pc(), 0x200);
    assert_eq!(emu.awaiting_key(), Some(5));

    emu.set_key(0x9, true);
    emu.step().unwrap();
    assert_eq!(emu.register(5), 0x9);
    assert_eq!(emu.pc(), 0x202);

    emu.step().unwrap();
    assert_eq!(emu.pc(), 0x206);
    emu.step().unwrap();
    assert_eq!(emu.register(2), 2);
    assert_eq!(emu.register(1), 0);
}

#[test]
fn delay_loop_is_driven_by_ticks_not_steps() {
    // DT = 3; loop until DT reads zero
    let mut emu = boot(&[0x6003, 0xF015, 0xF107, 0x3100, 0x1204, 0x6A01]);
    for _ in 0..100 {
        emu.step().unwrap();
    }
    assert_eq!(emu.register(0xA), 0);
    assert_eq!(emu.delay_timer(), 3);

    for _ in 0..3 {
        emu.tick_timers();
    }
    for _ in 0..4 {
        emu.step().unwrap();
    }
    assert_eq!(emu.register(0xA), 1);
}

#[test]
fn sixty_ticks_empty_a_one_second_timer() {
    let mut emu = boot(&[0x603C, 0xF015]);
    emu.step().unwrap();
    emu.step().unwrap();
    for _ in 0..60 {
        emu.tick_timers();
    }
    assert_eq!(emu.delay_timer(), 0);
    emu.tick_timers();
    assert_eq!(emu.delay_timer(), 0);
}
