use log::{debug, trace, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    decode::{AluOp, KeyOp, MiscOp, OpCodes, SystemOp},
    display::FrameBuffer,
    error::{LoadError, StepError},
    keyboard::{Keyboard, KEY_COUNT},
    memory::{glyph_addr, Memory, TypeAddr},
    registers::{Registers, FLAG},
    timer::Timer,
};

/// The whole machine. The host drives it through two independent cadences:
/// [`Emulator::step`] at the instruction clock and [`Emulator::tick_timers`]
/// at 60 Hz.
pub struct Emulator {
    fb: FrameBuffer,
    regs: Registers,
    mem: Memory,
    keys: Keyboard,
    delay_timer: Timer,
    sound_timer: Timer,
    // FX0A in progress, holding the destination register
    awaiting_key: Option<u8>,
    rng: StdRng,
}

impl Emulator {
    pub fn new(program: &[u8]) -> Result<Self, LoadError> {
        Self::with_rng(program, StdRng::from_entropy())
    }

    /// Same as [`Emulator::new`] but with a reproducible CXNN sequence.
    pub fn with_seed(program: &[u8], seed: u64) -> Result<Self, LoadError> {
        Self::with_rng(program, StdRng::seed_from_u64(seed))
    }

    fn with_rng(program: &[u8], rng: StdRng) -> Result<Self, LoadError> {
        let mut mem = Memory::new();
        mem.load_rom(program)?;

        Ok(Self {
            fb: FrameBuffer::new(),
            regs: Registers::new(),
            mem,
            keys: Keyboard::new(),
            delay_timer: Timer::default(),
            sound_timer: Timer::default(),
            awaiting_key: None,
            rng,
        })
    }

    pub fn set_keys(&mut self, keys: [bool; KEY_COUNT]) {
        self.keys.set_all(keys);
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) {
        self.keys.update_key(key, pressed);
    }

    /// Executes one instruction, or polls the keypad while FX0A is pending.
    ///
    /// Errors are recoverable: the offending word has been skipped and the
    /// machine is otherwise untouched, so the caller can keep stepping.
    pub fn step(&mut self) -> Result<(), StepError> {
        if let Some(vx) = self.awaiting_key {
            self.poll_key(vx);
            return Ok(());
        }

        let addr = self.mem.pc.0;
        let word = self.mem.current_instruction();
        let result = OpCodes::decode_raw(word, addr)
            .map_err(StepError::from)
            .and_then(|op| {
                trace!("{addr:#05X}: {word:04X}  {op}");
                self.execute_ins(op, word, addr)
            });

        if let Err(err) = &result {
            warn!("{err}");
            self.mem.set_pc(addr.wrapping_add(2));
        }
        result
    }

    /// Counts both timers down by one. Returns true when the sound timer
    /// ran out on this tick, i.e. the tone should stop now.
    pub fn tick_timers(&mut self) -> bool {
        self.delay_timer.tick();
        self.sound_timer.tick()
    }

    fn poll_key(&mut self, vx: u8) {
        if let Some(key) = self.keys.first_pressed() {
            debug!("key {key:X} pressed, resuming into V{vx:X}");
            self.regs.set_register(vx, key);
            self.awaiting_key = None;
            self.mem.increment_pc();
        }
    }

    fn execute_ins(&mut self, ins: OpCodes, word: u16, addr: TypeAddr) -> Result<(), StepError> {
        match ins {
            OpCodes::System(SystemOp::ClearScreen) => {
                self.fb.clear_buffer();
            }
            OpCodes::System(SystemOp::PopSubroutine) => {
                let ret = self
                    .mem
                    .stack
                    .pop()
                    .ok_or(StepError::StackUnderflow { word, addr })?;
                // the saved address already points past the call
                self.mem.set_pc(ret);
                return Ok(());
            }
            OpCodes::Jump(nnn) => {
                self.mem.set_pc(nnn);
                return Ok(());
            }
            OpCodes::PushSubroutine(nnn) => {
                // store the instruction after the call to return back
                if !self.mem.stack.push(addr.wrapping_add(2)) {
                    return Err(StepError::StackOverflow { word, addr });
                }
                self.mem.set_pc(nnn);
                return Ok(());
            }
            OpCodes::SkipEqualConstant(vx, nn) => {
                if self.regs.get(vx) == nn {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipNotEqualConstant(vx, nn) => {
                if self.regs.get(vx) != nn {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipEqualRegister(vx, vy) => {
                if self.regs.get(vx) == self.regs.get(vy) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SetRegister(vx, nn) => {
                self.regs.set_register(vx, nn);
            }
            OpCodes::AddToRegister(vx, nn) => {
                self.regs.add_to_register(vx, nn);
            }
            OpCodes::Alu(op, vx, vy) => self.execute_alu(op, vx, vy),
            OpCodes::SkipNotEqualRegister(vx, vy) => {
                if self.regs.get(vx) != self.regs.get(vy) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SetIndexRegister(nnn) => self.mem.set_index(nnn),
            OpCodes::JumpWithOffset(nnn) => {
                self.mem.set_pc(nnn + self.regs.get(0) as TypeAddr);
                return Ok(());
            }
            OpCodes::Random(vx, nn) => {
                let ransuu: u8 = self.rng.gen_range(0..=255);
                self.regs.set_register(vx, nn & ransuu);
            }
            OpCodes::Display(reg_x, reg_y, height) => {
                let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
                // From I to I + N, 8 pixels wide because u8
                let base = self.mem.index.0;
                let sprite: Vec<u8> = (0..height as TypeAddr)
                    .map(|row| self.mem.get(base.wrapping_add(row)))
                    .collect();

                let vf = self.fb.paint(x, y, &sprite);
                self.regs.set_flag(vf);
            }
            OpCodes::Key(op, vx) => {
                let pressed = self.keys.get_key_status_from_num(self.regs.get(vx));
                let skip = match op {
                    KeyOp::SkipIfPressed => pressed,
                    KeyOp::SkipIfNotPressed => !pressed,
                };
                if skip {
                    self.mem.increment_pc();
                }
            }
            OpCodes::Misc(op, vx) => {
                if !self.execute_misc(op, vx) {
                    // FX0A with nothing held: stay on this word
                    return Ok(());
                }
            }
        }
        self.mem.increment_pc();
        Ok(())
    }

    fn execute_alu(&mut self, op: AluOp, vx: u8, vy: u8) {
        let (x, y) = (self.regs.get(vx), self.regs.get(vy));
        match op {
            AluOp::CopyRegister => self.regs.set_register(vx, y),
            AluOp::Or => self.regs.set_register(vx, x | y),
            AluOp::And => self.regs.set_register(vx, x & y),
            AluOp::XOr => self.regs.set_register(vx, x ^ y),
            // the flag is written last so it wins when VX is VF
            AluOp::Add => {
                let (z, carry) = x.overflowing_add(y);
                self.regs.set_register(vx, z);
                self.regs.set_flag(carry);
            }
            AluOp::SubtractForward => {
                self.regs.set_register(vx, x.wrapping_sub(y));
                self.regs.set_flag(x >= y); // no borrow
            }
            AluOp::SubtractBackward => {
                self.regs.set_register(vx, y.wrapping_sub(x));
                self.regs.set_flag(y >= x); // no borrow
            }
            AluOp::RightShift => {
                self.regs.set_register(vx, x >> 1);
                self.regs.set_register(FLAG, x & 1);
            }
            AluOp::LeftShift => {
                self.regs.set_register(vx, x << 1);
                self.regs.set_register(FLAG, (x >> 7) & 1);
            }
        }
    }

    // returns false when the program counter must not advance
    fn execute_misc(&mut self, op: MiscOp, vx: u8) -> bool {
        let index = self.mem.index.0;
        match op {
            MiscOp::CopyDelayToRegister => self.regs.set_register(vx, self.delay_timer.count),
            MiscOp::GetKey => match self.keys.first_pressed() {
                Some(key) => self.regs.set_register(vx, key),
                None => {
                    debug!("waiting for a key into V{vx:X}");
                    self.awaiting_key = Some(vx);
                    return false;
                }
            },
            MiscOp::CopyRegisterToDelay => self.delay_timer.set(self.regs.get(vx)),
            MiscOp::CopyRegisterToSound => self.sound_timer.set(self.regs.get(vx)),
            // no VF side effect on overflow
            MiscOp::AddToIndex => self
                .mem
                .set_index(index.wrapping_add(self.regs.get(vx) as TypeAddr)),
            MiscOp::PointChar => self.mem.set_index(glyph_addr(self.regs.get(vx))),
            MiscOp::ToDecimal => {
                let value = self.regs.get(vx);
                let digits = [value / 100, (value / 10) % 10, value % 10];
                for (i, digit) in digits.into_iter().enumerate() {
                    self.mem.set(index.wrapping_add(i as TypeAddr), digit);
                }
            }
            MiscOp::StoreRegisterToMemory => {
                for reg in 0..=vx {
                    self.mem
                        .set(index.wrapping_add(reg as TypeAddr), self.regs.get(reg));
                }
            }
            MiscOp::LoadRegisterFromMemory => {
                for reg in 0..=vx {
                    let reg_val = self.mem.get(index.wrapping_add(reg as TypeAddr));
                    self.regs.set_register(reg, reg_val);
                }
            }
        }
        true
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn draw_needed(&self) -> bool {
        self.fb.is_dirty()
    }

    pub fn clear_draw_flag(&mut self) {
        self.fb.mark_clean();
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer.count
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer.count
    }

    pub fn tone_active(&self) -> bool {
        self.sound_timer.is_active()
    }

    pub fn pc(&self) -> TypeAddr {
        self.mem.pc.0
    }

    pub fn index(&self) -> TypeAddr {
        self.mem.index.0
    }

    pub fn register(&self, reg_num: u8) -> u8 {
        self.regs.get(reg_num)
    }

    pub fn memory(&self) -> &[u8] {
        self.mem.bytes()
    }

    pub fn stack_depth(&self) -> usize {
        self.mem.stack.depth()
    }

    pub fn awaiting_key(&self) -> Option<u8> {
        self.awaiting_key
    }
}
