use bitflags::bitflags;

use crate::cpu_bus::CpuBus;
use crate::memory::{IRQ_VECTOR, NMI_VECTOR, RESET_VECTOR};

pub mod opcodes;

use opcodes::{decode, Mode, Op, ILLEGAL_CYCLES};


bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        const CARRY = 0b00000001;
        const ZERO = 0b00000010;
        const INTERRUPT_DISABLE = 0b00000100;
        const DECIMAL = 0b00001000;
        const BREAK = 0b00010000;
        const UNUSED = 0b00100000;
        const OVERFLOW = 0b01000000;
        const NEGATIVE = 0b10000000;
    }
}

/// Resolved operand location for one instruction. `Accumulator` lets shift
/// and increment handlers treat "operate on A" and "operate on a memory
/// cell" through the same read/write helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    Accumulator,
    Address(u16),
}

pub struct Cpu {
    pub a: u8,   // Accumulator
    pub x: u8,   // X register
    pub y: u8,   // Y register
    pub sp: u8,  // Stack pointer, offset into 0x0100..=0x01FF
    pub pc: u16, // Program counter
    pub status: StatusFlags,
    pub(crate) cycles: u64, // total cycles executed
    pending: u8,            // countdown for the in-flight instruction
    page_crossed: bool,
    extra_cycles: u8, // branch-taken bonus reported by handlers
    pub(crate) halted: bool,
}

impl Cpu {
    pub fn new() -> Self {
        Cpu {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0,
            status: StatusFlags::from_bits_truncate(0x24),
            cycles: 0,
            pending: 0,
            page_crossed: false,
            extra_cycles: 0,
            halted: false,
        }
    }

    /// Restores power-on register state and loads `pc` from the little-endian
    /// reset vector at 0xFFFC/0xFFFD.
    pub fn reset(&mut self, bus: &mut dyn CpuBus) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = 0xFD;
        self.status = StatusFlags::from_bits_truncate(0x24);
        self.pc = bus.read_u16(RESET_VECTOR);
        self.halted = false;
        self.pending = 7;
    }

    /// Explicit program-counter seeding, for hosts that start execution at a
    /// fixed debug address instead of the reset vector.
    pub fn set_pc(&mut self, addr: u16) {
        self.pc = addr;
    }

    pub fn status_byte(&self) -> u8 {
        self.status.bits()
    }

    pub fn set_status_byte(&mut self, value: u8) {
        self.status = StatusFlags::from_bits_truncate(value);
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// True after BRK or an undefined opcode; `tick` becomes a no-op until
    /// the next `reset`.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Advances the core by one clock cycle: burns down the in-flight
    /// instruction's countdown, or fetches and executes the next instruction
    /// and re-arms it.
    pub fn tick(&mut self, bus: &mut dyn CpuBus) {
        if self.pending > 0 {
            self.pending -= 1;
            return;
        }
        if self.halted {
            return;
        }
        let spent = self.step(bus);
        // The executing tick itself counts as the first cycle.
        self.pending = spent.saturating_sub(1);
    }

    /// Executes exactly one instruction and returns its full cycle cost
    /// (base cycles plus branch and page-cross penalties). Returns 0 when
    /// halted.
    pub fn step(&mut self, bus: &mut dyn CpuBus) -> u8 {
        if self.halted {
            return 0;
        }

        let opcode = bus.read(self.pc);
        let (op, mode, base) = decode(opcode);
        if base == ILLEGAL_CYCLES {
            log::error!(
                "undefined opcode 0x{:02X} at PC 0x{:04X}, halting",
                opcode,
                self.pc
            );
            self.halted = true;
            return 0;
        }

        self.page_crossed = false;
        self.extra_cycles = 0;

        // Resolve before advancing past the operand bytes; handlers that
        // rewrite pc (branches, JSR) rely on seeing the already-advanced
        // value afterwards.
        let operand = self.resolve(bus, mode);
        self.pc = self.pc.wrapping_add(1 + mode.operand_len());
        self.execute(op, operand, bus);

        let mut total = base + self.extra_cycles;
        if self.page_crossed && op.page_penalty() {
            total += 1;
        }
        self.cycles += total as u64;
        total
    }

    /// Non-maskable interrupt entry: push pc and status, jump through the
    /// vector at 0xFFFA.
    pub fn nmi(&mut self, bus: &mut dyn CpuBus) {
        self.push(bus, (self.pc >> 8) as u8);
        self.push(bus, self.pc as u8);
        self.push(
            bus,
            (self.status.bits() | StatusFlags::UNUSED.bits()) & !StatusFlags::BREAK.bits(),
        );
        self.status.insert(StatusFlags::INTERRUPT_DISABLE);
        self.pc = bus.read_u16(NMI_VECTOR);
        self.cycles += 7;
    }

    /// Maskable interrupt entry; suppressed while the interrupt-disable flag
    /// is set.
    pub fn irq(&mut self, bus: &mut dyn CpuBus) {
        if self.status.contains(StatusFlags::INTERRUPT_DISABLE) {
            return;
        }
        self.push(bus, (self.pc >> 8) as u8);
        self.push(bus, self.pc as u8);
        self.push(
            bus,
            (self.status.bits() | StatusFlags::UNUSED.bits()) & !StatusFlags::BREAK.bits(),
        );
        self.status.insert(StatusFlags::INTERRUPT_DISABLE);
        self.pc = bus.read_u16(IRQ_VECTOR);
        self.cycles += 7;
    }

    // ------------------------------------------------------------------
    // Addressing-mode resolution
    // ------------------------------------------------------------------

    /// Computes the effective operand location for `mode`, reading operand
    /// bytes from the locations following the opcode at `pc`. Sets
    /// `page_crossed` for the indexed modes that can cross a page.
    fn resolve(&mut self, bus: &mut dyn CpuBus, mode: Mode) -> Operand {
        let base = self.pc.wrapping_add(1);
        match mode {
            Mode::Implied => Operand::None,
            Mode::Accumulator => Operand::Accumulator,
            // The value is used in place: the effective address is the
            // operand byte's own location.
            Mode::Immediate => Operand::Address(base),
            Mode::ZeroPage => Operand::Address(bus.read(base) as u16),
            Mode::ZeroPageX => {
                // Index addition wraps within the zero page.
                Operand::Address(bus.read(base).wrapping_add(self.x) as u16)
            }
            Mode::ZeroPageY => Operand::Address(bus.read(base).wrapping_add(self.y) as u16),
            Mode::Absolute => Operand::Address(bus.read_u16(base)),
            Mode::AbsoluteX => {
                let ptr = bus.read_u16(base);
                let addr = ptr.wrapping_add(self.x as u16);
                self.page_crossed = (ptr & 0xFF00) != (addr & 0xFF00);
                Operand::Address(addr)
            }
            Mode::AbsoluteY => {
                let ptr = bus.read_u16(base);
                let addr = ptr.wrapping_add(self.y as u16);
                self.page_crossed = (ptr & 0xFF00) != (addr & 0xFF00);
                Operand::Address(addr)
            }
            Mode::IndexedIndirect => {
                let zp = bus.read(base).wrapping_add(self.x);
                let lo = bus.read(zp as u16) as u16;
                let hi = bus.read(zp.wrapping_add(1) as u16) as u16;
                Operand::Address((hi << 8) | lo)
            }
            Mode::ZeroPageIndirect => {
                let zp = bus.read(base);
                let lo = bus.read(zp as u16) as u16;
                let hi = bus.read(zp.wrapping_add(1) as u16) as u16;
                Operand::Address((hi << 8) | lo)
            }
            Mode::IndirectIndexed => {
                let zp = bus.read(base);
                let lo = bus.read(zp as u16) as u16;
                let hi = bus.read(zp.wrapping_add(1) as u16) as u16;
                let ptr = (hi << 8) | lo;
                let addr = ptr.wrapping_add(self.y as u16);
                self.page_crossed = (ptr & 0xFF00) != (addr & 0xFF00);
                Operand::Address(addr)
            }
            Mode::AbsoluteIndirect => {
                let ptr = bus.read_u16(base);
                Operand::Address(bus.read_u16(ptr))
            }
            Mode::AbsoluteIndirectX => {
                let ptr = bus.read_u16(base).wrapping_add(self.x as u16);
                Operand::Address(bus.read_u16(ptr))
            }
            Mode::Relative => {
                let offset = bus.read(base) as i8;
                // Target is relative to pc after both instruction bytes.
                Operand::Address(self.pc.wrapping_add(2).wrapping_add(offset as u16))
            }
        }
    }

    // ------------------------------------------------------------------
    // Operation dispatch
    // ------------------------------------------------------------------

    fn execute(&mut self, op: Op, operand: Operand, bus: &mut dyn CpuBus) {
        match op {
            Op::Lda => {
                self.a = self.read_operand(bus, operand);
                self.set_zero_negative_flags(self.a);
            }
            Op::Ldx => {
                self.x = self.read_operand(bus, operand);
                self.set_zero_negative_flags(self.x);
            }
            Op::Ldy => {
                self.y = self.read_operand(bus, operand);
                self.set_zero_negative_flags(self.y);
            }
            Op::Sta => self.write_operand(bus, operand, self.a),
            Op::Stx => self.write_operand(bus, operand, self.x),
            Op::Sty => self.write_operand(bus, operand, self.y),
            Op::Stz => self.write_operand(bus, operand, 0),

            Op::Adc => {
                let value = self.read_operand(bus, operand);
                self.adc(value);
            }
            Op::Sbc => {
                let value = self.read_operand(bus, operand);
                self.sbc(value);
            }
            Op::And => {
                let value = self.read_operand(bus, operand);
                self.a &= value;
                self.set_zero_negative_flags(self.a);
            }
            Op::Ora => {
                let value = self.read_operand(bus, operand);
                self.a |= value;
                self.set_zero_negative_flags(self.a);
            }
            Op::Eor => {
                let value = self.read_operand(bus, operand);
                self.a ^= value;
                self.set_zero_negative_flags(self.a);
            }
            Op::Cmp => {
                let value = self.read_operand(bus, operand);
                self.compare(self.a, value);
            }
            Op::Cpx => {
                let value = self.read_operand(bus, operand);
                self.compare(self.x, value);
            }
            Op::Cpy => {
                let value = self.read_operand(bus, operand);
                self.compare(self.y, value);
            }
            Op::Bit => {
                let value = self.read_operand(bus, operand);
                self.status.set(StatusFlags::ZERO, value & self.a == 0);
                self.status.set(StatusFlags::NEGATIVE, value & 0x80 != 0);
                self.status.set(StatusFlags::OVERFLOW, value & 0x40 != 0);
            }
            Op::Tsb => {
                let value = self.read_operand(bus, operand);
                self.status.set(StatusFlags::ZERO, value & self.a == 0);
                self.write_operand(bus, operand, value | self.a);
            }
            Op::Trb => {
                let value = self.read_operand(bus, operand);
                self.status.set(StatusFlags::ZERO, value & self.a == 0);
                self.write_operand(bus, operand, value & !self.a);
            }

            Op::Asl => {
                let value = self.read_operand(bus, operand);
                self.status.set(StatusFlags::CARRY, value & 0x80 != 0);
                let result = value << 1;
                self.set_zero_negative_flags(result);
                self.write_operand(bus, operand, result);
            }
            Op::Lsr => {
                let value = self.read_operand(bus, operand);
                self.status.set(StatusFlags::CARRY, value & 0x01 != 0);
                let result = value >> 1;
                self.set_zero_negative_flags(result);
                self.write_operand(bus, operand, result);
            }
            Op::Rol => {
                let value = self.read_operand(bus, operand);
                let carry_in = self.status.contains(StatusFlags::CARRY) as u8;
                self.status.set(StatusFlags::CARRY, value & 0x80 != 0);
                let result = (value << 1) | carry_in;
                self.set_zero_negative_flags(result);
                self.write_operand(bus, operand, result);
            }
            Op::Ror => {
                let value = self.read_operand(bus, operand);
                let carry_in = self.status.contains(StatusFlags::CARRY) as u8;
                self.status.set(StatusFlags::CARRY, value & 0x01 != 0);
                let result = (value >> 1) | (carry_in << 7);
                self.set_zero_negative_flags(result);
                self.write_operand(bus, operand, result);
            }

            Op::Inc => {
                let result = self.read_operand(bus, operand).wrapping_add(1);
                self.set_zero_negative_flags(result);
                self.write_operand(bus, operand, result);
            }
            Op::Dec => {
                let result = self.read_operand(bus, operand).wrapping_sub(1);
                self.set_zero_negative_flags(result);
                self.write_operand(bus, operand, result);
            }
            Op::Inx => {
                self.x = self.x.wrapping_add(1);
                self.set_zero_negative_flags(self.x);
            }
            Op::Iny => {
                self.y = self.y.wrapping_add(1);
                self.set_zero_negative_flags(self.y);
            }
            Op::Dex => {
                self.x = self.x.wrapping_sub(1);
                self.set_zero_negative_flags(self.x);
            }
            Op::Dey => {
                self.y = self.y.wrapping_sub(1);
                self.set_zero_negative_flags(self.y);
            }

            Op::Bpl => self.branch(operand, !self.status.contains(StatusFlags::NEGATIVE)),
            Op::Bmi => self.branch(operand, self.status.contains(StatusFlags::NEGATIVE)),
            Op::Bvc => self.branch(operand, !self.status.contains(StatusFlags::OVERFLOW)),
            Op::Bvs => self.branch(operand, self.status.contains(StatusFlags::OVERFLOW)),
            Op::Bcc => self.branch(operand, !self.status.contains(StatusFlags::CARRY)),
            Op::Bcs => self.branch(operand, self.status.contains(StatusFlags::CARRY)),
            Op::Bne => self.branch(operand, !self.status.contains(StatusFlags::ZERO)),
            Op::Beq => self.branch(operand, self.status.contains(StatusFlags::ZERO)),
            Op::Bra => self.branch(operand, true),

            Op::Jmp => {
                if let Operand::Address(addr) = operand {
                    self.pc = addr;
                }
            }
            Op::Jsr => {
                if let Operand::Address(addr) = operand {
                    // Return address points at the last byte of the JSR
                    // instruction; RTS adds the 1 back.
                    let return_addr = self.pc.wrapping_sub(1);
                    self.push(bus, (return_addr >> 8) as u8);
                    self.push(bus, return_addr as u8);
                    self.pc = addr;
                }
            }
            Op::Rts => {
                let lo = self.pull(bus) as u16;
                let hi = self.pull(bus) as u16;
                self.pc = ((hi << 8) | lo).wrapping_add(1);
            }
            Op::Rti => {
                let flags = self.pull(bus);
                self.status = StatusFlags::from_bits_truncate(flags);
                self.status.insert(StatusFlags::UNUSED);
                self.status.remove(StatusFlags::BREAK);
                let lo = self.pull(bus) as u16;
                let hi = self.pull(bus) as u16;
                self.pc = (hi << 8) | lo;
            }
            Op::Brk => {
                // Break condition halts further fetch; the host observes it
                // through `is_halted`. Vector dispatch is the host's problem.
                self.status.insert(StatusFlags::BREAK);
                self.halted = true;
            }

            Op::Pha => self.push(bus, self.a),
            Op::Phx => self.push(bus, self.x),
            Op::Phy => self.push(bus, self.y),
            Op::Php => {
                let bits =
                    self.status.bits() | StatusFlags::BREAK.bits() | StatusFlags::UNUSED.bits();
                self.push(bus, bits);
            }
            Op::Pla => {
                self.a = self.pull(bus);
                self.set_zero_negative_flags(self.a);
            }
            Op::Plx => {
                self.x = self.pull(bus);
                self.set_zero_negative_flags(self.x);
            }
            Op::Ply => {
                self.y = self.pull(bus);
                self.set_zero_negative_flags(self.y);
            }
            Op::Plp => {
                let flags = self.pull(bus);
                self.status = StatusFlags::from_bits_truncate(flags);
                self.status.insert(StatusFlags::UNUSED);
                self.status.remove(StatusFlags::BREAK);
            }

            Op::Tax => {
                self.x = self.a;
                self.set_zero_negative_flags(self.x);
            }
            Op::Tay => {
                self.y = self.a;
                self.set_zero_negative_flags(self.y);
            }
            Op::Txa => {
                self.a = self.x;
                self.set_zero_negative_flags(self.a);
            }
            Op::Tya => {
                self.a = self.y;
                self.set_zero_negative_flags(self.a);
            }
            Op::Tsx => {
                self.x = self.sp;
                self.set_zero_negative_flags(self.x);
            }
            Op::Txs => self.sp = self.x,

            Op::Clc => self.status.remove(StatusFlags::CARRY),
            Op::Sec => self.status.insert(StatusFlags::CARRY),
            Op::Cli => self.status.remove(StatusFlags::INTERRUPT_DISABLE),
            Op::Sei => self.status.insert(StatusFlags::INTERRUPT_DISABLE),
            Op::Cld => self.status.remove(StatusFlags::DECIMAL),
            Op::Sed => self.status.insert(StatusFlags::DECIMAL),
            Op::Clv => self.status.remove(StatusFlags::OVERFLOW),

            Op::Nop => {}
        }
    }

    // ------------------------------------------------------------------
    // Shared helpers
    // ------------------------------------------------------------------

    fn read_operand(&mut self, bus: &mut dyn CpuBus, operand: Operand) -> u8 {
        match operand {
            Operand::Accumulator => self.a,
            Operand::Address(addr) => bus.read(addr),
            // Not reachable through the dispatch tables: implied operations
            // never read an operand.
            Operand::None => 0,
        }
    }

    fn write_operand(&mut self, bus: &mut dyn CpuBus, operand: Operand, value: u8) {
        match operand {
            Operand::Accumulator => self.a = value,
            Operand::Address(addr) => bus.write(addr, value),
            Operand::None => {}
        }
    }

    /// Add with carry. Decimal flag is tracked but has no numeric effect.
    fn adc(&mut self, value: u8) {
        let carry = self.status.contains(StatusFlags::CARRY) as u16;
        let sum = self.a as u16 + value as u16 + carry;
        let result = sum as u8;

        self.status.set(StatusFlags::CARRY, sum >= 0x100);
        // Signed overflow: operands agree in sign, result disagrees.
        self.status.set(
            StatusFlags::OVERFLOW,
            (self.a ^ result) & (value ^ result) & 0x80 != 0,
        );

        self.a = result;
        self.set_zero_negative_flags(self.a);
    }

    /// Subtract with carry, as ADC of the one's complement. The complement
    /// is passed through the ADC path unchanged so carry and overflow reuse
    /// its logic.
    fn sbc(&mut self, value: u8) {
        self.adc(!value);
    }

    fn compare(&mut self, register: u8, value: u8) {
        let diff = register.wrapping_sub(value);
        self.status.set(StatusFlags::CARRY, register >= value);
        self.status.set(StatusFlags::ZERO, register == value);
        self.status.set(StatusFlags::NEGATIVE, diff & 0x80 != 0);
    }

    /// Taken branches cost one extra cycle, two when the already-advanced
    /// pc and the target lie in different 256-byte pages.
    fn branch(&mut self, operand: Operand, condition: bool) {
        if let Operand::Address(target) = operand {
            if condition {
                self.extra_cycles += 1;
                if (self.pc & 0xFF00) != (target & 0xFF00) {
                    self.extra_cycles += 1;
                }
                self.pc = target;
            }
        }
    }

    fn push(&mut self, bus: &mut dyn CpuBus, value: u8) {
        bus.write(0x0100 | self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn pull(&mut self, bus: &mut dyn CpuBus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(0x0100 | self.sp as u16)
    }

    fn set_zero_negative_flags(&mut self, value: u8) {
        self.status.set(StatusFlags::ZERO, value == 0);
        self.status.set(StatusFlags::NEGATIVE, value & 0x80 != 0);
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
