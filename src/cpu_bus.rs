//! Trait representing the minimal bus interface required by the 6502 core.
//!
//! The host owns the 64 KiB address space; the core only ever reaches memory
//! through this trait. Addresses are 16-bit, so address arithmetic wraps at
//! 0xFFFF by construction.

pub trait CpuBus {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, data: u8);

    fn read_u16(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    fn write_u16(&mut self, addr: u16, value: u16) {
        self.write(addr, (value & 0xFF) as u8);
        self.write(addr.wrapping_add(1), (value >> 8) as u8);
    }
}
