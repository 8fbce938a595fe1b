use crate::cpu_bus::CpuBus;

pub const RESET_VECTOR: u16 = 0xFFFC;
pub const NMI_VECTOR: u16 = 0xFFFA;
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Flat 64 KiB memory image. Regions (zero page at 0x0000, stack page at
/// 0x0100, program space above) are conventional only; every address in
/// 0x0000..=0xFFFF reads and writes.
pub struct Memory {
    ram: Box<[u8; 0x10000]>,
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            ram: Box::new([0; 0x10000]),
        }
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.ram[addr as usize]
    }

    pub fn write(&mut self, addr: u16, data: u8) {
        self.ram[addr as usize] = data;
    }

    /// Copies `data` into the image starting at `base`, wrapping at the top
    /// of the address space. Cartridge images conventionally load at 0x8000.
    pub fn load(&mut self, base: u16, data: &[u8]) {
        let mut addr = base;
        for &byte in data {
            self.ram[addr as usize] = byte;
            addr = addr.wrapping_add(1);
        }
    }

    /// Points the reset vector at `addr` so a subsequent `Cpu::reset` starts
    /// execution there.
    pub fn set_reset_vector(&mut self, addr: u16) {
        self.ram[RESET_VECTOR as usize] = (addr & 0xFF) as u8;
        self.ram[RESET_VECTOR.wrapping_add(1) as usize] = (addr >> 8) as u8;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.ram[..]
    }

    pub fn copy_from_slice(&mut self, data: &[u8]) {
        self.ram.copy_from_slice(data);
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuBus for Memory {
    fn read(&mut self, addr: u16) -> u8 {
        Memory::read(self, addr)
    }

    fn write(&mut self, addr: u16, data: u8) {
        Memory::write(self, addr, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_wraps_at_top_of_address_space() {
        let mut mem = Memory::new();
        mem.load(0xFFFF, &[0x11, 0x22]);
        assert_eq!(mem.read(0xFFFF), 0x11);
        assert_eq!(mem.read(0x0000), 0x22);
    }

    #[test]
    fn reset_vector_is_little_endian() {
        let mut mem = Memory::new();
        mem.set_reset_vector(0x8000);
        assert_eq!(mem.read(0xFFFC), 0x00);
        assert_eq!(mem.read(0xFFFD), 0x80);
    }
}
