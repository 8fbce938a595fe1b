use serde::{Deserialize, Serialize};

use crate::cpu::{Cpu, StatusFlags};
use crate::memory::Memory;

/// Flat snapshot of the register file and memory image, serialized with
/// bincode.
#[derive(Serialize, Deserialize)]
pub struct SaveState {
    pub cpu_a: u8,
    pub cpu_x: u8,
    pub cpu_y: u8,
    pub cpu_pc: u16,
    pub cpu_sp: u8,
    pub cpu_status: u8,
    pub cpu_cycles: u64,
    pub cpu_halted: bool,

    pub ram: Vec<u8>,
}

impl SaveState {
    pub fn capture(cpu: &Cpu, memory: &Memory) -> Self {
        SaveState {
            cpu_a: cpu.a,
            cpu_x: cpu.x,
            cpu_y: cpu.y,
            cpu_pc: cpu.pc,
            cpu_sp: cpu.sp,
            cpu_status: cpu.status_byte(),
            cpu_cycles: cpu.cycles(),
            cpu_halted: cpu.is_halted(),
            ram: memory.as_slice().to_vec(),
        }
    }

    /// Restores registers and memory. The cycle countdown restarts at the
    /// next instruction boundary, so restoring mid-instruction timing is not
    /// attempted.
    pub fn apply(&self, cpu: &mut Cpu, memory: &mut Memory) {
        cpu.a = self.cpu_a;
        cpu.x = self.cpu_x;
        cpu.y = self.cpu_y;
        cpu.pc = self.cpu_pc;
        cpu.sp = self.cpu_sp;
        cpu.status = StatusFlags::from_bits_truncate(self.cpu_status);
        cpu.cycles = self.cpu_cycles;
        cpu.halted = self.cpu_halted;
        memory.copy_from_slice(&self.ram);
    }

    pub fn save_to_file(&self, filename: &str) -> Result<(), Box<dyn std::error::Error>> {
        let data = bincode::serialize(self)?;
        std::fs::write(filename, data)?;
        Ok(())
    }

    pub fn load_from_file(filename: &str) -> Result<SaveState, Box<dyn std::error::Error>> {
        let data = std::fs::read(filename)?;
        Ok(bincode::deserialize(&data)?)
    }
}
