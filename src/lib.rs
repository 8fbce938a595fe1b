//! Instruction-execution core for the 6502/65C02 as used in NES-style
//! systems. The crate owns the fetch-decode-execute engine only; cartridge
//! parsing, rendering and input belong to the embedding host.

pub mod cpu;
pub mod cpu_bus;
pub mod memory;
pub mod savestate;

pub use cpu::{Cpu, StatusFlags};
pub use cpu_bus::CpuBus;
pub use memory::Memory;
pub use savestate::SaveState;
