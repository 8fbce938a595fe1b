use std::path::PathBuf;
use std::process;

use nes6502::{Cpu, Memory};

// Headless driver loop.
// Usage:
//   cargo run --bin run6502 -- image.bin --base 0x8000 --pc 0x8000 --ticks 100000
// --pc is optional; without it the reset vector in the image is used.

fn parse_u32_hex_or_dec(s: &str) -> Option<u32> {
    let s = s.trim();
    if let Some(stripped) = s.strip_prefix("0x") {
        u32::from_str_radix(stripped, 16).ok()
    } else {
        s.parse::<u32>().ok()
    }
}

struct Args {
    image: PathBuf,
    base: u16,
    pc: Option<u16>,
    ticks: u64,
}

fn parse_args() -> Result<Args, String> {
    let mut args = std::env::args().skip(1);
    let mut image: Option<PathBuf> = None;
    let mut base: u16 = 0x8000;
    let mut pc: Option<u16> = None;
    let mut ticks: u64 = 1_000_000;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--base" => {
                let v = args.next().and_then(|s| parse_u32_hex_or_dec(&s));
                base = v.ok_or("--base needs a value")? as u16;
            }
            "--pc" => {
                let v = args.next().and_then(|s| parse_u32_hex_or_dec(&s));
                pc = Some(v.ok_or("--pc needs a value")? as u16);
            }
            "--ticks" => {
                let v = args.next().and_then(|s| parse_u32_hex_or_dec(&s));
                ticks = v.ok_or("--ticks needs a value")? as u64;
            }
            _ if image.is_none() => image = Some(PathBuf::from(&arg)),
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    Ok(Args {
        image: image.ok_or("missing program image path")?,
        base,
        pc,
        ticks,
    })
}

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("run6502: {msg}");
            process::exit(2);
        }
    };

    let data = match std::fs::read(&args.image) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("run6502: cannot read {}: {err}", args.image.display());
            process::exit(1);
        }
    };

    let mut memory = Memory::new();
    memory.load(args.base, &data);

    let mut cpu = Cpu::new();
    cpu.reset(&mut memory);
    if let Some(pc) = args.pc {
        cpu.set_pc(pc);
    }
    log::info!(
        "loaded {} bytes at 0x{:04X}, starting at PC 0x{:04X}",
        data.len(),
        args.base,
        cpu.pc
    );

    for tick in 0..args.ticks {
        cpu.tick(&mut memory);
        if cpu.is_halted() {
            log::info!("halted after {tick} ticks");
            break;
        }
    }

    println!(
        "PC={:04X} SP={:02X} A={:02X} X={:02X} Y={:02X} P={:02X} cycles={} halted={}",
        cpu.pc,
        cpu.sp,
        cpu.a,
        cpu.x,
        cpu.y,
        cpu.status_byte(),
        cpu.cycles(),
        cpu.is_halted()
    );
}
