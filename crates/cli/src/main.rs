//! MIPS multicore simulator shell.
//!
//! This binary loads a program image and drives the simulator through an
//! interactive command loop:
//! 1. **go** — run until every core halts.
//! 2. **run N** — advance N cycles.
//! 3. **mdump LOW HIGH** — dump a memory range, one word per line.
//! 4. **rdump** — dump registers and counters for every core.
//! 5. **quit** — exit (code 0).
//!
//! Commands read equally from a terminal or a piped script.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use mips_core::config::Config;
use mips_core::sim::loader;
use mips_core::{Memory, Processor};

#[derive(Parser, Debug)]
#[command(
    name = "sim",
    author,
    version,
    about = "MIPS multicore cycle-accurate simulator",
    long_about = "Load a hex program image and drive the simulator interactively.\n\n\
                  Example:\n  sim program.hex\n  echo go | sim program.hex"
)]
struct Cli {
    /// Program image (ASCII hex records `AAAAAAAA DDDDDDDD`).
    program: PathBuf,

    /// JSON configuration file; defaults reproduce the reference hardware.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit per-stage and per-cache diagnostic lines to stderr.
    #[arg(long)]
    trace: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("[!] FATAL: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("could not read config '{}'", path.display()))?;
            Config::from_json(&text)
                .with_context(|| format!("could not parse config '{}'", path.display()))?
        }
        None => Config::default(),
    };
    if cli.trace {
        config.general.trace = true;
    }

    let mut proc = Processor::new(&config);
    let words = loader::load_object(&mut proc.mem, &cli.program)?;
    println!("Loaded {} words from {}", words, cli.program.display());
    println!(
        "MIPS multicore simulator ({} cores). Type '?' for help.",
        proc.cores.len()
    );

    shell(&mut proc)
}

/// The interactive command loop.
fn shell(proc: &mut Processor) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("SIM> ");
        io::stdout().flush().ok();

        let Some(line) = lines.next() else {
            // EOF on a piped script behaves like quit.
            return Ok(());
        };
        let line = line.context("failed to read command")?;
        let mut args = line.split_whitespace();
        let Some(cmd) = args.next() else {
            continue;
        };

        match cmd {
            "go" | "g" => {
                println!("Simulating...");
                proc.run_until_halt(u64::MAX);
                println!("Simulator halted after {} cycles", proc.cycles);
            }
            "run" | "r" => match args.next().map(parse_u64) {
                Some(Ok(n)) => {
                    for _ in 0..n {
                        proc.cycle();
                    }
                    println!("Ran {n} cycles (total {})", proc.cycles);
                }
                _ => println!("usage: run <cycles>"),
            },
            "mdump" | "m" => {
                let (low, high) = (args.next().map(parse_u32), args.next().map(parse_u32));
                match (low, high) {
                    (Some(Ok(low)), Some(Ok(high))) if low <= high => mdump(&proc.mem, low, high),
                    _ => println!("usage: mdump <low> <high>"),
                }
            }
            "rdump" => rdump(proc),
            "stats" => proc.stats().print(),
            "?" | "help" => help(),
            "quit" | "q" => return Ok(()),
            other => {
                println!("unknown command '{other}'");
                help();
            }
        }
    }
}

fn help() {
    println!("Commands:");
    println!("  go                 run until all cores halt");
    println!("  run <cycles>       advance the given number of cycles");
    println!("  mdump <low> <high> dump memory words in [low, high]");
    println!("  rdump              dump registers and counters");
    println!("  stats              print the full statistics report");
    println!("  ?                  this help");
    println!("  quit               exit");
}

/// Dumps the words of `[low, high]` to stdout.
fn mdump(mem: &Memory, low: u32, high: u32) {
    let mut addr = low & !3;
    while addr <= high {
        println!("0x{addr:08x}: 0x{:08x}", mem.read_32(addr));
        match addr.checked_add(4) {
            Some(next) => addr = next,
            None => break,
        }
    }
}

/// Dumps every core's architectural state and counters.
fn rdump(proc: &Processor) {
    println!("Current cycle count: {}", proc.cycles);
    for core in &proc.cores {
        let pipe = &core.pipe;
        println!(
            "CPU {} ({}): PC=0x{:08x} HI=0x{:08x} LO=0x{:08x}",
            core.id,
            if core.running { "running" } else { "halted" },
            pipe.pc,
            pipe.hi,
            pipe.lo
        );
        println!(
            "  fetched {}  retired {}  squashed {}",
            pipe.fetched, pipe.retired, pipe.squashed
        );
        for (i, val) in pipe.regs.iter().enumerate() {
            print!("  R{i:<2} 0x{val:08x}");
            if i % 4 == 3 {
                println!();
            }
        }
    }
}

/// Parses a decimal or `0x`-prefixed number.
fn parse_u32(s: &str) -> Result<u32, std::num::ParseIntError> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else {
        s.parse()
    }
}

fn parse_u64(s: &str) -> Result<u64, std::num::ParseIntError> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else {
        s.parse()
    }
}
