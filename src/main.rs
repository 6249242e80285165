//! UVSim Emulator - CLI Entry Point
//!
//! Commands:
//! - `uvsim run <program>` - Run a program file with an interactive console
//! - `uvsim check <program>` - Validate a program file without running it
//! - `uvsim fmt <program>` - Re-export a program in canonical image form

use std::io::{BufRead, Write as _};

use clap::{Parser, Subcommand};

use uvsim::{
    export_image, load_image, parse_program, Console, Machine, Memory, RunState, Step, Word,
};

#[derive(Parser)]
#[command(name = "uvsim")]
#[command(author = "Yigit")]
#[command(version = "0.1.0")]
#[command(about = "An emulator of the UVSim educational decimal computer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program until it halts, prompting on READ instructions
    Run {
        /// Path to the program file to execute
        program: String,
        /// Maximum number of cycles to run (default: 100000)
        #[arg(short, long, default_value = "100000")]
        max_cycles: u64,
        /// Show trace output
        #[arg(short, long)]
        trace: bool,
        /// Print a JSON snapshot of the machine after the run
        #[arg(long)]
        snapshot: bool,
    },
    /// Validate a program file and report the first problem found
    Check {
        /// Path to the program file
        program: String,
    },
    /// Load a program and re-export it as a canonical image
    Fmt {
        /// Path to the program file
        program: String,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run { program, max_cycles, trace, snapshot }) => {
            run_program(&program, max_cycles, trace, snapshot);
        }
        Some(Commands::Check { program }) => {
            check_program(&program);
        }
        Some(Commands::Fmt { program, output }) => {
            format_program(&program, output);
        }
        None => {
            println!("UVSim Emulator v0.1.0");
            println!("A signed six-digit decimal computer emulator");
            println!();
            println!("Use --help for available commands");
            println!();
            demo_words();
        }
    }
}

/// Console host that renders machine events on stdout/stderr.
struct StdConsole;

impl Console for StdConsole {
    fn on_prompt_for_input(&mut self, addr: u16) {
        println!(
            "Enter a positive or negative 6 digit number into memory register {} (ex: +012034 or -043021):",
            addr
        );
    }

    fn on_output(&mut self, addr: u16, word: Word) {
        println!("Value from register {:03}: {}", addr, word);
    }

    fn on_halt(&mut self, success: bool, message: &str) {
        println!();
        println!("----------------- Program has halted -----------------");
        if success {
            println!("{}", message);
        }
    }

    fn on_error(&mut self, message: &str) {
        eprintln!("❌ {}", message);
    }
}

fn run_program(path: &str, max_cycles: u64, trace: bool, snapshot: bool) {
    println!("🔧 Running: {}", path);

    let words = match load_image(path) {
        Ok(words) => words,
        Err(e) => {
            eprintln!("❌ Failed to load program: {}", e);
            std::process::exit(1);
        }
    };

    if words.is_empty() {
        eprintln!("❌ No instructions to execute");
        std::process::exit(1);
    }
    println!("📂 Loaded {} instructions", words.len());

    let mut machine = Machine::new();
    let mut console = StdConsole;
    if let Err(e) = machine.load_program(&words) {
        eprintln!("❌ Failed to install program: {}", e);
        std::process::exit(1);
    }

    println!();
    println!("━━━ Execution ━━━");

    if let Err(e) = machine.begin() {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let stdin = std::io::stdin();
    loop {
        match machine.state {
            RunState::Running => {
                if machine.cycles >= max_cycles {
                    println!();
                    println!(
                        "⚠️  Reached max cycles limit ({}). Use --max-cycles to increase.",
                        max_cycles
                    );
                    machine.cancel();
                    break;
                }
                let pc = machine.pc;
                match machine.step(&mut console) {
                    Ok(Step::Executed(instr)) if trace => {
                        println!("{:03}: {}  ACC={}", pc, instr, machine.acc);
                    }
                    Ok(_) => {}
                    Err(_) => break, // events already rendered by the console
                }
            }
            RunState::AwaitingInput => {
                print!("> ");
                let _ = std::io::stdout().flush();

                let mut line = String::new();
                match stdin.lock().read_line(&mut line) {
                    Ok(0) => {
                        eprintln!("❌ No more input; cancelling run");
                        machine.cancel();
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        eprintln!("❌ Failed to read input: {}", e);
                        machine.cancel();
                        break;
                    }
                }

                let text = line.trim_end_matches(['\r', '\n']);
                if let Err(e) = machine.supply_input(text) {
                    eprintln!(
                        "Invalid input: {}. Please enter a valid positive or negative 6 digit number.",
                        e
                    );
                }
            }
            _ => break,
        }
    }

    println!();
    println!("━━━ Result ━━━");
    println!("Cycles: {}", machine.cycles);
    println!("State: {:?}", machine.state);
    println!("Accumulator: {}", machine.acc);

    if snapshot {
        match serde_json::to_string_pretty(&machine) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("❌ Failed to serialize snapshot: {}", e),
        }
    }

    if machine.state == RunState::Error {
        std::process::exit(1);
    }
}

fn check_program(path: &str) {
    match load_image(path) {
        Ok(words) => {
            println!(
                "✓ {} instructions, fits in {} registers",
                words.len(),
                uvsim::MEMORY_SIZE
            );
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

fn format_program(path: &str, output: Option<String>) {
    let words = match load_image(path) {
        Ok(words) => words,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let mut mem = Memory::new();
    if let Err(e) = mem.install(&words) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
    let image = export_image(&mem);

    match output {
        Some(out_path) => {
            if let Err(e) = std::fs::write(&out_path, image) {
                eprintln!("❌ Failed to write {}: {}", out_path, e);
                std::process::exit(1);
            }
            println!("✓ Saved to {}", out_path);
        }
        None => println!("{}", image),
    }
}

fn demo_words() {
    use uvsim::word::arith;

    println!("━━━ Word Demo ━━━");
    println!();

    println!("Words (signed six-digit values, canonical form [+-]DDDDDD):");
    let a = Word::from_value(1234);
    let b = Word::from_value(-4321);
    println!("  1234 as a word:  {}", a);
    println!("  -4321 as a word: {}", b);
    println!();

    println!("Checked arithmetic:");
    match arith::add(a, b) {
        Ok(sum) => println!("  {} + {} = {}", a, b, sum),
        Err(e) => println!("  {} + {} failed: {}", a, b, e),
    }
    match arith::multiply(Word::from_value(999_999), Word::from_value(2)) {
        Ok(product) => println!("  +999999 * +000002 = {}", product),
        Err(e) => println!("  +999999 * +000002 fails: {}", e),
    }
    println!();

    println!("Example program (READ 007 / WRITE 007 / HALT):");
    for line in ["+010007", "+011007", "+043000"] {
        match Word::parse(line) {
            Ok(word) => match uvsim::machine::decode(word) {
                Ok(instr) => println!("  {}  {}", word, instr),
                Err(e) => println!("  {}  ({})", word, e),
            },
            Err(e) => println!("  {}  ({})", line, e),
        }
    }

    match parse_program("+010007\n+011007\n+043000") {
        Ok(program) => {
            println!();
            println!("✓ Demo program validates ({} words)", program.len());
        }
        Err(e) => println!("✗ Demo program failed to validate: {}", e),
    }
}
