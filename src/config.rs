// Command-line configuration (§1a, §4.11, §6), built with clap's derive API
// for the CLI surface: multiple source paths, three independent output
// modes, and a debug-level selector.

use clap::Parser;

use forthxc::messages::DebugLevel;

pub const VERSION: &str = "0.1.0";

#[derive(Parser, Debug)]
#[command(name = "forthxc", version = VERSION, about = "A cross-compiler for a stack-CPU Forth dialect")]
pub struct Config {
    /// Source files to compile, in order. Concatenated into one session.
    #[arg(required = true)]
    pub sources: Vec<String>,

    /// Print an annotated disassembly of the linked image to stdout.
    #[arg(long)]
    pub print_disassembly: bool,

    /// Write the big-endian binary image to PATH.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<String>,

    /// Write a hex listing (one word per line) to PATH.
    #[arg(long = "output-hex", value_name = "PATH")]
    pub output_hex: Option<String>,

    /// Name of the entry word to link against.
    #[arg(long, default_value = "start")]
    pub entry: String,

    /// Which Msg diagnostics surface.
    #[arg(long, value_enum, default_value = "error")]
    pub debug_level: DebugLevelArg,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum DebugLevelArg {
    Error,
    Warning,
    Info,
    Debug,
}

impl From<DebugLevelArg> for DebugLevel {
    fn from(arg: DebugLevelArg) -> DebugLevel {
        match arg {
            DebugLevelArg::Error => DebugLevel::Error,
            DebugLevelArg::Warning => DebugLevel::Warning,
            DebugLevelArg::Info => DebugLevel::Info,
            DebugLevelArg::Debug => DebugLevel::Debug,
        }
    }
}

impl Config {
    /// True if at least one of the three output modes was requested. The
    /// original tool's CLI errors out otherwise (§4.11 step 2, mirroring
    /// `parser.error('did you forget one of --output, --output-hex, or
    /// --print-disassembly?')`).
    pub fn has_output_mode(&self) -> bool {
        self.print_disassembly || self.output.is_some() || self.output_hex.is_some()
    }
}
