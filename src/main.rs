// forthxc CLI front-end (§4.11). Owns every filesystem and process-exit
// concern; the compiler library itself never touches either.

mod config;

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use forthxc::messages::Msg;
use forthxc::Compiler;

use config::Config;

fn main() -> ExitCode {
    let config = Config::parse();

    if !config.has_output_mode() {
        eprintln!(
            "forthxc: did you forget one of --output, --output-hex, or --print-disassembly?"
        );
        return ExitCode::FAILURE;
    }

    let mut msg = Msg::new();
    msg.set_level(config.debug_level.into());

    let mut compiler = Compiler::new();
    compiler.msg = msg.clone();

    for path in &config.sources {
        let source = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                msg.error("forthxc", "could not read source file", Some(format!("{path}: {e}")));
                return ExitCode::FAILURE;
            }
        };
        if let Err(e) = compiler.evaluate(&source) {
            msg.error("forthxc", "compilation failed", Some(e));
            return ExitCode::FAILURE;
        }
    }

    if let Err(e) = compiler.link(&config.entry) {
        msg.error("forthxc", "linking failed", Some(e));
        return ExitCode::FAILURE;
    }

    if config.print_disassembly {
        print!("{}", compiler.disassemble());
    }

    if let Some(path) = &config.output {
        if let Err(e) = fs::write(path, compiler.binary()) {
            msg.error("forthxc", "could not write binary output", Some(format!("{path}: {e}")));
            return ExitCode::FAILURE;
        }
    }

    if let Some(path) = &config.output_hex {
        if let Err(e) = fs::write(path, compiler.hex_listing()) {
            msg.error("forthxc", "could not write hex output", Some(format!("{path}: {e}")));
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
