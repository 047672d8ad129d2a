// Emitters (§4.10): render a linked image as a big-endian binary, a hex
// listing, or an annotated disassembly.

use crate::compiler::Compiler;
use crate::isa::{self, OpClass};

impl Compiler {
    /// The image as a flat sequence of big-endian 16-bit words.
    pub fn binary(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.image().words().len() * 2);
        for word in self.image().words() {
            out.extend_from_slice(&word.to_be_bytes());
        }
        out
    }

    /// One lowercase, zero-padded 4-digit hex word per line.
    pub fn hex_listing(&self) -> String {
        let mut out = String::new();
        for word in self.image().words() {
            out.push_str(&format!("{word:04x}\n"));
        }
        out
    }

    /// An annotated disassembly: each address prefixed with the name of any
    /// Thread starting there, followed by the decoded instruction.
    pub fn disassemble(&self) -> String {
        let mut out = String::new();
        for (addr, &word) in self.image().words().iter().enumerate() {
            if let Some(name) = self.runtime().find_by_addr(addr) {
                out.push_str(&format!("{name}:\n"));
            }
            out.push_str(&format!("{:04x}  {}\n", addr, self.disassemble_word(word)));
        }
        out
    }

    fn disassemble_word(&self, word: u16) -> String {
        match isa::classify(word) {
            OpClass::Lit(payload) => format!("LIT {payload:#x}"),
            OpClass::ZeroBranch(target) => format!("0BRANCH {}", self.target_label(target)),
            OpClass::Branch(target) => format!("BRANCH {}", self.target_label(target)),
            OpClass::Call(target) => format!("CALL {}", self.target_label(target)),
            OpClass::Primitive(name) => name.to_owned(),
            OpClass::PrimitiveExit(name) => format!("{name} EXIT"),
            OpClass::Unknown => "<unknown>".to_owned(),
        }
    }

    fn target_label(&self, target: u16) -> String {
        match self.runtime().find_by_addr(target as usize) {
            Some(name) => format!("{target:#x} ({name})"),
            None => format!("{target:#x}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_is_big_endian_words() {
        let mut c = Compiler::new();
        c.evaluate(": start 1 ;").unwrap();
        c.link("start").unwrap();
        let bin = c.binary();
        assert_eq!(bin.len(), c.image().words().len() * 2);
        let reconstructed: Vec<u16> = bin
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        assert_eq!(reconstructed, c.image().words());
    }

    #[test]
    fn hex_listing_is_one_lowercase_word_per_line() {
        let mut c = Compiler::new();
        c.evaluate(": start $100 ;").unwrap();
        let hex = c.hex_listing();
        let lines: Vec<&str> = hex.lines().collect();
        assert_eq!(lines.len(), c.image().words().len());
        assert!(lines.contains(&"8100"));
    }

    #[test]
    fn disassembly_names_thread_starts_and_fused_exit() {
        let mut c = Compiler::new();
        c.evaluate(": f 2 ; : start f ;").unwrap();
        c.link("start").unwrap();
        let listing = c.disassemble();
        assert!(listing.contains("f:\n"));
        assert!(listing.contains("start:\n"));
        assert!(listing.contains("LIT 0x2"));
    }

    #[test]
    fn unknown_encoding_is_reported() {
        let c = Compiler::new();
        assert_eq!(c.disassemble_word(0x0001), "<unknown>");
    }
}
