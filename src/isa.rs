// ISA & Encoding
//
// Fixed mapping from mnemonic to 16-bit encoding, plus masks for the opcode
// classes the rest of the compiler needs to recognize (LIT, BRANCH class,
// CALL, EXIT). This table is a load-bearing contract: every value here is
// fixed by the target CPU, not a design choice of this compiler.

/// Code-space limit in 16-bit words. `here` must never exceed this at link time.
pub const CODESIZE: usize = 256;
/// Data-space limit in cells. `mem_pos` must never exceed this at link time.
pub const MEMSIZE: usize = 256;

pub const NOP: u16 = 0x0800;
pub const INVERT: u16 = 0x0700;
pub const TWO_SLASH: u16 = 0x0200;
pub const ZERO_EQUAL: u16 = 0x0300;
pub const AND: u16 = 0x06c0;
pub const OR: u16 = 0x05c0;
pub const XOR: u16 = 0x04c0;
pub const PLUS: u16 = 0x00c0;
pub const MINUS: u16 = 0x01c0;
pub const DUP: u16 = 0x0840;
pub const SWAP: u16 = 0x0980;
pub const DROP: u16 = 0x09c0;
pub const TO_R: u16 = 0x09d0;
pub const R_FROM: u16 = 0x0a70;
pub const R_FETCH: u16 = 0x0a40;
pub const BRANCH: u16 = 0x4000;
pub const ZERO_BRANCH: u16 = 0x6000;
pub const CALL: u16 = 0x2000;
pub const EXECUTE: u16 = 0x09e0;
pub const STORE_PLUS: u16 = 0x0dc0;
pub const FETCH: u16 = 0x0c00;
pub const LIT: u16 = 0x8000;

/// Canonical EXIT encoding, used for both the fold and the already-folded
/// detection mask (see DESIGN.md for the 0x1030/0x1830 encoding note).
pub const EXIT: u16 = 0x1830;

/// Mask over the low 13 bits that BRANCH/0BRANCH/CALL OR a target address into.
pub const TARGET_MASK: u16 = 0x1fff;
/// Mask isolating the return-stack ops (>R, R>, R@) that must never fold EXIT.
pub const RSTACK_MASK: u16 = 0x0030;

/// Table of (mnemonic, encoding) pairs, installed into the runtime wordlist
/// in this order. Order only matters for disassembly's inverse-lookup
/// tie-breaking; dictionary search itself is newest-first regardless of
/// insertion order.
pub const PRIMITIVES: &[(&str, u16)] = &[
    ("NOP", NOP),
    ("INVERT", INVERT),
    ("2/", TWO_SLASH),
    ("0=", ZERO_EQUAL),
    ("AND", AND),
    ("OR", OR),
    ("XOR", XOR),
    ("+", PLUS),
    ("-", MINUS),
    ("DUP", DUP),
    ("SWAP", SWAP),
    ("DROP", DROP),
    (">R", TO_R),
    ("R>", R_FROM),
    ("R@", R_FETCH),
    ("BRANCH", BRANCH),
    ("0BRANCH", ZERO_BRANCH),
    ("CALL", CALL),
    ("EXECUTE", EXECUTE),
    ("EXIT", EXIT),
    ("!+", STORE_PLUS),
    ("@", FETCH),
    ("LIT", LIT),
];

/// Opcode class, used by the peephole (§4.7) and the disassembler (§4.10) so
/// that the "which kind of branch is this" logic is a match on a class
/// rather than a chain of bit tests sprinkled through call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpClass {
    Lit(u16),
    ZeroBranch(u16),
    Branch(u16),
    Call(u16),
    Primitive(&'static str),
    PrimitiveExit(&'static str),
    Unknown,
}

/// Classify a 16-bit opcode word. Order matters: 0BRANCH's bit pattern is a
/// superset of BRANCH's (both set bit 0x2000via 0x6000/0x4000), so 0BRANCH
/// must be tested first.
pub fn classify(op: u16) -> OpClass {
    if op & LIT != 0 {
        return OpClass::Lit(op & 0x7fff);
    }
    if op & ZERO_BRANCH == ZERO_BRANCH {
        return OpClass::ZeroBranch(op & TARGET_MASK);
    }
    // 0BRANCH (0x6000) is the OR of BRANCH's bit (0x4000) and CALL's bit
    // (0x2000); having ruled it out above, the two bits are now mutually
    // exclusive and identify BRANCH vs. CALL on their own.
    if op & BRANCH != 0 {
        return OpClass::Branch(op & TARGET_MASK);
    }
    if op & CALL != 0 {
        return OpClass::Call(op & TARGET_MASK);
    }
    if let Some((name, _)) = PRIMITIVES.iter().find(|(_, enc)| *enc == op) {
        return OpClass::Primitive(name);
    }
    // A fused "primitive|EXIT" word can't be recovered by masking EXIT's
    // bits back out: EXIT's own bit pattern overlaps some primitives' (e.g.
    // DROP shares bit 0x0800 with EXIT), so `op & !EXIT` would silently
    // zero a bit that belonged to the primitive, not to EXIT. Search by
    // reconstructing the fused form instead.
    if let Some((name, _)) = PRIMITIVES.iter().find(|(_, enc)| *enc | EXIT == op) {
        return OpClass::PrimitiveExit(name);
    }
    OpClass::Unknown
}

/// Look up a primitive's encoding by name (case-sensitive; callers handling
/// user source should fold case themselves via the dictionary).
pub fn lookup(name: &str) -> Option<u16> {
    PRIMITIVES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, enc)| *enc)
}
