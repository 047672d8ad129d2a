// The dictionary: a compiler wordlist (immediate/defining words) and a
// runtime wordlist (Primitive/Thread/Literal entries), each searched
// newest-first, case-insensitively. Entries are a tagged sum type with a
// common `compile` capability rather than dynamically-inspected objects.

use crate::image::Image;
use crate::isa;

/// A runtime-dictionary entry: something that can be looked up by name and,
/// when invoked, either executed at interpret time or compiled into the
/// image at compile time.
#[derive(Debug, Clone)]
pub enum Entry {
    /// A fixed-encoding target instruction.
    Primitive { name: String, opcode: u16 },
    /// A user colon definition, called by CALL and tail-foldable to BRANCH.
    Thread { name: String, addr: usize },
    /// A CONSTANT or VARIABLE: compiles as a literal load of its value.
    Literal { name: String, value: i64 },
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Entry::Primitive { name, .. } => name,
            Entry::Thread { name, .. } => name,
            Entry::Literal { name, .. } => name,
        }
    }

    /// Compiles this entry into `image` (§3: "all three are
    /// immediate-compilable").
    pub fn compile(&self, image: &mut Image) {
        match self {
            Entry::Primitive { opcode, .. } => image.comma(*opcode),
            Entry::Thread { addr, .. } => image.comma(isa::CALL | (*addr as u16 & isa::TARGET_MASK)),
            Entry::Literal { value, .. } => image.compile_literal(*value),
        }
    }

    /// Executes this entry at interpret time. Only Literal has meaningful
    /// interpret-time behavior (push its value); Primitive/Thread have no
    /// well-defined interpret semantics per §4.4 and are no-ops here.
    pub fn push_value(&self) -> Option<i64> {
        match self {
            Entry::Literal { value, .. } => Some(*value),
            _ => None,
        }
    }
}

/// A single ordered, case-insensitive, newest-first wordlist.
#[derive(Debug, Default, Clone)]
pub struct Wordlist {
    entries: Vec<Entry>,
}

impl Wordlist {
    pub fn new() -> Wordlist {
        Wordlist {
            entries: Vec::new(),
        }
    }

    /// Inserts a new entry at the head, so it shadows any existing entry of
    /// the same name.
    pub fn insert(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Case-insensitive linear scan, newest-first.
    pub fn find(&self, word: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.name().eq_ignore_ascii_case(word))
    }

    /// Finds a Thread entry by its code address, used by the disassembler to
    /// annotate the start of a named definition.
    pub fn find_by_addr(&self, addr: usize) -> Option<&str> {
        self.entries.iter().rev().find_map(|e| match e {
            Entry::Thread { name, addr: a } if *a == addr => Some(name.as_str()),
            _ => None,
        })
    }
}

/// Populates a fresh Wordlist with the ISA's fixed primitives, in table
/// order (oldest-first, so later duplicates - there are none at build time -
/// would still shadow correctly under `find`'s newest-first scan).
pub fn primitives() -> Wordlist {
    let mut wl = Wordlist::new();
    for (name, opcode) in isa::PRIMITIVES {
        wl.insert(Entry::Primitive {
            name: (*name).to_owned(),
            opcode: *opcode,
        });
    }
    wl
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_are_case_insensitively_found() {
        let wl = primitives();
        assert!(matches!(wl.find("dup"), Some(Entry::Primitive { .. })));
        assert!(matches!(wl.find("DUP"), Some(Entry::Primitive { .. })));
        assert!(wl.find("nonesuch").is_none());
    }

    #[test]
    fn newest_entry_shadows_older_same_name() {
        let mut wl = Wordlist::new();
        wl.insert(Entry::Literal {
            name: "x".into(),
            value: 1,
        });
        wl.insert(Entry::Literal {
            name: "x".into(),
            value: 2,
        });
        match wl.find("x") {
            Some(Entry::Literal { value, .. }) => assert_eq!(*value, 2),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn find_by_addr_locates_thread() {
        let mut wl = Wordlist::new();
        wl.insert(Entry::Thread {
            name: "f".into(),
            addr: 7,
        });
        assert_eq!(wl.find_by_addr(7), Some("f"));
        assert_eq!(wl.find_by_addr(8), None);
    }
}
