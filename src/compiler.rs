// The outer interpreter and colon compiler (§4.4, §4.8): the single-pass
// front end that ties the tokenizer, the two dictionaries, the image buffer,
// and the control-flow compiler together.

use crate::control;
use crate::dictionary::{self, Entry, Wordlist};
use crate::error::{CompileError, Result};
use crate::image::Image;
use crate::messages::Msg;
use crate::tokenizer::Tokenizer;

/// Global STATE (§3): toggled only by `:` and `;`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Interpret,
    Compile,
}

/// The compiler session: dictionaries, image, compile-time stack, and the
/// bookkeeping `:` / `;` need to install a new Thread.
pub struct Compiler {
    image: Image,
    runtime: Wordlist,
    /// Shared value/control stack (§3, §9: "compile-time control stack is
    /// the value stack").
    stack: Vec<i64>,
    state: State,
    last_word: String,
    last_xt: usize,
    pub msg: Msg,
}

impl Compiler {
    pub fn new() -> Compiler {
        Compiler {
            image: Image::new(),
            runtime: dictionary::primitives(),
            stack: Vec::new(),
            state: State::Interpret,
            last_word: String::new(),
            last_xt: 0,
            msg: Msg::new(),
        }
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn runtime(&self) -> &Wordlist {
        &self.runtime
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Feeds one source file's worth of text through the outer interpreter.
    /// Multiple calls accumulate into the same session (§5: concatenated
    /// compilation of several files shares one dictionary and image).
    pub fn evaluate(&mut self, source: &str) -> Result<()> {
        let mut tokens = Tokenizer::new(source);
        loop {
            let word = tokens.word();
            if word.is_empty() {
                return Ok(());
            }
            self.dispatch(word, &mut tokens)
                .map_err(|e| CompileError::in_word(word, e))?;
        }
    }

    /// One token's worth of dispatch: compiler-dict, then runtime-dict, then
    /// numeric literal (§4.4). `tokens` is passed through so `(`, `\`, and
    /// the defining words can consume further input.
    fn dispatch(&mut self, word: &str, tokens: &mut Tokenizer) -> Result<()> {
        if let Some(()) = self.dispatch_compiler_word(word, tokens)? {
            return Ok(());
        }
        if let Some(entry) = self.runtime.find(word).cloned() {
            return self.dispatch_runtime_entry(&entry);
        }
        match parse_number(word) {
            Some(value) => {
                if self.state == State::Compile {
                    self.image.compile_literal(value);
                } else {
                    self.stack.push(value);
                }
                Ok(())
            }
            None => Err(CompileError::UnknownWord(word.to_owned())),
        }
    }

    /// Runtime-dict entries execute or compile depending on STATE (§4.4 step
    /// 2): Literals always push/compile their value; Primitives and Threads
    /// have no well-defined interpret-time behavior (interpreting a raw
    /// opcode or calling an unlinked thread isn't meaningful), so any
    /// non-Literal entry is simply compiled regardless of state.
    fn dispatch_runtime_entry(&mut self, entry: &Entry) -> Result<()> {
        match (self.state, entry) {
            (State::Interpret, Entry::Literal { value, .. }) => {
                self.stack.push(*value);
                Ok(())
            }
            _ => {
                entry.compile(&mut self.image);
                Ok(())
            }
        }
    }

    /// Compiler-dict words (§4.3): immediate, invoked regardless of state.
    /// Returns `Ok(Some(()))` if `word` was one of these, `Ok(None)` if it
    /// wasn't (so dispatch can fall through to the runtime dict).
    fn dispatch_compiler_word(
        &mut self,
        word: &str,
        tokens: &mut Tokenizer,
    ) -> Result<Option<()>> {
        match word.to_ascii_uppercase().as_str() {
            "(" => {
                tokens.parse(Some(')'));
            }
            "\\" => {
                tokens.parse(Some('\n'));
            }
            ":" => self.colon(tokens)?,
            ";" => self.semicolon()?,
            "CONSTANT" => self.constant(tokens)?,
            "VARIABLE" => self.variable(tokens)?,
            "ALLOT" => self.allot()?,
            "IF" => control::if_(&mut self.stack, &mut self.image),
            "THEN" => control::then(&mut self.stack, &mut self.image)?,
            "ELSE" => control::else_(&mut self.stack, &mut self.image)?,
            "BEGIN" => control::begin(&mut self.stack, &mut self.image),
            "AGAIN" => control::again(&mut self.stack, &mut self.image)?,
            "UNTIL" => control::until(&mut self.stack, &mut self.image)?,
            "AHEAD" => control::ahead(&mut self.stack, &mut self.image),
            "WHILE" => control::while_(&mut self.stack, &mut self.image)?,
            "REPEAT" => control::repeat(&mut self.stack, &mut self.image)?,
            _ => return Ok(None),
        }
        Ok(Some(()))
    }

    /// `: name` (§4.8): records the defining name and its start address,
    /// enters compile state.
    fn colon(&mut self, tokens: &mut Tokenizer) -> Result<()> {
        let name = tokens.word();
        self.last_word = name.to_owned();
        self.last_xt = self.image.here();
        self.state = State::Compile;
        Ok(())
    }

    /// `;` (§4.8): appends EXIT (through the peephole), installs the new
    /// Thread, returns to interpret state. A non-empty control stack at this
    /// point is a warning (§7 `ControlStackUnbalanced`), not a fatal error.
    fn semicolon(&mut self) -> Result<()> {
        self.image.comma(crate::isa::EXIT);
        if !self.stack.is_empty() {
            let err = CompileError::ControlStackUnbalanced {
                word: self.last_word.clone(),
            };
            self.msg.warning(";", &err.to_string(), None::<String>);
        }
        self.runtime.insert(Entry::Thread {
            name: std::mem::take(&mut self.last_word),
            addr: self.last_xt,
        });
        self.state = State::Interpret;
        Ok(())
    }

    /// `CONSTANT` (§4.8): pops a value, reads the following name, installs a
    /// Literal entry.
    fn constant(&mut self, tokens: &mut Tokenizer) -> Result<()> {
        let value = self
            .stack
            .pop()
            .ok_or(CompileError::StackUnderflow { word: "CONSTANT" })?;
        let name = tokens.word().to_owned();
        self.runtime.insert(Entry::Literal { name, value });
        Ok(())
    }

    /// `VARIABLE` (§4.8): reads the following name, allocates one data cell,
    /// installs a Literal entry holding its address.
    fn variable(&mut self, tokens: &mut Tokenizer) -> Result<()> {
        let name = tokens.word().to_owned();
        let addr = self.image.allot(1);
        self.runtime.insert(Entry::Literal {
            name,
            value: addr as i64,
        });
        Ok(())
    }

    /// `ALLOT (n -- addr)` (§4.8): consumes `n`, returns the reserved
    /// region's first address.
    fn allot(&mut self) -> Result<()> {
        let n = self
            .stack
            .pop()
            .ok_or(CompileError::StackUnderflow { word: "ALLOT" })?;
        let addr = self.image.allot(n);
        self.stack.push(addr as i64);
        Ok(())
    }

    /// Links the image: patches the entry vector at address 0 to branch to
    /// `entry`'s thread, then checks code/data limits (§4.9).
    pub fn link(&mut self, entry: &str) -> Result<()> {
        let addr = match self.runtime.find(entry) {
            Some(Entry::Thread { addr, .. }) => *addr,
            _ => return Err(CompileError::EntryUnresolved(entry.to_owned())),
        };
        self.image
            .set_word(0, crate::isa::BRANCH | (addr as u16 & crate::isa::TARGET_MASK));
        self.image.check_limits()
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a token as a numeric literal: `$`-prefixed is hexadecimal,
/// otherwise decimal (§4.4 step 3). Returns `None` if `w` is neither.
fn parse_number(w: &str) -> Option<i64> {
    if let Some(hex) = w.strip_prefix('$') {
        i64::from_str_radix(hex, 16).ok()
    } else {
        w.parse::<i64>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa;

    #[test]
    fn simple_definition_emits_literal_and_exit() {
        // : start 1 ;  -- a LIT can never fold with the following EXIT
        // (§4.7 rule 1), so this is two body words, not one.
        let mut c = Compiler::new();
        c.evaluate(": start 1 ;").unwrap();
        assert_eq!(c.image.here(), 3);
        assert_eq!(c.image.word_at(1), 0x8001);
        assert_eq!(c.image.word_at(2), isa::EXIT);
        assert!(matches!(c.runtime.find("start"), Some(Entry::Thread { .. })));
    }

    #[test]
    fn tail_call_folds_to_branch() {
        // : f 2 ; : start f ;  -- f's own LIT blocks its EXIT from folding
        // (§4.7 rule 1), but start's CALL to f folds to a tail BRANCH.
        let mut c = Compiler::new();
        c.evaluate(": f 2 ; : start f ;").unwrap();
        let f_addr = match c.runtime.find("f") {
            Some(Entry::Thread { addr, .. }) => *addr,
            other => panic!("unexpected: {other:?}"),
        };
        assert_eq!(c.image.word_at(f_addr), 0x8002);
        assert_eq!(c.image.word_at(f_addr + 1), isa::EXIT);
        let start_addr = match c.runtime.find("start") {
            Some(Entry::Thread { addr, .. }) => *addr,
            other => panic!("unexpected: {other:?}"),
        };
        assert_eq!(c.image.word_at(start_addr), isa::BRANCH | f_addr as u16);
    }

    #[test]
    fn delay_loop_matches_scenario_three() {
        let mut c = Compiler::new();
        c.evaluate(": delay begin dup while 1 - repeat drop ; : start delay ;")
            .unwrap();
        let delay_addr = match c.runtime.find("delay") {
            Some(Entry::Thread { addr, .. }) => *addr,
            other => panic!("unexpected: {other:?}"),
        };
        assert_eq!(c.image.word_at(delay_addr), isa::DUP);
        assert_eq!(c.image.word_at(delay_addr + 5), isa::DROP | isa::EXIT);
        assert!(c.stack.is_empty());
    }

    #[test]
    fn unbalanced_control_stack_warns_but_still_compiles() {
        // IF with no matching THEN before the closing ; leaves one pending
        // patch site on the stack. That's a warning, not a fatal error (§7).
        let mut c = Compiler::new();
        assert!(c.evaluate(": start 1 if ;").is_ok());
        assert!(matches!(c.runtime.find("start"), Some(Entry::Thread { .. })));
    }

    #[test]
    fn constant_resolves_at_use_site() {
        // 42 CONSTANT N : start N ;
        let mut c = Compiler::new();
        c.evaluate("42 CONSTANT N : start N ;").unwrap();
        let start_addr = match c.runtime.find("start") {
            Some(Entry::Thread { addr, .. }) => *addr,
            other => panic!("unexpected: {other:?}"),
        };
        assert_eq!(c.image.word_at(start_addr), 0x8000 | 42);
        assert_eq!(c.image.word_at(start_addr + 1), isa::EXIT);
    }

    #[test]
    fn variable_resolves_to_data_address_zero() {
        // VARIABLE X : start X @ ;
        let mut c = Compiler::new();
        c.evaluate("VARIABLE X : start X @ ;").unwrap();
        match c.runtime.find("X") {
            Some(Entry::Literal { value, .. }) => assert_eq!(*value, 0),
            other => panic!("unexpected: {other:?}"),
        }
        let start_addr = match c.runtime.find("start") {
            Some(Entry::Thread { addr, .. }) => *addr,
            other => panic!("unexpected: {other:?}"),
        };
        assert_eq!(c.image.word_at(start_addr), 0x8000);
        assert_eq!(c.image.word_at(start_addr + 1), isa::FETCH | isa::EXIT);
    }

    #[test]
    fn hex_literal_is_parsed() {
        // : start $100 ;
        let mut c = Compiler::new();
        c.evaluate(": start $100 ;").unwrap();
        let start_addr = match c.runtime.find("start") {
            Some(Entry::Thread { addr, .. }) => *addr,
            other => panic!("unexpected: {other:?}"),
        };
        assert_eq!(c.image.word_at(start_addr), 0x8100);
    }

    #[test]
    fn unknown_word_is_wrapped_with_its_spelling() {
        let mut c = Compiler::new();
        let err = c.evaluate(": start bogus ;").unwrap_err();
        match err {
            CompileError::InWord { word, source } => {
                assert_eq!(word, "bogus");
                assert!(matches!(*source, CompileError::UnknownWord(_)));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn link_patches_entry_vector() {
        let mut c = Compiler::new();
        c.evaluate(": start 1 ;").unwrap();
        let start_addr = match c.runtime.find("start") {
            Some(Entry::Thread { addr, .. }) => *addr,
            other => panic!("unexpected: {other:?}"),
        };
        c.link("start").unwrap();
        assert_eq!(c.image.word_at(0), isa::BRANCH | start_addr as u16);
    }

    #[test]
    fn link_fails_when_entry_is_undefined() {
        let mut c = Compiler::new();
        c.evaluate(": f 1 ;").unwrap();
        assert!(matches!(
            c.link("start"),
            Err(CompileError::EntryUnresolved(_))
        ));
    }

    #[test]
    fn concatenated_files_share_one_session() {
        let mut c = Compiler::new();
        c.evaluate(": f 2 ;").unwrap();
        c.evaluate(": start f ;").unwrap();
        assert!(c.link("start").is_ok());
    }
}
