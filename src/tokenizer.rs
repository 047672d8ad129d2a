// The tokenizer (§4.2): a delimiter-driven splitter over a single input
// string, consumed left-to-right. `word()` splits on any whitespace run;
// `parse(delim)` splits on the first occurrence of a given character,
// consuming it. Holds a `&str` slice into the caller-owned source text and
// advances it as tokens are consumed.

pub struct Tokenizer<'a> {
    remaining: &'a str,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Tokenizer<'a> {
        Tokenizer { remaining: input }
    }

    /// Splits on the first occurrence of `delim` if given, otherwise on any
    /// run of whitespace. Returns "" once the input is exhausted.
    pub fn parse(&mut self, delim: Option<char>) -> &'a str {
        if self.remaining.is_empty() {
            return "";
        }
        match delim {
            Some(d) => match self.remaining.find(d) {
                Some(idx) => {
                    let token = &self.remaining[..idx];
                    self.remaining = &self.remaining[idx + d.len_utf8()..];
                    token
                }
                None => {
                    let token = self.remaining;
                    self.remaining = "";
                    token
                }
            },
            None => {
                let trimmed = self.remaining.trim_start();
                match trimmed.find(char::is_whitespace) {
                    Some(idx) => {
                        let token = &trimmed[..idx];
                        self.remaining = &trimmed[idx..];
                        token
                    }
                    None => {
                        self.remaining = "";
                        trimmed
                    }
                }
            }
        }
    }

    /// The next whitespace-delimited token, or "" at end-of-input.
    pub fn word(&mut self) -> &'a str {
        self.parse(None)
    }
}
