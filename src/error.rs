// Error kinds the compiler can report.
//
// Policy: errors are surfaced, not recovered. Anything that escapes token
// evaluation is wrapped with the offending token's spelling via `InWord`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("unknown word `{0}'")]
    UnknownWord(String),

    #[error("entry word `{0}' is not defined")]
    EntryUnresolved(String),

    #[error("code memory overflow: {here} > {limit}")]
    CodeOverflow { here: usize, limit: usize },

    #[error("data memory overflow: {mem_pos} > {limit}")]
    DataOverflow { mem_pos: usize, limit: usize },

    #[error("stack underflow in `{word}'")]
    StackUnderflow { word: &'static str },

    #[error("control-flow stack unbalanced at `;' in `{word}'")]
    ControlStackUnbalanced { word: String },

    #[error("{source} while processing word `{word}'")]
    InWord {
        word: String,
        #[source]
        source: Box<CompileError>,
    },
}

pub type Result<T> = std::result::Result<T, CompileError>;

impl CompileError {
    /// Wraps an error with the token that was being evaluated when it escaped.
    pub fn in_word(word: &str, source: CompileError) -> CompileError {
        CompileError::InWord {
            word: word.to_owned(),
            source: Box::new(source),
        }
    }
}
