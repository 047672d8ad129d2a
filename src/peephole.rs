// The exit-merge peephole (§4.7): the compiler's only optimization. When
// `;` appends EXIT, try to fold it into the immediately preceding word
// instead of emitting a separate word.

use crate::image::Image;
use crate::isa::{self, OpClass};

/// Attempts to merge an about-to-be-appended EXIT into the preceding word.
/// Returns true if the merge happened (caller must not also append EXIT).
pub fn maybe_merge_exit(image: &mut Image) -> bool {
    let Some(orig) = image.last_op() else {
        // Nothing precedes, or it's a jump target: no merge is legal.
        return false;
    };
    let op = image.word_at(orig);
    match isa::classify(op) {
        // A literal's second word, or a conditional branch: neither can
        // also be a return point.
        OpClass::Lit(_) | OpClass::ZeroBranch(_) => false,
        // An unconditional branch never returns, so the EXIT is redundant.
        OpClass::Branch(_) => true,
        // Tail-call fold: CALL immediately before return becomes BRANCH.
        OpClass::Call(addr) => {
            image.set_word(orig, isa::BRANCH | (addr & isa::TARGET_MASK));
            true
        }
        // Already folded; a second EXIT right after is a no-op.
        OpClass::PrimitiveExit(_) => true,
        OpClass::Primitive(_) => {
            if op & isa::RSTACK_MASK != 0 {
                // >R / R> / R@ would have their return-stack timing
                // corrupted by folding EXIT into them.
                false
            } else {
                image.set_word(orig, op | isa::EXIT);
                true
            }
        }
        OpClass::Unknown => false,
    }
}
