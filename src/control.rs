// The control-flow compiler (§4.6): IF/THEN/ELSE, BEGIN/AGAIN/UNTIL, AHEAD,
// WHILE/REPEAT, implemented as forward/backward patching over the same
// stack used for interpret-time numeric literals (see DESIGN.md for why the
// stack is shared rather than split).

use crate::error::{CompileError, Result};
use crate::image::Image;
use crate::isa;

fn pop(stack: &mut Vec<i64>, word: &'static str) -> Result<i64> {
    stack
        .pop()
        .ok_or(CompileError::StackUnderflow { word })
}

/// IF: push `here`, emit 0BRANCH with a zero (unresolved) target.
pub fn if_(stack: &mut Vec<i64>, image: &mut Image) {
    stack.push(image.here() as i64);
    image.comma(isa::ZERO_BRANCH);
}

/// THEN: pop the pending origin and OR `here` into its target field.
pub fn then(stack: &mut Vec<i64>, image: &mut Image) -> Result<()> {
    let orig = pop(stack, "THEN")? as usize;
    image.patch(orig, image.here() as u16 & isa::TARGET_MASK);
    image.invalidate_last_op();
    Ok(())
}

/// UNTIL is a direct alias for THEN: it back-patches the most recent forward
/// branch, which the user must already have emitted (§9, "UNTIL semantics").
pub fn until(stack: &mut Vec<i64>, image: &mut Image) -> Result<()> {
    then(stack, image)
}

/// AHEAD: push `here`, emit an unconditional BRANCH with a zero target.
pub fn ahead(stack: &mut Vec<i64>, image: &mut Image) {
    stack.push(image.here() as i64);
    image.comma(isa::BRANCH);
}

/// ELSE: AHEAD past the (upcoming) false branch, then THEN the IF that
/// preceded it, leaving the new AHEAD's origin for the following THEN.
pub fn else_(stack: &mut Vec<i64>, image: &mut Image) -> Result<()> {
    let orig = pop(stack, "ELSE")? as usize;
    ahead(stack, image);
    let new_orig = stack.pop().expect("ahead always pushes");
    stack.push(orig as i64);
    then(stack, image)?;
    stack.push(new_orig);
    Ok(())
}

/// BEGIN: push `here` as the loop's back-edge target; plants a label, so the
/// next EXIT cannot merge into whatever preceded it.
pub fn begin(stack: &mut Vec<i64>, image: &mut Image) {
    stack.push(image.here() as i64);
    image.invalidate_last_op();
}

/// AGAIN: pop the BEGIN destination and emit an unconditional branch back to it.
pub fn again(stack: &mut Vec<i64>, image: &mut Image) -> Result<()> {
    let dest = pop(stack, "AGAIN")? as usize;
    image.comma(isa::BRANCH | (dest as u16 & isa::TARGET_MASK));
    Ok(())
}

/// WHILE: swap roles with the enclosing BEGIN. Pop its destination, compile
/// an IF (consuming the loop test just emitted by the source), then push the
/// BEGIN destination back underneath the new IF origin.
pub fn while_(stack: &mut Vec<i64>, image: &mut Image) -> Result<()> {
    let dest = pop(stack, "WHILE")?;
    if_(stack, image);
    stack.push(dest);
    Ok(())
}

/// REPEAT: AGAIN back to BEGIN, then THEN the WHILE's forward branch.
/// WHILE leaves the stack as `[if_origin, begin_dest]` (begin_dest on top),
/// so AGAIN (consuming begin_dest) and THEN (consuming if_origin) in that
/// order need no extra rearranging.
pub fn repeat(stack: &mut Vec<i64>, image: &mut Image) -> Result<()> {
    again(stack, image)?;
    then(stack, image)
}
