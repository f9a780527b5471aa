//! The comprehension engine: `for`-loop and comprehension traversal built
//! from the iteration protocol and two per-traversal ejectors.
//!
//! Each traversal allocates a fresh "skip" ejector (scoped to a single step)
//! and a fresh "stop" ejector (scoped to the whole loop). A skip-tagged
//! unwind drops the current element and continues; a stop-tagged unwind,
//! whether fired by the iterator at exhaustion or by user code requesting an
//! early stop, ends the traversal normally. Every other fault propagates
//! unchanged: correctness hinges on checking tag identity, not merely "is
//! this an escape". Nested traversals allocate independent tags, so inner
//! and outer skip/stop never cross-match.
use crate::{
    iterate::{PairIter, make_iterator},
    signal::{Ejector, Fault},
    tables,
    value::Value,
};

/// The compiled loop body: one `run` call per element, with the skip
/// ejector for the step.
pub trait Block {
    fn run(&self, key: Value, item: Value, skip: &Ejector) -> Result<Value, Fault>;
}

impl<F> Block for F
where
    F: Fn(Value, Value, &Ejector) -> Result<Value, Fault>,
{
    fn run(&self, key: Value, item: Value, skip: &Ejector) -> Result<Value, Fault> {
        self(key, item, skip)
    }
}

/// Runs `block` over every element of `collection`, collecting the results
/// into an immutable list that preserves traversal order. Skipped elements
/// are dropped, not replaced with placeholders.
pub fn accumulate_list(collection: &Value, block: &dyn Block) -> Result<Value, Fault> {
    Ok(Value::const_list(traverse(make_iterator(collection)?, block)?))
}

/// [`accumulate_list`] over an explicit iterator, for traversals that do not
/// start from a collection view (generator loops via
/// [`crate::iterate::iter_while`]).
pub fn accumulate_list_from(iter: PairIter, block: &dyn Block) -> Result<Value, Fault> {
    Ok(Value::const_list(traverse(iter, block)?))
}

/// Like [`accumulate_list`], but every produced element must be a
/// `[key, value]` pair; the results are assembled into an immutable
/// insertion-ordered map. Non-pair elements are usage errors.
pub fn accumulate_map(collection: &Value, block: &dyn Block) -> Result<Value, Fault> {
    let pairs = traverse(make_iterator(collection)?, block)?;
    Ok(Value::const_map(tables::map_from_pairs(&pairs)?))
}

fn traverse(mut iter: PairIter, block: &dyn Block) -> Result<Vec<Value>, Fault> {
    let skip = Ejector::new("listcomp_skip");
    let stop = Ejector::new("iteration");
    let mut acc = Vec::new();

    let outcome = loop {
        let (key, item) = match iter.next(&stop) {
            Ok(pair) => pair,
            Err(fault) if stop.matches(&fault) => break Ok(()),
            Err(fault) => break Err(fault),
        };
        match block.run(key, item, &skip) {
            Ok(value) => acc.push(value),
            Err(fault) if skip.matches(&fault) => continue,
            Err(fault) if stop.matches(&fault) => break Ok(()),
            Err(fault) => break Err(fault),
        }
    };

    // Both ejectors die with the traversal, on every exit path.
    skip.disable();
    stop.disable();
    outcome?;
    Ok(acc)
}

/// Asserts a `for` loop's continuation flag.
///
/// Compiled `for` bodies call this before running logic that must not be
/// attributable to "after the loop already exited".
pub fn validate_for(flag: &Value) -> Result<(), Fault> {
    if flag.truthiness()? {
        Ok(())
    } else {
        Err(Fault::usage(
            "For-loop body isn't valid after for-loop exits.",
        ))
    }
}
