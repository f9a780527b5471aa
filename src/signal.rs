//! Signals and ejectors: the non-local escape mechanism.
//!
//! Every piece of compiled control flow that can exit a scope early (early
//! return, loop break/continue, `escape`/`catch` blocks) is lowered onto one
//! mechanism: create an [`Ejector`] at the start of the scope, run the body,
//! and catch unwinds that carry that ejector's tag. Unwinds are not host
//! panics; they are the [`Fault::Eject`] variant propagated through ordinary
//! `Result` returns, and handlers match by tag identity, never by name.
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::value::Value;

/// Identity of one escape point.
///
/// Tags are allocated from a process-wide counter and never reused, so two
/// ejectors can never be confused even when their scopes are nested or
/// concurrently live siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignalTag(u64);

static NEXT_TAG: AtomicU64 = AtomicU64::new(1);

impl SignalTag {
    fn fresh() -> Self {
        SignalTag(NEXT_TAG.fetch_add(1, Ordering::Relaxed))
    }
}

/// Error channel shared by the whole runtime.
///
/// The two variants are disjoint by design: `Eject` is expected control
/// transfer that some enclosing scope will catch by tag; `Usage` is a
/// contract violation by compiled code and must never be caught by
/// pattern-matching machinery.
#[derive(Debug, Clone, PartialEq)]
pub enum Fault {
    /// A non-local escape in flight, looking for the handler that owns `tag`.
    Eject {
        tag: SignalTag,
        name: Rc<str>,
        payload: Value,
    },
    /// A contract violation. Fatal to the current operation.
    Usage(String),
}

impl Fault {
    pub fn usage(message: impl Into<String>) -> Fault {
        Fault::Usage(message.into())
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Fault::Usage(_))
    }

    /// Converts an escape that reached a scope boundary with no live handler
    /// into the fatal escape-misuse error. Usage faults pass through.
    pub fn into_unhandled(self) -> Fault {
        match self {
            Fault::Eject { name, payload, .. } => Fault::Usage(format!(
                "ejector \"{}\" fired with no enclosing handler (payload: {})",
                name, payload
            )),
            usage => usage,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Eject { name, payload, .. } => {
                write!(f, "<escape via \"{}\": {}>", name, payload)
            }
            Fault::Usage(message) => write!(f, "{}", message),
        }
    }
}

/// A one-scope escape capability.
///
/// Created when its owning scope is entered and disabled when that scope
/// exits, by any path. Firing a disabled ejector is a usage error distinct
/// from the unhandled-escape error: it means compiled code kept the
/// capability alive past its scope.
pub struct Ejector {
    name: Rc<str>,
    tag: SignalTag,
    live: Cell<bool>,
}

impl Ejector {
    pub fn new(name: &str) -> Ejector {
        Ejector {
            name: name.into(),
            tag: SignalTag::fresh(),
            live: Cell::new(true),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> SignalTag {
        self.tag
    }

    pub fn is_live(&self) -> bool {
        self.live.get()
    }

    /// Produces the unwind for this ejector, carrying `payload`.
    ///
    /// The caller is expected to propagate the returned fault immediately;
    /// matcher code does this via [`Ejector::eject`] and `?`.
    pub fn fire(&self, payload: Value) -> Fault {
        if !self.live.get() {
            return Fault::usage(format!(
                "ejector \"{}\" was invoked after its scope exited",
                self.name
            ));
        }
        Fault::Eject {
            tag: self.tag,
            name: self.name.clone(),
            payload,
        }
    }

    /// Fires with `payload` as an `Err`, for use in `?` position.
    pub fn eject<T>(&self, payload: Value) -> Result<T, Fault> {
        Err(self.fire(payload))
    }

    /// Fires with a text payload. This is the match-failure path: the
    /// message describes why the specimen was rejected.
    pub fn fail<T>(&self, message: impl Into<String>) -> Result<T, Fault> {
        Err(self.fire(Value::String(message.into().into())))
    }

    /// Whether `fault` is this ejector's own unwind. Tag identity only.
    pub fn matches(&self, fault: &Fault) -> bool {
        matches!(fault, Fault::Eject { tag, .. } if *tag == self.tag)
    }

    /// Releases ownership. Mandatory when the owning scope exits so a stale
    /// tag can never be fired again.
    pub fn disable(&self) {
        self.live.set(false);
    }
}

impl fmt::Debug for Ejector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ejector({:?}, {:?}, {})",
            self.name,
            self.tag,
            if self.live.get() { "live" } else { "disabled" }
        )
    }
}

/// Runs `body` with a fresh ejector scoped to the call.
///
/// The result is the body's value, or the ejected payload if the body fired
/// the ejector. Every other fault, including ejects belonging to other
/// scopes, passes through unchanged. The ejector is disabled on all paths.
pub fn escape<F>(name: &str, body: F) -> Result<Value, Fault>
where
    F: FnOnce(&Ejector) -> Result<Value, Fault>,
{
    let ejector = Ejector::new(name);
    let outcome = body(&ejector);
    ejector.disable();
    match outcome {
        Err(Fault::Eject { tag, payload, .. }) if tag == ejector.tag() => Ok(payload),
        other => other,
    }
}

/// The `escape e { body } catch p { handler }` form: a caught payload is
/// passed through `handler` instead of being returned directly.
pub fn escape_catch<F, H>(name: &str, body: F, handler: H) -> Result<Value, Fault>
where
    F: FnOnce(&Ejector) -> Result<Value, Fault>,
    H: FnOnce(Value) -> Result<Value, Fault>,
{
    let ejector = Ejector::new(name);
    let outcome = body(&ejector);
    ejector.disable();
    match outcome {
        Err(Fault::Eject { tag, payload, .. }) if tag == ejector.tag() => handler(payload),
        other => other,
    }
}

/// Scope boundary: any escape still in flight here has no handler and
/// becomes the fatal escape-misuse error.
pub fn seal<T>(result: Result<T, Fault>) -> Result<T, Fault> {
    result.map_err(Fault::into_unhandled)
}
