use std::sync::atomic::{
    AtomicBool,
    Ordering,
};

/// Process-wide cancellation flag, polled at the top of every evaluation
/// step. Setting it makes the next step fail with a semantic error that
/// unwinds to the caller; the REPL worker clears it before each request.
static INTERRUPT: AtomicBool = AtomicBool::new(false);

pub fn request() {
    INTERRUPT.store(true, Ordering::SeqCst);
}

pub fn clear() {
    INTERRUPT.store(false, Ordering::SeqCst);
}

pub fn is_set() -> bool {
    return INTERRUPT.load(Ordering::SeqCst);
}
