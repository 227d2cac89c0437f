//! Type aliases for shared state.
//!
//! The mapping engine is a cloneable handle over one lock-guarded state
//! block; this alias names that pattern.
//!
//! ```rust,ignore
//! use starsync_core::types::*;
//!
//! let state: ThreadSafe<EngineState> = thread_safe(EngineState::default());
//! state.lock().rebuild();
//! ```

use parking_lot::Mutex;
use std::sync::Arc;

/// A thread-safe, mutex-protected wrapper for cross-thread sharing.
///
/// Uses `parking_lot::Mutex`, which never poisons.
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// Create a new `ThreadSafe<T>` from a value.
#[inline]
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}
