//! Serialised, self-restoring environment mutation.
//!
//! # Examples
//!
//! ```
//! use envgen_test_helpers::env;
//!
//! let mut sandbox = env::sandbox();
//! sandbox.set("APP_PORT", "8080").remove("APP_HOST");
//! assert_eq!(std::env::var("APP_PORT").as_deref(), Ok("8080"));
//! drop(sandbox);
//! // `APP_PORT` and `APP_HOST` are back to their previous state.
//! ```

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Holds the environment lock and remembers every key it changed.
///
/// Keys are restored in reverse order of their first change when the
/// sandbox is dropped, so a key changed twice returns to the value it had
/// before the sandbox touched it.
#[must_use = "dropping restores the environment and releases the lock"]
pub struct Sandbox {
    saved: Vec<(String, Option<OsString>)>,
    _lock: ReentrantMutexGuard<'static, ()>,
}

impl Sandbox {
    /// Acquires the environment lock.
    pub fn new() -> Self {
        Self {
            saved: Vec::new(),
            _lock: ENV_MUTEX.lock(),
        }
    }

    /// Sets `key` to `value`.
    pub fn set<V>(&mut self, key: &str, value: V) -> &mut Self
    where
        V: AsRef<OsStr>,
    {
        self.remember(key);
        // SAFETY: `ENV_MUTEX` is held for the sandbox's lifetime.
        unsafe { env::set_var(key, value) };
        self
    }

    /// Unsets `key`.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.remember(key);
        // SAFETY: `ENV_MUTEX` is held for the sandbox's lifetime.
        unsafe { env::remove_var(key) };
        self
    }

    /// Unsets every variable whose name starts with `prefix`.
    ///
    /// Use this to make sure stray variables from the host do not leak into
    /// a loader under test.
    pub fn clear_prefix(&mut self, prefix: &str) -> &mut Self {
        let keys: Vec<String> = env::vars_os()
            .filter_map(|(key, _)| key.into_string().ok())
            .filter(|key| key.starts_with(prefix))
            .collect();
        for key in keys {
            self.remove(&key);
        }
        self
    }

    /// Number of distinct keys the sandbox will restore.
    #[must_use]
    pub fn touched(&self) -> usize {
        self.saved.len()
    }

    fn remember(&mut self, key: &str) {
        if !self.saved.iter().any(|(saved, _)| saved == key) {
            self.saved.push((key.to_owned(), env::var_os(key)));
        }
    }
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        while let Some((key, original)) = self.saved.pop() {
            match original {
                // SAFETY: `ENV_MUTEX` is still held; `_lock` drops after this.
                Some(value) => unsafe { env::set_var(&key, value) },
                // SAFETY: as above.
                None => unsafe { env::remove_var(&key) },
            }
        }
    }
}

impl fmt::Debug for Sandbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sandbox")
            .field(
                "keys",
                &self.saved.iter().map(|(key, _)| key).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Acquires the environment lock and returns an empty sandbox.
pub fn sandbox() -> Sandbox {
    Sandbox::new()
}

/// Runs `f` with `vars` set, every other variable starting with `prefix`
/// unset, and the previous environment restored afterwards.
///
/// # Examples
/// ```
/// use envgen_test_helpers::env;
///
/// let port = env::with_vars("DEMO_", &[("DEMO_PORT", "9000")], || {
///     std::env::var("DEMO_PORT")
/// });
/// assert_eq!(port.as_deref(), Ok("9000"));
/// ```
#[must_use]
pub fn with_vars<F, R>(prefix: &str, vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let mut sandbox = sandbox();
    sandbox.clear_prefix(prefix);
    for (key, value) in vars {
        sandbox.set(key, value);
    }
    f()
}
