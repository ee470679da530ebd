//! # Logging Gate
//!
//! Thin layer over [`tracing`] that lets callers silence warnings around code paths
//! where failures are expected (bulk validation of malformed inputs, probing
//! unreachable hosts, ...).
//!
//! Library code logs through the [`info!`](crate::info), [`success!`](crate::success),
//! [`warn!`](crate::warn), [`error!`](crate::error) and [`debug!`](crate::debug) macros
//! exported by this crate. They forward to `tracing` only while the gate is open.
//! Subscriber setup is left to the binary.

use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(test)]
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Target used by [`success!`](crate::success) so formatters can render it differently.
pub const SUCCESS_TARGET: &str = "linkaddr::success";

static LOGS_ENABLED: AtomicBool = AtomicBool::new(true);

/// Stops the crate macros from emitting events until [`enable_logs`] is called.
pub fn suppress_logs() {
    LOGS_ENABLED.store(false, Ordering::Relaxed);
}

/// Re-opens the gate closed by [`suppress_logs`].
pub fn enable_logs() {
    LOGS_ENABLED.store(true, Ordering::Relaxed);
}

pub fn logs_enabled() -> bool {
    LOGS_ENABLED.load(Ordering::Relaxed)
}

/// Scoped form of [`suppress_logs`]: closes the gate and restores the previous
/// state when dropped.
#[must_use = "logs are re-enabled as soon as the guard is dropped"]
pub struct Suppressed {
    previous: bool,
}

impl Suppressed {
    pub fn new() -> Self {
        let previous = LOGS_ENABLED.swap(false, Ordering::Relaxed);
        Self { previous }
    }
}

impl Default for Suppressed {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Suppressed {
    fn drop(&mut self) {
        LOGS_ENABLED.store(self.previous, Ordering::Relaxed);
    }
}

/// Serialises tests that flip or assert on the global gate.
#[cfg(test)]
pub(crate) fn gate_lock() -> MutexGuard<'static, ()> {
    static GATE: Mutex<()> = Mutex::new(());
    GATE.lock().unwrap_or_else(PoisonError::into_inner)
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        if $crate::logging::logs_enabled() {
            ::tracing::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        if $crate::logging::logs_enabled() {
            ::tracing::info!(target: "linkaddr::success", $($arg)*);
        }
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        if $crate::logging::logs_enabled() {
            ::tracing::warn!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        if $crate::logging::logs_enabled() {
            ::tracing::error!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        if $crate::logging::logs_enabled() {
            ::tracing::debug!($($arg)*);
        }
    };
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_toggles_and_guard_restores_previous_state() {
        let _serial = gate_lock();
        enable_logs();
        assert!(logs_enabled());

        suppress_logs();
        assert!(!logs_enabled());
        enable_logs();
        assert!(logs_enabled());

        {
            let _quiet = Suppressed::new();
            assert!(!logs_enabled());
            {
                let _nested = Suppressed::new();
                assert!(!logs_enabled());
            }
            assert!(!logs_enabled(), "inner guard must restore the suppressed state");
        }
        assert!(logs_enabled());

        // macros must be callable in both states
        crate::warn!("visible warning {}", 1);
        let _quiet = Suppressed::new();
        crate::warn!("hidden warning {}", 2);
    }
}
