//! Верхняя граница номера сигнала для dex2oat-результатов.
//!
//! Граница берётся из среды исполнения (SIGRTMAX) в момент валидации, а не вшивается
//! литералом: на разных платформах/libc она разная. Для тестов и вызывающих, которым
//! нужна детерминированность, граница передаётся явно через ReadOptions.

/// Граница для платформ, где SIGRTMAX недоступен через libc.
pub const FALLBACK_MAX_SIGNAL: i32 = 64;

/// Максимальный номер realtime-сигнала текущего процесса.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn max_realtime_signal() -> i32 {
    libc::SIGRTMAX()
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub fn max_realtime_signal() -> i32 {
    FALLBACK_MAX_SIGNAL
}

/// Параметры чтения/валидации записи.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Inclusive upper bound for `SubprocessResult::signal`.
    pub max_signal: i32,
}

impl ReadOptions {
    /// Граница из среды исполнения.
    pub fn from_runtime() -> Self {
        Self {
            max_signal: max_realtime_signal(),
        }
    }

    pub fn with_max_signal(mut self, max_signal: i32) -> Self {
        self.max_signal = max_signal;
        self
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self::from_runtime()
    }
}
