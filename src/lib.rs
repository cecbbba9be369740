// Базовые модули
pub mod consts;
pub mod config;
pub mod fs_utils;
pub mod props;
pub mod signal;

// Кодек: грамматика тегов + сама metrics-запись
pub mod xml;    // src/xml/{mod,parse,writer}.rs
pub mod record; // src/record/{mod,error,kinds,reader,writer}.rs

// CLI (используется бинарём odrmetrics)
pub mod cli;

// Удобные реэкспорты
pub use config::MetricsConfig;
pub use consts::{DEFAULT_METRICS_FILE, METRICS_VERSION};
pub use record::{
    BcpCompilationType, ExecStatus, MetricsRecord, RecordError, RecordErrorKind, Stage, Status,
    SubprocessResult,
    Trigger,
};
pub use signal::{max_realtime_signal, ReadOptions};
