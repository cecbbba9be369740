//! Общие константы формата metrics-записи (версия, пути, имена тегов).

// -------- Version / location --------

/// Версия раскладки полей. Увеличивается при добавлении/удалении/перестановке поля.
pub const METRICS_VERSION: i32 = 4;

/// Default location of the metrics file written by odrefresh.
pub const DEFAULT_METRICS_FILE: &str = "/data/misc/odrefresh/odrefresh-metrics.xml";

// -------- Container --------
pub const TAG_CONTAINER: &str = "odrefresh_metrics";

// -------- Scalar fields (в порядке записи) --------
pub const TAG_VERSION: &str = "odrefresh_metrics_version";
pub const TAG_APEX_BUILD_VERSION: &str = "apex_build_version";
pub const TAG_TRIGGER: &str = "trigger";
pub const TAG_STAGE_REACHED: &str = "stage_reached";
pub const TAG_STATUS: &str = "status";
pub const TAG_CACHE_FREE_START_MIB: &str = "cache_space_free_start_mib";
pub const TAG_CACHE_FREE_END_MIB: &str = "cache_space_free_end_mib";
pub const TAG_PRIMARY_COMPILE_MILLIS: &str = "primary_bcp_compilation_millis";
pub const TAG_SECONDARY_COMPILE_MILLIS: &str = "secondary_bcp_compilation_millis";
pub const TAG_SYSTEM_SERVER_COMPILE_MILLIS: &str = "system_server_compilation_millis";

// -------- dex2oat results (self-closing, attributes only) --------
pub const TAG_PRIMARY_RESULT: &str = "primary_bcp_dex2oat_result";
pub const TAG_SECONDARY_RESULT: &str = "secondary_bcp_dex2oat_result";
pub const TAG_SYSTEM_SERVER_RESULT: &str = "system_server_dex2oat_result";

pub const ATTR_STATUS: &str = "status";
pub const ATTR_EXIT_CODE: &str = "exit-code"; // дефис, не подчёркивание (внешний контракт)
pub const ATTR_SIGNAL: &str = "signal";

// -------- Compilation types --------
pub const TAG_PRIMARY_COMPILE_TYPE: &str = "primary_bcp_compilation_type";
pub const TAG_SECONDARY_COMPILE_TYPE: &str = "secondary_bcp_compilation_type";

// -------- dex2oat result bounds --------

/// ExecResult status value used when the process was not run at all.
/// Must stay above every real exec status (Unknown..StartFailed).
pub const EXEC_RESULT_NOT_RUN: i32 = 5;

pub const EXEC_STATUS_MIN: i32 = 0;
pub const EXEC_STATUS_MAX: i32 = EXEC_RESULT_NOT_RUN;
pub const EXIT_CODE_MIN: i32 = -1; // -1 = killed by signal / no exit code
pub const EXIT_CODE_MAX: i32 = 255;
pub const SIGNAL_MIN: i32 = 0;

// -------- Misc --------

/// Suffix of the temporary file used by atomic writes.
pub const TMP_SUFFIX: &str = ".tmp";
