//! record - metrics-запись odrefresh и её текстовый кодек.
//!
//! Разделение:
//! - error.rs  - RecordError (тексты сообщений - внешний контракт).
//! - kinds.rs  - типизированные виды сырых кодов (ExecStatus, Trigger, Stage, Status).
//! - writer.rs - запись: один контейнер, поля строго в порядке структуры.
//! - reader.rs - чтение: порядок полей, тип, диапазон; версия проверяется первой.
//!
//! Порядок и типы полей повторяют атом OdrefreshReported. Любое добавление,
//! удаление или перестановка поля требует увеличить METRICS_VERSION.

mod error;
mod kinds;
mod reader;
mod writer;

use serde::{Deserialize, Serialize};

use crate::consts::{
    EXEC_RESULT_NOT_RUN, METRICS_VERSION, TAG_PRIMARY_RESULT, TAG_SECONDARY_RESULT,
    TAG_SYSTEM_SERVER_RESULT,
};

pub use error::{RecordError, RecordErrorKind};
pub use kinds::{
    compilation_type_label, label, BcpCompilationType, ExecStatus, NamedKind, Stage, Status,
    Trigger,
};

/// Как завершился дочерний процесс dex2oat.
///
/// Три значения приходят готовыми от вызывающего кода (интерпретация wait-status - не наша).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubprocessResult {
    /// 0..=5, see [`ExecStatus`].
    pub status: i32,
    /// -1..=255; -1 when there is no exit code (killed by a signal, not run, ...).
    pub exit_code: i32,
    /// 0..=SIGRTMAX.
    pub signal: i32,
}

impl SubprocessResult {
    pub fn new(status: i32, exit_code: i32, signal: i32) -> Self {
        Self {
            status,
            exit_code,
            signal,
        }
    }

    /// Процесс не запускался.
    pub fn not_run() -> Self {
        Self::new(EXEC_RESULT_NOT_RUN, -1, 0)
    }

    pub fn exec_status(&self) -> Option<ExecStatus> {
        ExecStatus::try_from(self.status).ok()
    }
}

impl Default for SubprocessResult {
    fn default() -> Self {
        Self::not_run()
    }
}

/// Одна metrics-запись прогона odrefresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsRecord {
    pub schema_version: i32,
    pub apex_build_version: u64,
    pub trigger: i32,
    pub stage_reached: i32,
    pub status: i32,
    pub cache_free_start_mib: u32,
    pub cache_free_end_mib: u32,
    pub primary_compile_millis: u32,
    pub secondary_compile_millis: u32,
    pub system_server_compile_millis: u32,
    pub primary_subprocess_result: SubprocessResult,
    pub secondary_subprocess_result: SubprocessResult,
    pub system_server_subprocess_result: SubprocessResult,
    pub primary_compile_type: u32,
    pub secondary_compile_type: u32,
}

impl MetricsRecord {
    /// Свежая запись текущей версии: счётчики в нуле, dex2oat не запускался.
    pub fn new(apex_build_version: u64) -> Self {
        Self {
            schema_version: METRICS_VERSION,
            apex_build_version,
            trigger: Trigger::Unknown.as_i32(),
            stage_reached: Stage::Unknown.as_i32(),
            status: Status::Unknown.as_i32(),
            cache_free_start_mib: 0,
            cache_free_end_mib: 0,
            primary_compile_millis: 0,
            secondary_compile_millis: 0,
            system_server_compile_millis: 0,
            primary_subprocess_result: SubprocessResult::not_run(),
            secondary_subprocess_result: SubprocessResult::not_run(),
            system_server_subprocess_result: SubprocessResult::not_run(),
            primary_compile_type: 0,
            secondary_compile_type: 0,
        }
    }

    /// dex2oat-результаты вместе с именами их тегов, в порядке записи.
    pub fn subprocess_results(&self) -> [(&'static str, &SubprocessResult); 3] {
        [
            (TAG_PRIMARY_RESULT, &self.primary_subprocess_result),
            (TAG_SECONDARY_RESULT, &self.secondary_subprocess_result),
            (TAG_SYSTEM_SERVER_RESULT, &self.system_server_subprocess_result),
        ]
    }
}

impl Default for MetricsRecord {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_record_defaults() {
        let r = MetricsRecord::new(7);
        assert_eq!(r.schema_version, METRICS_VERSION);
        assert_eq!(r.apex_build_version, 7);
        for (_, res) in r.subprocess_results() {
            assert_eq!(*res, SubprocessResult::new(5, -1, 0));
            assert_eq!(res.exec_status(), Some(ExecStatus::NotRun));
        }
        assert_eq!(MetricsRecord::default(), MetricsRecord::new(0));
    }

    #[test]
    fn json_uses_rust_field_names_and_rejects_unknown() {
        let r = MetricsRecord::new(1);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["schema_version"], METRICS_VERSION);
        assert_eq!(v["primary_subprocess_result"]["exit_code"], -1);

        let back: MetricsRecord = serde_json::from_value(v.clone()).unwrap();
        assert_eq!(back, r);

        let mut bad = v;
        bad["bogus"] = serde_json::json!(1);
        assert!(serde_json::from_value::<MetricsRecord>(bad).is_err());
    }
}
