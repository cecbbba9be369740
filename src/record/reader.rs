//! record/reader - разбор и строгая валидация metrics-записи.
//!
//! Правила (fail-fast, первая ошибка в порядке документа выигрывает):
//! 1. Файл читается целиком; пустой/битый документ - Format.
//! 2. Нужен контейнер `odrefresh_metrics` на верхнем уровне.
//! 3. Поля читаются строго по порядку: курсор идёт только вперёд, поэтому поле,
//!    стоящее раньше предыдущего, считается отсутствующим. Посторонние элементы
//!    между ожидаемыми пропускаются.
//! 4. Для каждого поля: наличие -> тип -> диапазон.
//! 5. Версия проверяется сразу после чтения, до всех остальных полей.
//!
//! Частично заполненная запись наружу никогда не возвращается.

use log::debug;
use std::path::Path;
use std::str::FromStr;

use crate::consts::*;
use crate::fs_utils;
use crate::signal::ReadOptions;
use crate::xml::{find_root, parse_bytes, parse_document, Element, ParseError};

use super::{MetricsRecord, RecordError, SubprocessResult};

/// Целочисленный тип поля и его имя для сообщения об ошибке (с артиклем).
trait MetricInt: FromStr + Copy {
    const TYPE_NAME: &'static str;
}

impl MetricInt for i32 {
    const TYPE_NAME: &'static str = "an int32";
}
impl MetricInt for u32 {
    const TYPE_NAME: &'static str = "a uint32";
}
impl MetricInt for u64 {
    const TYPE_NAME: &'static str = "a uint64";
}

/// Строгий разбор десятичного числа; по краям допускаются только XML-пробелы.
fn parse_int<T: MetricInt>(text: &str) -> Option<T> {
    let t = text.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\r' | '\n'));
    if t.is_empty() {
        return None;
    }
    t.parse::<T>().ok()
}

/// Курсор по дочерним элементам контейнера (только вперёд).
struct Fields<'a> {
    children: &'a [Element],
    next: usize,
}

impl<'a> Fields<'a> {
    fn new(children: &'a [Element]) -> Self {
        Self { children, next: 0 }
    }

    fn expect(&mut self, name: &str) -> Result<&'a Element, RecordError> {
        let rest = &self.children[self.next..];
        match rest.iter().position(|e| e.name() == name) {
            Some(off) => {
                self.next += off + 1;
                Ok(&rest[off])
            }
            None => Err(RecordError::MissingField {
                field: name.to_string(),
            }),
        }
    }

    fn int<T: MetricInt>(&mut self, name: &str) -> Result<T, RecordError> {
        let el = self.expect(name)?;
        parse_int::<T>(el.text()).ok_or_else(|| RecordError::NotAnInteger {
            field: name.to_string(),
            type_name: T::TYPE_NAME,
        })
    }

    fn exec_result(&mut self, name: &str, opts: &ReadOptions) -> Result<SubprocessResult, RecordError> {
        let el = self.expect(name)?;
        let status = read_attr(el, name, ATTR_STATUS, EXEC_STATUS_MIN, EXEC_STATUS_MAX)?;
        let exit_code = read_attr(el, name, ATTR_EXIT_CODE, EXIT_CODE_MIN, EXIT_CODE_MAX)?;
        let signal = read_attr(el, name, ATTR_SIGNAL, SIGNAL_MIN, opts.max_signal)?;
        Ok(SubprocessResult::new(status, exit_code, signal))
    }
}

/// Атрибут dex2oat-результата: наличие+тип, затем диапазон.
fn read_attr(el: &Element, field: &str, attr: &str, min: i32, max: i32) -> Result<i32, RecordError> {
    let v = el
        .attribute(attr)
        .and_then(parse_int::<i32>)
        .ok_or_else(|| RecordError::InvalidAttribute {
            field: field.to_string(),
            attribute: attr.to_string(),
        })?;
    check_range(&format!("{}.{}", field, attr), v, min, max)?;
    Ok(v)
}

fn check_range(field: &str, value: i32, min: i32, max: i32) -> Result<(), RecordError> {
    if value < min || value > max {
        return Err(RecordError::OutOfRange {
            field: field.to_string(),
            value: value as i64,
            min: min as i64,
            max: max as i64,
        });
    }
    Ok(())
}

fn check_version(found: i32) -> Result<(), RecordError> {
    if found != METRICS_VERSION {
        return Err(RecordError::VersionMismatch {
            found,
            expected: METRICS_VERSION,
        });
    }
    Ok(())
}

fn check_exec_result(field: &str, r: &SubprocessResult, opts: &ReadOptions) -> Result<(), RecordError> {
    check_range(&format!("{}.{}", field, ATTR_STATUS), r.status, EXEC_STATUS_MIN, EXEC_STATUS_MAX)?;
    check_range(&format!("{}.{}", field, ATTR_EXIT_CODE), r.exit_code, EXIT_CODE_MIN, EXIT_CODE_MAX)?;
    check_range(&format!("{}.{}", field, ATTR_SIGNAL), r.signal, SIGNAL_MIN, opts.max_signal)?;
    Ok(())
}

impl MetricsRecord {
    /// Прочитать запись; граница сигнала берётся из среды исполнения.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        Self::read_from_file_with(path, &ReadOptions::from_runtime())
    }

    /// Прочитать запись с явно заданными параметрами валидации.
    pub fn read_from_file_with(path: impl AsRef<Path>, opts: &ReadOptions) -> Result<Self, RecordError> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        let bytes = fs_utils::read_all(path).map_err(|e| RecordError::io(path, e))?;
        let roots = parse_bytes(&bytes).map_err(|e| format_error(&shown, e))?;
        let record = Self::from_roots(&roots, &shown, opts)?;

        debug!("metrics: read {} ({} bytes)", shown, bytes.len());
        Ok(record)
    }

    /// Разобрать запись из текста. `source` используется только в сообщениях об ошибках.
    pub fn from_xml_str(text: &str, source: &str, opts: &ReadOptions) -> Result<Self, RecordError> {
        let roots = parse_document(text).map_err(|e| format_error(source, e))?;
        Self::from_roots(&roots, source, opts)
    }

    fn from_roots(roots: &[Element], source: &str, opts: &ReadOptions) -> Result<Self, RecordError> {
        let metrics = find_root(roots, TAG_CONTAINER).ok_or_else(|| RecordError::ContainerNotFound {
            path: source.to_string(),
        })?;

        let mut f = Fields::new(&metrics.children);

        // Версия - до всего остального: при несовпадении раскладка полей неизвестна.
        let schema_version: i32 = f.int(TAG_VERSION)?;
        check_version(schema_version)?;

        let apex_build_version: u64 = f.int(TAG_APEX_BUILD_VERSION)?;
        let trigger: i32 = f.int(TAG_TRIGGER)?;
        let stage_reached: i32 = f.int(TAG_STAGE_REACHED)?;
        let status: i32 = f.int(TAG_STATUS)?;
        let cache_free_start_mib: u32 = f.int(TAG_CACHE_FREE_START_MIB)?;
        let cache_free_end_mib: u32 = f.int(TAG_CACHE_FREE_END_MIB)?;
        let primary_compile_millis: u32 = f.int(TAG_PRIMARY_COMPILE_MILLIS)?;
        let secondary_compile_millis: u32 = f.int(TAG_SECONDARY_COMPILE_MILLIS)?;
        let system_server_compile_millis: u32 = f.int(TAG_SYSTEM_SERVER_COMPILE_MILLIS)?;
        let primary_subprocess_result = f.exec_result(TAG_PRIMARY_RESULT, opts)?;
        let secondary_subprocess_result = f.exec_result(TAG_SECONDARY_RESULT, opts)?;
        let system_server_subprocess_result = f.exec_result(TAG_SYSTEM_SERVER_RESULT, opts)?;
        let primary_compile_type: u32 = f.int(TAG_PRIMARY_COMPILE_TYPE)?;
        let secondary_compile_type: u32 = f.int(TAG_SECONDARY_COMPILE_TYPE)?;

        Ok(MetricsRecord {
            schema_version,
            apex_build_version,
            trigger,
            stage_reached,
            status,
            cache_free_start_mib,
            cache_free_end_mib,
            primary_compile_millis,
            secondary_compile_millis,
            system_server_compile_millis,
            primary_subprocess_result,
            secondary_subprocess_result,
            system_server_subprocess_result,
            primary_compile_type,
            secondary_compile_type,
        })
    }

    /// Те же проверки версии и диапазонов, что и при чтении, но для записи в памяти.
    pub fn validate(&self, opts: &ReadOptions) -> Result<(), RecordError> {
        check_version(self.schema_version)?;
        for (name, r) in self.subprocess_results() {
            check_exec_result(name, r, opts)?;
        }
        Ok(())
    }
}

fn format_error(path: &str, source: ParseError) -> RecordError {
    RecordError::Format {
        path: path.to_string(),
        source,
    }
}
