//! Команды CLI. Каждая принимает уже разрешённый путь/конфиг, чтобы их можно было
//! вызывать из тестов без разбора argv.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::config::MetricsConfig;
use crate::consts::*;
use crate::fs_utils;
use crate::record::{
    compilation_type_label, label, ExecStatus, MetricsRecord, Stage, Status, SubprocessResult,
    Trigger,
};
use crate::signal::ReadOptions;

/// Человекочитаемый вид записи; коды перечислений дополнены именами.
pub fn render_text(r: &MetricsRecord) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "odrefresh metrics (version {})", r.schema_version);
    let mut line = |k: &str, v: String| {
        let _ = writeln!(s, "  {:<34} = {}", k, v);
    };

    line(TAG_APEX_BUILD_VERSION, format!("{:#018x}", r.apex_build_version));
    line(TAG_TRIGGER, format!("{} ({})", r.trigger, label::<Trigger>(r.trigger)));
    line(TAG_STAGE_REACHED, format!("{} ({})", r.stage_reached, label::<Stage>(r.stage_reached)));
    line(TAG_STATUS, format!("{} ({})", r.status, label::<Status>(r.status)));
    line(TAG_CACHE_FREE_START_MIB, r.cache_free_start_mib.to_string());
    line(TAG_CACHE_FREE_END_MIB, r.cache_free_end_mib.to_string());
    line(TAG_PRIMARY_COMPILE_MILLIS, r.primary_compile_millis.to_string());
    line(TAG_SECONDARY_COMPILE_MILLIS, r.secondary_compile_millis.to_string());
    line(TAG_SYSTEM_SERVER_COMPILE_MILLIS, r.system_server_compile_millis.to_string());
    for (name, res) in r.subprocess_results() {
        line(name, render_exec_result(res));
    }
    line(
        TAG_PRIMARY_COMPILE_TYPE,
        format!("{} ({})", r.primary_compile_type, compilation_type_label(r.primary_compile_type)),
    );
    line(
        TAG_SECONDARY_COMPILE_TYPE,
        format!("{} ({})", r.secondary_compile_type, compilation_type_label(r.secondary_compile_type)),
    );
    s
}

fn render_exec_result(res: &SubprocessResult) -> String {
    format!(
        "{}={} ({}) {}={} {}={}",
        ATTR_STATUS,
        res.status,
        label::<ExecStatus>(res.status),
        ATTR_EXIT_CODE,
        res.exit_code,
        ATTR_SIGNAL,
        res.signal
    )
}

/// show: прочитать и напечатать запись.
pub fn cmd_show(path: &Path, opts: &ReadOptions, json: bool) -> Result<MetricsRecord> {
    let record = MetricsRecord::read_from_file_with(path, opts)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print!("{}", render_text(&record));
    }
    Ok(record)
}

/// check: "ok" в stdout либо текст ошибки кодека в stderr. Возвращает успех.
pub fn cmd_check(path: &Path, opts: &ReadOptions) -> bool {
    match MetricsRecord::read_from_file_with(path, opts) {
        Ok(_) => {
            println!("ok");
            true
        }
        Err(e) => {
            eprintln!("{}", e);
            false
        }
    }
}

/// write: JSON -> валидация -> запись (атомарно, если включено в конфиге).
pub fn cmd_write(path: &Path, from_json: &Path, cfg: &MetricsConfig) -> Result<MetricsRecord> {
    let text = fs::read_to_string(from_json)
        .with_context(|| format!("read {}", from_json.display()))?;
    let record: MetricsRecord = serde_json::from_str(&text)
        .with_context(|| format!("parse JSON record from {}", from_json.display()))?;

    record.validate(&cfg.read_options())?;

    if cfg.atomic_write {
        record.write_to_file_atomic(path)?;
    } else {
        record.write_to_file(path)?;
    }
    println!("Wrote metrics record to {}", path.display());
    Ok(record)
}

/// remove: удалить файл записи (потребитель делает это после отправки).
pub fn cmd_remove(path: &Path) -> Result<bool> {
    let removed = fs_utils::remove_if_exists(path)
        .with_context(|| format!("remove {}", path.display()))?;
    if removed {
        println!("Removed {}", path.display());
    } else {
        println!("No metrics record at {}", path.display());
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_rendering_names_known_codes() {
        let mut r = MetricsRecord::new(0x0123_3456_789a_bcde);
        r.trigger = 2;
        r.stage_reached = 60;
        r.status = 99;
        r.primary_subprocess_result = SubprocessResult::new(2, -1, 9);
        r.primary_compile_type = 2;
        r.secondary_compile_type = 1;
        let out = render_text(&r);
        assert!(out.starts_with("odrefresh metrics (version 4)\n"));
        assert!(out.contains("0x01233456789abcde"));
        assert!(out.contains("= 2 (dex_files_changed)"));
        assert!(out.contains("= 60 (complete)"));
        assert!(out.contains("= 99 (?)"));
        assert!(out.contains("status=2 (signaled) exit-code=-1 signal=9"));
        assert!(out.contains("status=5 (not_run) exit-code=-1 signal=0"));
        assert!(out.contains("= 2 (mainline)"));
        assert!(out.contains("= 1 (primary_and_mainline)"));
    }
}
