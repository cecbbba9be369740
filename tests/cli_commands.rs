use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;

use odrmetrics::cli::{cmd_check, cmd_remove, cmd_show, cmd_write};
use odrmetrics::{MetricsConfig, MetricsRecord, ReadOptions, RecordError, SubprocessResult};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let base = std::env::temp_dir();
    base.join(format!("odrmtest-cli-{prefix}-{pid}-{t}-{id}"))
}

fn opts() -> ReadOptions {
    ReadOptions::from_runtime().with_max_signal(64)
}

#[test]
fn write_from_json_then_show_and_check() -> Result<()> {
    let root = unique_root("write");
    fs::create_dir_all(&root)?;
    let json = root.join("record.json");
    let path = root.join("odrefresh-metrics.xml");

    let mut r = MetricsRecord::new(77);
    r.stage_reached = 60;
    r.primary_subprocess_result = SubprocessResult::new(1, 0, 0);
    fs::write(&json, serde_json::to_string_pretty(&r)?)?;

    for atomic in [false, true] {
        let cfg = MetricsConfig::default()
            .with_max_signal(Some(64))
            .with_atomic_write(atomic);
        let written = cmd_write(&path, &json, &cfg)?;
        assert_eq!(written, r);

        assert_eq!(cmd_show(&path, &opts(), false)?, r);
        assert_eq!(cmd_show(&path, &opts(), true)?, r);
        assert!(cmd_check(&path, &opts()));
    }
    Ok(())
}

#[test]
fn write_rejects_out_of_range_json() -> Result<()> {
    let root = unique_root("reject");
    fs::create_dir_all(&root)?;
    let json = root.join("record.json");
    let path = root.join("odrefresh-metrics.xml");

    let mut r = MetricsRecord::new(1);
    r.system_server_subprocess_result.exit_code = 300;
    fs::write(&json, serde_json::to_string(&r)?)?;

    let cfg = MetricsConfig::default().with_max_signal(Some(64));
    let err = cmd_write(&path, &json, &cfg).unwrap_err();
    let rec = err.downcast_ref::<RecordError>().expect("codec error");
    assert_eq!(
        rec.to_string(),
        "Odrefresh metric system_server_dex2oat_result.exit-code has a value (300) \
         outside of the expected range ([-1, 255])"
    );
    assert!(!path.exists(), "nothing must be written on validation failure");
    Ok(())
}

#[test]
fn write_rejects_unknown_json_fields() -> Result<()> {
    let root = unique_root("badjson");
    fs::create_dir_all(&root)?;
    let json = root.join("record.json");
    let path = root.join("odrefresh-metrics.xml");

    let mut v = serde_json::to_value(MetricsRecord::new(1))?;
    v["extra_field"] = serde_json::json!(true);
    fs::write(&json, v.to_string())?;

    assert!(cmd_write(&path, &json, &MetricsConfig::default()).is_err());
    assert!(!path.exists());
    Ok(())
}

#[test]
fn check_fails_on_broken_record() -> Result<()> {
    let root = unique_root("check");
    fs::create_dir_all(&root)?;
    let path = root.join("odrefresh-metrics.xml");

    assert!(!cmd_check(&path, &opts()));

    fs::write(&path, "<odrefresh_metrics></odrefresh_metrics>")?;
    assert!(!cmd_check(&path, &opts()));
    assert!(cmd_show(&path, &opts(), false).is_err());
    Ok(())
}

#[test]
fn remove_is_idempotent() -> Result<()> {
    let root = unique_root("remove");
    fs::create_dir_all(&root)?;
    let path = root.join("odrefresh-metrics.xml");

    MetricsRecord::new(5).write_to_file(&path)?;
    assert!(cmd_remove(&path)?);
    assert!(!path.exists());
    assert!(!cmd_remove(&path)?);
    Ok(())
}
