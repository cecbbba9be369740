// tests/roundtrip_random.rs
//
// Случайные валидные записи: write -> read должен вернуть то же самое,
// а канонический текст - совпасть байт в байт после повторной записи.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use oorandom::Rand64;

use odrmetrics::{MetricsRecord, ReadOptions, SubprocessResult, METRICS_VERSION};

const MAX_SIGNAL: i32 = 64;

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("odrmtest-rand-{prefix}-{pid}-{t}"))
}

fn range_i32(rng: &mut Rand64, lo: i32, hi: i32) -> i32 {
    let span = (hi as i64 - lo as i64 + 1) as u64;
    (lo as i64 + rng.rand_range(0..span) as i64) as i32
}

fn random_result(rng: &mut Rand64) -> SubprocessResult {
    SubprocessResult::new(
        range_i32(rng, 0, 5),
        range_i32(rng, -1, 255),
        range_i32(rng, 0, MAX_SIGNAL),
    )
}

fn random_record(rng: &mut Rand64) -> MetricsRecord {
    let mut r = MetricsRecord::new(rng.rand_u64());
    // Свободные поля - весь диапазон своего типа.
    r.trigger = rng.rand_i64() as i32;
    r.stage_reached = rng.rand_i64() as i32;
    r.status = rng.rand_i64() as i32;
    r.cache_free_start_mib = rng.rand_u64() as u32;
    r.cache_free_end_mib = rng.rand_u64() as u32;
    r.primary_compile_millis = rng.rand_u64() as u32;
    r.secondary_compile_millis = rng.rand_u64() as u32;
    r.system_server_compile_millis = rng.rand_u64() as u32;
    r.primary_subprocess_result = random_result(rng);
    r.secondary_subprocess_result = random_result(rng);
    r.system_server_subprocess_result = random_result(rng);
    r.primary_compile_type = rng.rand_u64() as u32;
    r.secondary_compile_type = rng.rand_u64() as u32;
    r
}

#[test]
fn random_records_roundtrip() -> Result<()> {
    let root = unique_root("rt");
    fs::create_dir_all(&root)?;
    let path = root.join("odrefresh-metrics.xml");
    let opts = ReadOptions::from_runtime().with_max_signal(MAX_SIGNAL);

    let mut rng = Rand64::new(0x0DEF_2EF2_E5A1_u128);
    for i in 0..200 {
        let r = random_record(&mut rng);
        assert_eq!(r.schema_version, METRICS_VERSION);
        r.validate(&opts)?;

        if i % 2 == 0 {
            r.write_to_file(&path)?;
        } else {
            r.write_to_file_atomic(&path)?;
        }
        let back = MetricsRecord::read_from_file_with(&path, &opts)?;
        assert_eq!(back, r, "iteration {i}");
        assert_eq!(back.to_xml_string(), fs::read_to_string(&path)?);
    }
    Ok(())
}

#[test]
fn extreme_values_roundtrip() -> Result<()> {
    let opts = ReadOptions::from_runtime().with_max_signal(MAX_SIGNAL);
    let mut r = MetricsRecord::new(u64::MAX);
    r.trigger = i32::MIN;
    r.stage_reached = i32::MAX;
    r.status = -1;
    r.cache_free_start_mib = u32::MAX;
    r.primary_subprocess_result = SubprocessResult::new(0, 255, MAX_SIGNAL);
    r.secondary_subprocess_result = SubprocessResult::new(5, -1, 0);

    let back = MetricsRecord::from_xml_str(&r.to_xml_string(), "mem", &opts)?;
    assert_eq!(back, r);
    Ok(())
}
