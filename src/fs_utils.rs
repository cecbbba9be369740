// src/fs_utils.rs - файловые примитивы для metrics-записи
//
// - read_all:       открыть, прочитать целиком, закрыть (хэндл живёт только внутри вызова).
// - write_truncate: create+truncate, запись, flush.
// - write_atomic:   <path>.tmp -> sync_all -> rename -> fsync родительского каталога (best-effort).
// - remove_if_exists.
//
// Ошибки возвращаются как std::io::Error без обёрток: кодек сам добавляет путь.

use log::warn;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::consts::TMP_SUFFIX;

#[cfg(unix)]
fn fsync_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let dir = File::open(parent)?;
            dir.sync_all()?;
        }
    }
    Ok(())
}
#[cfg(not(unix))]
fn fsync_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// `<path>.tmp` рядом с целевым файлом.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(TMP_SUFFIX);
    PathBuf::from(name)
}

/// Прочитать файл целиком (кодировку проверяет парсер).
pub fn read_all(path: &Path) -> io::Result<Vec<u8>> {
    let mut f = File::open(path)?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Создать/усечь файл и записать содержимое.
pub fn write_truncate(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    f.write_all(bytes)?;
    f.flush()
}

/// Атомарная замена файла через tmp+rename.
///
/// Читатель видит либо старое, либо новое содержимое целиком.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = tmp_path(path);
    let _ = fs::remove_file(&tmp); // best-effort

    {
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    if let Err(e) = fsync_dir(path) {
        warn!("fsync of parent dir for {} failed: {}", path.display(), e);
    }
    Ok(())
}

/// Удалить файл; Ok(false), если его и не было.
pub fn remove_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
