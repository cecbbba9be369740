//! props - перечисление пар ключ/значение конфигурации.
//!
//! Источник вызывает visitor по разу на каждую пару; порядок не гарантируется,
//! вызывать источник изнутри visitor нельзя.

use std::collections::BTreeMap;

pub trait PropertySource {
    fn for_each(&self, visitor: &mut dyn FnMut(&str, &str));
}

/// Переменные окружения процесса с заданным префиксом.
///
/// Ключи отдаются как есть (вместе с префиксом). Пары, не являющиеся UTF-8, пропускаются.
#[derive(Debug, Clone)]
pub struct EnvProperties {
    pub prefix: String,
}

impl EnvProperties {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl PropertySource for EnvProperties {
    fn for_each(&self, visitor: &mut dyn FnMut(&str, &str)) {
        for (k, v) in std::env::vars_os() {
            let (Some(k), Some(v)) = (k.to_str(), v.to_str()) else {
                continue;
            };
            if k.starts_with(&self.prefix) {
                visitor(k, v);
            }
        }
    }
}

/// Пары из памяти.
#[derive(Debug, Clone, Default)]
pub struct MapProperties {
    map: BTreeMap<String, String>,
}

impl MapProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.map.insert(key.into(), value.into());
        self
    }
}

impl PropertySource for MapProperties {
    fn for_each(&self, visitor: &mut dyn FnMut(&str, &str)) {
        for (k, v) in &self.map {
            visitor(k, v);
        }
    }
}

/// Собрать все пары источника в упорядоченную карту (последнее значение ключа выигрывает).
pub fn collect_properties(src: &dyn PropertySource) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    src.for_each(&mut |k, v| {
        out.insert(k.to_string(), v.to_string());
    });
    out
}
