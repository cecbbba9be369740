//! xml/writer - компактная запись (без пробелов и переводов строк между элементами).

use std::fmt::{Display, Write as _};

/// Накопитель компактного документа.
///
/// Самозакрывающиеся элементы пишутся как `<name a="1" b="2" />` (с пробелом перед `/>`).
#[derive(Debug, Default)]
pub struct XmlWriter {
    out: String,
}

impl XmlWriter {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            out: String::with_capacity(cap),
        }
    }

    pub fn open(&mut self, name: &str) -> &mut Self {
        self.out.push('<');
        self.out.push_str(name);
        self.out.push('>');
        self
    }

    pub fn close(&mut self, name: &str) -> &mut Self {
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
        self
    }

    /// `<name>value</name>`
    pub fn text_element<T: Display>(&mut self, name: &str, value: T) -> &mut Self {
        self.open(name);
        push_escaped(&mut self.out, &value, false);
        self.close(name)
    }

    /// `<name k="v" ... />`
    pub fn empty_element<T: Display>(&mut self, name: &str, attrs: &[(&str, T)]) -> &mut Self {
        self.out.push('<');
        self.out.push_str(name);
        for (k, v) in attrs {
            self.out.push(' ');
            self.out.push_str(k);
            self.out.push_str("=\"");
            push_escaped(&mut self.out, v, true);
            self.out.push('"');
        }
        self.out.push_str(" />");
        self
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Записать Display-значение с экранированием спецсимволов.
/// Числа через это проходят без изменений (fast-path не нужен: записи крошечные).
fn push_escaped(out: &mut String, value: &dyn Display, in_attr: bool) {
    let mut raw = String::new();
    // write! в String не может вернуть ошибку
    let _ = write!(raw, "{}", value);
    for c in raw.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' if in_attr => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
