//! xml - минимальная грамматика тегов для metrics-файла.
//!
//! Разделение:
//! - parse.rs  - разбор документа в дерево Element (толерантен к пробелам/переводам строк,
//!               прологу `<?...?>`, комментариям, CDATA и стандартным сущностям).
//! - writer.rs - компактная каноническая запись (без пробелов между элементами).
//!
//! Это не полноценный XML: нет пространств имён, DTD и внешних сущностей.
//! Ровно то, что пишет кодек, плюс то, что может выдать другой совместимый писатель.

mod parse;
mod writer;

pub use parse::{parse_bytes, parse_document, ParseError};
pub use writer::XmlWriter;

/// Элемент дерева: имя, атрибуты в порядке документа, прямой текст и дочерние элементы.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    /// The element's leading text node (text or CDATA), entities decoded.
    /// Empty when the content starts with a comment, PI or child element.
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Значение атрибута по имени (первое вхождение).
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Первый элемент верхнего уровня с данным именем.
pub fn find_root<'a>(roots: &'a [Element], name: &str) -> Option<&'a Element> {
    roots.iter().find(|e| e.name == name)
}
