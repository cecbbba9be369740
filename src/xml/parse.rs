//! xml/parse - разбор документа в дерево элементов.
//!
//! Поддерживается:
//! - пролог `<?xml ...?>` и прочие processing instructions (пропускаются);
//! - комментарии `<!-- ... -->`, `<!DOCTYPE ...>` без внутреннего подмножества;
//! - произвольные пробелы/переводы строк между тегами;
//! - атрибуты в двойных или одинарных кавычках, `<a/>` и `<a />`;
//! - сущности &lt; &gt; &amp; &quot; &apos; и числовые &#NN; / &#xHH;;
//! - CDATA (как текстовый узел);
//! - текст элемента - только его ведущий текстовый узел, как у tinyxml2 GetText.
//!
//! Любое нарушение структуры - ParseError с номером строки/колонки.

use thiserror::Error;

use super::Element;

/// Жёсткий предел вложенности, чтобы враждебный файл не сорвал стек.
const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} at line {line}, column {column}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub reason: String,
}

/// Разобрать документ. Возвращает элементы верхнего уровня в порядке документа.
///
/// Пустой документ (или только пробелы/комментарии) - ошибка.
pub fn parse_document(input: &str) -> Result<Vec<Element>, ParseError> {
    let mut p = Parser::new(input);
    if p.starts_with("\u{feff}") {
        p.pos += '\u{feff}'.len_utf8();
    }

    let mut roots = Vec::new();
    loop {
        p.skip_ws();
        if p.at_end() {
            break;
        }
        if p.starts_with("<?") {
            p.skip_until("?>", "unterminated processing instruction")?;
        } else if p.starts_with("<!--") {
            p.skip_until("-->", "unterminated comment")?;
        } else if p.starts_with("<!DOCTYPE") || p.starts_with("<!doctype") {
            p.skip_until(">", "unterminated DOCTYPE declaration")?;
        } else if p.starts_with("</") {
            return Err(p.error("closing tag without matching opening tag"));
        } else if p.peek() == Some(b'<') {
            roots.push(p.parse_element(0)?);
        } else {
            return Err(p.error("text outside of an element"));
        }
    }

    if roots.is_empty() {
        return Err(p.error("empty document"));
    }
    Ok(roots)
}

/// То же, что parse_document, но для сырых байт: невалидный UTF-8 - ParseError
/// с позицией первого плохого байта.
pub fn parse_bytes(input: &[u8]) -> Result<Vec<Element>, ParseError> {
    match std::str::from_utf8(input) {
        Ok(text) => parse_document(text),
        Err(e) => {
            let valid = &input[..e.valid_up_to()];
            // Префикс до valid_up_to() гарантированно валиден
            let prefix = std::str::from_utf8(valid).unwrap_or_default();
            let p = Parser::new(prefix);
            Err(p.error_at(prefix.len(), "invalid UTF-8"))
        }
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    #[inline]
    fn starts_with(&self, s: &str) -> bool {
        self.src[self.pos..].starts_with(s)
    }

    /// Пропустить пробелы; true, если хотя бы один был.
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !matches!(b, b' ' | b'\t' | b'\r' | b'\n') {
                break;
            }
            self.pos += 1;
        }
        self.pos > start
    }

    /// Сдвинуться за ближайший `terminator` (включительно).
    fn skip_until(&mut self, terminator: &str, reason: &str) -> Result<(), ParseError> {
        match self.src[self.pos..].find(terminator) {
            Some(off) => {
                self.pos += off + terminator.len();
                Ok(())
            }
            None => Err(self.error(reason)),
        }
    }

    fn expect(&mut self, b: u8, reason: &str) -> Result<(), ParseError> {
        if self.peek() == Some(b) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(reason))
        }
    }

    fn parse_name(&mut self) -> Result<&'a str, ParseError> {
        let start = self.pos;
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' || b == b':' || b >= 0x80 => {
                self.pos += 1;
            }
            _ => return Err(self.error("expected a name")),
        }
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || matches!(b, b'_' | b':' | b'-' | b'.') || b >= 0x80 {
                self.pos += 1;
            } else {
                break;
            }
        }
        Ok(&self.src[start..self.pos])
    }

    fn parse_attribute(&mut self) -> Result<(String, String), ParseError> {
        let name = self.parse_name()?.to_string();
        self.skip_ws();
        self.expect(b'=', "expected '=' after attribute name")?;
        self.skip_ws();

        let quote = match self.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.error("expected quoted attribute value")),
        };
        self.pos += 1;
        let start = self.pos;
        let len = match self.src[start..].find(quote as char) {
            Some(len) => len,
            None => return Err(self.error("unterminated attribute value")),
        };
        let raw = &self.src[start..start + len];
        if raw.contains('<') {
            return Err(self.error_at(start, "'<' in attribute value"));
        }

        let mut value = String::with_capacity(raw.len());
        decode_entities(raw, &mut value).map_err(|r| self.error_at(start, &r))?;
        self.pos = start + len + 1;
        Ok((name, value))
    }

    fn parse_element(&mut self, depth: usize) -> Result<Element, ParseError> {
        if depth >= MAX_DEPTH {
            return Err(self.error("elements nested too deeply"));
        }
        self.expect(b'<', "expected '<'")?;
        let mut el = Element::new(self.parse_name()?);

        // Атрибуты до '>' или '/>'
        loop {
            let had_ws = self.skip_ws();
            match self.peek() {
                Some(b'/') => {
                    self.pos += 1;
                    self.expect(b'>', "expected '>' after '/'")?;
                    return Ok(el);
                }
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                None => return Err(self.error(&format!("unterminated tag <{}>", el.name))),
                Some(_) => {
                    if !had_ws {
                        return Err(self.error("expected whitespace before attribute"));
                    }
                    let attr_pos = self.pos;
                    let (k, v) = self.parse_attribute()?;
                    if el.attribute(&k).is_some() {
                        return Err(self.error_at(attr_pos, &format!("duplicate attribute '{}'", k)));
                    }
                    el.attributes.push((k, v));
                }
            }
        }

        // Содержимое до парного закрывающего тега.
        // В text попадает только первый узел содержимого, если это текст или CDATA;
        // всё после комментария/PI/дочернего элемента проверяется, но не склеивается.
        let mut leading = true;
        let mut scratch = String::new();
        loop {
            if self.at_end() {
                return Err(self.error(&format!("missing closing tag </{}>", el.name)));
            }
            if self.starts_with("</") {
                let close_pos = self.pos;
                self.pos += 2;
                let close = self.parse_name()?;
                if close != el.name {
                    return Err(self.error_at(
                        close_pos,
                        &format!("mismatched closing tag </{}> for <{}>", close, el.name),
                    ));
                }
                self.skip_ws();
                self.expect(b'>', "expected '>' in closing tag")?;
                return Ok(el);
            }
            if self.starts_with("<!--") {
                self.skip_until("-->", "unterminated comment")?;
                leading = false;
                continue;
            }
            if self.starts_with("<![CDATA[") {
                let start = self.pos + "<![CDATA[".len();
                self.skip_until("]]>", "unterminated CDATA section")?;
                if leading {
                    el.text.push_str(&self.src[start..self.pos - "]]>".len()]);
                }
                leading = false;
                continue;
            }
            if self.starts_with("<?") {
                self.skip_until("?>", "unterminated processing instruction")?;
                leading = false;
                continue;
            }
            if self.peek() == Some(b'<') {
                let child = self.parse_element(depth + 1)?;
                el.children.push(child);
                leading = false;
                continue;
            }

            let start = self.pos;
            let len = self.src[start..].find('<').unwrap_or(self.src.len() - start);
            self.pos = start + len;
            let out = if leading { &mut el.text } else { &mut scratch };
            decode_entities(&self.src[start..self.pos], out).map_err(|r| self.error_at(start, &r))?;
            scratch.clear();
            leading = false;
        }
    }

    fn error(&self, reason: &str) -> ParseError {
        self.error_at(self.pos, reason)
    }

    fn error_at(&self, pos: usize, reason: &str) -> ParseError {
        let pos = pos.min(self.src.len());
        let before = &self.src[..pos];
        let line = before.matches('\n').count() + 1;
        let column = before
            .rsplit('\n')
            .next()
            .map(|s| s.chars().count())
            .unwrap_or(0)
            + 1;
        ParseError {
            line,
            column,
            reason: reason.to_string(),
        }
    }
}

/// Декодировать сущности в `raw` и дописать результат в `out`.
fn decode_entities(raw: &str, out: &mut String) -> Result<(), String> {
    let mut rest = raw;
    while let Some(i) = rest.find('&') {
        out.push_str(&rest[..i]);
        let after = &rest[i + 1..];
        let end = after
            .find(';')
            .ok_or_else(|| "unterminated entity reference".to_string())?;
        let ent = &after[..end];
        let ch = match ent {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "quot" => '"',
            "apos" => '\'',
            _ if ent.starts_with("#x") || ent.starts_with("#X") => {
                u32::from_str_radix(&ent[2..], 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| format!("invalid character reference &{};", ent))?
            }
            _ if ent.starts_with('#') => ent[1..]
                .parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| format!("invalid character reference &{};", ent))?,
            _ => return Err(format!("unknown entity &{};", ent)),
        };
        out.push(ch);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(())
}
