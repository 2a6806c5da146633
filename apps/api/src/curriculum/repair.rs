//! Tolerant JSON repair for model output that is almost, but not quite, JSON.
//!
//! The repairer walks the text once and re-emits it as strict JSON, fixing
//! the defects models commonly produce:
//! - unquoted keys and bareword values (`{name: Algebra}`)
//! - single or typographic quotes (`'x'`, `“x”`)
//! - trailing, leading and doubled commas
//! - missing commas between members or elements
//! - missing values after a colon
//! - `//` and `/* */` comments
//! - Python literals (`True`, `False`, `None`) and `undefined`/`NaN`
//! - raw control characters inside strings
//! - truncated output (unterminated strings, unclosed containers)
//!
//! The result is meant to be fed straight back into `serde_json`.

use thiserror::Error;

/// Nesting ceiling; deeper input is rejected rather than recursed into.
const MAX_DEPTH: usize = 256;

#[derive(Debug, Error, PartialEq)]
#[error("{message} at position {position}")]
pub struct RepairError {
    pub position: usize,
    pub message: String,
}

/// Rewrites `text` as strict JSON. Content after the first complete value is
/// ignored.
pub fn repair_json(text: &str) -> Result<String, RepairError> {
    let mut repairer = Repairer {
        chars: text.chars().collect(),
        pos: 0,
        out: String::with_capacity(text.len() + 16),
    };
    repairer.skip_insignificant();
    if repairer.peek().is_none() {
        return Err(repairer.error("Unexpected end of input"));
    }
    repairer.value(0)?;
    Ok(repairer.out)
}

struct Repairer {
    chars: Vec<char>,
    pos: usize,
    out: String,
}

impl Repairer {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn error(&self, message: impl Into<String>) -> RepairError {
        RepairError {
            position: self.pos,
            message: message.into(),
        }
    }

    /// Skips whitespace and comments.
    fn skip_insignificant(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => self.pos += 1,
                Some('/') if self.peek_at(1) == Some('/') => {
                    while !matches!(self.peek(), None | Some('\n')) {
                        self.pos += 1;
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    self.pos += 2;
                    while self.peek().is_some()
                        && !(self.peek() == Some('*') && self.peek_at(1) == Some('/'))
                    {
                        self.pos += 1;
                    }
                    self.pos = (self.pos + 2).min(self.chars.len());
                }
                _ => return,
            }
        }
    }

    fn value(&mut self, depth: usize) -> Result<(), RepairError> {
        if depth > MAX_DEPTH {
            return Err(self.error("Maximum nesting depth exceeded"));
        }
        self.skip_insignificant();
        match self.peek() {
            None => Err(self.error("Unexpected end of input")),
            Some('{') => self.object(depth),
            Some('[') => self.array(depth),
            Some(c) if closing_quote(c).is_some() => self.string(),
            Some(c) if c == '-' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if is_word_start(c) => {
                self.bareword();
                Ok(())
            }
            Some(c) => Err(self.error(format!("Unexpected character '{c}'"))),
        }
    }

    fn object(&mut self, depth: usize) -> Result<(), RepairError> {
        self.pos += 1;
        self.out.push('{');
        let mut first = true;
        loop {
            self.skip_insignificant();
            match self.peek() {
                None | Some(']') => break,
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                Some(',') => self.pos += 1,
                Some(_) => {
                    if !first {
                        self.out.push(',');
                    }
                    first = false;
                    self.key()?;
                    self.skip_insignificant();
                    if self.peek() == Some(':') {
                        self.pos += 1;
                        self.skip_insignificant();
                    }
                    self.out.push(':');
                    match self.peek() {
                        None | Some(',') | Some('}') | Some(']') => self.out.push_str("null"),
                        Some(_) => self.value(depth + 1)?,
                    }
                }
            }
        }
        self.out.push('}');
        Ok(())
    }

    fn array(&mut self, depth: usize) -> Result<(), RepairError> {
        self.pos += 1;
        self.out.push('[');
        let mut first = true;
        loop {
            self.skip_insignificant();
            match self.peek() {
                None | Some('}') => break,
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                Some(',') => self.pos += 1,
                Some(_) => {
                    if !first {
                        self.out.push(',');
                    }
                    first = false;
                    self.value(depth + 1)?;
                }
            }
        }
        self.out.push(']');
        Ok(())
    }

    fn key(&mut self) -> Result<(), RepairError> {
        match self.peek() {
            Some(c) if closing_quote(c).is_some() => self.string(),
            Some(c) if matches!(c, '{' | '[') => Err(self.error("Expected object key")),
            _ => {
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if matches!(c, ':' | ',' | '}' | ']' | '\n' | '\r') {
                        break;
                    }
                    self.pos += 1;
                }
                let key: String = self.chars[start..self.pos].iter().collect();
                push_json_string(&mut self.out, key.trim());
                Ok(())
            }
        }
    }

    fn string(&mut self) -> Result<(), RepairError> {
        let open = self.chars[self.pos];
        let close = closing_quote(open).unwrap_or('"');
        self.pos += 1;
        let mut text = String::new();
        loop {
            let Some(c) = self.peek() else { break };
            self.pos += 1;
            if c == close {
                if self.ends_string() {
                    break;
                }
                text.push(c);
                continue;
            }
            if c == '\\' {
                let Some(escaped) = self.peek() else { break };
                self.pos += 1;
                match escaped {
                    'n' => text.push('\n'),
                    't' => text.push('\t'),
                    'r' => text.push('\r'),
                    'b' => text.push('\u{8}'),
                    'f' => text.push('\u{c}'),
                    'u' => match self.unicode_escape() {
                        Some(decoded) => text.push(decoded),
                        None => text.push_str("\\u"),
                    },
                    other => text.push(other),
                }
                continue;
            }
            text.push(c);
        }
        push_json_string(&mut self.out, &text);
        Ok(())
    }

    /// Decides whether a closing quote really terminates the string, or is an
    /// unescaped quote inside it: it terminates when followed by a structural
    /// character, another quote, an unquoted key, or the end of input.
    fn ends_string(&self) -> bool {
        let i = self.skip_whitespace_from(self.pos);
        match self.chars.get(i) {
            None => true,
            Some(&c) if is_word_start(c) => self.unquoted_key_at(i),
            Some(&c) => matches!(c, ',' | '}' | ']' | ':' | '/') || closing_quote(c).is_some(),
        }
    }

    /// True when an identifier starting at `i` is followed by a colon.
    fn unquoted_key_at(&self, mut i: usize) -> bool {
        while self
            .chars
            .get(i)
            .is_some_and(|&c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            i += 1;
        }
        let i = self.skip_whitespace_from(i);
        self.chars.get(i) == Some(&':')
    }

    fn skip_whitespace_from(&self, mut i: usize) -> usize {
        while self.chars.get(i).is_some_and(|c| c.is_whitespace()) {
            i += 1;
        }
        i
    }

    fn unicode_escape(&mut self) -> Option<char> {
        let hex: String = self.chars.get(self.pos..self.pos + 4)?.iter().collect();
        let code = u32::from_str_radix(&hex, 16).ok()?;
        self.pos += 4;
        if (0xD800..0xDC00).contains(&code)
            && self.peek() == Some('\\')
            && self.peek_at(1) == Some('u')
        {
            let low: String = self
                .chars
                .get(self.pos + 2..self.pos + 6)
                .map(|hex| hex.iter().collect())
                .unwrap_or_default();
            if let Ok(low) = u32::from_str_radix(&low, 16) {
                if (0xDC00..0xE000).contains(&low) {
                    self.pos += 6;
                    let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    return char::from_u32(combined);
                }
            }
        }
        Some(char::from_u32(code).unwrap_or('\u{FFFD}'))
    }

    fn number(&mut self) -> Result<(), RepairError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                self.pos += 1;
            } else {
                break;
            }
        }
        // `3 credits` style values glued to letters are text, not numbers.
        if self.peek().is_some_and(is_word_start) {
            self.pos = start;
            self.bareword();
            return Ok(());
        }
        let raw: String = self.chars[start..self.pos].iter().collect();
        let mut fixed = raw.trim_end_matches('.').to_string();
        if let Some(rest) = fixed.strip_prefix("-.") {
            fixed = format!("-0.{rest}");
        } else if fixed.starts_with('.') {
            fixed.insert(0, '0');
        }
        if fixed.parse::<serde_json::Number>().is_ok() {
            self.out.push_str(&fixed);
        } else {
            push_json_string(&mut self.out, &raw);
        }
        Ok(())
    }

    /// An unquoted token: a literal keyword, or text running up to the next
    /// structural character or line break.
    fn bareword(&mut self) {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, ',' | '}' | ']' | '\n' | '\r') {
                break;
            }
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        let word = word.trim();
        match word {
            "true" | "True" => self.out.push_str("true"),
            "false" | "False" => self.out.push_str("false"),
            "null" | "None" | "undefined" | "NaN" | "Infinity" | "-Infinity" => {
                self.out.push_str("null")
            }
            _ => push_json_string(&mut self.out, word),
        }
    }
}

fn closing_quote(open: char) -> Option<char> {
    match open {
        '"' => Some('"'),
        '\'' => Some('\''),
        '\u{201C}' => Some('\u{201D}'),
        '\u{2018}' => Some('\u{2019}'),
        _ => None,
    }
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn push_json_string(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}
