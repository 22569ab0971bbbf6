//! The source buffer and its cursor.
//!
//! TeX input is not tokenized up front: macro expansion rewrites the
//! unread part of the buffer, so the parser reads one character or one
//! control-sequence name at a time straight from a [`Scanner`].

/// Characters skipped between units.
#[must_use]
pub const fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

/// A string plus a byte cursor.
///
/// # Cross-references
/// - [`crate::macro_expander`] replaces the buffer through [`Scanner::splice`].
/// - [`crate::parser::Parser`] owns one scanner per active parse.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    string: String,
    pos: usize,
}

impl Scanner {
    /// Create a scanner positioned at the start of `string`.
    #[must_use]
    pub fn new<S: Into<String>>(string: S) -> Self {
        Self {
            string: string.into(),
            pos: 0,
        }
    }

    /// Current byte offset.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Move the cursor to a byte offset.
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.string.len());
    }

    /// The whole buffer.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.string
    }

    /// The unread part of the buffer.
    #[must_use]
    pub fn remaining(&self) -> &str {
        &self.string[self.pos..]
    }

    /// Whether every character has been consumed.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.pos >= self.string.len()
    }

    /// The character under the cursor.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Consume and return the character under the cursor.
    pub fn next_char(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Step over `bytes` bytes.
    pub fn advance(&mut self, bytes: usize) {
        self.set_position(self.pos + bytes);
    }

    /// Step back over `ch`, which must be the character just consumed.
    pub fn back(&mut self, ch: char) {
        self.pos = self.pos.saturating_sub(ch.len_utf8());
    }

    /// Whether the character under the cursor is whitespace.
    #[must_use]
    pub fn next_is_space(&self) -> bool {
        self.peek().is_some_and(is_space)
    }

    /// Skip whitespace.
    pub fn skip_spaces(&mut self) {
        while self.next_is_space() {
            self.pos += 1;
        }
    }

    /// Skip whitespace and return, without consuming, the next character.
    pub fn get_next(&mut self) -> Option<char> {
        self.skip_spaces();
        self.peek()
    }

    /// Read a control-sequence name; the cursor is just past the `\`.
    ///
    /// A run of ASCII letters forms the name and swallows one following
    /// space. Otherwise the name is the single next character. A `\` at the
    /// very end, or before a line break, reads as a control space.
    pub fn get_cs(&mut self) -> String {
        let rest = self.remaining();
        let letters = rest.bytes().take_while(u8::is_ascii_alphabetic).count();
        if letters > 0 {
            let name = rest[..letters].to_owned();
            self.pos += letters;
            if self.peek() == Some(' ') {
                self.pos += 1;
            }
            return name;
        }
        match self.peek() {
            Some(ch) if ch != '\n' && ch != '\r' => {
                self.pos += ch.len_utf8();
                ch.to_string()
            }
            _ => {
                self.advance(1);
                " ".to_owned()
            }
        }
    }

    /// Skip to the end of the current line.
    pub fn skip_comment(&mut self) {
        match self.remaining().find('\n') {
            Some(offset) => self.pos += offset + 1,
            None => self.pos = self.string.len(),
        }
    }

    /// Replace the consumed part of the buffer with `text`, leaving the
    /// cursor at its start so `text` is read next.
    pub fn splice(&mut self, text: &str) {
        let mut string = String::with_capacity(text.len() + self.string.len() - self.pos);
        string.push_str(text);
        string.push_str(self.remaining());
        self.string = string;
        self.pos = 0;
    }

    /// Insert `text` at the cursor, keeping what was already consumed.
    pub fn insert(&mut self, text: &str) {
        self.string.insert_str(self.pos, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_cs_letters_swallow_one_space() {
        let mut scanner = Scanner::new("alpha  x");
        assert_eq!(scanner.get_cs(), "alpha");
        assert_eq!(scanner.remaining(), " x");
    }

    #[test]
    fn test_get_cs_single_symbol() {
        let mut scanner = Scanner::new(",a");
        assert_eq!(scanner.get_cs(), ",");
        assert_eq!(scanner.remaining(), "a");
        let mut scanner = Scanner::new("\u{3b1}b");
        assert_eq!(scanner.get_cs(), "\u{3b1}");
        assert_eq!(scanner.remaining(), "b");
    }

    #[test]
    fn test_get_cs_at_end_is_control_space() {
        let mut scanner = Scanner::new("");
        assert_eq!(scanner.get_cs(), " ");
        assert!(scanner.at_end());
    }

    #[test]
    fn test_get_next_skips_whitespace() {
        let mut scanner = Scanner::new(" \n\tx");
        assert_eq!(scanner.get_next(), Some('x'));
        assert_eq!(scanner.next_char(), Some('x'));
        assert_eq!(scanner.get_next(), None);
    }

    #[test]
    fn test_splice_restarts_at_inserted_text() {
        let mut scanner = Scanner::new(r"\foo+y");
        scanner.advance(4);
        scanner.splice("x");
        assert_eq!(scanner.as_str(), "x+y");
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn test_comment() {
        let mut scanner = Scanner::new("% note\nx");
        scanner.skip_comment();
        assert_eq!(scanner.peek(), Some('x'));
    }
}
