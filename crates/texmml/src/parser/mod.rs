//! The parser engine.
//!
//! A [`Parser`] reads its source one character at a time and turns each
//! into stack operations:
//!
//! - letters, digits and other characters become token nodes
//! - `{`, `}`, `^`, `_`, `'`, `&`, `~`, `#` and `%` have fixed meanings
//! - `\name` is looked up in the user definitions, then the delimiters,
//!   then the command table of the enabled packages, then the symbol
//!   tables; anything else is an undefined control sequence
//!
//! Arguments are read as raw text and parsed by a nested parser that
//! shares the document state and the substitution counter.
//!
//! # Cross-references
//! - [`crate::stack`] combines the pushed items into nodes.
//! - [`crate::macro_expander`] splices macro bodies into the source.
//! - [`parse_util`] holds node builders shared by the handlers.

pub mod parse_util;

use core::mem;

use crate::context::ParseContext;
use crate::define_function::CommandEntry;
use crate::functions;
use crate::lexer::{Scanner, is_space};
use crate::macro_expander;
use crate::macros::UserCommand;
use crate::mathml_tree::{MathNode, MathNodeType};
use crate::stack::{Env, ItemFactory, ItemKind, Stack, StackGlobal, StackItem};
use crate::symbols::{self, MATHCHAR0MI, MATHCHAR0MO, MATHCHAR7, REMAP};
use crate::types::{ParseError, ParseErrorKind};
use crate::units::match_dimen;

/// One parse of one piece of source.
pub struct Parser<'p, 'a> {
    /// The source buffer.
    pub scanner: Scanner,
    /// Frames of this parse.
    pub stack: Stack,
    /// Document state.
    pub ctx: &'p mut ParseContext<'a>,
    /// Control sequence being handled, for error messages.
    pub current_cs: String,
}

impl<'p, 'a> Parser<'p, 'a> {
    /// A parser over `text` whose outermost scope has `env`.
    pub fn new<S: Into<String>>(
        text: S,
        env: Env,
        is_inner: bool,
        ctx: &'p mut ParseContext<'a>,
    ) -> Self {
        Self {
            scanner: Scanner::new(text),
            stack: Stack::new(env, is_inner),
            ctx,
            current_cs: String::new(),
        }
    }

    /// Consume the whole source.
    pub fn parse(&mut self) -> Result<(), ParseError> {
        while let Some(ch) = self.scanner.next_char() {
            self.parse_char(ch)?;
        }
        Ok(())
    }

    /// Close the parse and return its node with the final stack flags.
    pub fn finish(mut self) -> Result<(MathNode, StackGlobal), ParseError> {
        self.push(ItemFactory::create(ItemKind::Stop))?;
        let global = self.stack.global.clone();
        let node = self
            .stack
            .into_result()
            .unwrap_or_else(|| MathNode::inferred_row(Vec::new()));
        Ok((node, global))
    }

    /// Parse `text` in a nested parser with the given env.
    pub fn sub_parse_with_globals(
        &mut self,
        text: &str,
        env: Env,
    ) -> Result<(MathNode, StackGlobal), ParseError> {
        let mut parser = Parser::new(text, env, true, &mut *self.ctx);
        parser.parse()?;
        parser.finish()
    }

    /// Parse `text` in a nested parser that inherits the current env.
    pub fn sub_parse(&mut self, text: &str) -> Result<MathNode, ParseError> {
        let env = self.stack.env().clone();
        Ok(self.sub_parse_with_globals(text, env)?.0)
    }

    /// Handle one character of source.
    pub fn parse_char(&mut self, ch: char) -> Result<(), ParseError> {
        match ch {
            '\\' => {
                let name = self.scanner.get_cs();
                self.control_sequence(&name)
            }
            '{' => self.push(ItemFactory::create(ItemKind::Open)),
            '}' => self.push(ItemFactory::create(ItemKind::Close)),
            '^' => functions::superscript(self),
            '_' => functions::subscript(self),
            '\'' | '\u{2019}' => functions::prime(self, ch),
            '&' => functions::entry(self, "&"),
            '~' => self.push_node(MathNode::text("\u{a0}")),
            '#' => Err(ParseErrorKind::CantUseHash.into()),
            '%' => {
                self.scanner.skip_comment();
                Ok(())
            }
            '\u{a0}' => Ok(()),
            ch if is_space(ch) => Ok(()),
            ch if ch.is_ascii_alphabetic() => self.variable(ch),
            ch if ch.is_ascii_digit() || ch == '.' => self.digit(ch),
            ch => self.other(ch),
        }
    }

    fn font_token(&self, kind: MathNodeType, text: String) -> MathNode {
        let mut node = MathNode::token(kind, text);
        if let Some(font) = self.stack.env().font {
            node.set_attribute("mathvariant", font.as_ref());
        }
        node
    }

    fn variable(&mut self, ch: char) -> Result<(), ParseError> {
        let mut text = ch.to_string();
        if self.stack.env().multi_letter {
            let rest = self.scanner.remaining();
            let run = rest.bytes().take_while(u8::is_ascii_alphabetic).count();
            text.push_str(&rest[..run]);
            self.scanner.advance(run);
        }
        let node = self.font_token(MathNodeType::Mi, text);
        self.push_node(node)
    }

    fn digit(&mut self, ch: char) -> Result<(), ParseError> {
        let start = self.scanner.position() - ch.len_utf8();
        let rest = &self.scanner.as_str()[start..];
        let node = match self.ctx.settings.digits.match_number(rest) {
            Some(len) => {
                let text: String = rest[..len].chars().filter(|c| !matches!(c, '{' | '}')).collect();
                self.scanner.set_position(start + len);
                self.font_token(MathNodeType::Mn, text)
            }
            None => self.font_token(MathNodeType::Mo, ch.to_string()),
        };
        self.push_node(node)
    }

    fn other(&mut self, ch: char) -> Result<(), ParseError> {
        let text = REMAP
            .get(&ch)
            .map_or_else(|| ch.to_string(), |remapped| (*remapped).to_owned());
        let kind = if ch.is_alphabetic() {
            MathNodeType::Mi
        } else if ch.is_numeric() {
            MathNodeType::Mn
        } else {
            MathNodeType::Mo
        };
        let mut node = self.font_token(kind, text);
        if matches!(ch, '(' | ')' | '[' | ']' | '|' | '/') {
            node.set_attribute("stretchy", "false");
        }
        self.push_node(node)
    }

    /// Resolve and run `\name`.
    pub fn control_sequence(&mut self, name: &str) -> Result<(), ParseError> {
        match self.ctx.commands.get(name).cloned() {
            Some(UserCommand::Macro(def)) => macro_expander::expand_macro(self, name, &def),
            Some(UserCommand::Builtin(target)) => self.builtin(&target),
            Some(UserCommand::Char(ch)) => self.parse_char(ch),
            None => self.builtin(name),
        }
    }

    fn builtin(&mut self, name: &str) -> Result<(), ParseError> {
        let cs = format!("\\{name}");
        if let Some(delim) = symbols::delimiter(&cs) {
            let node = MathNode::token(MathNodeType::Mo, delim)
                .with_attr("fence", "false")
                .with_attr("stretchy", "false");
            return self.push_node(node);
        }
        let tex = self.ctx.tex;
        let settings = self.ctx.settings;
        if let Some(entry) = tex.function(name, settings) {
            return match entry {
                CommandEntry::Command(handler) => {
                    let saved = mem::replace(&mut self.current_cs, cs.clone());
                    let result = handler.apply(self, &cs);
                    self.current_cs = saved;
                    result
                }
                CommandEntry::Macro(def) => macro_expander::expand_macro(self, name, def),
            };
        }
        if let Some(symbol) = MATHCHAR0MI.get(name) {
            let mut node = MathNode::token(MathNodeType::Mi, symbol.text);
            if let Some(variant) = symbol.variant {
                node.set_attribute("mathvariant", variant.as_ref());
            }
            node.properties.tex_class = symbol.class;
            return self.push_node(node);
        }
        if let Some(symbol) = MATHCHAR0MO.get(name) {
            let mut node = MathNode::token(MathNodeType::Mo, symbol.text).with_attr("stretchy", "false");
            if let Some(variant) = symbol.variant {
                node.set_attribute("mathvariant", variant.as_ref());
            }
            node.properties.tex_class = symbol.class;
            if symbol.movesupsub {
                node.properties.movesupsub = Some(true);
            }
            return self.push_node(node);
        }
        if let Some(symbol) = MATHCHAR7.get(name) {
            let variant = self
                .stack
                .env()
                .font
                .as_ref()
                .map_or("normal", AsRef::as_ref);
            let node = MathNode::token(MathNodeType::Mi, symbol.text).with_attr("mathvariant", variant);
            return self.push_node(node);
        }
        Err(ParseErrorKind::UndefinedControlSequence { name: cs }.into())
    }

    /// Push a frame.
    pub fn push(&mut self, item: StackItem) -> Result<(), ParseError> {
        self.stack.push(item, self.ctx)
    }

    /// Push a node; an inferred row is pushed child by child.
    pub fn push_node(&mut self, node: MathNode) -> Result<(), ParseError> {
        if node.is_inferred() {
            for child in node.children.into_iter().flatten() {
                self.push_node(child)?;
            }
            return Ok(());
        }
        self.push(StackItem::Mml(node))
    }

    /// Push several nodes in order.
    pub fn push_all<I: IntoIterator<Item = MathNode>>(&mut self, nodes: I) -> Result<(), ParseError> {
        for node in nodes {
            self.push_node(node)?;
        }
        Ok(())
    }

    /// The next non-space character, not consumed.
    pub fn get_next(&mut self) -> Option<char> {
        self.scanner.get_next()
    }

    /// Read a control-sequence name; the cursor is just past the `\`.
    pub fn get_cs(&mut self) -> String {
        self.scanner.get_cs()
    }

    /// Consume a `*` if one comes next.
    pub fn get_star(&mut self) -> bool {
        if self.get_next() == Some('*') {
            self.scanner.advance(1);
            true
        } else {
            false
        }
    }

    /// Read a mandatory argument as raw text: a braced group, a control
    /// sequence or a single character.
    pub fn get_argument(&mut self) -> Result<String, ParseError> {
        match self.get_next() {
            None => Err(ParseErrorKind::MissingArgFor {
                name: self.current_cs.clone(),
            }
            .into()),
            Some('}') => Err(ParseErrorKind::ExtraCloseMissingOpen.into()),
            Some('\\') => {
                self.scanner.advance(1);
                Ok(format!("\\{}", self.get_cs()))
            }
            Some('{') => {
                self.scanner.advance(1);
                let start = self.scanner.position();
                let mut depth = 1_usize;
                while let Some(ch) = self.scanner.next_char() {
                    match ch {
                        '\\' => {
                            self.scanner.next_char();
                        }
                        '{' => depth += 1,
                        '}' => {
                            depth -= 1;
                            if depth == 0 {
                                let end = self.scanner.position() - 1;
                                return Ok(self.scanner.as_str()[start..end].to_owned());
                            }
                        }
                        _ => {}
                    }
                }
                Err(ParseErrorKind::MissingCloseBrace.into())
            }
            Some(_) => Ok(self.scanner.next_char().map(String::from).unwrap_or_default()),
        }
    }

    /// Read an optional bracketed argument.
    pub fn get_brackets(&mut self) -> Result<Option<String>, ParseError> {
        if self.get_next() != Some('[') {
            return Ok(None);
        }
        self.scanner.advance(1);
        let start = self.scanner.position();
        let mut depth = 0_usize;
        while let Some(ch) = self.scanner.next_char() {
            match ch {
                '{' => depth += 1,
                '\\' => {
                    self.scanner.next_char();
                }
                '}' => {
                    if depth == 0 {
                        return Err(ParseErrorKind::ExtraCloseLooking {
                            token: "']'".to_owned(),
                        }
                        .into());
                    }
                    depth -= 1;
                }
                ']' if depth == 0 => {
                    let end = self.scanner.position() - 1;
                    return Ok(Some(self.scanner.as_str()[start..end].to_owned()));
                }
                _ => {}
            }
        }
        Err(ParseErrorKind::MissingCloseBracket {
            name: self.current_cs.clone(),
        }
        .into())
    }

    /// Read a delimiter and return its text.
    ///
    /// With `brace_ok` a braced group holding a delimiter, or nothing, is
    /// accepted.
    pub fn get_delimiter(&mut self, brace_ok: bool) -> Result<String, ParseError> {
        let found = match self.get_next() {
            Some('\\') => {
                self.scanner.advance(1);
                let name = format!("\\{}", self.get_cs());
                symbols::delimiter(&name)
            }
            Some('{') if brace_ok => {
                let arg = self.get_argument()?;
                let arg = arg.trim();
                if arg.is_empty() {
                    Some("")
                } else {
                    symbols::delimiter(arg)
                }
            }
            Some(ch) => {
                self.scanner.next_char();
                symbols::delimiter(ch.encode_utf8(&mut [0; 4]))
            }
            None => None,
        };
        found.map(str::to_owned).ok_or_else(|| {
            ParseErrorKind::MissingOrUnrecognizedDelim {
                name: self.current_cs.clone(),
            }
            .into()
        })
    }

    /// Read a dimension, braced or inline.
    pub fn get_dimen(&mut self) -> Result<String, ParseError> {
        let dimen = if self.get_next() == Some('{') {
            let arg = self.get_argument()?;
            match_dimen(&arg, false)
        } else {
            let found = match_dimen(self.scanner.remaining(), true);
            if let Some(dimen) = &found {
                self.scanner.advance(dimen.len);
            }
            found
        };
        dimen.map(|dimen| dimen.text()).ok_or_else(|| {
            ParseErrorKind::MissingDimOrUnits {
                name: self.current_cs.clone(),
            }
            .into()
        })
    }

    /// Read raw text up to `token` at brace depth zero.
    pub fn get_up_to(&mut self, token: &str) -> Result<String, ParseError> {
        self.scanner.skip_spaces();
        let start = self.scanner.position();
        let mut depth = 0_usize;
        loop {
            let before = self.scanner.position();
            let Some(ch) = self.scanner.next_char() else {
                break;
            };
            let mut seen = ch.to_string();
            match ch {
                '\\' => seen.push_str(&self.get_cs()),
                '{' => depth += 1,
                '}' => {
                    if depth == 0 {
                        return Err(ParseErrorKind::ExtraCloseLooking {
                            token: token.to_owned(),
                        }
                        .into());
                    }
                    depth -= 1;
                }
                _ => {}
            }
            if depth == 0 && seen == token {
                return Ok(self.scanner.as_str()[start..before].to_owned());
            }
        }
        Err(ParseErrorKind::TokenNotFoundForCommand {
            token: token.to_owned(),
            name: self.current_cs.clone(),
        }
        .into())
    }

    /// Read and parse a mandatory argument.
    pub fn parse_arg(&mut self) -> Result<MathNode, ParseError> {
        let arg = self.get_argument()?;
        self.sub_parse(&arg)
    }

    /// Read and parse everything up to `token`.
    pub fn parse_up_to(&mut self, token: &str) -> Result<MathNode, ParseError> {
        let text = self.get_up_to(token)?;
        self.sub_parse(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TexContext;
    use crate::namespace::Namespace;
    use crate::tags::TagRegistry;
    use crate::types::Settings;

    fn with_parser<T, F: FnOnce(&mut Parser<'_, '_>) -> T>(text: &str, f: F) -> T {
        let tex = TexContext::default();
        let settings = Settings::default();
        let mut tags = TagRegistry::new(&settings);
        let mut commands = Namespace::default();
        let mut environments = Namespace::default();
        let mut ctx = ParseContext::new(&tex, &settings, &mut tags, &mut commands, &mut environments);
        let mut parser = Parser::new(text, Env::default(), false, &mut ctx);
        f(&mut parser)
    }

    #[test]
    fn test_get_argument() {
        with_parser(r"{a{b}\}c} x \alpha", |parser| {
            assert_eq!(parser.get_argument().unwrap(), r"a{b}\}c");
            assert_eq!(parser.get_argument().unwrap(), "x");
            assert_eq!(parser.get_argument().unwrap(), r"\alpha");
            assert_eq!(parser.get_argument().unwrap_err().id(), "MissingArgFor");
        });
    }

    #[test]
    fn test_get_brackets() {
        with_parser("[a{]}b]c", |parser| {
            assert_eq!(parser.get_brackets().unwrap().as_deref(), Some("a{]}b"));
            assert_eq!(parser.get_brackets().unwrap(), None);
        });
        with_parser("[ab", |parser| {
            assert_eq!(parser.get_brackets().unwrap_err().id(), "MissingCloseBracket");
        });
    }

    #[test]
    fn test_get_up_to() {
        with_parser(r"a {b\over c} \over d", |parser| {
            assert_eq!(parser.get_up_to(r"\over").unwrap(), r"a {b\over c} ");
        });
    }

    #[test]
    fn test_get_delimiter() {
        with_parser(r"( \langle {|} x", |parser| {
            assert_eq!(parser.get_delimiter(false).unwrap(), "(");
            assert_eq!(parser.get_delimiter(false).unwrap(), "\u{27e8}");
            assert_eq!(parser.get_delimiter(true).unwrap(), "|");
            assert_eq!(
                parser.get_delimiter(false).unwrap_err().id(),
                "MissingOrUnrecognizedDelim"
            );
        });
    }

    #[test]
    fn test_get_dimen() {
        with_parser("{2pt} -1.5em x", |parser| {
            assert_eq!(parser.get_dimen().unwrap(), "2pt");
            assert_eq!(parser.get_dimen().unwrap(), "-1.5em");
            assert_eq!(parser.get_dimen().unwrap_err().id(), "MissingDimOrUnits");
        });
    }
}
