//! Math styles and sizes. Both run to the end of the enclosing group.

use crate::context::TexContext;
use crate::define_function::CommandHandler;
use crate::parser::Parser;
use crate::stack::{StackItem, StyleItem};
use crate::types::{Package, ParseError, TexStyle};
use crate::units::make_em;

#[derive(Debug, Clone, Copy)]
struct SetStyle {
    style: TexStyle,
}

impl CommandHandler for SetStyle {
    fn apply(&self, parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
        if let Some(env) = parser.stack.env_mut() {
            env.style = Some(self.style);
        }
        parser.push(StackItem::Style(StyleItem {
            nodes: Vec::new(),
            attributes: vec![
                ("displaystyle".to_owned(), self.style.is_display().to_string()),
                ("scriptlevel".to_owned(), self.style.script_level().to_string()),
            ],
        }))
    }
}

#[derive(Debug, Clone, Copy)]
struct SetSize {
    size: f64,
}

impl CommandHandler for SetSize {
    fn apply(&self, parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
        if let Some(env) = parser.stack.env_mut() {
            env.size = Some(self.size);
        }
        parser.push(StackItem::Style(StyleItem {
            nodes: Vec::new(),
            attributes: vec![("mathsize".to_owned(), make_em(self.size))],
        }))
    }
}

const STYLES: [(&str, TexStyle); 4] = [
    ("displaystyle", TexStyle::Display),
    ("textstyle", TexStyle::Text),
    ("scriptstyle", TexStyle::Script),
    ("scriptscriptstyle", TexStyle::ScriptScript),
];

const SIZES: [(&str, f64); 10] = [
    ("tiny", 0.5),
    ("Tiny", 0.6),
    ("scriptsize", 0.7),
    ("small", 0.85),
    ("normalsize", 1.0),
    ("large", 1.2),
    ("Large", 1.44),
    ("LARGE", 1.73),
    ("huge", 2.07),
    ("Huge", 2.49),
];

/// Register the style and size switches.
pub fn define_styling(ctx: &mut TexContext) {
    for (name, style) in STYLES {
        ctx.define_command(Package::Base, name, SetStyle { style });
    }
    for (name, size) in SIZES {
        ctx.define_command(Package::Base, name, SetSize { size });
    }
}
