//! Text boxes.
//!
//! The argument is read as text. `$...$` and `\(...\)` inside it switch
//! back to math, see [`internal_math`]. `\mbox` and `\hbox` also reset the
//! style to text size.

use alloc::sync::Arc;

use phf::phf_map;

use crate::context::TexContext;
use crate::define_function::FunctionDefSpec;
use crate::parser::Parser;
use crate::parser::parse_util::internal_math;
use crate::types::{MathVariant, Package, ParseError};

/// Fonts of the text commands; `None` keeps the surrounding font.
static TEXT_FONTS: phf::Map<&'static str, Option<MathVariant>> = phf_map! {
    "\\text" => None,
    "\\mbox" => None,
    "\\hbox" => None,
    "\\textrm" => Some(MathVariant::Normal),
    "\\textnormal" => Some(MathVariant::Normal),
    "\\textup" => Some(MathVariant::Normal),
    "\\textit" => Some(MathVariant::Italic),
    "\\textbf" => Some(MathVariant::Bold),
    "\\textsf" => Some(MathVariant::SansSerif),
    "\\texttt" => Some(MathVariant::Monospace),
};

fn text(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let font = TEXT_FONTS.get(name).copied().flatten();
    let level = matches!(name, r"\mbox" | r"\hbox").then_some(0);
    let text = parser.get_argument()?;
    let nodes = internal_math(parser, &text, level, font)?;
    parser.push_all(nodes)
}

/// Register the text commands.
pub fn define_text(ctx: &mut TexContext) {
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &[
            "text",
            "mbox",
            "hbox",
            "textrm",
            "textnormal",
            "textup",
            "textit",
            "textbf",
            "textsf",
            "texttt",
        ],
        handler: Arc::new(text),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_text_command_has_a_font_entry() {
        for name in ["text", "mbox", "textbf", "texttt"] {
            assert!(TEXT_FONTS.contains_key(format!("\\{name}").as_str()));
        }
        assert_eq!(TEXT_FONTS.get("\\textit").copied().flatten(), Some(MathVariant::Italic));
    }
}
