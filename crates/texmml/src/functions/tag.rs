//! `\tag`, `\notag`, `\label`, `\ref` and `\eqref`.
//!
//! The commands only record state in the document's
//! [`TagRegistry`](crate::tags::TagRegistry); the tag cell itself is built
//! when the row or equation that owns it is finished.

use alloc::sync::Arc;

use crate::context::TexContext;
use crate::define_function::FunctionDefSpec;
use crate::mathml_tree::MathNode;
use crate::parser::Parser;
use crate::parser::parse_util::{internal_math, trim_spaces};
use crate::tags::Label;
use crate::types::{Package, ParseError, ParseErrorKind};

fn tag(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let tags = &*parser.ctx.tags;
    if !tags.current().taggable && !tags.env().is_empty() {
        return Err(ParseErrorKind::CommandNotAllowedInEnv {
            name: name.to_owned(),
            env: tags.env().to_owned(),
        }
        .into());
    }
    if tags.current().tag.as_deref().is_some_and(|tag| !tag.is_empty()) {
        return Err(ParseErrorKind::MultipleCommand {
            name: name.to_owned(),
        }
        .into());
    }
    let star = parser.get_star();
    let text = trim_spaces(&parser.get_argument()?);
    parser.ctx.tags.tag(&text, star);
    Ok(())
}

fn no_tag(parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
    parser.ctx.tags.no_tag();
    Ok(())
}

fn label(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let label = parser.get_argument()?;
    if label.is_empty() {
        return Ok(());
    }
    let tags = &mut *parser.ctx.tags;
    if !tags.label().is_empty() {
        return Err(ParseErrorKind::MultipleCommand {
            name: name.to_owned(),
        }
        .into());
    }
    if tags.has_label(&label) {
        if !parser.ctx.settings.ignore_duplicate_labels {
            return Err(ParseErrorKind::MultipleLabel { label }.into());
        }
        log::warn!("label '{label}' is defined more than once");
    }
    tags.set_label(&label);
    Ok(())
}

fn reference(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let label = parser.get_argument()?;
    let target = match parser.ctx.tags.lookup(&label) {
        Some(target) => target.clone(),
        None => {
            log::debug!("reference to undefined label '{label}'");
            Label::default()
        }
    };
    let text = if name == r"\eqref" {
        parser.ctx.tags.formatter().format_ref(&target.tag)
    } else {
        target.tag
    };
    let url = parser.ctx.tags.format_url(&target.id);
    let nodes = internal_math(parser, &text, None, None)?;
    let node = MathNode::row(nodes)
        .with_attr("href", url)
        .with_attr("class", "texmml-ref");
    parser.push_node(node)
}

/// Register the tag and label commands.
pub fn define_tag(ctx: &mut TexContext) {
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["label"],
        handler: Arc::new(label),
    });
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["ref", "eqref"],
        handler: Arc::new(reference),
    });
    ctx.define_function(FunctionDefSpec {
        package: Package::Ams,
        names: &["tag"],
        handler: Arc::new(tag),
    });
    ctx.define_function(FunctionDefSpec {
        package: Package::Ams,
        names: &["notag", "nonumber"],
        handler: Arc::new(no_tag),
    });
}
