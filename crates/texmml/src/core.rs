//! Main entry points and error presentation.

use crate::context::{ParseContext, TexContext};
use crate::macros::{EnvironmentDefinition, UserCommand};
use crate::mathml_tree::{MathNode, MathNodeType, filters};
use crate::namespace::Namespace;
use crate::parser::Parser;
use crate::stack::Env;
use crate::tags::TagRegistry;
use crate::types::{ErrorMode, ParseError, Settings};

/// State shared by the expressions of one document.
///
/// Equation numbers, labels and user definitions made in one expression
/// are visible to the expressions parsed after it.
#[derive(Debug)]
pub struct Document {
    /// Settings every expression is parsed with.
    pub settings: Settings,
    /// Equation counter and labels.
    pub tags: TagRegistry,
    /// User control sequences, preloaded from [`Settings::macros`].
    pub commands: Namespace<UserCommand>,
    /// User environments.
    pub environments: Namespace<EnvironmentDefinition>,
}

impl Document {
    /// A fresh document.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let tags = TagRegistry::new(&settings);
        let mut commands = Namespace::default();
        for (name, def) in &settings.macros {
            commands.set(name.clone(), UserCommand::Macro(def.clone()));
        }
        Self {
            settings,
            tags,
            commands,
            environments: Namespace::default(),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

/// Parse an expression into a `math` element.
///
/// # Parameters
/// * `ctx` - The command tables
/// * `doc` - The document the expression belongs to
/// * `expression` - The TeX source
///
/// # Returns
/// The finished tree. On failure the document keeps the numbers and labels
/// it had before the call.
pub fn parse(ctx: &TexContext, doc: &mut Document, expression: &str) -> Result<MathNode, ParseError> {
    let display = doc.settings.display_mode;
    doc.tags.start_equation();
    let mut context = ParseContext::new(
        ctx,
        &doc.settings,
        &mut doc.tags,
        &mut doc.commands,
        &mut doc.environments,
    );
    let env = Env {
        display,
        ..Env::default()
    };
    let mut parser = Parser::new(expression, env, false, &mut context);
    parser.parse()?;
    let (node, _) = parser.finish()?;
    log::trace!("{} substitutions", context.macro_count());
    doc.tags.finish_equation();
    let mut root = math_root(node, display);
    filters::finalize(&mut root);
    Ok(root)
}

/// Parse an expression, showing a failure as an error node.
///
/// See [`render_error_node`] for the shape of the error.
pub fn render(ctx: &TexContext, doc: &mut Document, expression: &str) -> MathNode {
    parse(ctx, doc, expression).unwrap_or_else(|error| {
        log::debug!("{}: {}", error.id(), error.message());
        render_error_node(&error, expression, doc.settings.error_mode)
    })
}

/// The `math` element shown in place of an expression that failed.
///
/// [`ErrorMode::Strict`] shows the message, [`ErrorMode::Verbatim`] shows
/// the source with the message as its title.
#[must_use]
pub fn render_error_node(error: &ParseError, expression: &str, mode: ErrorMode) -> MathNode {
    let message = error.message();
    let merror = match mode {
        ErrorMode::Strict => MathNode::container(MathNodeType::Merror, vec![MathNode::text(message)]),
        ErrorMode::Verbatim => {
            MathNode::container(MathNodeType::Merror, vec![MathNode::text(expression)])
                .with_attr("title", message)
        }
    }
    .with_attr("data-error", error.id());
    MathNode::container(MathNodeType::Math, vec![merror])
}

fn math_root(node: MathNode, display: bool) -> MathNode {
    let root = MathNode::container(MathNodeType::Math, vec![node]);
    if display {
        root.with_attr("display", "block")
    } else {
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::MacroDefinition;
    use crate::types::ParseErrorKind;

    #[test]
    fn test_document_preloads_macros() {
        let settings = Settings::builder()
            .macros(vec![("RR".to_owned(), MacroDefinition::new(r"\mathbb{R}", 0))])
            .build();
        let doc = Document::new(settings);
        assert!(doc.commands.has("RR"));
        assert!(doc.environments.is_empty());
    }

    #[test]
    fn test_error_node() {
        let error: ParseError = ParseErrorKind::ExtraCloseMissingOpen.into();
        let node = render_error_node(&error, "x}", ErrorMode::Verbatim);
        let merror = node.child(0).unwrap();
        assert!(merror.is(MathNodeType::Merror));
        assert_eq!(merror.text_content(), "x}");
        assert_eq!(merror.attribute("title"), Some(error.message().as_str()));

        let node = render_error_node(&error, "x}", ErrorMode::Strict);
        assert_eq!(node.child(0).unwrap().text_content(), error.message());
    }
}
