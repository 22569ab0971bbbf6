#[cfg(feature = "backtrace")]
use std::backtrace::Backtrace;
use std::{
    panic::{UnwindSafe, catch_unwind},
    sync::OnceLock,
};

#[cfg(feature = "backtrace")]
use btparse::deserialize;

use texmml::{
    Document, Settings,
    context::TexContext,
    mathml_tree::{MathNode, MathNodeType},
    parse, render,
    types::{ParseError, TagMode},
};

static DEFAULT_CONTEXT: OnceLock<TexContext> = OnceLock::new();
pub fn default_ctx() -> &'static TexContext {
    DEFAULT_CONTEXT.get_or_init(TexContext::default)
}

pub struct TestExpr<'a> {
    pub expr: String,
    pub ctx: &'a TexContext,
    pub file: &'static str,
    pub line: u32,
    pub code: &'static str,
}

impl TestExpr<'_> {
    fn run(&self, settings: &Settings) -> Result<MathNode, ParseError> {
        let mut doc = Document::new(settings.clone());
        parse(self.ctx, &mut doc, &self.expr)
    }

    pub fn to_parse(self, settings: &Settings) -> Result<(), ParseError> {
        self.run(settings).map(|_| ())
    }

    /// The expression must fail with the error whose id is `id`.
    pub fn to_fail_with(self, id: &str, settings: &Settings) -> Result<(), ParseError> {
        match self.run(settings) {
            Ok(tree) => panic!(
                "{}:{}: `{}` parsed to {:?}, expected {}",
                self.file, self.line, self.code, tree, id
            ),
            Err(e) => {
                assert_eq!(
                    e.id(),
                    id,
                    "{}:{}: `{}` failed with {}",
                    self.file,
                    self.line,
                    self.code,
                    e
                );
                Ok(())
            }
        }
    }

    pub fn to_parse_like(self, other: &str, settings: &Settings) -> Result<(), ParseError> {
        let tree1 = self.run(settings)?;
        let mut doc = Document::new(settings.clone());
        let tree2 = parse(self.ctx, &mut doc, other)?;
        assert_eq!(
            tree1, tree2,
            "Parse trees do not match between '{}' and '{}'",
            self.expr, other
        );
        Ok(())
    }
}

pub fn expect_impl(
    expr: &str,
    file: &'static str,
    line: u32,
    code: &'static str,
) -> TestExpr<'static> {
    TestExpr {
        expr: expr.to_string(),
        ctx: default_ctx(),
        file,
        line,
        code,
    }
}

#[macro_export]
macro_rules! expect {
    ($e:expr) => {
        $crate::setup::expect_impl($e, file!(), line!(), stringify!($e))
    };
}

#[cfg(feature = "backtrace")]
fn format_backtrace(bt_serialized: &Backtrace) -> String {
    let mut traces = Vec::new();
    let backtrace = deserialize(bt_serialized).unwrap();
    for frame in backtrace.frames {
        let function = frame.function;
        if function.starts_with("texmml::types::parse_error::ParseError")
            || function.starts_with("core::ops::function::FnOnce")
        {
            continue;
        }
        if function.starts_with("std::panicking") {
            break;
        }
        let loc = match (frame.file, frame.line) {
            (Some(file), Some(line)) => format!("{}:{}", file, line),
            (Some(file), None) => file,
            _ => "<unknown>".to_string(),
        };
        traces.push(format!("at {} ({})", function, loc));
    }
    traces.join("\n")
}

#[cfg(not(feature = "backtrace"))]
fn format_backtrace(_: &ParseError) -> String {
    "<enable the backtrace feature>".to_string()
}

pub fn it<F>(desc: &str, test_fn: F)
where
    F: FnOnce() -> Result<(), ParseError> + UnwindSafe,
{
    let result = catch_unwind(test_fn);

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            #[cfg(feature = "backtrace")]
            let traces = format_backtrace(&e.backtrace);
            #[cfg(not(feature = "backtrace"))]
            let traces = format_backtrace(&e);
            panic!(
                "Test '{}' failed with Result::Err: {}\nBacktrace:\n{}",
                desc, e, traces
            );
        }
        Err(panic_payload) => {
            let msg = if let Some(s) = panic_payload.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "<non-string panic payload>".to_string()
            };
            panic!("Test '{}' panicked: {}", desc, msg);
        }
    }
}

pub fn inline_settings() -> Settings {
    Settings::default()
}

pub fn display_settings() -> Settings {
    Settings::builder().display_mode(true).build()
}

pub fn ams_tag_settings() -> Settings {
    Settings::builder()
        .display_mode(true)
        .tags(TagMode::Ams)
        .build()
}

pub fn get_built(expr: &str) -> Result<MathNode, ParseError> {
    let mut doc = Document::default();
    parse(default_ctx(), &mut doc, expr)
}

pub fn get_built_with(expr: &str, settings: &Settings) -> Result<MathNode, ParseError> {
    let mut doc = Document::new(settings.clone());
    parse(default_ctx(), &mut doc, expr)
}

/// Parse several expressions into one document, returning the last tree.
pub fn get_built_in_document(
    exprs: &[&str],
    settings: &Settings,
) -> Result<MathNode, ParseError> {
    let mut doc = Document::new(settings.clone());
    let mut last = None;
    for expr in exprs {
        last = Some(parse(default_ctx(), &mut doc, expr)?);
    }
    Ok(last.expect("at least one expression"))
}

pub fn render_in(doc: &mut Document, expr: &str) -> MathNode {
    render(default_ctx(), doc, expr)
}

/// First node of kind `kind` in depth-first order.
pub fn find(node: &MathNode, kind: MathNodeType) -> Option<&MathNode> {
    if node.is(kind) {
        return Some(node);
    }
    node.child_nodes().find_map(|child| find(child, kind))
}

/// Every node of kind `kind` in depth-first order.
pub fn find_all(node: &MathNode, kind: MathNodeType) -> Vec<&MathNode> {
    let mut found = Vec::new();
    collect(node, kind, &mut found);
    found
}

fn collect<'a>(node: &'a MathNode, kind: MathNodeType, found: &mut Vec<&'a MathNode>) {
    if node.is(kind) {
        found.push(node);
    }
    for child in node.child_nodes() {
        collect(child, kind, found);
    }
}
