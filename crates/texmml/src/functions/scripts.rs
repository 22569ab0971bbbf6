//! Superscripts, subscripts and primes.
//!
//! `^` and `_` take the node just before them as their base and promote it
//! to the matching script element: `msubsup`, or `munderover` for a base
//! whose scripts become limits. The promoted base waits in a `subsup`
//! frame for its script. Primes wait in a `prime` frame, so a following
//! `^` can fold them into its script.

use alloc::sync::Arc;

use crate::context::TexContext;
use crate::define_function::FunctionDefSpec;
use crate::mathml_tree::{MathNode, MathNodeType, OVER, SUB, SUP, UNDER};
use crate::parser::Parser;
use crate::stack::{PrimeItem, StackItem, SubsupItem};
use crate::types::{Package, ParseError, ParseErrorKind};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Script {
    Sup,
    Sub,
}

impl Script {
    const fn slots(self) -> (usize, usize) {
        match self {
            Self::Sup => (SUP, OVER),
            Self::Sub => (SUB, UNDER),
        }
    }

    fn double(self) -> ParseError {
        match self {
            Self::Sup => ParseErrorKind::DoubleExponent.into(),
            Self::Sub => ParseErrorKind::DoubleSubscripts.into(),
        }
    }
}

/// Keep a digit after `^` or `_` from running into the number after it.
fn split_digit(parser: &mut Parser<'_, '_>) {
    if parser.get_next().is_some_and(|c| c.is_ascii_digit()) {
        let pos = parser.scanner.position();
        parser.scanner.set_position(pos + 1);
        parser.scanner.insert(" ");
        parser.scanner.set_position(pos);
    }
}

fn script(parser: &mut Parser<'_, '_>, which: Script) -> Result<(), ParseError> {
    split_digit(parser);
    let (base, primes) = if matches!(parser.stack.top(), Some(StackItem::Prime(_))) {
        match parser.stack.pop() {
            Some(StackItem::Prime(prime)) => (prime.base, prime.primes),
            _ => (None, None),
        }
    } else {
        (parser.stack.prev(), None)
    };
    let mut base = base.unwrap_or_else(|| MathNode::token(MathNodeType::Mi, ""));
    let movesupsub = base.properties.movesupsub;
    let (script_slot, limit_slot) = which.slots();

    if (base.is(MathNodeType::Msubsup) && base.child(script_slot).is_some())
        || (base.is(MathNodeType::Munderover)
            && base.child(limit_slot).is_some()
            && !base.properties.subsup_ok)
    {
        return Err(which.double());
    }

    let position = if base.is(MathNodeType::Msubsup) {
        script_slot
    } else if movesupsub == Some(true) {
        if !base.is(MathNodeType::Munderover) || base.child(limit_slot).is_some() {
            let mut wrapped = MathNode::container(MathNodeType::Munderover, vec![base]);
            wrapped.properties.movesupsub = Some(true);
            base = wrapped;
        }
        limit_slot
    } else {
        base = MathNode::container(MathNodeType::Msubsup, vec![base]);
        script_slot
    };
    parser.push(StackItem::Subsup(SubsupItem {
        base: Some(base),
        position,
        primes,
        movesupsub,
    }))
}

/// Handle `^`.
pub fn superscript(parser: &mut Parser<'_, '_>) -> Result<(), ParseError> {
    script(parser, Script::Sup)
}

/// Handle `_`.
pub fn subscript(parser: &mut Parser<'_, '_>) -> Result<(), ParseError> {
    script(parser, Script::Sub)
}

/// The prime glyph for a run of `count` primes.
#[must_use]
pub fn prime_text(count: usize) -> String {
    match count {
        1 => "\u{2032}".to_owned(),
        2 => "\u{2033}".to_owned(),
        3 => "\u{2034}".to_owned(),
        4 => "\u{2057}".to_owned(),
        n => "\u{2032}".repeat(n),
    }
}

/// Handle a run of primes starting with `ch`.
pub fn prime(parser: &mut Parser<'_, '_>, ch: char) -> Result<(), ParseError> {
    let base = parser.stack.prev().unwrap_or_else(|| MathNode::token(MathNodeType::Mi, ""));
    if base.is(MathNodeType::Msubsup) && base.child(SUP).is_some() {
        return Err(ParseErrorKind::DoubleExponentPrime.into());
    }
    let mut count = 1;
    log::trace!("prime run starting with {ch:?}");
    while let Some(next @ ('\'' | '\u{2019}')) = parser.get_next() {
        parser.scanner.advance(next.len_utf8());
        count += 1;
    }
    let mut primes = MathNode::token(MathNodeType::Mo, prime_text(count));
    primes.properties.variant_form = true;
    parser.push(StackItem::Prime(PrimeItem {
        base: Some(base),
        primes: Some(primes),
    }))
}

fn sup_command(parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
    superscript(parser)
}

fn sub_command(parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
    subscript(parser)
}

/// Register `\sp` and `\sb`, the control-sequence forms of `^` and `_`.
pub fn define_scripts(ctx: &mut TexContext) {
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["sp"],
        handler: Arc::new(sup_command),
    });
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["sb"],
        handler: Arc::new(sub_command),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prime_text() {
        assert_eq!(prime_text(1), "\u{2032}");
        assert_eq!(prime_text(2), "\u{2033}");
        assert_eq!(prime_text(4), "\u{2057}");
        assert_eq!(prime_text(5).chars().count(), 5);
    }
}
