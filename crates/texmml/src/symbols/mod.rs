//! Symbol tables for control sequences that stand for a single character.
//!
//! Names map to a [`Symbol`] in one of three tables, each producing a
//! different token:
//!
//! - [`MATHCHAR0MI`]: identifiers (`\alpha`, `\infty`), italic unless the
//!   entry gives a variant
//! - [`MATHCHAR0MO`]: operators (`\sum`, `\le`, `\to`) with their class
//! - [`MATHCHAR7`]: upright identifiers that follow the current font
//!   (`\Gamma`, `\$`)
//!
//! [`DELIMITERS`] lists what may follow `\left`, `\right` and `\big`.
//! [`operator_class`] gives the class of an operator by its text.
//!
//! # Examples
//!
//! ```rust
//! use texmml::mathml_tree::TexClass;
//! use texmml::symbols::{MATHCHAR0MO, operator_class};
//!
//! let sum = MATHCHAR0MO.get("sum").unwrap();
//! assert_eq!(sum.text, "\u{2211}");
//! assert!(sum.movesupsub);
//! assert_eq!(operator_class("="), Some(TexClass::Rel));
//! ```

use phf::phf_map;

use crate::mathml_tree::TexClass;
use crate::types::MathVariant;

/// A named character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    /// The character(s) the name stands for.
    pub text: &'static str,
    /// Class forced on the token.
    pub class: Option<TexClass>,
    /// Variant forced on the token.
    pub variant: Option<MathVariant>,
    /// Scripts become limits in display style.
    pub movesupsub: bool,
}

const fn ch(text: &'static str) -> Symbol {
    Symbol {
        text,
        class: None,
        variant: None,
        movesupsub: false,
    }
}

const fn upright(text: &'static str) -> Symbol {
    Symbol {
        variant: Some(MathVariant::Normal),
        ..ch(text)
    }
}

const fn op(text: &'static str, class: TexClass) -> Symbol {
    Symbol {
        class: Some(class),
        ..ch(text)
    }
}

const fn bin(text: &'static str) -> Symbol {
    op(text, TexClass::Bin)
}

const fn rel(text: &'static str) -> Symbol {
    op(text, TexClass::Rel)
}

/// Large operator whose scripts become limits.
const fn large(text: &'static str) -> Symbol {
    Symbol {
        movesupsub: true,
        ..op(text, TexClass::Op)
    }
}

/// Identifier characters.
pub static MATHCHAR0MI: phf::Map<&'static str, Symbol> = phf_map! {
    "alpha" => ch("\u{3b1}"),
    "beta" => ch("\u{3b2}"),
    "gamma" => ch("\u{3b3}"),
    "delta" => ch("\u{3b4}"),
    "epsilon" => ch("\u{3f5}"),
    "zeta" => ch("\u{3b6}"),
    "eta" => ch("\u{3b7}"),
    "theta" => ch("\u{3b8}"),
    "iota" => ch("\u{3b9}"),
    "kappa" => ch("\u{3ba}"),
    "lambda" => ch("\u{3bb}"),
    "mu" => ch("\u{3bc}"),
    "nu" => ch("\u{3bd}"),
    "xi" => ch("\u{3be}"),
    "omicron" => ch("\u{3bf}"),
    "pi" => ch("\u{3c0}"),
    "rho" => ch("\u{3c1}"),
    "sigma" => ch("\u{3c3}"),
    "tau" => ch("\u{3c4}"),
    "upsilon" => ch("\u{3c5}"),
    "phi" => ch("\u{3d5}"),
    "chi" => ch("\u{3c7}"),
    "psi" => ch("\u{3c8}"),
    "omega" => ch("\u{3c9}"),
    "varepsilon" => ch("\u{3b5}"),
    "vartheta" => ch("\u{3d1}"),
    "varpi" => ch("\u{3d6}"),
    "varrho" => ch("\u{3f1}"),
    "varsigma" => ch("\u{3c2}"),
    "varphi" => ch("\u{3c6}"),
    "S" => upright("\u{a7}"),
    "aleph" => upright("\u{2135}"),
    "hbar" => upright("\u{210f}"),
    "imath" => ch("\u{131}"),
    "jmath" => ch("\u{237}"),
    "ell" => ch("\u{2113}"),
    "wp" => upright("\u{2118}"),
    "Re" => upright("\u{211c}"),
    "Im" => upright("\u{2111}"),
    "partial" => ch("\u{2202}"),
    "infty" => upright("\u{221e}"),
    "prime" => upright("\u{2032}"),
    "emptyset" => upright("\u{2205}"),
    "nabla" => upright("\u{2207}"),
    "top" => upright("\u{22a4}"),
    "bot" => upright("\u{22a5}"),
    "angle" => upright("\u{2220}"),
    "triangle" => upright("\u{25b3}"),
    "backslash" => upright("\u{2216}"),
    "forall" => upright("\u{2200}"),
    "exists" => upright("\u{2203}"),
    "neg" => upright("\u{ac}"),
    "lnot" => upright("\u{ac}"),
    "flat" => upright("\u{266d}"),
    "natural" => upright("\u{266e}"),
    "sharp" => upright("\u{266f}"),
    "clubsuit" => upright("\u{2663}"),
    "diamondsuit" => upright("\u{2662}"),
    "heartsuit" => upright("\u{2661}"),
    "spadesuit" => upright("\u{2660}"),
};

/// Operator characters.
pub static MATHCHAR0MO: phf::Map<&'static str, Symbol> = phf_map! {
    "surd" => ch("\u{221a}"),

    "coprod" => large("\u{2210}"),
    "bigvee" => large("\u{22c1}"),
    "bigwedge" => large("\u{22c0}"),
    "biguplus" => large("\u{2a04}"),
    "bigcap" => large("\u{22c2}"),
    "bigcup" => large("\u{22c3}"),
    "int" => op("\u{222b}", TexClass::Op),
    "intop" => large("\u{222b}"),
    "iint" => op("\u{222c}", TexClass::Op),
    "iiint" => op("\u{222d}", TexClass::Op),
    "prod" => large("\u{220f}"),
    "sum" => large("\u{2211}"),
    "bigotimes" => large("\u{2a02}"),
    "bigoplus" => large("\u{2a01}"),
    "bigodot" => large("\u{2a00}"),
    "oint" => op("\u{222e}", TexClass::Op),
    "bigsqcup" => large("\u{2a06}"),
    "smallint" => op("\u{222b}", TexClass::Op),

    "triangleleft" => bin("\u{25c3}"),
    "triangleright" => bin("\u{25b9}"),
    "bigtriangleup" => bin("\u{25b3}"),
    "bigtriangledown" => bin("\u{25bd}"),
    "wedge" => bin("\u{2227}"),
    "land" => bin("\u{2227}"),
    "vee" => bin("\u{2228}"),
    "lor" => bin("\u{2228}"),
    "cap" => bin("\u{2229}"),
    "cup" => bin("\u{222a}"),
    "ddagger" => bin("\u{2021}"),
    "dagger" => bin("\u{2020}"),
    "sqcap" => bin("\u{2293}"),
    "sqcup" => bin("\u{2294}"),
    "uplus" => bin("\u{228e}"),
    "amalg" => bin("\u{2a3f}"),
    "diamond" => bin("\u{22c4}"),
    "bullet" => bin("\u{2219}"),
    "wr" => bin("\u{2240}"),
    "div" => bin("\u{f7}"),
    "odot" => bin("\u{2299}"),
    "oslash" => bin("\u{2298}"),
    "otimes" => bin("\u{2297}"),
    "ominus" => bin("\u{2296}"),
    "oplus" => bin("\u{2295}"),
    "mp" => bin("\u{2213}"),
    "pm" => bin("\u{b1}"),
    "circ" => bin("\u{2218}"),
    "bigcirc" => bin("\u{25ef}"),
    "setminus" => bin("\u{2216}"),
    "cdot" => bin("\u{22c5}"),
    "ast" => bin("\u{2217}"),
    "times" => bin("\u{d7}"),
    "star" => bin("\u{22c6}"),

    "propto" => rel("\u{221d}"),
    "sqsubseteq" => rel("\u{2291}"),
    "sqsupseteq" => rel("\u{2292}"),
    "parallel" => rel("\u{2225}"),
    "mid" => rel("\u{2223}"),
    "dashv" => rel("\u{22a3}"),
    "vdash" => rel("\u{22a2}"),
    "leq" => rel("\u{2264}"),
    "le" => rel("\u{2264}"),
    "geq" => rel("\u{2265}"),
    "ge" => rel("\u{2265}"),
    "lt" => rel("<"),
    "gt" => rel(">"),
    "succ" => rel("\u{227b}"),
    "prec" => rel("\u{227a}"),
    "approx" => rel("\u{2248}"),
    "succeq" => rel("\u{2ab0}"),
    "preceq" => rel("\u{2aaf}"),
    "supset" => rel("\u{2283}"),
    "subset" => rel("\u{2282}"),
    "supseteq" => rel("\u{2287}"),
    "subseteq" => rel("\u{2286}"),
    "in" => rel("\u{2208}"),
    "ni" => rel("\u{220b}"),
    "notin" => rel("\u{2209}"),
    "owns" => rel("\u{220b}"),
    "gg" => rel("\u{226b}"),
    "ll" => rel("\u{226a}"),
    "sim" => rel("\u{223c}"),
    "simeq" => rel("\u{2243}"),
    "perp" => rel("\u{22a5}"),
    "equiv" => rel("\u{2261}"),
    "asymp" => rel("\u{224d}"),
    "smile" => rel("\u{2323}"),
    "frown" => rel("\u{2322}"),
    "ne" => rel("\u{2260}"),
    "neq" => rel("\u{2260}"),
    "cong" => rel("\u{2245}"),
    "doteq" => rel("\u{2250}"),
    "bowtie" => rel("\u{22c8}"),
    "models" => rel("\u{22a8}"),

    "Leftrightarrow" => rel("\u{21d4}"),
    "Leftarrow" => rel("\u{21d0}"),
    "Rightarrow" => rel("\u{21d2}"),
    "leftrightarrow" => rel("\u{2194}"),
    "leftarrow" => rel("\u{2190}"),
    "gets" => rel("\u{2190}"),
    "rightarrow" => rel("\u{2192}"),
    "to" => rel("\u{2192}"),
    "mapsto" => rel("\u{21a6}"),
    "leftharpoonup" => rel("\u{21bc}"),
    "leftharpoondown" => rel("\u{21bd}"),
    "rightharpoonup" => rel("\u{21c0}"),
    "rightharpoondown" => rel("\u{21c1}"),
    "nearrow" => rel("\u{2197}"),
    "searrow" => rel("\u{2198}"),
    "nwarrow" => rel("\u{2196}"),
    "swarrow" => rel("\u{2199}"),
    "rightleftharpoons" => rel("\u{21cc}"),
    "hookrightarrow" => rel("\u{21aa}"),
    "hookleftarrow" => rel("\u{21a9}"),
    "longleftarrow" => rel("\u{27f5}"),
    "Longleftarrow" => rel("\u{27f8}"),
    "longrightarrow" => rel("\u{27f6}"),
    "Longrightarrow" => rel("\u{27f9}"),
    "Longleftrightarrow" => rel("\u{27fa}"),
    "longleftrightarrow" => rel("\u{27f7}"),
    "longmapsto" => rel("\u{27fc}"),

    "ldots" => op("\u{2026}", TexClass::Inner),
    "cdots" => op("\u{22ef}", TexClass::Inner),
    "vdots" => ch("\u{22ee}"),
    "ddots" => op("\u{22f1}", TexClass::Inner),
    "dotsc" => op("\u{2026}", TexClass::Inner),
    "dotsb" => op("\u{22ef}", TexClass::Inner),
    "dotsm" => op("\u{22ef}", TexClass::Inner),
    "dotsi" => op("\u{22ef}", TexClass::Inner),
    "dotso" => op("\u{2026}", TexClass::Inner),
    "ldotp" => op(".", TexClass::Punct),
    "cdotp" => op("\u{22c5}", TexClass::Punct),
    "colon" => op(":", TexClass::Punct),
};

/// Upright identifiers that follow the current font.
pub static MATHCHAR7: phf::Map<&'static str, Symbol> = phf_map! {
    "Gamma" => ch("\u{393}"),
    "Delta" => ch("\u{394}"),
    "Theta" => ch("\u{398}"),
    "Lambda" => ch("\u{39b}"),
    "Xi" => ch("\u{39e}"),
    "Pi" => ch("\u{3a0}"),
    "Sigma" => ch("\u{3a3}"),
    "Upsilon" => ch("\u{3a5}"),
    "Phi" => ch("\u{3a6}"),
    "Psi" => ch("\u{3a8}"),
    "Omega" => ch("\u{3a9}"),
    "_" => ch("_"),
    "#" => ch("#"),
    "$" => ch("$"),
    "%" => ch("%"),
    "&" => ch("&"),
    "And" => ch("&"),
};

/// Delimiters, keyed by how they are written.
///
/// The empty string is the null delimiter `.`.
pub static DELIMITERS: phf::Map<&'static str, &'static str> = phf_map! {
    "(" => "(",
    ")" => ")",
    "[" => "[",
    "]" => "]",
    "<" => "\u{27e8}",
    ">" => "\u{27e9}",
    "\\lt" => "\u{27e8}",
    "\\gt" => "\u{27e9}",
    "/" => "/",
    "|" => "|",
    "." => "",
    "\\lmoustache" => "\u{23b0}",
    "\\rmoustache" => "\u{23b1}",
    "\\lgroup" => "\u{27ee}",
    "\\rgroup" => "\u{27ef}",
    "\\arrowvert" => "\u{23d0}",
    "\\Arrowvert" => "\u{2016}",
    "\\bracevert" => "\u{23aa}",
    "\\Vert" => "\u{2016}",
    "\\|" => "\u{2016}",
    "\\vert" => "|",
    "\\uparrow" => "\u{2191}",
    "\\downarrow" => "\u{2193}",
    "\\updownarrow" => "\u{2195}",
    "\\Uparrow" => "\u{21d1}",
    "\\Downarrow" => "\u{21d3}",
    "\\Updownarrow" => "\u{21d5}",
    "\\backslash" => "\\",
    "\\rangle" => "\u{27e9}",
    "\\langle" => "\u{27e8}",
    "\\rbrace" => "}",
    "\\lbrace" => "{",
    "\\}" => "}",
    "\\{" => "{",
    "\\rceil" => "\u{2309}",
    "\\lceil" => "\u{2308}",
    "\\rfloor" => "\u{230b}",
    "\\lfloor" => "\u{230a}",
    "\\lbrack" => "[",
    "\\rbrack" => "]",
};

/// Characters replaced when they appear as operators.
pub static REMAP: phf::Map<char, &'static str> = phf_map! {
    '-' => "\u{2212}",
    '*' => "\u{2217}",
    '`' => "\u{2018}",
};

/// Negated forms used by `\not`.
pub static NOT_REMAP: phf::Map<&'static str, &'static str> = phf_map! {
    "\u{2190}" => "\u{219a}",
    "\u{2192}" => "\u{219b}",
    "\u{2194}" => "\u{21ae}",
    "\u{21d0}" => "\u{21cd}",
    "\u{21d2}" => "\u{21cf}",
    "\u{21d4}" => "\u{21ce}",
    "\u{2208}" => "\u{2209}",
    "\u{220b}" => "\u{220c}",
    "\u{2223}" => "\u{2224}",
    "\u{2225}" => "\u{2226}",
    "\u{223c}" => "\u{2241}",
    "~" => "\u{2241}",
    "\u{2243}" => "\u{2244}",
    "\u{2245}" => "\u{2247}",
    "\u{2248}" => "\u{2249}",
    "\u{224d}" => "\u{226d}",
    "=" => "\u{2260}",
    "\u{2261}" => "\u{2262}",
    "<" => "\u{226e}",
    ">" => "\u{226f}",
    "\u{2264}" => "\u{2270}",
    "\u{2265}" => "\u{2271}",
    "\u{2272}" => "\u{2274}",
    "\u{2273}" => "\u{2275}",
    "\u{2276}" => "\u{2278}",
    "\u{2277}" => "\u{2279}",
    "\u{227a}" => "\u{2280}",
    "\u{227b}" => "\u{2281}",
    "\u{2282}" => "\u{2284}",
    "\u{2283}" => "\u{2285}",
    "\u{2286}" => "\u{2288}",
    "\u{2287}" => "\u{2289}",
    "\u{22a2}" => "\u{22ac}",
    "\u{22a8}" => "\u{22ad}",
    "\u{22a9}" => "\u{22ae}",
    "\u{22ab}" => "\u{22af}",
    "\u{227c}" => "\u{22e0}",
    "\u{227d}" => "\u{22e1}",
    "\u{2291}" => "\u{22e2}",
    "\u{2292}" => "\u{22e3}",
    "\u{22b2}" => "\u{22ea}",
    "\u{22b3}" => "\u{22eb}",
    "\u{22b4}" => "\u{22ec}",
    "\u{22b5}" => "\u{22ed}",
    "\u{2203}" => "\u{2204}",
};

/// Classes of operator characters typed directly or produced by commands.
static OPERATOR_CLASSES: phf::Map<&'static str, TexClass> = phf_map! {
    "+" => TexClass::Bin,
    "-" => TexClass::Bin,
    "\u{2212}" => TexClass::Bin,
    "*" => TexClass::Bin,
    "\u{2217}" => TexClass::Bin,
    "\u{b1}" => TexClass::Bin,
    "\u{2213}" => TexClass::Bin,
    "\u{d7}" => TexClass::Bin,
    "\u{f7}" => TexClass::Bin,
    "\u{22c5}" => TexClass::Bin,
    "\u{2218}" => TexClass::Bin,
    "\u{2229}" => TexClass::Bin,
    "\u{222a}" => TexClass::Bin,
    "\u{2227}" => TexClass::Bin,
    "\u{2228}" => TexClass::Bin,
    "\u{2295}" => TexClass::Bin,
    "\u{2297}" => TexClass::Bin,
    "=" => TexClass::Rel,
    "<" => TexClass::Rel,
    ">" => TexClass::Rel,
    ":" => TexClass::Rel,
    "\u{2260}" => TexClass::Rel,
    "\u{2264}" => TexClass::Rel,
    "\u{2265}" => TexClass::Rel,
    "\u{2208}" => TexClass::Rel,
    "\u{2192}" => TexClass::Rel,
    "\u{2190}" => TexClass::Rel,
    "\u{21d2}" => TexClass::Rel,
    "(" => TexClass::Open,
    "[" => TexClass::Open,
    "{" => TexClass::Open,
    "\u{27e8}" => TexClass::Open,
    "\u{2308}" => TexClass::Open,
    "\u{230a}" => TexClass::Open,
    "\u{27ee}" => TexClass::Open,
    ")" => TexClass::Close,
    "]" => TexClass::Close,
    "}" => TexClass::Close,
    "\u{27e9}" => TexClass::Close,
    "\u{2309}" => TexClass::Close,
    "\u{230b}" => TexClass::Close,
    "\u{27ef}" => TexClass::Close,
    "!" => TexClass::Close,
    "?" => TexClass::Close,
    "," => TexClass::Punct,
    ";" => TexClass::Punct,
    "." => TexClass::Ord,
    "/" => TexClass::Ord,
    "|" => TexClass::Ord,
    "\u{2016}" => TexClass::Ord,
    "\\" => TexClass::Ord,
    "'" => TexClass::Ord,
    "\u{2032}" => TexClass::Ord,
    "\u{2033}" => TexClass::Ord,
    "\u{2034}" => TexClass::Ord,
    "\u{2057}" => TexClass::Ord,
    "\u{2018}" => TexClass::Ord,
    "\u{2026}" => TexClass::Inner,
    "\u{22ef}" => TexClass::Inner,
    "\u{22ee}" => TexClass::Ord,
    "\u{22f1}" => TexClass::Inner,
    "\u{2061}" => TexClass::None,
    "\u{2062}" => TexClass::None,
    "\u{2211}" => TexClass::Op,
    "\u{220f}" => TexClass::Op,
    "\u{222b}" => TexClass::Op,
    "\u{222e}" => TexClass::Op,
    "\u{2210}" => TexClass::Op,
    "\u{22c2}" => TexClass::Op,
    "\u{22c3}" => TexClass::Op,
    "\u{af}" => TexClass::Ord,
    "\u{2015}" => TexClass::Ord,
    "\u{23de}" => TexClass::Ord,
    "\u{23df}" => TexClass::Ord,
    "^" => TexClass::Ord,
    "~" => TexClass::Ord,
};

/// Class of an operator by its text.
///
/// Text not in the table falls back to the class of a single-character
/// entry in [`MATHCHAR0MO`] with the same glyph.
#[must_use]
pub fn operator_class(text: &str) -> Option<TexClass> {
    if let Some(class) = OPERATOR_CLASSES.get(text) {
        return Some(*class);
    }
    MATHCHAR0MO
        .values()
        .find(|symbol| symbol.text == text)
        .and_then(|symbol| symbol.class)
}

/// Resolve a delimiter written as `name`; control sequences include
/// their backslash.
#[must_use]
pub fn delimiter(name: &str) -> Option<&'static str> {
    DELIMITERS.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_resolve() {
        assert_eq!(MATHCHAR0MI.get("alpha").map(|s| s.text), Some("\u{3b1}"));
        assert_eq!(
            MATHCHAR0MI.get("infty").and_then(|s| s.variant),
            Some(MathVariant::Normal)
        );
        assert_eq!(MATHCHAR7.get("Gamma").map(|s| s.text), Some("\u{393}"));
        assert_eq!(delimiter("\\langle"), Some("\u{27e8}"));
        assert_eq!(delimiter("."), Some(""));
        assert_eq!(delimiter("x"), None);
    }

    #[test]
    fn test_operator_classes() {
        assert_eq!(operator_class("+"), Some(TexClass::Bin));
        assert_eq!(operator_class("("), Some(TexClass::Open));
        assert_eq!(operator_class("\u{2286}"), Some(TexClass::Rel));
        assert_eq!(operator_class("xyz"), None);
    }

    #[test]
    fn test_integrals_keep_scripts_beside() {
        let int = MATHCHAR0MO.get("int").copied();
        assert_eq!(int.map(|s| s.movesupsub), Some(false));
        assert_eq!(int.and_then(|s| s.class), Some(TexClass::Op));
    }

    #[test]
    fn test_not_remap() {
        assert_eq!(NOT_REMAP.get("="), Some(&"\u{2260}"));
        assert_eq!(REMAP.get(&'-'), Some(&"\u{2212}"));
    }
}
