//! Handlers for the built-in control sequences.
//!
//! Each submodule owns one family of commands and exposes a `define_*`
//! function that registers them in a [`TexContext`](crate::context::TexContext)
//! under the package that provides them. Handlers either push nodes
//! directly or push stack items that combine with what follows.
//!
//! ## Key Components
//!
//! - **Scripts and primes**: `^`, `_` and `'` are dispatched by the parser
//!   itself to [`superscript`], [`subscript`] and [`prime`], which attach to
//!   the previous node or open a script on an empty base.
//!
//! - **Arrays**: the `&` and `\\` handlers feed rows and cells into the
//!   open array frame; [`entry`] also serves the parser's `&`.
//!
//! - **Fractions, roots and operators**: `\frac` and its relatives, the
//!   infix `\over` family, `\sqrt`/`\root`, big operators and named
//!   functions with their limit placement.
//!
//! - **User definitions**: `\newcommand`, `\def`, `\let` and
//!   `\newenvironment` store into the document's namespaces.

mod accent;
mod array;
mod boxes;
mod chars;
mod color;
mod delimsizing;
mod environment;
mod font;
mod genfrac;
mod mathchoice;
mod mmltoken;
mod newcommand;
mod op;
mod scripts;
mod spacing;
mod sqrt;
mod styling;
mod tag;
mod text;

/// Registers the accents (`\hat`, `\vec`, ...), the stretchy over and
/// under marks (`\overline`, `\underbrace`, ...) and, with the AMS
/// package, `\overset` and `\underset`.
pub use accent::define_accent;

/// Registers the array commands: the row separator `\\` with its optional
/// spacing, `\cr`, `\hline`, `\hdashline`, `\hfill` and the AMS
/// `\shoveleft`/`\shoveright`.
///
/// # Parameters
///
/// - `ctx`: The [`TexContext`](crate::context::TexContext) receiving the
///   definitions.
///
/// # Error Handling
///
/// The handlers fail with `Misplaced` when used outside an array.
/// `\hfill` outside a row fails with `UnsupportedHFill`.
///
/// # See Also
///
/// - [`entry`] for the handler shared with the parser's `&`.
/// - [`crate::define_environment`] for the environments that open arrays.
pub use array::{define_array, entry};

/// Registers phantoms, rules and boxes: `\fbox`, `\phantom`, `\smash`,
/// `\rlap`, `\rule`, `\raise`, `\lower` and friends.
pub use boxes::define_boxes;

/// Registers `\not`, `\dots` and `\relax`.
pub use chars::define_chars;

/// Registers `\color`, `\textcolor`, `\colorbox` and `\fcolorbox`.
pub use color::{define_color, get_color};

/// Registers `\left`, `\middle`, `\right` and the fixed-size delimiters
/// `\big` to `\Bigg` with their `l`, `m` and `r` forms.
///
/// # Error Handling
///
/// A `\right` without its `\left` fails with `MissingLeftExtraRight`; an
/// unknown delimiter fails with `MissingOrUnrecognizedDelim`.
pub use delimsizing::define_delimsizing;

/// Registers `\begin` and `\end`.
///
/// `\begin{name}` looks the environment up in the document's user
/// environments before the package tables, and runs the user environment's
/// begin text through the same argument substitution as a macro. `\end`
/// checks the name against the open environment.
///
/// # Error Handling
///
/// - `EnvBadEnd` when the names differ.
/// - `MissingBeginExtraEnd` when no environment is open.
/// - `UnknownEnv` for names that nothing defines, `InvalidEnv` for names
///   holding a backslash.
pub use environment::define_environment;

/// Registers the math font switches (`\mathbf`, `\rm`, `\boldsymbol`, ...).
pub use font::define_font;

/// Registers the fraction and binomial commands.
///
/// This covers the prefix forms (`\frac` and the AMS `\genfrac`,
/// `\binom` family and `\cfrac`) and the infix primitives `\over`,
/// `\atop`, `\choose`, `\brace`, `\brack` and `\above`. The infix
/// commands split the enclosing group: everything before becomes the
/// numerator and everything after the denominator.
///
/// # Parameters
///
/// - `ctx`: The [`TexContext`](crate::context::TexContext) receiving the
///   definitions.
///
/// # Error Handling
///
/// A second infix command in the same group fails with `AmbiguousUseOf`.
/// `\genfrac` validates its style argument and fails with `BadMathStyleFor`;
/// `\cfrac` fails with `IllegalAlign` on an unknown alignment.
///
/// # See Also
///
/// - [`define_sqrt`] for roots, the other two-part construct.
pub use genfrac::define_genfrac;

/// Registers `\mathchoice`.
pub use mathchoice::define_mathchoice;

/// Registers `\mmlToken`.
pub use mmltoken::define_mmltoken;

/// Registers `\newcommand`, `\renewcommand`, `\newenvironment`,
/// `\renewenvironment`, `\def` and `\let`, all in the newcommand package.
pub use newcommand::define_newcommand;

/// Registers big operators, named functions (`\sin`, `\lim`, ...),
/// `\operatorname`, `\limits`, `\nolimits` and the class commands
/// (`\mathop`, `\mathrel`, ...).
pub use op::define_op;

/// Registers `\sp`, `\sb` and the script helpers.
pub use scripts::{define_scripts, prime, subscript, superscript};

/// Registers the fixed spaces and the explicit skips (`\hspace`, `\kern`,
/// `\mskip`, ...).
pub use spacing::define_spacing;

/// Registers `\sqrt`, `\root`, `\leftroot` and `\uproot`.
///
/// # Error Handling
///
/// `\leftroot` and `\uproot` outside a root degree fail with
/// `MisplacedMoveRoot`, and twice in one degree with `MultipleMoveRoot`.
pub use sqrt::define_sqrt;

/// Registers the style and size switches.
pub use styling::define_styling;

/// Registers `\tag`, `\notag`, `\label`, `\ref` and `\eqref`.
pub use tag::define_tag;

pub use text::define_text;
