//! TeX math to MathML, following the conventions of the MathJax TeX input.
//!
//! An expression is parsed against a [`context::TexContext`] command table
//! and a [`Document`] holding equation numbers, labels and user
//! definitions. The result is a [`mathml_tree::MathNode`] tree rooted at a
//! `math` element.
#![warn(missing_docs)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![warn(clippy::str_to_string)]
#![warn(clippy::non_ascii_literal)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::absolute_paths)]
#![warn(clippy::panic)]
#![warn(clippy::expect_used)]
#![warn(clippy::unwrap_in_result)]
#![warn(clippy::if_then_some_else_none)]
#![warn(clippy::unused_trait_names)]
#![warn(clippy::get_unwrap)]
#![warn(clippy::impl_trait_in_params)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::unimplemented)]
#![warn(clippy::return_and_then)]
#![warn(clippy::needless_raw_strings)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(clippy::ref_patterns)]
// clippy exceptions
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_sign_loss)]

extern crate alloc;
pub mod context;
pub mod core;
pub mod define_environment;
pub mod define_function;
pub mod functions;
pub mod lexer;
pub mod macro_expander;
pub mod macros;
pub mod mathml_tree;
pub mod namespace;
/// Core parsing logic for TeX math expressions.
pub mod parser;
pub mod stack;
pub mod symbols;
pub mod tags;
pub mod types;
pub mod units;

pub use crate::core::{Document, parse, render};
pub use crate::types::Settings;
