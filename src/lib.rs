//! An interpreter for [Chef](https://www.dangermouse.net/esoteric/chef.html),
//! the esoteric programming language in which every program is a cooking
//! recipe.
//!
//! This crate is split the same way the language itself is: a [`parser`]
//! turns recipe source text into a [`model::Recipe`], and an [`evaluator`]
//! walks that recipe's instructions, maintaining the mixing bowls and baking
//! dishes described by the language, and producing output through an
//! injected sink.
//!
//! # Basic usage
//!
//! ```
//! use chef::{evaluator::Evaluator, parse};
//!
//! let source = "\
//! Mash.
//!
//! Ingredients.
//! 111 ml water
//!
//! Method.
//! Put water into mixing bowl.
//! Pour contents of the mixing bowl into the baking dish.
//!
//! Serves 1.
//! ";
//!
//! let recipe = parse(source).expect("valid recipe");
//! let mut evaluator = Evaluator::new(&recipe);
//! let mut output = Vec::new();
//! evaluator
//!     .run(&mut std::io::empty(), &mut output)
//!     .expect("valid program");
//! assert_eq!(output, b"o");
//! ```

pub mod container;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod parser;
pub mod shuffle;
pub mod text;
pub mod validators;

pub use error::{RuntimeError, SyntaxError};
pub use model::Recipe;

/// Parses a complete recipe from source text.
///
/// This is a thin wrapper around [`parser::parse`], kept at the crate root
/// the way `cooklang::parse` sits above `cooklang::parser`.
pub fn parse(source: &str) -> Result<Recipe, SyntaxError> {
    parser::parse(source)
}
