//! Keyword-dispatch option parsing: typed extraction, dependency
//! validation, and ordered dispatch.
//!
//! A program registers option handlers under string keys, each with a fixed
//! list of typed parameter slots (or a variadic tail). One
//! [`Parser::run`] call then:
//!
//! 1. tokenizes the raw arguments ([`TokenStream`], whitespace/quote
//!    delimited, quoted spans kept whole for strings),
//! 2. matches each token against a registered name and pulls that option's
//!    parameters through the typed extractors ([`extract`]),
//! 3. validates the whole queue's dependency constraints — requires-sets,
//!    conflicts-sets, exclusive and required flags ([`validate_queue`]),
//! 4. and only then dispatches every queued callback in discovery order.
//!
//! Any failure — an unknown token, a parameter that will not convert, a
//! dependency violation — aborts the run before a single callback fires.
//! The reserved tokens `?` and `help` print help and suppress execution.
//!
//! This is not a POSIX/GNU flag parser: there is no `--flag=value` and no
//! short-flag clustering. Each option name is a plain keyword followed by
//! its declared parameter tokens.
//!
//! # Example
//!
//! ```
//! use optline_core::{OptionSpec, ParamType, Parser};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let total = Rc::new(RefCell::new(0i64));
//! let sink = Rc::clone(&total);
//!
//! let mut parser = Parser::new("adder", "1.0.0", "Adds numbers");
//! parser
//!     .add_option(
//!         OptionSpec::new("add")
//!             .with_description("Add two integers")
//!             .with_params(&[ParamType::I32, ParamType::I32]),
//!         move |values| {
//!             *sink.borrow_mut() +=
//!                 values[0].as_i64().unwrap() + values[1].as_i64().unwrap();
//!         },
//!     )
//!     .unwrap();
//!
//! let report = parser.run(["add", "2", "3"]).unwrap();
//! assert_eq!(report.executed, ["add"]);
//! assert_eq!(*total.borrow(), 5);
//!
//! // hex fallback: a token that is not decimal parses as bare hex
//! parser.run(["add", "3afD", "0"]).unwrap();
//! assert_eq!(*total.borrow(), 5 + 0x3afd);
//! ```

mod extract;
mod help;
mod option;
mod parser;
mod token;
mod validate;

pub use extract::{ExtractError, extract};
pub use help::{OptionSummary, ParserSummary, render_help};
pub use option::{Arity, MAX_FIXED_ARITY, OptionSpec, ParamType, ParamValue};
pub use parser::{HELP_TOKENS, Parser, RegistryError, RunError, RunReport};
pub use token::{DEFAULT_DELIMITERS, TokenStream};
pub use validate::{DependencyError, validate_queue};
