//! Composable command-line parsing that writes straight into a caller-owned config struct.
//!
//! Each [`Opt`], [`Arg`], [`ExeName`] and [`HelpFlag`] carries a binder: a closure that is
//! handed `&mut C` when its token turns up. Specs are joined with `+` into a [`Parser`], which
//! can in turn be joined with other parsers, so a large command line can be built from small
//! groups that are each defined and tested on their own.
//!
//! ```
//! use argbind::prelude::*;
//!
//! #[derive(Default)]
//! struct Config {
//!     verbose: bool,
//!     jobs: u32,
//!     files: Vec<String>,
//! }
//!
//! let parser = Opt::flag(|c: &mut Config| &mut c.verbose).name('v').name("verbose")
//!     + Opt::value(|c: &mut Config| &mut c.jobs, "N").name('j')
//!     + Arg::values(|c: &mut Config| &mut c.files, "FILE");
//!
//! let mut config = Config::default();
//! let outcome = parser.parse(&mut config, ["prog", "-vj4", "a.txt"]).unwrap();
//! assert_eq!(outcome, ParseOutcome::Matched);
//! assert!(config.verbose);
//! assert_eq!(config.jobs, 4);
//! assert_eq!(config.files, ["a.txt"]);
//! ```
//!
//! Parsing stops at the first error. Fields bound before the error keep their new values, so
//! callers that want all-or-nothing behaviour should parse into a scratch copy.

pub mod commandline;
pub mod error;
pub mod help;
pub mod low_level;
pub mod parser;
pub mod token;

pub use error::{
    ok, runtime_error, BindResult, ErrorKind, ParseError, ParseOutcome, ParseResult, SpecError,
};
pub use help::Help;
pub use parser::{Arg, Binder, ExeName, HelpFlag, IntoName, IntoParser, Name, Opt, Parser};

pub mod prelude {
    pub use super::error::{ok, runtime_error, BindResult, ParseOutcome};
    pub use super::parser::{Arg, ExeName, HelpFlag, Opt, Parser};
}
