//! A tunable getopt engine.
//!
//! One dispatch routine reproduces the POSIX, GNU, BSD and Darwin flavours of
//! `getopt`, `getopt_long` and `getopt_long_only`, plus DOS-style `/switch`
//! parsing. The flavour is a [`Config`]; the parse cursor lives in a
//! caller-owned [`Getopt`] session, so independent sessions never share
//! state.
//!
//! ```
//! use tunable_getopt::{Config, Getopt, LongOpt, Parsed};
//!
//! let long = [LongOpt::required("output", 'o'), LongOpt::no_argument("verbose", 'v')];
//! let mut args = ["prog", "input", "--verb", "-o", "out.txt"];
//! let mut g = Getopt::new(Config::gnu().posixly_correct(Some(false)));
//!
//! assert_eq!(g.next(&mut args, "o:v", Some(&long)), Parsed::Opt('v' as i32));
//! assert_eq!(g.next(&mut args, "o:v", Some(&long)), Parsed::Opt('o' as i32));
//! assert_eq!(g.optarg(), Some("out.txt"));
//! assert_eq!(g.next(&mut args, "o:v", Some(&long)), Parsed::End);
//! assert_eq!(g.operands(&args), ["input"]);
//! ```

mod classify;
mod config;
mod error;
mod getopt;
mod long;
mod permute;
mod report;
mod short;
mod spec;

pub use config::{Config, Dialect, EscapeFallback, MissingAdvance};
pub use error::{Error, OptionName};
pub use getopt::{Getopt, Parsed, Phase};
pub use spec::{HasArg, LongOpt};
