//! Diagnostic text for the four dialects, and where it goes.

use std::io::Write;

use crate::config::Dialect;
use crate::error::{Error, OptionName};

/// Destination for diagnostics.
#[derive(Debug, Default)]
pub(crate) enum Sink {
    #[default]
    Stderr,
    Buffer(String),
}

impl Sink {
    /// Write one complete diagnostic line.
    pub fn emit(&mut self, line: &str) {
        match self {
            Sink::Stderr => {
                std::io::stderr().lock().write_all(line.as_bytes()).ok();
            }
            Sink::Buffer(buf) => buf.push_str(line),
        }
    }

    pub fn take(&mut self) -> String {
        match self {
            Sink::Stderr => String::new(),
            Sink::Buffer(buf) => std::mem::take(buf),
        }
    }
}

pub(crate) struct Diagnostic<'a> {
    pub error: &'a Error,
    /// Name of the table entry the option resolved to, if any.
    pub entry: Option<&'a str>,
    /// The option was named through the `W;` escape.
    pub escaped: bool,
}

/// Render `d` as a full line: `program: message\n`.
pub(crate) fn render(dialect: Dialect, program: &str, d: &Diagnostic<'_>) -> String {
    let message = match d.error {
        Error::UnknownOption(OptionName::Short(c)) => match dialect {
            Dialect::Gnu => format!("invalid option -- '{}'", c),
            Dialect::Posix => format!("illegal option -- {}", c),
            Dialect::Bsd => format!("unknown option -- {}", c),
            Dialect::Darwin => format!("invalid option -- {}", c),
        },
        Error::MissingArgument(OptionName::Short(c)) => match dialect {
            Dialect::Gnu => format!("option requires an argument -- '{}'", c),
            _ => format!("option requires an argument -- {}", c),
        },
        Error::UnexpectedArgument(OptionName::Short(c)) => match dialect {
            Dialect::Gnu => format!("option '-{}' doesn't allow an argument", c),
            Dialect::Posix => format!("option does not take an argument -- {}", c),
            Dialect::Bsd | Dialect::Darwin => format!("option doesn't take an argument -- {}", c),
        },
        Error::UnknownOption(OptionName::Long(text)) => match dialect {
            Dialect::Gnu => format!("unrecognized option '{}'", text),
            Dialect::Posix => format!("illegal option -- {}", text),
            Dialect::Bsd => format!("unknown option -- {}", text),
            Dialect::Darwin => format!("unrecognized option `{}'", text),
        },
        Error::UnexpectedArgument(OptionName::Long(text)) => match dialect {
            Dialect::Gnu => format!("option '{}' doesn't allow an argument", text),
            Dialect::Posix => format!("option does not take an argument -- {}", text),
            Dialect::Bsd | Dialect::Darwin => format!("option `{}' doesn't allow an argument", text),
        },
        Error::MissingArgument(OptionName::Long(text)) => match dialect {
            Dialect::Gnu => format!("option '{}' requires an argument", gnu_long_name(text, d)),
            Dialect::Posix => format!("option requires an argument -- {}", text),
            Dialect::Bsd | Dialect::Darwin => format!("option `{}' requires an argument", text),
        },
        Error::AmbiguousLongOption { option, candidates } => match dialect {
            Dialect::Gnu if d.escaped => format!("option '{}' is ambiguous", option),
            Dialect::Gnu => {
                let lead = double_leader(option);
                let mut s = format!("option '{}' is ambiguous; possibilities:", option);
                for name in candidates {
                    s.push_str(&format!(" '{}{}'", lead, name));
                }
                s
            }
            Dialect::Posix => format!("ambiguous option -- {}", option),
            Dialect::Bsd | Dialect::Darwin => format!("option `{}' is ambiguous", option),
        },
    };
    format!("{}: {}\n", program, message)
}

/// GNU names a long option by its full table name when complaining about a
/// missing argument, whatever abbreviation was typed.
fn gnu_long_name(text: &str, d: &Diagnostic<'_>) -> String {
    match d.entry {
        Some(name) if !d.escaped => format!("{}{}", double_leader(text), name),
        _ => text.to_string(),
    }
}

fn double_leader(text: &str) -> String {
    let c = text.chars().next().unwrap_or('-');
    format!("{}{}", c, c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(dialect: Dialect, error: Error) -> String {
        let d = Diagnostic {
            error: &error,
            entry: None,
            escaped: false,
        };
        render(dialect, "prog", &d)
    }

    fn long(text: &str) -> OptionName {
        OptionName::Long(text.to_string())
    }

    // -- short options --

    #[test]
    fn unknown_short_per_dialect() {
        let e = || Error::UnknownOption(OptionName::Short('a'));
        assert_eq!(line(Dialect::Gnu, e()), "prog: invalid option -- 'a'\n");
        assert_eq!(line(Dialect::Posix, e()), "prog: illegal option -- a\n");
        assert_eq!(line(Dialect::Bsd, e()), "prog: unknown option -- a\n");
        assert_eq!(line(Dialect::Darwin, e()), "prog: invalid option -- a\n");
    }

    #[test]
    fn missing_short_argument() {
        let e = || Error::MissingArgument(OptionName::Short('r'));
        assert_eq!(
            line(Dialect::Gnu, e()),
            "prog: option requires an argument -- 'r'\n"
        );
        assert_eq!(
            line(Dialect::Bsd, e()),
            "prog: option requires an argument -- r\n"
        );
    }

    // -- long options --

    #[test]
    fn unknown_long_per_dialect() {
        let e = || Error::UnknownOption(long("--noarg"));
        assert_eq!(line(Dialect::Gnu, e()), "prog: unrecognized option '--noarg'\n");
        assert_eq!(line(Dialect::Posix, e()), "prog: illegal option -- --noarg\n");
        assert_eq!(line(Dialect::Bsd, e()), "prog: unknown option -- --noarg\n");
        assert_eq!(line(Dialect::Darwin, e()), "prog: unrecognized option `--noarg'\n");
    }

    #[test]
    fn gnu_missing_argument_uses_full_name() {
        let error = Error::MissingArgument(long("-req"));
        let d = Diagnostic {
            error: &error,
            entry: Some("reqarg"),
            escaped: false,
        };
        assert_eq!(
            render(Dialect::Gnu, "prog", &d),
            "prog: option '--reqarg' requires an argument\n"
        );
        assert_eq!(
            render(Dialect::Bsd, "prog", &d),
            "prog: option `-req' requires an argument\n"
        );

        let error = Error::MissingArgument(long("-W reqarg"));
        let d = Diagnostic {
            error: &error,
            entry: Some("reqarg"),
            escaped: true,
        };
        assert_eq!(
            render(Dialect::Gnu, "prog", &d),
            "prog: option '-W reqarg' requires an argument\n"
        );
    }

    #[test]
    fn ambiguous_lists_possibilities_for_gnu() {
        let e = || Error::AmbiguousLongOption {
            option: "-no".to_string(),
            candidates: vec!["noa".to_string(), "nob".to_string()],
        };
        assert_eq!(
            line(Dialect::Gnu, e()),
            "prog: option '-no' is ambiguous; possibilities: '--noa' '--nob'\n"
        );
        assert_eq!(line(Dialect::Posix, e()), "prog: ambiguous option -- -no\n");
        assert_eq!(line(Dialect::Bsd, e()), "prog: option `-no' is ambiguous\n");
    }

    #[test]
    fn buffer_sink_collects_and_drains() {
        let mut sink = Sink::Buffer(String::new());
        sink.emit("a\n");
        sink.emit("b\n");
        assert_eq!(sink.take(), "a\nb\n");
        assert_eq!(sink.take(), "");
        assert_eq!(Sink::Stderr.take(), "");
    }

    #[test]
    fn stderr_sink_writes_through() {
        let mut sink = Sink::Stderr;
        sink.emit("prog: written to stderr\n");
        assert_eq!(sink.take(), "");
    }
}
