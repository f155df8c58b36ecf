//! Session configuration.
//!
//! A `Config` is the static policy of a parse session. The presets stand in
//! for the historical getopt flavours; every knob can still be flipped with
//! the builder methods afterwards. Per call, the policy is merged with the
//! spec-string modifiers and the `POSIXLY_CORRECT` marker into a
//! [`Behavior`].

use crate::spec::Modifiers;

/// Which family of diagnostic wording to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Posix,
    Gnu,
    Bsd,
    Darwin,
}

/// What the long escape (`W;`) does when its name matches no long option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeFallback {
    /// Return the escape character itself with the name as its argument.
    Argument,
    /// Report an unrecognized option.
    Error,
}

/// How far the cursor moves when a required argument is missing because the
/// option was the last token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingAdvance {
    /// Past the option token only (what deployed C libraries do).
    One,
    /// Past the option and the absent argument slot (POSIX as written).
    Two,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) leaders: String,
    pub(crate) assigners: String,
    pub(crate) case_insensitive: bool,
    pub(crate) single_leader_long: bool,
    pub(crate) single_leader_only: bool,
    pub(crate) permute: bool,
    pub(crate) operands_as_options: bool,
    pub(crate) quiet: bool,
    pub(crate) optional_args: bool,
    pub(crate) missing_colon: bool,
    pub(crate) separated_optional: bool,
    pub(crate) short_assign: bool,
    pub(crate) keep_terminator: bool,
    pub(crate) long_adjacent: bool,
    pub(crate) hyphen_args: bool,
    pub(crate) two_char_short: bool,
    pub(crate) long_escape: Option<char>,
    pub(crate) escape_fallback: EscapeFallback,
    pub(crate) missing_advance: MissingAdvance,
    pub(crate) dialect: Dialect,
    pub(crate) default_optopt: Option<i32>,
    pub(crate) program_name: Option<String>,
    pub(crate) posixly_correct: Option<bool>,
}

impl Config {
    fn base() -> Self {
        Config {
            leaders: "-".to_string(),
            assigners: "=".to_string(),
            case_insensitive: false,
            single_leader_long: false,
            single_leader_only: false,
            permute: false,
            operands_as_options: false,
            quiet: false,
            optional_args: true,
            missing_colon: false,
            separated_optional: false,
            short_assign: false,
            keep_terminator: false,
            long_adjacent: false,
            hyphen_args: false,
            two_char_short: false,
            long_escape: Some('W'),
            escape_fallback: EscapeFallback::Error,
            missing_advance: MissingAdvance::One,
            dialect: Dialect::Posix,
            default_optopt: None,
            program_name: None,
            posixly_correct: None,
        }
    }

    /// Strict POSIX: no permutation, no `::`, no `--name=value`.
    pub fn posix() -> Self {
        Config {
            assigners: String::new(),
            optional_args: false,
            ..Config::base()
        }
    }

    /// glibc behavior: permutation, hyphen arguments, GNU wording.
    pub fn gnu() -> Self {
        Config {
            permute: true,
            hyphen_args: true,
            dialect: Dialect::Gnu,
            ..Config::base()
        }
    }

    /// BSD libc: in-order scanning, `?` as the default option character.
    pub fn bsd() -> Self {
        Config {
            dialect: Dialect::Bsd,
            default_optopt: Some('?' as i32),
            ..Config::base()
        }
    }

    pub fn darwin() -> Self {
        Config {
            permute: true,
            dialect: Dialect::Darwin,
            ..Config::base()
        }
    }

    /// `/switch` syntax: case-insensitive, `:` or `=` assigns, long options
    /// take a single leader.
    pub fn dos() -> Self {
        Config {
            leaders: "/".to_string(),
            assigners: ":=".to_string(),
            case_insensitive: true,
            single_leader_long: true,
            single_leader_only: true,
            permute: true,
            ..Config::base()
        }
    }

    /// Accept long options introduced by a single leader (`-name`).
    pub fn long_only(mut self) -> Self {
        self.single_leader_long = true;
        self
    }

    pub fn leaders(mut self, leaders: &str) -> Self {
        self.leaders = leaders.to_string();
        self
    }

    pub fn assigners(mut self, assigners: &str) -> Self {
        self.assigners = assigners.to_string();
        self
    }

    pub fn case_insensitive(mut self, on: bool) -> Self {
        self.case_insensitive = on;
        self
    }

    pub fn single_leader_only(mut self, on: bool) -> Self {
        self.single_leader_only = on;
        self
    }

    pub fn permute(mut self, on: bool) -> Self {
        self.permute = on;
        self
    }

    /// Return every operand as option `1` instead of stopping at it.
    pub fn operands_as_options(mut self, on: bool) -> Self {
        self.operands_as_options = on;
        self
    }

    pub fn quiet(mut self, on: bool) -> Self {
        self.quiet = on;
        self
    }

    /// Honour `::` in the short spec. Without it `o::` means `o:`, unless a
    /// long option table is passed: `::` is always optional then.
    pub fn optional_args(mut self, on: bool) -> Self {
        self.optional_args = on;
        self
    }

    pub fn missing_colon(mut self, on: bool) -> Self {
        self.missing_colon = on;
        self
    }

    /// Let optional arguments come from the next token (`-o value`).
    pub fn separated_optional(mut self, on: bool) -> Self {
        self.separated_optional = on;
        self
    }

    /// Accept `-o=value` for short options.
    pub fn short_assign(mut self, on: bool) -> Self {
        self.short_assign = on;
        self
    }

    /// Leave the cursor on `--` instead of stepping past it.
    pub fn keep_terminator(mut self, on: bool) -> Self {
        self.keep_terminator = on;
        self
    }

    /// Match long options by longest table prefix, so `--outfile.txt`
    /// carries the argument `file.txt` for an `out` entry.
    pub fn long_adjacent(mut self, on: bool) -> Self {
        self.long_adjacent = on;
        self
    }

    /// Accept option-like tokens as required arguments (`-o -x`).
    pub fn hyphen_args(mut self, on: bool) -> Self {
        self.hyphen_args = on;
        self
    }

    /// In long-only mode, always read `-c` as a short option when `c` is one.
    pub fn two_char_short(mut self, on: bool) -> Self {
        self.two_char_short = on;
        self
    }

    pub fn long_escape(mut self, c: Option<char>) -> Self {
        self.long_escape = c;
        self
    }

    pub fn escape_fallback(mut self, fallback: EscapeFallback) -> Self {
        self.escape_fallback = fallback;
        self
    }

    pub fn missing_advance(mut self, advance: MissingAdvance) -> Self {
        self.missing_advance = advance;
        self
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn default_optopt(mut self, optopt: Option<i32>) -> Self {
        self.default_optopt = optopt;
        self
    }

    /// Name used in diagnostics instead of the first argument.
    pub fn program_name(mut self, name: &str) -> Self {
        self.program_name = Some(name.to_string());
        self
    }

    /// Force the `POSIXLY_CORRECT` marker instead of reading the environment.
    pub fn posixly_correct(mut self, value: Option<bool>) -> Self {
        self.posixly_correct = value;
        self
    }

    pub fn is_leader(&self, c: char) -> bool {
        self.leaders.contains(c)
    }

    pub fn is_assigner(&self, c: char) -> bool {
        self.assigners.contains(c)
    }

    pub(crate) fn optional_args_with(&self, longopts: bool) -> bool {
        self.optional_args || longopts
    }

    pub(crate) fn long_mode(&self) -> bool {
        self.single_leader_long || self.single_leader_only
    }

    /// Merge this policy with one call's spec modifiers.
    pub(crate) fn resolve(&self, modifiers: Modifiers, posixly_correct: bool) -> Behavior<'_> {
        let mut permute = self.permute && !posixly_correct;
        let mut operands_as_options = self.operands_as_options;
        let mut quiet = self.quiet;
        let mut missing_colon = self.missing_colon;

        if modifiers.in_order {
            permute = false;
        }
        if modifiers.return_operands {
            operands_as_options = true;
        }
        if modifiers.colon {
            quiet = true;
            missing_colon = true;
        }

        Behavior {
            config: self,
            permute,
            operands_as_options,
            quiet,
            missing_colon,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::gnu()
    }
}

/// The flags in effect for a single call.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Behavior<'c> {
    pub config: &'c Config,
    pub permute: bool,
    pub operands_as_options: bool,
    pub quiet: bool,
    pub missing_colon: bool,
}
