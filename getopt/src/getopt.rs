//! The dispatch state machine and its public handle.

use std::env;

use tracing::{debug, trace};

use crate::classify::{classify, is_double_leader, leader_len, Token};
use crate::config::{Behavior, Config, MissingAdvance};
use crate::error::Error;
use crate::long::{match_long, resolve_long_only, LongOnly, LongSite};
use crate::permute::permute;
use crate::report::{render, Diagnostic, Sink};
use crate::spec::{LongOpt, ShortSpec};

/// Result of one call to [`Getopt::next`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// A recognized option: the short option character or the long entry's
    /// `val`.
    Opt(i32),
    /// A long option with a flag store; `val` was written to the store.
    Flagged,
    /// A plain operand handed back as option `1`; the text is in `optarg`.
    Operand,
    /// Unknown option, ambiguous abbreviation, or a bad or missing argument.
    Invalid(Error),
    /// Missing argument, when the spec asked for `:` instead of `?`.
    Missing(Error),
    /// No more options.
    End,
}

impl Parsed {
    /// The classic integer result code.
    pub fn code(&self) -> i32 {
        match self {
            Parsed::Opt(val) => *val,
            Parsed::Flagged => 0,
            Parsed::Operand => 1,
            Parsed::Invalid(_) => '?' as i32,
            Parsed::Missing(_) => ':' as i32,
            Parsed::End => -1,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            Parsed::Invalid(e) | Parsed::Missing(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing parsed since creation or reset.
    Fresh,
    Scanning,
    /// Part way through a short option cluster.
    InCluster,
    /// `End` was returned; stays here until reset or repositioned.
    Exhausted,
}

#[derive(Debug)]
pub(crate) struct ParserState {
    pub optind: usize,
    /// Bytes of the current token already consumed after its leader.
    pub cluster: usize,
    pub optarg: Option<String>,
    pub optopt: i32,
    pub longind: Option<usize>,
    pub opterr: bool,
    pub phase: Phase,
    pub posixly_correct: bool,
    pub sink: Sink,
}

/// What one call works with besides the cursor.
pub(crate) struct Call<'c, 'a> {
    pub behavior: Behavior<'c>,
    pub program: &'a str,
    /// First index past the tokens this call's permutation moved into
    /// place. Separate arguments are never taken from there on.
    pub bound: Option<usize>,
}

impl Call<'_, '_> {
    pub fn separate<'s, S: AsRef<str>>(&self, args: &'s [S], index: usize) -> Option<&'s str> {
        if self.bound.map_or(false, |bound| index >= bound) {
            return None;
        }
        args.get(index).map(AsRef::as_ref)
    }
}

impl ParserState {
    pub(crate) fn new() -> Self {
        ParserState {
            optind: 1,
            cluster: 0,
            optarg: None,
            optopt: 0,
            longind: None,
            opterr: true,
            phase: Phase::Fresh,
            posixly_correct: false,
            sink: Sink::default(),
        }
    }

    fn begin(&mut self, cfg: &Config) {
        if self.optind == 0 {
            self.optind = 1;
            self.cluster = 0;
            self.phase = Phase::Fresh;
        }
        if self.phase == Phase::Fresh {
            self.posixly_correct = cfg
                .posixly_correct
                .unwrap_or_else(|| env::var_os("POSIXLY_CORRECT").is_some());
            self.phase = Phase::Scanning;
            debug!(
                optind = self.optind,
                posixly_correct = self.posixly_correct,
                "option parsing session reset"
            );
        }

        self.optarg = None;
        self.longind = None;
        if let Some(optopt) = cfg.default_optopt {
            self.optopt = optopt;
        }
    }

    fn dispatch<S: AsRef<str>>(
        &mut self,
        args: &mut [S],
        spec: &ShortSpec<'_>,
        longopts: Option<&[LongOpt<'_>]>,
        behavior: Behavior<'_>,
    ) -> Parsed {
        let cfg = behavior.config;
        if self.phase == Phase::Exhausted || self.optind >= args.len() {
            return Parsed::End;
        }

        let mut bound = None;
        if self.cluster == 0 {
            match classify(args[self.optind].as_ref(), cfg) {
                Token::Option => {}
                Token::Terminator => return self.terminate(cfg),
                Token::Operand => {
                    if behavior.operands_as_options {
                        self.optarg = Some(args[self.optind].as_ref().to_string());
                        self.optind += 1;
                        return Parsed::Operand;
                    }
                    if !behavior.permute {
                        return Parsed::End;
                    }
                    let moved = permute(args, self.optind, spec, longopts, cfg);
                    if moved == 0 {
                        return Parsed::End;
                    }
                    bound = Some(self.optind + moved);
                    if classify(args[self.optind].as_ref(), cfg) == Token::Terminator {
                        return self.terminate(cfg);
                    }
                }
            }
        }

        let args: &[S] = args;
        let program = match &cfg.program_name {
            Some(name) => name.as_str(),
            None => args.first().map_or("", |a| a.as_ref()),
        };
        let call = Call {
            behavior,
            program,
            bound,
        };
        let token = args[self.optind].as_ref();
        let lead = leader_len(token);

        if let Some(table) = longopts {
            if self.cluster == 0 && is_double_leader(token, cfg) {
                let start = if cfg.single_leader_only { lead } else { 2 * lead };
                let (name, outcome) = match_long(&token[start..], table, cfg);
                let site = LongSite {
                    text: format!("{}{}", &token[..start], name),
                    next: self.optind + 1,
                    escaped: false,
                };
                return self.long_option(args, table, outcome, site, &call);
            }

            if cfg.long_mode() {
                let region = token.get(lead + self.cluster..).unwrap_or("");
                if let LongOnly::Long(outcome, name) = resolve_long_only(region, table, spec, cfg) {
                    let site = LongSite {
                        text: format!("{}{}", &token[..lead], name),
                        next: self.optind + 1,
                        escaped: false,
                    };
                    return self.long_option(args, table, outcome, site, &call);
                }
            }
        }

        self.short_option(args, token, spec, longopts, &call)
    }

    fn terminate(&mut self, cfg: &Config) -> Parsed {
        if !cfg.keep_terminator {
            self.optind += 1;
        }
        Parsed::End
    }

    /// Position the cursor after a missing argument. `slot` is where the
    /// argument should have been.
    pub(crate) fn missing_at(&mut self, cfg: &Config, slot: usize, present: bool) {
        self.cluster = 0;
        self.optind = slot;
        if cfg.missing_advance == MissingAdvance::Two && !present {
            self.optind += 1;
        }
    }

    /// Report `error` and turn it into the call's result.
    pub(crate) fn fail(
        &mut self,
        call: &Call<'_, '_>,
        error: Error,
        entry: Option<&str>,
        escaped: bool,
    ) -> Parsed {
        let behavior = &call.behavior;
        if self.opterr && !behavior.quiet {
            let diagnostic = Diagnostic {
                error: &error,
                entry,
                escaped,
            };
            let line = render(behavior.config.dialect, call.program, &diagnostic);
            self.sink.emit(&line);
        }
        debug!(%error, optopt = self.optopt, optind = self.optind, "option error");

        match error {
            Error::MissingArgument(_) if behavior.missing_colon => Parsed::Missing(error),
            _ => Parsed::Invalid(error),
        }
    }
}

/// A parse session over one argument vector.
///
/// The caller owns both the session and the vector; every call to
/// [`next`](Getopt::next) resolves at most one option and leaves the cursor
/// on the next token to examine. With permutation on, the vector is
/// reordered in place so options precede operands.
#[derive(Debug)]
pub struct Getopt {
    config: Config,
    state: ParserState,
}

impl Default for Getopt {
    fn default() -> Self {
        Getopt::new(Config::default())
    }
}

impl Getopt {
    pub fn new(config: Config) -> Self {
        Getopt {
            config,
            state: ParserState::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve the next option in `args` (whose first element is the
    /// program name).
    ///
    /// `shortopts` lists the short options: `c` for a flag, `c:` for a
    /// required argument, `c::` for an optional one and `W;` for the long
    /// escape. It may start with `+` (no permutation) or `-` (operands come
    /// back as [`Parsed::Operand`]), then `:` (no diagnostics, and
    /// [`Parsed::Missing`] for missing arguments).
    pub fn next<S: AsRef<str>>(
        &mut self,
        args: &mut [S],
        shortopts: &str,
        longopts: Option<&[LongOpt<'_>]>,
    ) -> Parsed {
        self.state.begin(&self.config);

        let spec = ShortSpec::parse(shortopts);
        let behavior = self.config.resolve(spec.modifiers, self.state.posixly_correct);
        let parsed = self.state.dispatch(args, &spec, longopts, behavior);

        self.state.phase = match parsed {
            Parsed::End => Phase::Exhausted,
            _ if self.state.cluster > 0 => Phase::InCluster,
            _ => Phase::Scanning,
        };
        trace!(
            code = parsed.code(),
            optind = self.state.optind,
            cluster = self.state.cluster,
            "next option"
        );
        parsed
    }

    /// Index of the next token to examine.
    pub fn optind(&self) -> usize {
        self.state.optind
    }

    /// Move the cursor. `0` requests a full reset on the next call.
    pub fn set_optind(&mut self, optind: usize) {
        self.state.optind = optind;
        self.state.cluster = 0;
        if self.state.phase != Phase::Fresh {
            self.state.phase = Phase::Scanning;
        }
    }

    /// Start over on the next call, re-reading `POSIXLY_CORRECT`.
    pub fn reset(&mut self) {
        self.set_optind(0);
    }

    /// Argument of the last option, or the operand returned as option `1`.
    pub fn optarg(&self) -> Option<&str> {
        self.state.optarg.as_deref()
    }

    /// Option character involved in the last error (0 for long options).
    pub fn optopt(&self) -> i32 {
        self.state.optopt
    }

    /// Table index of the long option matched by the last call.
    pub fn longind(&self) -> Option<usize> {
        self.state.longind
    }

    /// Bytes of the current token consumed after its leader.
    pub fn cluster_offset(&self) -> usize {
        self.state.cluster
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn opterr(&self) -> bool {
        self.state.opterr
    }

    /// Enable or disable diagnostics.
    pub fn set_opterr(&mut self, on: bool) {
        self.state.opterr = on;
    }

    /// Tokens left after the cursor.
    pub fn operands<'a, S>(&self, args: &'a [S]) -> &'a [S] {
        &args[self.state.optind.min(args.len())..]
    }

    /// Collect diagnostics in memory instead of writing them to stderr.
    pub fn capture_diagnostics(&mut self) {
        self.state.sink = Sink::Buffer(String::new());
    }

    /// Drain captured diagnostics.
    pub fn take_diagnostics(&mut self) -> String {
        self.state.sink.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OptionName;

    fn session() -> Getopt {
        let mut g = Getopt::new(Config::gnu().posixly_correct(Some(false)));
        g.capture_diagnostics();
        g
    }

    fn opt(c: char) -> Parsed {
        Parsed::Opt(c as i32)
    }

    #[test]
    fn codes() {
        assert_eq!(opt('a').code(), 'a' as i32);
        assert_eq!(Parsed::Flagged.code(), 0);
        assert_eq!(Parsed::Operand.code(), 1);
        let e = Error::UnknownOption(OptionName::Short('x'));
        assert_eq!(Parsed::Invalid(e.clone()).code(), '?' as i32);
        assert_eq!(Parsed::Missing(e).code(), ':' as i32);
        assert_eq!(Parsed::End.code(), -1);
    }

    #[test]
    fn cluster_then_separate_argument() {
        let mut g = session();
        let mut args = ["cmd", "-ao", "arg", "path", "path"];

        assert_eq!(g.next(&mut args, ":abf:o:", None), opt('a'));
        assert_eq!(g.optind(), 1);
        assert_eq!(g.phase(), Phase::InCluster);

        assert_eq!(g.next(&mut args, ":abf:o:", None), opt('o'));
        assert_eq!(g.optarg(), Some("arg"));
        assert_eq!(g.optind(), 3);

        assert_eq!(g.next(&mut args, ":abf:o:", None), Parsed::End);
        assert_eq!(g.optind(), 3);
        assert_eq!(g.operands(&args), ["path", "path"]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "past end of")]
    fn shortened_token_trips_the_cluster_assertion() {
        let mut g = Getopt::new(Config::gnu().long_only().posixly_correct(Some(false)));
        g.capture_diagnostics();
        let table = [LongOpt::no_argument("noarg", 'N')];
        let mut args = vec!["cmd".to_string(), "-ab".to_string()];
        assert_eq!(g.next(&mut args, "ab", Some(&table)), opt('a'));
        args[1] = "-".to_string();
        g.next(&mut args, "ab", Some(&table));
    }

    #[test]
    fn end_is_sticky_until_reset() {
        let mut g = session();
        let mut args = ["cmd", "-a", "--", "-a"];

        assert_eq!(g.next(&mut args, "a", None), opt('a'));
        assert_eq!(g.next(&mut args, "a", None), Parsed::End);
        assert_eq!(g.optind(), 3);
        assert_eq!(g.next(&mut args, "a", None), Parsed::End);
        assert_eq!(g.optind(), 3);
        assert_eq!(g.phase(), Phase::Exhausted);

        g.reset();
        assert_eq!(g.next(&mut args, "a", None), opt('a'));
        assert_eq!(g.optind(), 2);
    }

    #[test]
    fn repositioning_resumes_after_end() {
        let mut g = session();
        let mut args = ["cmd", "arg", "-r"];

        assert_eq!(g.next(&mut args, "+:r:", None), Parsed::End);
        assert_eq!(g.optind(), 1);

        g.set_optind(2);
        let parsed = g.next(&mut args, "+:r:", None);
        assert_eq!(
            parsed,
            Parsed::Missing(Error::MissingArgument(OptionName::Short('r')))
        );
        assert_eq!(g.optind(), 3);
        assert_eq!(g.optopt(), 'r' as i32);
    }

    #[test]
    fn reset_replays_the_same_results() {
        let run = |g: &mut Getopt| {
            let mut args = ["cmd", "x", "-ab", "-c", "v", "y"];
            let mut seen = Vec::new();
            loop {
                let parsed = g.next(&mut args, "abc:", None);
                seen.push((parsed.clone(), g.optind(), g.optarg().map(String::from)));
                if parsed == Parsed::End {
                    break;
                }
            }
            (seen, args)
        };

        let mut g = session();
        let first = run(&mut g);
        g.reset();
        let second = run(&mut g);
        assert_eq!(first, second);
        assert_eq!(first.1, ["cmd", "-ab", "-c", "v", "x", "y"]);
    }

    #[test]
    fn progress_is_strictly_increasing() {
        let mut g = session();
        let mut args = ["cmd", "-xyz", "--bogus", "-", "-q", "--", "-a"];
        let table = [LongOpt::no_argument("real", 'r')];
        let mut last = (g.optind(), g.cluster_offset());
        loop {
            let parsed = g.next(&mut args, "", Some(&table));
            let now = (g.optind(), g.cluster_offset());
            if parsed == Parsed::End {
                assert!(now >= last);
                break;
            }
            assert!(now > last, "{:?} did not advance past {:?}", now, last);
            last = now;
        }
    }

    #[test]
    fn optind_zero_resets() {
        let mut g = session();
        let mut args = ["cmd", "-n"];
        g.set_optind(0);
        assert_eq!(g.next(&mut args, "n", None), opt('n'));
        assert_eq!(g.optind(), 2);
    }

    #[test]
    fn optarg_cleared_every_call() {
        let mut g = session();
        let mut args = ["cmd", "-rx", "-n"];
        assert_eq!(g.next(&mut args, "r:n", None), opt('r'));
        assert_eq!(g.optarg(), Some("x"));
        assert_eq!(g.next(&mut args, "r:n", None), opt('n'));
        assert_eq!(g.optarg(), None);
    }

    #[test]
    fn diagnostics_respect_opterr_and_colon() {
        let mut g = session();
        let mut args = ["prog", "-x", "-y", "-z"];

        assert!(matches!(g.next(&mut args, "", None), Parsed::Invalid(_)));
        assert_eq!(g.take_diagnostics(), "prog: invalid option -- 'x'\n");

        g.set_opterr(false);
        assert!(matches!(g.next(&mut args, "", None), Parsed::Invalid(_)));
        assert_eq!(g.take_diagnostics(), "");

        g.set_opterr(true);
        assert!(matches!(g.next(&mut args, ":", None), Parsed::Invalid(_)));
        assert_eq!(g.take_diagnostics(), "");
    }

    #[test]
    fn program_name_override() {
        let mut g = Getopt::new(Config::posix().program_name("tool"));
        g.capture_diagnostics();
        let mut args = ["/usr/bin/tool", "-q"];
        g.next(&mut args, "", None);
        assert_eq!(g.take_diagnostics(), "tool: illegal option -- q\n");
    }

    #[test]
    fn default_optopt_is_set_each_call() {
        let mut g = Getopt::new(Config::bsd());
        g.capture_diagnostics();
        let mut args = ["cmd", "-x", "-a"];
        g.next(&mut args, "a", None);
        assert_eq!(g.optopt(), 'x' as i32);
        g.next(&mut args, "a", None);
        assert_eq!(g.optopt(), '?' as i32);
    }

    #[test]
    fn posixly_correct_override_stops_permutation() {
        let mut g = Getopt::new(Config::gnu().posixly_correct(Some(true)));
        let mut args = ["cmd", "arg", "-n"];
        assert_eq!(g.next(&mut args, "n", None), Parsed::End);
        assert_eq!(g.optind(), 1);
        assert_eq!(args, ["cmd", "arg", "-n"]);
    }
}
