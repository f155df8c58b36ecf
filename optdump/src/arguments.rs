use tunable_getopt::{
    Config, Dialect, EscapeFallback, Getopt, HasArg, LongOpt, MissingAdvance, Parsed,
};

use crate::error::{OptdumpError, Result};

const USAGE: &str = r#"Usage: optdump [OPTION]... [--] SHORTOPTS [ARG]...
Run one option parsing session over ARG... and print every result.

  -s, --style STYLE      Preset: posix, gnu (default), bsd, darwin or dos.
  -l, --long-only        Accept long options after a single leader.
  -L, --long LIST        Long option table, entries separated by spaces.
                         Each entry is NAME, NAME: or NAME:: followed by
                         an optional ,C (returns C) or @C (stores C).
  -n, --name NAME        Program name placed in front of ARG...
  -o, --set SETTING      Adjust the preset; may be repeated.  SETTING is
                         one of the switches below, optionally prefixed
                         with no-, or KEY=VALUE.
  -p, --posixly-correct  Behave as if POSIXLY_CORRECT were set.
  -h, --help             Show this help.

Switches:
  permute, case-insensitive, quiet, optional-args, missing-colon,
  separated-optional, short-assign, keep-terminator, long-adjacent,
  hyphen-args, two-char-short, operands-as-options, single-leader-only,
  escape-argument, missing-advance-two, posixly-correct

Keys:
  leaders=CHARS, assigners=CHARS, escape=C (empty disables),
  dialect=posix|gnu|bsd|darwin, default-optopt=C

Set OPTDUMP_LOG to a tracing filter (e.g. debug) to log the session.
"#;

/// One entry of the `--long` table before it is lent to the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongEntry {
    pub name: String,
    pub has_arg: HasArg,
    pub val: i32,
    /// Write `val` to a flag store instead of returning it.
    pub flag: bool,
}

#[derive(Debug)]
pub struct Cmdline {
    pub config: Config,
    pub long: Option<Vec<LongEntry>>,
    pub shortopts: String,
    /// Vector handed to the session under test, program name first.
    pub argv: Vec<String>,
    pub help: bool,
}

fn options() -> [LongOpt<'static>; 7] {
    [
        LongOpt::required("style", 's'),
        LongOpt::no_argument("long-only", 'l'),
        LongOpt::required("long", 'L'),
        LongOpt::required("name", 'n'),
        LongOpt::required("set", 'o'),
        LongOpt::no_argument("posixly-correct", 'p'),
        LongOpt::no_argument("help", 'h'),
    ]
}

pub fn usage() -> &'static str {
    USAGE
}

/// Parse optdump's own command line. `args[0]` is the program name.
pub fn parse_args(mut args: Vec<String>) -> Result<Cmdline> {
    let table = options();
    let mut getopt = Getopt::new(Config::gnu());
    getopt.set_opterr(false);

    let mut style = None;
    let mut long_only = false;
    let mut long = None;
    let mut name = "prog".to_string();
    let mut settings = Vec::new();
    let mut posixly_correct = None;
    let mut help = false;

    loop {
        let parsed = getopt.next(&mut args, "+s:lL:n:o:ph", Some(&table));
        let val = match parsed {
            Parsed::Opt(val) => val,
            Parsed::End => break,
            Parsed::Invalid(e) | Parsed::Missing(e) => {
                return Err(OptdumpError::Usage(e.to_string()))
            }
            Parsed::Flagged | Parsed::Operand => continue,
        };
        let optarg = getopt.optarg().unwrap_or_default().to_string();
        match char::from_u32(val as u32) {
            Some('s') => style = Some(parse_style(&optarg)?),
            Some('l') => long_only = true,
            Some('L') => long = Some(parse_long_table(&optarg)?),
            Some('n') => name = optarg,
            Some('o') => settings.push(optarg),
            Some('p') => posixly_correct = Some(true),
            Some('h') => help = true,
            _ => {}
        }
    }

    let mut rest = getopt.operands(&args).iter();
    let shortopts = match rest.next() {
        Some(spec) => spec.clone(),
        None if help => String::new(),
        None => return Err(OptdumpError::Usage("missing SHORTOPTS".to_string())),
    };

    let mut config = style.unwrap_or_else(Config::gnu);
    if long_only {
        config = config.long_only();
    }
    for setting in &settings {
        config = apply_setting(config, setting)?;
    }
    if posixly_correct.is_some() {
        config = config.posixly_correct(posixly_correct);
    }

    let mut argv = vec![name];
    argv.extend(rest.cloned());

    Ok(Cmdline {
        config,
        long,
        shortopts,
        argv,
        help,
    })
}

fn parse_style(style: &str) -> Result<Config> {
    match style {
        "posix" => Ok(Config::posix()),
        "gnu" => Ok(Config::gnu()),
        "bsd" => Ok(Config::bsd()),
        "darwin" => Ok(Config::darwin()),
        "dos" => Ok(Config::dos()),
        _ => Err(OptdumpError::UnknownStyle(style.to_string())),
    }
}

fn parse_dialect(dialect: &str) -> Option<Dialect> {
    match dialect {
        "posix" => Some(Dialect::Posix),
        "gnu" => Some(Dialect::Gnu),
        "bsd" => Some(Dialect::Bsd),
        "darwin" => Some(Dialect::Darwin),
        _ => None,
    }
}

fn single_char(value: &str) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn apply_setting(config: Config, setting: &str) -> Result<Config> {
    let unknown = || OptdumpError::UnknownSetting(setting.to_string());

    if let Some((key, value)) = setting.split_once('=') {
        return match key {
            "leaders" if !value.is_empty() => Ok(config.leaders(value)),
            "assigners" => Ok(config.assigners(value)),
            "escape" if value.is_empty() => Ok(config.long_escape(None)),
            "escape" => single_char(value)
                .map(|c| config.long_escape(Some(c)))
                .ok_or_else(unknown),
            "dialect" => parse_dialect(value)
                .map(|d| config.dialect(d))
                .ok_or_else(unknown),
            "default-optopt" => single_char(value)
                .map(|c| config.default_optopt(Some(c as i32)))
                .ok_or_else(unknown),
            _ => Err(unknown()),
        };
    }

    let (switch, on) = match setting.strip_prefix("no-") {
        Some(switch) => (switch, false),
        None => (setting, true),
    };
    let config = match switch {
        "permute" => config.permute(on),
        "case-insensitive" => config.case_insensitive(on),
        "quiet" => config.quiet(on),
        "optional-args" => config.optional_args(on),
        "missing-colon" => config.missing_colon(on),
        "separated-optional" => config.separated_optional(on),
        "short-assign" => config.short_assign(on),
        "keep-terminator" => config.keep_terminator(on),
        "long-adjacent" => config.long_adjacent(on),
        "hyphen-args" => config.hyphen_args(on),
        "two-char-short" => config.two_char_short(on),
        "operands-as-options" => config.operands_as_options(on),
        "single-leader-only" => config.single_leader_only(on),
        "posixly-correct" => config.posixly_correct(Some(on)),
        "escape-argument" => config.escape_fallback(if on {
            EscapeFallback::Argument
        } else {
            EscapeFallback::Error
        }),
        "missing-advance-two" => config.missing_advance(if on {
            MissingAdvance::Two
        } else {
            MissingAdvance::One
        }),
        _ => return Err(unknown()),
    };
    Ok(config)
}

/// Parse `--long` syntax: `NAME[:|::][,C|@C]` entries separated by
/// whitespace. Entries without `,C` or `@C` return 256 plus their index.
pub fn parse_long_table(list: &str) -> Result<Vec<LongEntry>> {
    list.split_whitespace()
        .enumerate()
        .map(|(index, item)| parse_long_entry(index, item))
        .collect()
}

fn parse_long_entry(index: usize, item: &str) -> Result<LongEntry> {
    let bad = || OptdumpError::BadLongOption(item.to_string());

    let (spec, val, flag) = match item.rfind(&[',', '@'][..]) {
        Some(pos) => {
            let marker = &item[pos..pos + 1];
            let c = single_char(&item[pos + 1..]).ok_or_else(bad)?;
            (&item[..pos], c as i32, marker == "@")
        }
        None => (item, 256 + index as i32, false),
    };

    let (name, has_arg) = if let Some(name) = spec.strip_suffix("::") {
        (name, HasArg::Optional)
    } else if let Some(name) = spec.strip_suffix(':') {
        (name, HasArg::Required)
    } else {
        (spec, HasArg::No)
    };

    Ok(LongEntry {
        name: name.to_string(),
        has_arg,
        val,
        flag,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    // -- long table syntax --

    #[test]
    fn long_entries() {
        let table = parse_long_table("noarg,N reqarg:,R opt:: store@S").unwrap();
        assert_eq!(
            table,
            vec![
                LongEntry {
                    name: "noarg".into(),
                    has_arg: HasArg::No,
                    val: 'N' as i32,
                    flag: false,
                },
                LongEntry {
                    name: "reqarg".into(),
                    has_arg: HasArg::Required,
                    val: 'R' as i32,
                    flag: false,
                },
                LongEntry {
                    name: "opt".into(),
                    has_arg: HasArg::Optional,
                    val: 258,
                    flag: false,
                },
                LongEntry {
                    name: "store".into(),
                    has_arg: HasArg::No,
                    val: 'S' as i32,
                    flag: true,
                },
            ]
        );
    }

    #[test]
    fn empty_name_and_empty_list() {
        let table = parse_long_table(":,E").unwrap();
        assert_eq!(table[0].name, "");
        assert_eq!(table[0].has_arg, HasArg::Required);
        assert!(parse_long_table("").unwrap().is_empty());
    }

    #[test]
    fn bad_long_entry() {
        assert!(matches!(
            parse_long_table("name,XY"),
            Err(OptdumpError::BadLongOption(_))
        ));
    }

    // -- command line --

    #[test]
    fn options_then_vector() {
        let cmd = parse_args(args(&[
            "optdump", "-s", "posix", "--long", "verbose,v", "--", "-ab:", "-a", "x",
        ]))
        .unwrap();
        assert_eq!(cmd.shortopts, "-ab:");
        assert_eq!(cmd.argv, args(&["prog", "-a", "x"]));
        assert_eq!(cmd.long.map(|t| t.len()), Some(1));
        assert!(!cmd.help);
    }

    #[test]
    fn stops_at_the_short_spec() {
        let cmd = parse_args(args(&["optdump", "-n", "tool", "ab", "-l"])).unwrap();
        assert_eq!(cmd.shortopts, "ab");
        assert_eq!(cmd.argv, args(&["tool", "-l"]));
        assert!(cmd.long.is_none());
    }

    #[test]
    fn missing_short_spec() {
        assert!(matches!(
            parse_args(args(&["optdump", "-l"])),
            Err(OptdumpError::Usage(_))
        ));
        assert!(parse_args(args(&["optdump", "--help"])).unwrap().help);
    }

    #[test]
    fn settings() {
        assert!(apply_setting(Config::gnu(), "no-permute").is_ok());
        assert!(apply_setting(Config::gnu(), "leaders=-/").is_ok());
        assert!(apply_setting(Config::gnu(), "escape=").is_ok());
        assert!(matches!(
            apply_setting(Config::gnu(), "dialect=vms"),
            Err(OptdumpError::UnknownSetting(_))
        ));
        assert!(matches!(
            apply_setting(Config::gnu(), "sideways"),
            Err(OptdumpError::UnknownSetting(_))
        ));
        assert!(matches!(parse_style("vms"), Err(OptdumpError::UnknownStyle(_))));
    }
}
