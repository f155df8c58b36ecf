// Drives one option parsing session from the command line and prints what
// every call returned.

mod arguments;
mod error;
mod logging;

use std::cell::Cell;
use std::io::{self, Write};

use tracing::info;
use tunable_getopt::{Getopt, LongOpt, Parsed};

use arguments::{parse_args, usage, Cmdline};
use error::{fatal, Result};

fn main() {
    logging::init_tracing();

    if let Err(e) = run() {
        fatal(&e.to_string());
    }
}

fn run() -> Result<()> {
    let cmd = parse_args(std::env::args().collect())?;
    if cmd.help {
        print!("{}", usage());
        return Ok(());
    }

    let mut out = io::stdout().lock();
    dump(cmd, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Run the session described by `cmd` to the end, one line per call, then
/// print the final vector and the operands left after the cursor.
fn dump<W: Write>(cmd: Cmdline, out: &mut W) -> io::Result<()> {
    let Cmdline {
        config,
        long,
        shortopts,
        mut argv,
        ..
    } = cmd;

    let stores: Vec<Cell<i32>> = long.iter().flatten().map(|_| Cell::new(0)).collect();
    let table: Option<Vec<LongOpt<'_>>> = long.as_ref().map(|entries| {
        entries
            .iter()
            .zip(&stores)
            .map(|(entry, store)| {
                let opt = LongOpt::new(&entry.name, entry.has_arg, entry.val);
                if entry.flag {
                    opt.flag(store)
                } else {
                    opt
                }
            })
            .collect()
    });

    let mut getopt = Getopt::new(config);
    info!(shortopts = %shortopts, args = argv.len(), "starting session");

    loop {
        let parsed = getopt.next(&mut argv, &shortopts, table.as_deref());
        writeln!(out, "{}", describe(&parsed, &getopt, table.as_deref()))?;
        if parsed == Parsed::End {
            break;
        }
    }

    writeln!(out, "argv: {}", quoted(&argv))?;
    writeln!(out, "operands: {}", quoted(getopt.operands(&argv)))?;
    Ok(())
}

fn describe(parsed: &Parsed, getopt: &Getopt, table: Option<&[LongOpt<'_>]>) -> String {
    let mut line = match parsed {
        Parsed::Opt(val) => format!("opt {}", show(*val)),
        Parsed::Flagged => {
            let stored = getopt
                .longind()
                .and_then(|i| table?.get(i))
                .and_then(|o| o.flag)
                .map_or(0, Cell::get);
            format!("flag {}", show(stored))
        }
        Parsed::Operand => "operand".to_string(),
        Parsed::Invalid(e) => format!("invalid ({})", e),
        Parsed::Missing(e) => format!("missing ({})", e),
        Parsed::End => "end".to_string(),
    };

    if let Some(arg) = getopt.optarg() {
        line.push_str(&format!(" optarg={:?}", arg));
    }
    if let Some(index) = getopt.longind() {
        line.push_str(&format!(" longind={}", index));
    }
    if parsed.error().is_some() {
        line.push_str(&format!(" optopt={}", show(getopt.optopt())));
    }
    line.push_str(&format!(" optind={}", getopt.optind()));
    line
}

/// An option code as a quoted character when it is one, else the number.
fn show(val: i32) -> String {
    match u32::try_from(val).ok().and_then(char::from_u32) {
        Some(c) if c.is_ascii_graphic() => format!("'{}'", c),
        _ => val.to_string(),
    }
}

fn quoted<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|a| format!("{:?}", a.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_dump(args: &[&str]) -> String {
        let args = args.iter().map(|s| s.to_string()).collect();
        let cmd = parse_args(args).unwrap();
        let mut out = Vec::new();
        dump(cmd, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn show_codes() {
        assert_eq!(show('a' as i32), "'a'");
        assert_eq!(show(0), "0");
        assert_eq!(show(-1), "-1");
        assert_eq!(show(256), "256");
    }

    #[test]
    fn dumps_a_permuted_session() {
        let out = run_dump(&[
            "optdump",
            "-o",
            "no-posixly-correct",
            "--",
            "ab:",
            "x",
            "-a",
            "-b",
            "v",
            "y",
        ]);
        assert_eq!(
            out,
            "opt 'a' optind=2\n\
             opt 'b' optarg=\"v\" optind=4\n\
             end optind=4\n\
             argv: \"prog\" \"-a\" \"-b\" \"v\" \"x\" \"y\"\n\
             operands: \"x\" \"y\"\n"
        );
    }

    #[test]
    fn dumps_flag_stores_and_errors() {
        let out = run_dump(&[
            "optdump",
            "-o",
            "quiet",
            "-L",
            "verbose@V",
            "",
            "--verb",
            "-q",
        ]);
        assert_eq!(
            out,
            "flag 'V' longind=0 optind=2\n\
             invalid (unknown option -q) optopt='q' optind=3\n\
             end optind=3\n\
             argv: \"prog\" \"--verb\" \"-q\"\n\
             operands: \n"
        );
    }
}
