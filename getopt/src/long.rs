//! Long option matching.

use crate::classify::looks_like_argument;
use crate::config::Config;
use crate::error::{Error, OptionName};
use crate::getopt::{Call, Parsed, ParserState};
use crate::spec::{HasArg, LongOpt, ShortSpec};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LongHit<'t> {
    pub index: usize,
    /// Value attached to the name (`--name=value`, or the tail of
    /// `--namevalue` in adjacent mode).
    pub arg: Option<&'t str>,
    /// The name matched an entry in full rather than as an abbreviation.
    pub exact: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LongMatch<'t> {
    Found(LongHit<'t>),
    /// Table indexes of every entry the abbreviation could mean.
    Ambiguous(Vec<usize>),
    NotFound,
}

fn same_name(a: &str, b: &str, cfg: &Config) -> bool {
    if cfg.case_insensitive {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}

fn has_prefix(name: &str, prefix: &str, cfg: &Config) -> bool {
    name.get(..prefix.len())
        .map_or(false, |head| same_name(head, prefix, cfg))
}

/// Split `region` at its first assigner character.
fn split_assigner<'t>(region: &'t str, cfg: &Config) -> (&'t str, Option<&'t str>) {
    match region.char_indices().find(|&(_, c)| cfg.is_assigner(c)) {
        Some((pos, c)) => (&region[..pos], Some(&region[pos + c.len_utf8()..])),
        None => (region, None),
    }
}

/// Resolve the text after the leader(s) against `table`. Returns the option
/// name as typed (without any attached value) together with the outcome.
pub(crate) fn match_long<'t>(
    region: &'t str,
    table: &[LongOpt<'_>],
    cfg: &Config,
) -> (&'t str, LongMatch<'t>) {
    if cfg.long_adjacent {
        return match_adjacent(region, table, cfg);
    }

    let (name, arg) = split_assigner(region, cfg);

    if let Some(index) = table.iter().position(|o| same_name(o.name, name, cfg)) {
        return (
            name,
            LongMatch::Found(LongHit {
                index,
                arg,
                exact: true,
            }),
        );
    }

    let hits: Vec<usize> = table
        .iter()
        .enumerate()
        .filter(|(_, o)| has_prefix(o.name, name, cfg))
        .map(|(i, _)| i)
        .collect();

    // Several abbreviations that all do the same thing are one match.
    let first = hits.first().copied();
    let outcome = match first {
        None => LongMatch::NotFound,
        Some(first) if hits.iter().all(|&i| table[i].same_effect(&table[first])) => {
            LongMatch::Found(LongHit {
                index: first,
                arg,
                exact: false,
            })
        }
        Some(_) => LongMatch::Ambiguous(hits),
    };
    (name, outcome)
}

/// Longest table name that starts `region`; whatever follows it (past one
/// optional assigner) is the attached value.
fn match_adjacent<'t>(
    region: &'t str,
    table: &[LongOpt<'_>],
    cfg: &Config,
) -> (&'t str, LongMatch<'t>) {
    let mut best: Option<(usize, usize)> = None;
    for (i, o) in table.iter().enumerate() {
        let len = o.name.len();
        if len > best.map_or(0, |(_, l)| l) && has_prefix(region, o.name, cfg) {
            best = Some((i, len));
        }
    }

    let Some((index, len)) = best else {
        return (split_assigner(region, cfg).0, LongMatch::NotFound);
    };

    let rest = &region[len..];
    let arg = match rest.chars().next() {
        None => None,
        Some(c) if cfg.is_assigner(c) => Some(&rest[c.len_utf8()..]),
        Some(_) => Some(rest),
    };
    (
        &region[..len],
        LongMatch::Found(LongHit {
            index,
            arg,
            exact: rest.is_empty(),
        }),
    )
}

pub(crate) enum LongOnly<'t> {
    Long(LongMatch<'t>, &'t str),
    Short,
}

/// Decide whether a single-leader region is a long option or the start of a
/// short cluster.
pub(crate) fn resolve_long_only<'t>(
    region: &'t str,
    table: &[LongOpt<'_>],
    spec: &ShortSpec<'_>,
    cfg: &Config,
) -> LongOnly<'t> {
    let Some(first) = region.chars().next() else {
        return LongOnly::Short;
    };
    let short_ok = spec.contains(first, cfg.case_insensitive);
    let (name, outcome) = match_long(region, table, cfg);

    if short_ok && first.len_utf8() == region.len() {
        // `-c`: short unless a long option is named exactly `c`.
        return match outcome {
            LongMatch::Found(hit) if hit.exact && !cfg.two_char_short => {
                LongOnly::Long(LongMatch::Found(hit), name)
            }
            _ => LongOnly::Short,
        };
    }

    match outcome {
        LongMatch::NotFound if short_ok => LongOnly::Short,
        outcome => LongOnly::Long(outcome, name),
    }
}

/// Where a long option was found.
pub(crate) struct LongSite {
    /// The option as the user wrote it, for diagnostics.
    pub text: String,
    /// Index of the first token after the option name.
    pub next: usize,
    /// Reached through the `W;` escape.
    pub escaped: bool,
}

impl ParserState {
    pub(crate) fn long_option<S: AsRef<str>>(
        &mut self,
        args: &[S],
        table: &[LongOpt<'_>],
        outcome: LongMatch<'_>,
        site: LongSite,
        call: &Call<'_, '_>,
    ) -> Parsed {
        self.cluster = 0;
        match outcome {
            LongMatch::Found(hit) => self.take_long(args, table, hit, site, call),
            LongMatch::Ambiguous(hits) => {
                self.optopt = 0;
                self.optind = site.next;
                let candidates = hits.iter().map(|&i| table[i].name.to_string()).collect();
                let error = Error::AmbiguousLongOption {
                    option: site.text,
                    candidates,
                };
                self.fail(call, error, None, site.escaped)
            }
            LongMatch::NotFound => {
                self.optopt = 0;
                self.optind = site.next;
                let error = Error::UnknownOption(OptionName::Long(site.text));
                self.fail(call, error, None, site.escaped)
            }
        }
    }

    fn take_long<S: AsRef<str>>(
        &mut self,
        args: &[S],
        table: &[LongOpt<'_>],
        hit: LongHit<'_>,
        site: LongSite,
        call: &Call<'_, '_>,
    ) -> Parsed {
        let cfg = call.behavior.config;
        let entry = &table[hit.index];
        let optopt = if site.escaped { 0 } else { entry.val };

        if let Some(value) = hit.arg {
            if entry.has_arg == HasArg::No {
                self.optopt = optopt;
                self.optind = site.next;
                let error = Error::UnexpectedArgument(OptionName::Long(site.text));
                return self.fail(call, error, Some(entry.name), site.escaped);
            }
            self.optarg = Some(value.to_string());
            self.optind = site.next;
        } else {
            let hyphen = cfg.hyphen_args && entry.has_arg == HasArg::Required;
            let separate = call
                .separate(args, site.next)
                .filter(|v| looks_like_argument(Some(*v), cfg, hyphen));
            let wants = match entry.has_arg {
                HasArg::No => false,
                HasArg::Required => true,
                HasArg::Optional => cfg.separated_optional,
            };

            match separate {
                Some(value) if wants => {
                    self.optarg = Some(value.to_string());
                    self.optind = site.next + 1;
                }
                None if entry.has_arg == HasArg::Required => {
                    self.optopt = optopt;
                    self.missing_at(cfg, site.next, args.len() > site.next);
                    let error = Error::MissingArgument(OptionName::Long(site.text));
                    return self.fail(call, error, Some(entry.name), site.escaped);
                }
                _ => self.optind = site.next,
            }
        }

        self.longind = Some(hit.index);
        match entry.flag {
            Some(store) => {
                store.set(entry.val);
                Parsed::Flagged
            }
            None => Parsed::Opt(entry.val),
        }
    }
}
