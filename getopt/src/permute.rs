//! Bringing the next option forward over operands.

use tracing::trace;

use crate::classify::{classify, is_double_leader, leader_len, looks_like_argument, Token};
use crate::config::Config;
use crate::long::{match_long, resolve_long_only, LongMatch, LongOnly};
use crate::spec::{HasArg, LongOpt, ShortSpec};

/// Find the next option or terminator at or after `cursor` and rotate it,
/// together with any separate argument tokens it owns, down to `cursor`.
/// Operands passed over keep their relative order.
///
/// Returns the number of tokens now starting at `cursor` that belong to the
/// option: 0 when nothing was found, 1 for the option alone, 2 with its
/// argument (3 for `-W name value`).
pub(crate) fn permute<S: AsRef<str>>(
    args: &mut [S],
    cursor: usize,
    spec: &ShortSpec<'_>,
    longopts: Option<&[LongOpt<'_>]>,
    cfg: &Config,
) -> usize {
    let found = match (cursor..args.len()).find(|&i| classify(args[i].as_ref(), cfg) != Token::Operand)
    {
        Some(i) => i,
        None => return 0,
    };

    let trailing = match classify(args[found].as_ref(), cfg) {
        Token::Option => trailing_arguments(args, found, spec, longopts, cfg),
        _ => 0,
    };
    let trailing = trailing.min(args.len() - 1 - found);

    args[cursor..=found + trailing].rotate_right(1 + trailing);
    trace!(from = found, to = cursor, moved = 1 + trailing, "permuted option");
    1 + trailing
}

/// How many tokens after `args[at]` are separate arguments of that option.
fn trailing_arguments<S: AsRef<str>>(
    args: &[S],
    at: usize,
    spec: &ShortSpec<'_>,
    longopts: Option<&[LongOpt<'_>]>,
    cfg: &Config,
) -> usize {
    let token = args[at].as_ref();
    let next = args.get(at + 1).map(AsRef::as_ref);
    let lead = leader_len(token);

    if let Some(table) = longopts {
        if is_double_leader(token, cfg) {
            let start = if cfg.single_leader_only { lead } else { 2 * lead };
            let (_, outcome) = match_long(&token[start..], table, cfg);
            return long_trailing(&outcome, table, next, cfg);
        }
    }

    cluster_trailing(args, at, spec, longopts, cfg)
}

fn long_trailing(
    outcome: &LongMatch<'_>,
    table: &[LongOpt<'_>],
    next: Option<&str>,
    cfg: &Config,
) -> usize {
    let LongMatch::Found(hit) = outcome else {
        return 0;
    };
    let entry = &table[hit.index];
    let wants = match entry.has_arg {
        HasArg::No => false,
        HasArg::Required => true,
        HasArg::Optional => cfg.separated_optional,
    };
    if hit.arg.is_some() || !wants {
        return 0;
    }
    let hyphen = cfg.hyphen_args && entry.has_arg == HasArg::Required;
    usize::from(looks_like_argument(next, cfg, hyphen))
}

/// Walk a short cluster to the first option that consumes the rest of the
/// token or the next one, long-only matches included.
fn cluster_trailing<S: AsRef<str>>(
    args: &[S],
    at: usize,
    spec: &ShortSpec<'_>,
    longopts: Option<&[LongOpt<'_>]>,
    cfg: &Config,
) -> usize {
    let token = args[at].as_ref();
    let next = args.get(at + 1).map(AsRef::as_ref);
    let body = &token[leader_len(token)..];
    let escape = longopts.and(cfg.long_escape);
    let optional_args = cfg.optional_args_with(longopts.is_some());

    for (pos, c) in body.char_indices() {
        // Dispatch retries long-only matching at every cluster position.
        if let (true, Some(table)) = (cfg.long_mode(), longopts) {
            if let LongOnly::Long(outcome, _) = resolve_long_only(&body[pos..], table, spec, cfg) {
                return long_trailing(&outcome, table, next, cfg);
            }
        }

        let Some(opt) = spec.lookup(c, cfg.case_insensitive, optional_args, escape) else {
            continue;
        };
        let rest = &body[pos + c.len_utf8()..];

        if let (true, Some(table)) = (opt.escape, longopts) {
            if !rest.is_empty() {
                let (_, outcome) = match_long(rest, table, cfg);
                return long_trailing(&outcome, table, next, cfg);
            }
            let Some(name) = next else {
                return 0;
            };
            let (_, outcome) = match_long(name, table, cfg);
            let after = args.get(at + 2).map(AsRef::as_ref);
            return 1 + long_trailing(&outcome, table, after, cfg);
        }

        match opt.has_arg {
            HasArg::No if cfg.short_assign && rest.starts_with(|a| cfg.is_assigner(a)) => return 0,
            HasArg::No => continue,
            _ if !rest.is_empty() => return 0,
            HasArg::Required => return usize::from(looks_like_argument(next, cfg, cfg.hyphen_args)),
            HasArg::Optional => {
                return usize::from(cfg.separated_optional && looks_like_argument(next, cfg, false))
            }
        }
    }
    0
}
