//! Short option clusters and the `W;` long escape.

use crate::classify::{leader_len, looks_like_argument};
use crate::config::EscapeFallback;
use crate::error::{Error, OptionName};
use crate::getopt::{Call, Parsed, ParserState};
use crate::long::{match_long, LongMatch, LongSite};
use crate::spec::{HasArg, LongOpt, ShortSpec};

impl ParserState {
    /// Handle the character at the current cluster position of `token`.
    pub(crate) fn short_option<S: AsRef<str>>(
        &mut self,
        args: &[S],
        token: &str,
        spec: &ShortSpec<'_>,
        longopts: Option<&[LongOpt<'_>]>,
        call: &Call<'_, '_>,
    ) -> Parsed {
        let cfg = call.behavior.config;
        let lead = leader_len(token);
        let mut chars = token.get(lead + self.cluster..).unwrap_or("").chars();
        let Some(c) = chars.next() else {
            debug_assert!(false, "cluster offset {} past end of {:?}", self.cluster, token);
            self.optind += 1;
            self.cluster = 0;
            return Parsed::End;
        };
        let rest = chars.as_str();

        let escape = longopts.and(cfg.long_escape);
        let optional_args = cfg.optional_args_with(longopts.is_some());
        let Some(opt) = spec.lookup(c, cfg.case_insensitive, optional_args, escape) else {
            self.optopt = c as i32;
            self.step(c, rest);
            return self.fail(call, Error::UnknownOption(OptionName::Short(c)), None, false);
        };

        if let (true, Some(table)) = (opt.escape, longopts) {
            return self.long_escape(args, &token[..lead], opt.ch, rest, table, call);
        }

        match opt.has_arg {
            HasArg::No => {
                if cfg.short_assign && rest.starts_with(|a| cfg.is_assigner(a)) {
                    self.optopt = c as i32;
                    self.optind += 1;
                    self.cluster = 0;
                    let error = Error::UnexpectedArgument(OptionName::Short(c));
                    return self.fail(call, error, None, false);
                }
                self.step(c, rest);
            }
            _ if !rest.is_empty() => {
                let value = match rest.chars().next() {
                    Some(a) if cfg.short_assign && cfg.is_assigner(a) => &rest[a.len_utf8()..],
                    _ => rest,
                };
                self.optarg = Some(value.to_string());
                self.optind += 1;
                self.cluster = 0;
            }
            HasArg::Optional => {
                let slot = self.optind + 1;
                self.optind = slot;
                self.cluster = 0;
                if cfg.separated_optional {
                    let value = call
                        .separate(args, slot)
                        .filter(|v| looks_like_argument(Some(*v), cfg, false));
                    if let Some(value) = value {
                        self.optarg = Some(value.to_string());
                        self.optind += 1;
                    }
                }
            }
            HasArg::Required => {
                let slot = self.optind + 1;
                self.cluster = 0;
                match call.separate(args, slot) {
                    Some(value) if looks_like_argument(Some(value), cfg, cfg.hyphen_args) => {
                        self.optarg = Some(value.to_string());
                        self.optind = slot + 1;
                    }
                    _ => {
                        self.optopt = c as i32;
                        self.missing_at(cfg, slot, args.len() > slot);
                        let error = Error::MissingArgument(OptionName::Short(c));
                        return self.fail(call, error, None, false);
                    }
                }
            }
        }

        Parsed::Opt(opt.ch as i32)
    }

    /// Move past character `c`: to the next one in the cluster, or to the
    /// next token when `c` was the last.
    fn step(&mut self, c: char, rest: &str) {
        if rest.is_empty() {
            self.optind += 1;
            self.cluster = 0;
        } else {
            self.cluster += c.len_utf8();
        }
    }

    /// `-W name`: the rest of the token, or the next token, names a long
    /// option.
    fn long_escape<S: AsRef<str>>(
        &mut self,
        args: &[S],
        leader: &str,
        w: char,
        rest: &str,
        table: &[LongOpt<'_>],
        call: &Call<'_, '_>,
    ) -> Parsed {
        let cfg = call.behavior.config;
        self.cluster = 0;

        let slot = self.optind + 1;
        let (region, next) = if !rest.is_empty() {
            (rest, slot)
        } else {
            match call.separate(args, slot) {
                Some(name) => (name, slot + 1),
                None => {
                    self.optopt = w as i32;
                    self.missing_at(cfg, slot, args.len() > slot);
                    let error = Error::MissingArgument(OptionName::Short(w));
                    return self.fail(call, error, None, false);
                }
            }
        };

        let (name, outcome) = match_long(region, table, cfg);
        if outcome == LongMatch::NotFound && cfg.escape_fallback == EscapeFallback::Argument {
            self.optarg = Some(region.to_string());
            self.optind = next;
            return Parsed::Opt(w as i32);
        }

        let site = LongSite {
            text: format!("{}{} {}", leader, w, name),
            next,
            escaped: true,
        };
        self.long_option(args, table, outcome, site, call)
    }
}
