//! Option specifications: the short-option spec string and the long-option
//! table.

use std::cell::Cell;

/// Whether an option takes an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HasArg {
    No,
    Required,
    Optional,
}

/// One entry of a long-option table.
#[derive(Debug, Clone, Copy)]
pub struct LongOpt<'a> {
    pub name: &'a str,
    pub has_arg: HasArg,
    /// When set, a match stores `val` here and the call yields code 0.
    pub flag: Option<&'a Cell<i32>>,
    pub val: i32,
}

impl<'a> LongOpt<'a> {
    pub const fn new(name: &'a str, has_arg: HasArg, val: i32) -> Self {
        LongOpt {
            name,
            has_arg,
            flag: None,
            val,
        }
    }

    pub const fn no_argument(name: &'a str, val: char) -> Self {
        Self::new(name, HasArg::No, val as i32)
    }

    pub const fn required(name: &'a str, val: char) -> Self {
        Self::new(name, HasArg::Required, val as i32)
    }

    pub const fn optional(name: &'a str, val: char) -> Self {
        Self::new(name, HasArg::Optional, val as i32)
    }

    pub fn flag(mut self, store: &'a Cell<i32>) -> Self {
        self.flag = Some(store);
        self
    }

    /// Two entries are interchangeable when a match on either has the same
    /// effect.
    pub(crate) fn same_effect(&self, other: &LongOpt<'_>) -> bool {
        let same_flag = match (self.flag, other.flag) {
            (None, None) => true,
            (Some(a), Some(b)) => std::ptr::eq(a, b),
            _ => false,
        };
        self.has_arg == other.has_arg && self.val == other.val && same_flag
    }
}

/// Behavior modifiers taken from the front of a short spec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// `+`: stop at the first operand.
    pub in_order: bool,
    /// `-`: hand back operands as option `1`.
    pub return_operands: bool,
    /// `:`: no diagnostics, `:` for missing arguments.
    pub colon: bool,
}

/// A short option found in the spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ShortOpt {
    /// The character as written in the spec (differs from the token only in
    /// case-insensitive mode).
    pub ch: char,
    pub has_arg: HasArg,
    /// Marked `c;`: the rest of the token (or the next one) names a long
    /// option.
    pub escape: bool,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ShortSpec<'s> {
    body: &'s str,
    pub modifiers: Modifiers,
}

impl<'s> ShortSpec<'s> {
    /// Split the leading modifiers off a spec string. An optional `+` or `-`
    /// comes first, then an optional `:`.
    pub fn parse(spec: &'s str) -> Self {
        let mut modifiers = Modifiers::default();
        let mut body = spec;

        if let Some(rest) = body.strip_prefix('+') {
            modifiers.in_order = true;
            body = rest;
        } else if let Some(rest) = body.strip_prefix('-') {
            modifiers.return_operands = true;
            body = rest;
        }
        if let Some(rest) = body.strip_prefix(':') {
            modifiers.colon = true;
            body = rest;
        }

        ShortSpec { body, modifiers }
    }

    pub fn lookup(
        &self,
        c: char,
        case_insensitive: bool,
        optional_args: bool,
        escape: Option<char>,
    ) -> Option<ShortOpt> {
        if c == ':' {
            return None;
        }
        let found = self.find(c).or_else(|| {
            if !case_insensitive {
                return None;
            }
            let swapped = if c.is_ascii_lowercase() {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            if swapped == c {
                None
            } else {
                self.find(swapped)
            }
        })?;

        let (pos, ch) = found;
        let after = &self.body[pos + ch.len_utf8()..];
        let (has_arg, is_escape) = if after.starts_with("::") {
            let arity = if optional_args {
                HasArg::Optional
            } else {
                HasArg::Required
            };
            (arity, false)
        } else if after.starts_with(':') {
            (HasArg::Required, false)
        } else if after.starts_with(';') && escape == Some(ch) {
            (HasArg::Required, true)
        } else {
            (HasArg::No, false)
        };

        Some(ShortOpt {
            ch,
            has_arg,
            escape: is_escape,
        })
    }

    pub fn contains(&self, c: char, case_insensitive: bool) -> bool {
        self.lookup(c, case_insensitive, true, None).is_some()
    }

    fn find(&self, c: char) -> Option<(usize, char)> {
        self.body.char_indices().find(|&(_, ch)| ch == c)
    }
}
