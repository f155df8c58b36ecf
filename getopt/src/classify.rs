//! Token classification.

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    /// Leader followed by at least one more character, other than `--`.
    Option,
    /// Exactly two identical leaders.
    Terminator,
    Operand,
}

pub(crate) fn classify(token: &str, cfg: &Config) -> Token {
    let mut chars = token.chars();
    let first = match chars.next() {
        Some(c) if cfg.is_leader(c) => c,
        _ => return Token::Operand,
    };
    match (chars.next(), chars.next()) {
        (None, _) => Token::Operand,
        (Some(second), None) if second == first => Token::Terminator,
        _ => Token::Option,
    }
}

/// `--name` style: an option token whose first two characters are the same
/// leader.
pub(crate) fn is_double_leader(token: &str, cfg: &Config) -> bool {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(a), Some(b)) => a == b && cfg.is_leader(a),
        _ => false,
    }
}

/// Whether `token` can serve as a separate option argument. With
/// `allow_option` anything present qualifies; otherwise option-like tokens
/// and the terminator do not. A lone leader is never option-like.
pub(crate) fn looks_like_argument(token: Option<&str>, cfg: &Config, allow_option: bool) -> bool {
    match token {
        None => false,
        Some(_) if allow_option => true,
        Some(t) => classify(t, cfg) == Token::Operand,
    }
}

/// Byte length of the leader that starts `token`.
pub(crate) fn leader_len(token: &str) -> usize {
    token.chars().next().map_or(0, char::len_utf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_tokens() {
        let cfg = Config::gnu();
        assert_eq!(classify("-a", &cfg), Token::Option);
        assert_eq!(classify("-abc", &cfg), Token::Option);
        assert_eq!(classify("--name", &cfg), Token::Option);
        assert_eq!(classify("---", &cfg), Token::Option);
        assert_eq!(classify("--", &cfg), Token::Terminator);
        assert_eq!(classify("-", &cfg), Token::Operand);
        assert_eq!(classify("", &cfg), Token::Operand);
        assert_eq!(classify("file", &cfg), Token::Operand);
        assert_eq!(classify("/x", &cfg), Token::Operand);
    }

    #[test]
    fn dos_tokens() {
        let cfg = Config::dos();
        assert_eq!(classify("/x", &cfg), Token::Option);
        assert_eq!(classify("//", &cfg), Token::Terminator);
        assert_eq!(classify("-x", &cfg), Token::Operand);
    }

    #[test]
    fn mixed_leaders_are_not_a_terminator() {
        let cfg = Config::gnu().leaders("-/");
        assert_eq!(classify("-/", &cfg), Token::Option);
        assert!(!is_double_leader("-/x", &cfg));
        assert!(is_double_leader("//x", &cfg));
    }

    #[test]
    fn argument_likeness() {
        let cfg = Config::gnu();
        assert!(looks_like_argument(Some("value"), &cfg, false));
        assert!(looks_like_argument(Some("-"), &cfg, false));
        assert!(!looks_like_argument(Some("-x"), &cfg, false));
        assert!(!looks_like_argument(Some("--"), &cfg, false));
        assert!(looks_like_argument(Some("-x"), &cfg, true));
        assert!(looks_like_argument(Some("--"), &cfg, true));
        assert!(!looks_like_argument(None, &cfg, true));
    }
}
