use std::fmt;

/// The option an error is about, as the user wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionName {
    /// A single character from a short option cluster.
    Short(char),
    /// Long option text without any attached argument, leader(s) included
    /// (`--name`, `-name`, or `-W name` when reached through the long escape).
    Long(String),
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionName::Short(c) => write!(f, "-{}", c),
            OptionName::Long(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("unknown option {0}")]
    UnknownOption(OptionName),

    #[error("option {option} is ambiguous")]
    AmbiguousLongOption {
        option: String,
        /// Names of every entry the abbreviation matched, in table order.
        candidates: Vec<String>,
    },

    #[error("option {0} doesn't allow an argument")]
    UnexpectedArgument(OptionName),

    #[error("option {0} requires an argument")]
    MissingArgument(OptionName),
}

impl Error {
    pub fn option(&self) -> OptionName {
        match self {
            Error::UnknownOption(o) | Error::UnexpectedArgument(o) | Error::MissingArgument(o) => {
                o.clone()
            }
            Error::AmbiguousLongOption { option, .. } => OptionName::Long(option.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_short_and_long() {
        let e = Error::UnknownOption(OptionName::Short('x'));
        assert_eq!(e.to_string(), "unknown option -x");
        let e = Error::MissingArgument(OptionName::Long("--reqarg".to_string()));
        assert_eq!(e.to_string(), "option --reqarg requires an argument");
    }

    #[test]
    fn ambiguous_reports_option_text() {
        let e = Error::AmbiguousLongOption {
            option: "--no".to_string(),
            candidates: vec!["noa".to_string(), "nob".to_string()],
        };
        assert_eq!(e.option(), OptionName::Long("--no".to_string()));
        assert_eq!(e.to_string(), "option --no is ambiguous");
    }
}
