use std::io;

#[derive(Debug, thiserror::Error)]
pub enum OptdumpError {
    #[error("{0}\nTry 'optdump --help' for more information.")]
    Usage(String),

    #[error("unknown style '{0}' (expected posix, gnu, bsd, darwin or dos)")]
    UnknownStyle(String),

    #[error("unknown setting '{0}'")]
    UnknownSetting(String),

    #[error("bad long option entry '{0}'")]
    BadLongOption(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, OptdumpError>;

/// Report a fatal error and exit.
pub fn fatal(msg: &str) -> ! {
    eprintln!("optdump: {}", msg);
    std::process::exit(2);
}
