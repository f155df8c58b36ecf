use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing on stderr.
///
/// Off unless `OPTDUMP_LOG` is set; its value is the filter (`debug`,
/// `tunable_getopt=trace`, ...).
pub fn init_tracing() {
    let Some(directives) = std::env::var("OPTDUMP_LOG").ok() else {
        return;
    };

    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();
}
