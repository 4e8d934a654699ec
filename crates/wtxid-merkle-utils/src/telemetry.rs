use color_eyre::eyre::{
    eyre,
    Result,
    WrapErr as _,
};
use tracing_subscriber::EnvFilter;

/// Installs a global subscriber writing logs filtered by `directives` to stderr.
///
/// # Errors
/// Returns an error if `directives` cannot be parsed or if a global subscriber
/// was already installed.
pub fn init(directives: &str) -> Result<()> {
    let filter = EnvFilter::try_new(directives)
        .wrap_err_with(|| format!("failed to parse log filter directives `{directives}`"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| eyre!(err))
        .wrap_err("failed installing global tracing subscriber")
}
