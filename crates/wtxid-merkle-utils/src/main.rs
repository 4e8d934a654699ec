use color_eyre::eyre::{
    Result,
    WrapErr as _,
};
use wtxid_merkle_utils::{
    cli::{
        self,
        Command,
    },
    commitment,
    config::Config,
    proof,
    root,
    telemetry,
    wtxids,
};

fn main() -> Result<()> {
    color_eyre::install()?;
    let config = Config::get().wrap_err("failed to read config from the environment")?;
    telemetry::init(&config.log)?;

    let cli = cli::get();
    let format = cli.format.unwrap_or(config.format);
    match cli.command {
        Command::Root(args) => root::run(args, format),
        Command::Proof(args) => proof::run(args, format),
        Command::Commitment(args) => commitment::run(args, format),
        Command::Wtxids(args) => wtxids::run(args, format),
    }
}
