use clap::Parser;

#[derive(Parser)]
#[command(name = "genrelay")]
pub(crate) struct Cli {
    #[arg(long, default_value = "127.0.0.1")]
    pub(crate) host: String,
    #[arg(long, default_value_t = 8686)]
    pub(crate) port: u16,
    /// Path to the JSON seed file with provider profiles and access tokens.
    #[arg(long, default_value = "genrelay.json")]
    pub(crate) seed: String,
}
