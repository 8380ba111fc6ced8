pub mod decode;
pub mod info;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Print the metadata of a dictionary
    Info(info::InfoArgs),
    /// Decode dictionaries into JSON lines of rendered entries
    Decode(decode::DecodeArgs),
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Info(info) => info.handle(),
            Commands::Decode(decode) => decode.handle(),
        }
    }
}
