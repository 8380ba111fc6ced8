use clap::Args;
use dictconv_stardict::metadata::Metadata;
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, io::BufReader, path::PathBuf};

#[derive(Args)]
pub struct InfoArgs {
    /// An input .ifo file
    #[arg(short, long, value_name = "FILE")]
    ifo: PathBuf,
}

impl InfoArgs {
    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.ifo)
            .into_diagnostic()
            .context(format!("path: {}", &self.ifo.display()))?;
        let metadata = Metadata::read(BufReader::new(f))?;

        let json = serde_json::to_string_pretty(&metadata).into_diagnostic()?;
        println!("{json}");
        Ok(())
    }
}
