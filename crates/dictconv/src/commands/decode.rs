use clap::Args;
use dictconv_stardict::{StarDict, StarDictFiles};
use miette::{miette, Context, IntoDiagnostic, Result};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{error, info};
use walkdir::WalkDir;

#[derive(Args)]
pub struct DecodeArgs {
    /// An input .ifo file
    #[arg(short, long, value_name = "FILE", required_unless_present = "directory")]
    ifo: Option<PathBuf>,

    /// A directory to search for .ifo files
    #[arg(short, long, value_name = "DIR", conflicts_with = "ifo")]
    directory: Option<PathBuf>,

    /// Target file for entries, defaults to stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

fn find_dictionaries(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "ifo"))
        .collect()
}

fn decode(ifo: &Path, out: &mut impl Write) -> Result<usize> {
    let files = StarDictFiles::from_ifo(ifo).context(format!("path: {}", ifo.display()))?;
    let dict = StarDict::open(&files).context(format!("path: {}", ifo.display()))?;

    let entries = dict.entries();
    for entry in &entries {
        serde_json::to_writer(&mut *out, entry).into_diagnostic()?;
        writeln!(out).into_diagnostic()?;
    }
    Ok(entries.len())
}

impl DecodeArgs {
    fn create_output(&self) -> Result<Box<dyn Write>> {
        let Some(path) = &self.output else {
            return Ok(Box::new(std::io::stdout().lock()));
        };

        let f = if !self.overwrite {
            File::create_new(path)
                .into_diagnostic()
                .context(format!("creating {}", path.display()))?
        } else {
            File::create(path)
                .into_diagnostic()
                .context(format!("creating {}", path.display()))?
        };
        Ok(Box::new(BufWriter::new(f)))
    }

    pub fn handle(&self) -> Result<()> {
        let mut out = self.create_output()?;

        if let Some(ifo) = &self.ifo {
            let count = decode(ifo, &mut out)?;
            info!("decoded {} entries from {}", count, ifo.display());
            return out.flush().into_diagnostic();
        }

        let dir = self
            .directory
            .as_ref()
            .ok_or_else(|| miette!("either --ifo or --directory is required"))?;

        let mut converted = 0;
        for ifo in find_dictionaries(dir) {
            match decode(&ifo, &mut out) {
                Ok(count) => {
                    info!("decoded {} entries from {}", count, ifo.display());
                    converted += 1;
                }
                Err(err) => error!("skipping {}: {:?}", ifo.display(), err),
            }
        }
        out.flush().into_diagnostic()?;

        if converted == 0 {
            return Err(miette!("no dictionaries converted in {}", dir.display()));
        }
        info!("converted {} dictionaries", converted);
        Ok(())
    }
}
