//! `atlas convert` command implementation.

use std::path::{Path, PathBuf};

use atlas_adf::Converter;
use atlas_config::{CliSettings, Config};
use clap::Args;
use rayon::prelude::*;
use tracing::info;

use crate::error::CliError;
use crate::output::Output;

/// Extension appended to converted files.
const OUTPUT_EXTENSION: &str = "adf.json";

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Markdown files to convert.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Never add a table of contents.
    #[arg(long)]
    no_toc: bool,

    /// Minimum heading count for the table of contents (overrides config).
    #[arg(long, value_name = "N")]
    toc_threshold: Option<usize>,

    /// Pretty-print JSON output.
    #[arg(long)]
    pretty: bool,

    /// Directory for `<name>.adf.json` files (default: stdout for one file,
    /// next to each source otherwise).
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover atlas.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be read, converted or written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            add_table_of_contents: self.no_toc.then_some(false),
            toc_threshold: self.toc_threshold,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let converter = Converter::with_options(config.converter);

        if self.files.len() == 1 && self.output.is_none() {
            let json = convert_file(&converter, &self.files[0], self.pretty)?;
            output.data(&json)?;
            return Ok(());
        }

        if let Some(dir) = &self.output {
            std::fs::create_dir_all(dir)?;
        }

        let written = self
            .files
            .par_iter()
            .map(|path| {
                let json = convert_file(&converter, path, self.pretty)?;
                let target = output_path(path, self.output.as_deref());
                std::fs::write(&target, json)?;
                info!("Wrote {}", target.display());
                Ok(target)
            })
            .collect::<Result<Vec<PathBuf>, CliError>>()?;

        for target in &written {
            output.info(&format!("  -> {}", target.display()));
        }
        output.success(&format!("Converted {} file(s).", written.len()));
        Ok(())
    }
}

/// Convert one file to ADF JSON.
fn convert_file(converter: &Converter, path: &Path, pretty: bool) -> Result<String, CliError> {
    let bytes = std::fs::read(path)?;
    let doc = converter
        .convert_bytes(&bytes)
        .map_err(|source| CliError::Convert {
            path: path.display().to_string(),
            source,
        })?;
    let json = if pretty {
        doc.to_json_pretty()?
    } else {
        doc.to_json()?
    };
    Ok(json)
}

/// `<stem>.adf.json` in `dir`, or next to `source` when no directory is given.
fn output_path(source: &Path, dir: Option<&Path>) -> PathBuf {
    let stem = source
        .file_stem()
        .map_or_else(|| "document".into(), |s| s.to_string_lossy());
    let name = format!("{stem}.{OUTPUT_EXTENSION}");
    match dir {
        Some(dir) => dir.join(name),
        None => source.with_file_name(name),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_output_path_next_to_source() {
        assert_eq!(
            output_path(Path::new("docs/guide.md"), None),
            PathBuf::from("docs/guide.adf.json")
        );
    }

    #[test]
    fn test_output_path_in_directory() {
        assert_eq!(
            output_path(Path::new("docs/guide.md"), Some(Path::new("out"))),
            PathBuf::from("out/guide.adf.json")
        );
    }

    #[test]
    fn test_convert_file_compact_and_pretty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, "# Title").unwrap();

        let converter = Converter::new();
        let compact = convert_file(&converter, &path, false).unwrap();
        assert_eq!(
            compact,
            r#"{"type":"doc","version":1,"content":[{"type":"heading","attrs":{"level":1},"content":[{"type":"text","text":"Title"}]}]}"#
        );

        let pretty = convert_file(&converter, &path, true).unwrap();
        assert!(pretty.contains("\n  \"version\": 1"));
    }

    #[test]
    fn test_convert_file_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.md");
        std::fs::write(&path, [0xff, 0xfe]).unwrap();

        let err = convert_file(&Converter::new(), &path, false).unwrap_err();
        assert!(matches!(err, CliError::Convert { .. }));
        assert!(err.to_string().contains("bad.md"));
    }
}
