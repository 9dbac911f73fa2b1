//! Scrub command implementation
//!
//! Redacts a text given inline, read from a file, or piped on stdin, and
//! prints the result on stdout. With `--explain` every detection is written
//! to stderr as one JSON line.

use crate::anonymization::{ScrubEngine, ScrubOutcome};
use crate::config::ScrubberConfig;
use clap::Args;
use std::io::{Read, Write};
use std::path::PathBuf;

/// Arguments for the scrub command
#[derive(Args, Debug)]
pub struct ScrubArgs {
    /// Text to scrub
    #[arg(short, long, conflicts_with = "file")]
    pub text: Option<String>,

    /// File to scrub
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Language code, defaults to `analyzer.default_language`
    #[arg(long)]
    pub language: Option<String>,

    /// Extra context words for this text
    #[arg(long = "context", value_delimiter = ',')]
    pub context: Vec<String>,

    /// Print each detection as a JSON line on stderr
    #[arg(long)]
    pub explain: bool,
}

impl ScrubArgs {
    /// Execute the scrub command
    pub async fn execute(&self, config: ScrubberConfig) -> anyhow::Result<i32> {
        let engine = match ScrubEngine::from_config(&config) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("❌ Failed to initialize scrub engine");
                eprintln!("   Error: {e}");
                return Ok(2);
            }
        };

        let text = self.read_input()?;
        let language = self
            .language
            .clone()
            .unwrap_or_else(|| engine.default_language().to_string());

        let outcome = match engine.scrub_with_context(&text, &language, &self.context) {
            Ok(outcome) => outcome,
            Err(e) => {
                crate::log_error_with_context!(&e, "Scrub failed");
                eprintln!("❌ Scrub failed");
                eprintln!("   Error: {e}");
                return Ok(1);
            }
        };

        if self.explain {
            write_explanation(&mut std::io::stderr().lock(), &outcome)?;
        }

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(outcome.text.as_bytes())?;
        if !outcome.text.ends_with('\n') {
            stdout.write_all(b"\n")?;
        }
        stdout.flush()?;

        Ok(0)
    }

    fn read_input(&self) -> anyhow::Result<String> {
        use anyhow::Context;

        if let Some(ref text) = self.text {
            return Ok(text.clone());
        }
        if let Some(ref path) = self.file {
            return std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()));
        }

        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        Ok(buffer)
    }
}

/// One JSON line per detection; the detected value itself is not written
fn write_explanation(out: &mut impl Write, outcome: &ScrubOutcome) -> anyhow::Result<()> {
    for detection in &outcome.detections {
        serde_json::to_writer(&mut *out, detection)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}
