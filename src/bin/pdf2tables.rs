//! CLI tool for extracting whitespace-aligned tables from PDF or layout text

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pdf_table_extractor::{
    output::table_to_csv_string, process_file, sheet_name, tables_to_markdown, write_csv_dir,
    ExtractionConfig, ExtractionResult,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Markdown,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "pdf2tables",
    version,
    about = "Detect whitespace-aligned tables in PDF or layout text"
)]
struct Cli {
    /// Input file (.pdf, or layout text with form-feed page breaks)
    input: PathBuf,

    /// Directory for CSV output (one file per table). Prints to stdout if omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Format for stdout output
    #[arg(long, value_enum, default_value_t = Format::Markdown)]
    format: Format,

    /// Minimum whitespace gap (in characters) between columns
    #[arg(long, default_value_t = 3)]
    min_col_width: usize,

    /// Minimum rows for a block to count as a table
    #[arg(long, default_value_t = 2)]
    min_rows: usize,

    /// Maximum column drift between consecutive lines
    #[arg(long, default_value_t = 2)]
    drift_tolerance: usize,

    /// Split blocks of pipe-delimited lines on `|`
    #[arg(long)]
    split_pipes: bool,
}

impl Cli {
    fn config(&self) -> ExtractionConfig {
        ExtractionConfig {
            min_col_width: self.min_col_width,
            min_rows: self.min_rows,
            drift_tolerance: self.drift_tolerance,
            split_pipes: self.split_pipes,
        }
    }
}

fn emit(cli: &Cli, result: &ExtractionResult) -> Result<()> {
    if let Some(dir) = &cli.output {
        let written = write_csv_dir(&result.tables, dir)
            .with_context(|| format!("failed to write CSV files to '{}'", dir.display()))?;
        eprintln!(
            "Wrote {} table(s) to {} ({} page(s), {}ms)",
            written.len(),
            dir.display(),
            result.page_count,
            result.processing_time_ms
        );
        return Ok(());
    }

    match cli.format {
        Format::Markdown => println!("{}", tables_to_markdown(&result.tables)),
        Format::Csv => {
            for (idx, table) in result.tables.iter().enumerate() {
                println!("# {}", sheet_name(table, idx));
                print!("{}", table_to_csv_string(table)?);
                println!();
            }
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<ExtractionResult> {
    let result = process_file(&cli.input, &cli.config())
        .with_context(|| format!("failed to extract tables from '{}'", cli.input.display()))?;
    emit(cli, &result)?;
    Ok(result)
}

/// Process exit code: 0 when tables were found, 2 when none were, 1 on error
fn exit_status(outcome: &Result<ExtractionResult>) -> u8 {
    match outcome {
        Ok(result) if result.tables.is_empty() => 2,
        Ok(_) => 0,
        Err(_) => 1,
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let outcome = run(&cli);
    let status = exit_status(&outcome);
    match outcome {
        Ok(_) if status == 2 => eprintln!("No tables found in {}", cli.input.display()),
        Ok(_) => {}
        Err(error) => eprintln!("Error: {error:#}"),
    }
    ExitCode::from(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use pdf_table_extractor::{ColumnLayout, ExtractedTable};

    fn result_with(tables: Vec<ExtractedTable>) -> ExtractionResult {
        ExtractionResult {
            tables,
            page_count: 1,
            processing_time_ms: 0,
        }
    }

    #[test]
    fn test_exit_status_tables_found() {
        let table = ExtractedTable {
            page: 1,
            block_index: 0,
            first_line: 0,
            layout: ColumnLayout::Delimited('|'),
            rows: vec![vec!["a".into(), "b".into()], vec!["c".into(), "d".into()]],
        };
        assert_eq!(exit_status(&Ok(result_with(vec![table]))), 0);
    }

    #[test]
    fn test_exit_status_no_tables() {
        assert_eq!(exit_status(&Ok(result_with(Vec::new()))), 2);
    }

    #[test]
    fn test_exit_status_error() {
        assert_eq!(exit_status(&Err(anyhow!("unreadable input"))), 1);
    }

    #[test]
    fn test_cli_flags_build_config() {
        let cli = Cli::parse_from([
            "pdf2tables",
            "report.pdf",
            "--min-col-width",
            "2",
            "--drift-tolerance",
            "4",
            "--split-pipes",
        ]);
        let config = cli.config();
        assert_eq!(config.min_col_width, 2);
        assert_eq!(config.min_rows, 2);
        assert_eq!(config.drift_tolerance, 4);
        assert!(config.split_pipes);
        assert_eq!(cli.format, Format::Markdown);
    }
}
