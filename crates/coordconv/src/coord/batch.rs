use std::io::{BufRead, Write};

use crate::prelude::{eprintln, *};
use colored::Colorize;
use coordconv_core::{ConversionError, GridPrecision, Notation};

#[derive(Debug, clap::Args, Clone)]
pub struct BatchOptions {
    /// Notation of every input line
    #[arg(short, long, env = "COORDCONV_FROM")]
    pub from: Notation,

    /// Notation to convert to
    #[arg(short, long, env = "COORDCONV_TO")]
    pub to: Notation,

    /// Format template for the output
    #[arg(long, env = "COORDCONV_TEMPLATE")]
    pub template: Option<String>,

    /// Grid precision for MGRS/USNG output
    #[arg(short, long, env = "COORDCONV_PRECISION", default_value = "1m")]
    pub precision: GridPrecision,

    /// Reject templates with dangling selectors or malformed numeric fields
    #[arg(long)]
    pub strict_template: bool,
}

/// Result of one input line. `line` is 1-based.
#[derive(Debug, PartialEq)]
pub enum LineOutcome {
    Blank {
        line: usize,
    },
    Converted {
        line: usize,
        input: String,
        text: String,
    },
    Failed {
        line: usize,
        input: String,
        error: ConversionError,
    },
}

impl LineOutcome {
    /// What goes to stdout for this line. Blank and failed lines print an
    /// empty line so the output stays aligned with the input.
    pub fn output(&self) -> &str {
        match self {
            LineOutcome::Converted { text, .. } => text,
            LineOutcome::Blank { .. } | LineOutcome::Failed { .. } => "",
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub failed: usize,
}

pub fn run(options: BatchOptions, global: crate::Global) -> Result<()> {
    let core = coordconv_core::ConvertOptions {
        template: options.template,
        precision: options.precision,
        strict_template: options.strict_template,
    };

    let stdin = std::io::stdin();
    let mut stdout = anstream::stdout();
    let summary = convert_lines(stdin.lock(), options.from, options.to, &core, |outcome| {
        match outcome {
            LineOutcome::Converted { line, input, .. } if global.verbose => {
                eprintln!("{} {}", format!("{line}:").bright_black(), input);
            }
            LineOutcome::Failed { line, input, error } => {
                eprintln!(
                    "{} {}",
                    format!("line {line}:").red(),
                    super::conversion_context(input, options.from, options.to)
                );
                eprintln!("  {}", error.to_string().red());
            }
            _ => {}
        }
        writeln!(stdout, "{}", outcome.output())?;
        stdout.flush()?;
        Ok(())
    })?;

    log::info!(
        "Converted {} of {} lines",
        summary.total - summary.failed,
        summary.total
    );

    if summary.failed > 0 {
        return Err(Error::BatchFailed {
            failed: summary.failed,
            total: summary.total,
        }
        .into());
    }

    Ok(())
}

/// Converts `reader` line by line, handing each outcome to `emit` before the
/// next line is read. One conversion failing does not stop the rest.
pub fn convert_lines<R, F>(
    reader: R,
    from: Notation,
    to: Notation,
    options: &coordconv_core::ConvertOptions,
    mut emit: F,
) -> Result<BatchSummary>
where
    R: BufRead,
    F: FnMut(&LineOutcome) -> Result<()>,
{
    let mut summary = BatchSummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.wrap_err("Failed to read input line")?;
        let input = line.trim();

        let outcome = if input.is_empty() {
            LineOutcome::Blank { line: line_number }
        } else {
            summary.total += 1;
            match coordconv_core::convert_with(input, from, to, options) {
                Ok(conversion) => LineOutcome::Converted {
                    line: line_number,
                    input: input.to_string(),
                    text: conversion.text,
                },
                Err(error) => {
                    log::debug!("line {line_number}: {error}");
                    summary.failed += 1;
                    LineOutcome::Failed {
                        line: line_number,
                        input: input.to_string(),
                        error,
                    }
                }
            }
        };

        emit(&outcome)?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coordconv_core::error::ErrorKind;
    use std::io::Cursor;

    fn collect(
        input: &str,
        to: Notation,
        options: &coordconv_core::ConvertOptions,
    ) -> (Vec<LineOutcome>, BatchSummary) {
        let mut outcomes = Vec::new();
        let summary = convert_lines(Cursor::new(input), Notation::Dd, to, options, |outcome| {
            outcomes.push(match outcome {
                LineOutcome::Blank { line } => LineOutcome::Blank { line: *line },
                LineOutcome::Converted { line, input, text } => LineOutcome::Converted {
                    line: *line,
                    input: input.clone(),
                    text: text.clone(),
                },
                LineOutcome::Failed { line, input, error } => LineOutcome::Failed {
                    line: *line,
                    input: input.clone(),
                    error: error.clone(),
                },
            });
            Ok(())
        })
        .unwrap();
        (outcomes, summary)
    }

    #[test]
    fn test_convert_lines() {
        let (outcomes, summary) = collect(
            "0 0\n\n  38.8895 -77.0353  \n",
            Notation::Gars,
            &coordconv_core::ConvertOptions::default(),
        );

        assert_eq!(summary, BatchSummary { total: 2, failed: 0 });
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].output(), "361HN37");
        assert_eq!(outcomes[1], LineOutcome::Blank { line: 2 });
        assert!(matches!(
            &outcomes[2],
            LineOutcome::Converted { line: 3, input, .. } if input == "38.8895 -77.0353"
        ));
    }

    #[test]
    fn test_output_stays_aligned_with_input() {
        let input = "0 0\n\nbogus\n10 10\n";
        let (outcomes, summary) = collect(
            input,
            Notation::Mgrs,
            &coordconv_core::ConvertOptions::default(),
        );

        let output: Vec<_> = outcomes.iter().map(LineOutcome::output).collect();
        assert_eq!(output.len(), input.lines().count());
        assert_eq!(output[0], "31NAA6602100000");
        assert_eq!(output[1], "");
        assert_eq!(output[2], "");
        assert!(!output[3].is_empty());
        assert_eq!(summary, BatchSummary { total: 3, failed: 1 });
    }

    #[test]
    fn test_failures_do_not_stop_the_batch() {
        let (outcomes, _) = collect(
            "0 0\n95 0\nbogus\n10 10\n",
            Notation::Mgrs,
            &coordconv_core::ConvertOptions::default(),
        );

        let kinds: Vec<_> = outcomes
            .iter()
            .map(|outcome| match outcome {
                LineOutcome::Failed { error, .. } => Some(error.kind()),
                _ => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                None,
                Some(ErrorKind::OutOfRange),
                Some(ErrorKind::GrammarMismatch),
                None
            ]
        );
    }

    #[test]
    fn test_each_line_is_emitted_before_the_next_is_read() {
        // A reader that fails after its first line still yields that line.
        struct OneLineThenError(bool);

        impl std::io::Read for OneLineThenError {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                unreachable!("read through BufRead")
            }
        }

        impl BufRead for OneLineThenError {
            fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
                if self.0 {
                    Err(std::io::Error::other("stdin closed"))
                } else {
                    Ok(b"0 0\n")
                }
            }

            fn consume(&mut self, _amount: usize) {
                self.0 = true;
            }
        }

        let mut emitted = Vec::new();
        let result = convert_lines(
            OneLineThenError(false),
            Notation::Dd,
            Notation::Gars,
            &coordconv_core::ConvertOptions::default(),
            |outcome| {
                emitted.push(outcome.output().to_string());
                Ok(())
            },
        );

        assert!(result.is_err());
        assert_eq!(emitted, vec!["361HN37"]);
    }

    #[test]
    fn test_batch_uses_template_and_precision() {
        let options = coordconv_core::ConvertOptions {
            template: Some("Z S".to_string()),
            precision: GridPrecision::HundredKilometre,
            strict_template: false,
        };
        let (outcomes, _) = collect("0 0", Notation::Usng, &options);
        assert_eq!(outcomes[0].output(), "31N AA");
    }
}
