pub mod dashboard;
pub mod estimate;
pub mod schema;

use crate::range::RangeSelector;
use crate::records::RecordsInput;
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read a `RecordsInput` JSON document from a file (or stdin with "-").
pub fn read_records(path: &Path) -> anyhow::Result<RecordsInput> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

fn read_from_stdin() -> anyhow::Result<RecordsInput> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    Ok(serde_json::from_slice(&buffer)?)
}

/// Date-range flags shared by the reporting commands.
#[derive(Args, Debug)]
pub struct RangeArgs {
    /// Date range to report over
    #[arg(short, long, value_enum, default_value_t = RangeArg::Ytd)]
    range: RangeArg,

    /// Start date for --range custom (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// End date for --range custom (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl RangeArgs {
    /// Build the selector; an incomplete custom range is passed through so
    /// the resolver can reject it.
    pub fn selector(&self) -> RangeSelector {
        match self.range {
            RangeArg::Ytd => RangeSelector::Ytd,
            RangeArg::Last30 => RangeSelector::Last30,
            RangeArg::Last90 => RangeSelector::Last90,
            RangeArg::LastYear => RangeSelector::LastYear,
            RangeArg::Custom => RangeSelector::Custom {
                start: self.from,
                end: self.to,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum RangeArg {
    /// January 1 of the current year through today
    #[default]
    Ytd,
    /// Rolling 30-day window
    Last30,
    /// Rolling 90-day window
    Last90,
    /// The full prior calendar year
    LastYear,
    /// Explicit --from/--to bounds
    Custom,
}

pub(crate) fn format_usd(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}
