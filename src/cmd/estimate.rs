//! Estimate command - period tax liability from records and a tax profile

use crate::aggregate::aggregate_records;
use crate::cmd::{format_usd, read_records, RangeArgs};
use crate::tax::{estimate_tax, TaxNote, TaxTables};
use chrono::{Datelike, Local};
use clap::Args;
use rust_decimal_macros::dec;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct EstimateCommand {
    /// JSON file containing income, expense and mileage records (or "-")
    #[arg(short = 'f', long)]
    records: PathBuf,

    #[command(flatten)]
    range: RangeArgs,

    /// Tax year tables to use (defaults to the current year)
    #[arg(short, long)]
    year: Option<i32>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl EstimateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = read_records(&self.records)?;
        let today = Local::now().date_naive();
        let tables = TaxTables::for_year(self.year.unwrap_or(today.year()));
        let window = self.range.selector().resolve(today)?;

        let agg = aggregate_records(
            &input.income,
            &input.expenses,
            &input.mileage,
            window,
            tables.mileage_rate(),
        );
        let breakdown = estimate_tax(
            agg.net_earnings(),
            agg.gross_earnings(),
            input.tax_profile.as_ref(),
            &tables,
        );

        if self.json {
            println!("{}", serde_json::to_string_pretty(&breakdown)?);
            return Ok(());
        }

        println!("Tax Estimate ({} - {})", window.start, window.end);
        println!("==========================================");
        if let Some(profile) = &input.tax_profile {
            println!(
                "Profile: {}, {}",
                profile.filing_status.display(),
                profile.state
            );
        }
        println!();
        println!("Gross earnings:       {}", format_usd(agg.gross_earnings()));
        println!("Expenses:             {}", format_usd(agg.total_expenses));
        println!("Mileage deduction:    {}", format_usd(agg.mileage_deduction));
        println!("Subcontractors:       {}", format_usd(agg.total_subcontractor));
        println!("Net earnings:         {}", format_usd(agg.net_earnings()));
        println!();
        println!("Self-employment tax:  {}", format_usd(breakdown.se_tax));
        println!("Federal income tax:   {}", format_usd(breakdown.federal));
        println!("State income tax:     {}", format_usd(breakdown.state));
        println!("Local income tax:     {}", format_usd(breakdown.local));
        println!();
        println!("ESTIMATED TAX:        {}", format_usd(breakdown.total));
        println!(
            "Effective rate:       {:.2}%",
            breakdown.effective_rate * dec!(100)
        );
        if let Some(floor) = breakdown.federal_floor {
            println!(
                "Federal tax starts once net earnings exceed {}",
                format_usd(floor)
            );
        }
        for note in &breakdown.notes {
            println!("note: {}", describe_note(note));
        }
        Ok(())
    }
}

fn describe_note(note: &TaxNote) -> String {
    match note {
        TaxNote::ProfileMissing => {
            "no tax profile on file; only self-employment tax was estimated".to_string()
        }
        TaxNote::StateNotRecognized { state } => {
            format!("state \"{state}\" not recognized; state tax not computed")
        }
        TaxNote::LocalTaxNotComputed { state } => {
            format!("{state} levies county tax but no county is set; local tax not computed")
        }
        TaxNote::SeBelowMinimum => {
            "net self-employment earnings are below the $400 floor; no SE tax owed".to_string()
        }
    }
}
