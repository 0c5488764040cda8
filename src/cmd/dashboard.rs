//! Dashboard command - monthly series, breakdowns and gated totals

use crate::cmd::{format_usd, read_records, RangeArgs};
use crate::dashboard::{DashboardData, MonthlyPoint, TotalsState};
use crate::pipeline::{compute_dashboard, PipelineInput};
use crate::readiness::LoadStatus;
use crate::tax::TaxTables;
use crate::utils::write_csv;
use chrono::{Datelike, Local};
use clap::Args;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{Table, Tabled};

#[derive(Args, Debug)]
pub struct DashboardCommand {
    /// JSON file containing income, expense and mileage records (or "-")
    #[arg(short = 'f', long)]
    records: PathBuf,

    #[command(flatten)]
    range: RangeArgs,

    /// Tax year tables to use (defaults to the current year)
    #[arg(short, long)]
    year: Option<i32>,

    /// Output the full dashboard as JSON
    #[arg(long)]
    json: bool,

    /// Output the monthly series as CSV
    #[arg(long)]
    csv: bool,
}

#[derive(Tabled)]
struct MonthlyRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expenses")]
    expenses: String,
    #[tabled(rename = "Taxes")]
    taxes: String,
    #[tabled(rename = "Net")]
    net: String,
}

impl From<&MonthlyPoint> for MonthlyRow {
    fn from(p: &MonthlyPoint) -> Self {
        MonthlyRow {
            month: p.month.clone(),
            income: format_usd(p.income.round_dp(2)),
            expenses: format_usd(p.expenses.round_dp(2)),
            taxes: format_usd(p.taxes.round_dp(2)),
            net: format_usd(p.net.round_dp(2)),
        }
    }
}

#[derive(Serialize)]
struct MonthlyCsvRecord {
    month: String,
    income: String,
    expenses: String,
    taxes: String,
    net: String,
}

impl From<&MonthlyPoint> for MonthlyCsvRecord {
    fn from(p: &MonthlyPoint) -> Self {
        MonthlyCsvRecord {
            month: p.month.clone(),
            income: p.income.round_dp(2).to_string(),
            expenses: p.expenses.round_dp(2).to_string(),
            taxes: p.taxes.round_dp(2).to_string(),
            net: p.net.round_dp(2).to_string(),
        }
    }
}

impl DashboardCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = read_records(&self.records)?;
        let today = Local::now().date_naive();
        let tables = TaxTables::for_year(self.year.unwrap_or(today.year()));

        // The CLI loads everything synchronously, so all sources are loaded
        // by the time the pipeline runs.
        let pipeline_input = PipelineInput {
            incomes: &input.income,
            expenses: &input.expenses,
            mileage: &input.mileage,
            profile: input.tax_profile.as_ref(),
            statuses: LoadStatus::all_loaded(),
            selector: self.range.selector(),
            today,
            tables: &tables,
        };
        let data = compute_dashboard(&pipeline_input)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&data)?);
            return Ok(());
        }
        if self.csv {
            let records: Vec<MonthlyCsvRecord> =
                data.monthly.iter().map(MonthlyCsvRecord::from).collect();
            return write_csv(records, io::stdout());
        }

        self.print_text(&data);
        Ok(())
    }

    fn print_text(&self, data: &DashboardData) {
        let rows: Vec<MonthlyRow> = data.monthly.iter().map(MonthlyRow::from).collect();
        println!("{}", Table::new(rows));
        println!();

        println!("Gigs: {}", data.gigs_count);
        println!("Gross income: {}", format_usd(data.total_gross_income));
        let inc = &data.income_breakdown;
        println!(
            "  tips {} / per diem {} / other {} / fees {}",
            format_usd(inc.tips),
            format_usd(inc.per_diem),
            format_usd(inc.other),
            format_usd(inc.fees),
        );
        println!();

        if !data.expense_breakdown.is_empty() {
            println!("Expenses by category:");
            for bucket in &data.expense_breakdown {
                println!("  {:24} {}", bucket.label, format_usd(bucket.amount.round_dp(2)));
            }
            println!();
        }
        if !data.payer_breakdown.is_empty() {
            println!("Income by payer:");
            for bucket in &data.payer_breakdown {
                println!("  {:24} {}", bucket.label, format_usd(bucket.amount.round_dp(2)));
            }
            println!();
        }

        match &data.totals {
            TotalsState::Pending => println!("Totals pending: not all sources loaded."),
            TotalsState::Ready {
                totals,
                tax_breakdown,
            } => {
                println!("Estimated taxes:  {}", format_usd(totals.taxes));
                println!("Net after taxes:  {}", format_usd(totals.net));
                println!(
                    "Effective rate:   {:.2}%",
                    totals.effective_tax_rate * dec!(100)
                );
                println!(
                    "  SE {} / federal {} / state {} / local {}",
                    format_usd(tax_breakdown.se_tax),
                    format_usd(tax_breakdown.federal),
                    format_usd(tax_breakdown.state),
                    format_usd(tax_breakdown.local),
                );
            }
        }
    }
}
