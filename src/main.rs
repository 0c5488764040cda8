use clap::{Parser, Subcommand};
use gigtax::cmd::dashboard::DashboardCommand;
use gigtax::cmd::estimate::EstimateCommand;
use gigtax::cmd::schema::SchemaCommand;

#[derive(Parser, Debug)]
#[command(name = "gigtax", version, about = "Tax estimation and dashboards for gig work")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate tax liability for a date range
    Estimate(EstimateCommand),
    /// Compose the financial dashboard for a date range
    Dashboard(DashboardCommand),
    /// Print the JSON Schema for the records input
    Schema(SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Estimate(cmd) => cmd.exec(),
        Command::Dashboard(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
