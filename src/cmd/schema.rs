//! Schema command - print the expected input format

use crate::records::RecordsInput;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let schema = schema_for!(RecordsInput);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }
}
