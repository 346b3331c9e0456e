use schemars::schema_for;

use crate::model::{COLUMNS, OptionChainRow};

/// Print the output columns, or the JSON Schema for `OptionChainRow`.
pub fn run(json: bool) -> anyhow::Result<()> {
    if json {
        let schema = schema_for!(OptionChainRow);
        let json = serde_json::to_string_pretty(&schema)?;
        println!("{json}");
    } else {
        println!("{}", COLUMNS.join(","));
    }
    Ok(())
}
