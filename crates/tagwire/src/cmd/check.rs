use serde::Serialize;

use crate::cmd::{load_schema, SchemaArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_json, print_table, OutputFormat};

#[derive(Serialize)]
struct CheckOutput<'a> {
    schema: &'a str,
    valid: bool,
    types: usize,
}

pub fn run(args: SchemaArgs, format: OutputFormat) -> CliResult<i32> {
    let schema = load_schema(&args.schema)?;
    let path = args.schema.display().to_string();
    let types = schema.namespace().len();

    match format {
        OutputFormat::Json => print_json(&CheckOutput {
            schema: &path,
            valid: true,
            types,
        }),
        OutputFormat::Table => print_table(
            &["SCHEMA", "VALID", "TYPES"],
            [vec![path, "yes".to_string(), types.to_string()]],
        ),
        OutputFormat::Pretty | OutputFormat::Raw => println!("{path}: ok ({types} types)"),
    }

    Ok(SUCCESS)
}
