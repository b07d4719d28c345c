use serde::Serialize;
use tagwire::Schema;

use crate::cmd::{load_schema, SchemaArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_json, print_table, OutputFormat};

#[derive(Serialize)]
struct IdentifierRow<'a> {
    name: &'a str,
    identifier: u64,
    kind: &'static str,
}

fn rows(schema: &Schema) -> Vec<IdentifierRow<'_>> {
    schema
        .identifiers()
        .iter()
        .filter_map(|(name, identifier)| {
            let definition = schema.namespace().get(name)?;
            Some(IdentifierRow {
                name,
                identifier: identifier.get(),
                kind: definition.kind().as_str(),
            })
        })
        .collect()
}

pub fn run(args: SchemaArgs, format: OutputFormat) -> CliResult<i32> {
    let schema = load_schema(&args.schema)?;
    let rows = rows(&schema);

    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Table => print_table(
            &["ID", "NAME", "KIND"],
            rows.iter().map(|row| {
                vec![
                    row.identifier.to_string(),
                    row.name.to_string(),
                    row.kind.to_string(),
                ]
            }),
        ),
        OutputFormat::Pretty | OutputFormat::Raw => {
            for row in &rows {
                println!("{:>4}  {}  ({})", row.identifier, row.name, row.kind);
            }
        }
    }

    Ok(SUCCESS)
}
