use std::fs;
use std::io::Read;

use serde::Serialize;
use tagwire::frame::write_message;
use tagwire::json::{encode_hex, value_from_json};
use tracing::debug;

use crate::cmd::{load_schema, EncodeArgs};
use crate::exit::{codec_error, io_error, json_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_json, print_raw, print_table, OutputFormat};

#[derive(Serialize)]
struct EncodeOutput<'a> {
    #[serde(rename = "type")]
    type_name: &'a str,
    identifier: u64,
    framed: bool,
    size: usize,
    hex: String,
}

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let schema = load_schema(&args.schema)?;
    let json = resolve_value(&args)?;

    let value = value_from_json(schema.namespace(), &args.type_name, &json)
        .map_err(|err| json_error("invalid value", err))?;
    let codec = schema.codec();
    let encoded = codec
        .encode(&args.type_name, &value)
        .map_err(|err| codec_error("encode failed", err))?;
    let identifier = codec
        .identifier(&args.type_name)
        .map_err(|err| codec_error("encode failed", err))?;

    let bytes = if args.framed {
        let mut framed = Vec::with_capacity(encoded.len() + 9);
        write_message(&mut framed, &encoded).map_err(|err| codec_error("framing failed", err))?;
        framed
    } else {
        encoded.to_vec()
    };
    debug!(type_name = %args.type_name, size = bytes.len(), framed = args.framed, "value encoded");

    match format {
        OutputFormat::Json => print_json(&EncodeOutput {
            type_name: &args.type_name,
            identifier: identifier.get(),
            framed: args.framed,
            size: bytes.len(),
            hex: encode_hex(&bytes),
        }),
        OutputFormat::Table => print_table(
            &["TYPE", "ID", "SIZE", "HEX"],
            [vec![
                args.type_name.clone(),
                identifier.to_string(),
                bytes.len().to_string(),
                encode_hex(&bytes),
            ]],
        ),
        OutputFormat::Pretty => println!("{}", encode_hex(&bytes)),
        OutputFormat::Raw => print_raw(&bytes),
    }

    Ok(SUCCESS)
}

fn resolve_value(args: &EncodeArgs) -> CliResult<serde_json::Value> {
    let text = if let Some(value) = &args.value {
        value.clone()
    } else if let Some(path) = &args.value_file {
        fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?
    } else {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|err| io_error("failed reading stdin", err))?;
        text
    };

    serde_json::from_str(&text)
        .map_err(|err| CliError::new(USAGE, format!("value is not valid JSON: {err}")))
}
