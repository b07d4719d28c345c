use std::io::Read;

use bytes::Bytes;
use serde::Serialize;
use tagwire::frame::read_message;
use tagwire::json::{decode_hex, value_to_json};
use tracing::debug;

use crate::cmd::{load_schema, DecodeArgs};
use crate::exit::{
    codec_error, io_error, json_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE,
};
use crate::output::{print_json, print_table, OutputFormat};

#[derive(Serialize)]
struct DecodeOutput<'a> {
    #[serde(rename = "type")]
    type_name: &'a str,
    value: &'a serde_json::Value,
}

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let schema = load_schema(&args.schema)?;
    let input = resolve_input(&args)?;
    let payload = if args.framed {
        unframe(&input)?
    } else {
        Bytes::from(input)
    };

    let codec = schema.codec();
    let value = codec
        .decode(&payload, &args.type_name)
        .map_err(|err| codec_error("decode failed", err))?;
    let json = value_to_json(schema.namespace(), &args.type_name, &value)
        .map_err(|err| json_error("decode failed", err))?;
    debug!(type_name = %args.type_name, size = payload.len(), "value decoded");

    match format {
        OutputFormat::Json => print_json(&DecodeOutput {
            type_name: &args.type_name,
            value: &json,
        }),
        OutputFormat::Table => print_table(
            &["TYPE", "VALUE"],
            [vec![args.type_name.clone(), json.to_string()]],
        ),
        OutputFormat::Pretty => println!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        ),
        OutputFormat::Raw => println!("{json}"),
    }

    Ok(SUCCESS)
}

fn resolve_input(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    if let Some(hex) = &args.hex {
        return decode_hex(hex)
            .map_err(|reason| CliError::new(USAGE, format!("invalid hex input: {reason}")));
    }

    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(input)
}

/// Strip exactly one message frame, rejecting anything after it.
fn unframe(input: &[u8]) -> CliResult<Bytes> {
    let mut rest = input;
    let payload = read_message(&mut rest).map_err(|err| codec_error("invalid frame", err))?;
    if !rest.is_empty() {
        return Err(CliError::new(
            DATA_INVALID,
            format!("invalid frame: {} bytes after the message", rest.len()),
        ));
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unframe_accepts_exactly_one_message() {
        assert_eq!(unframe(&[0x01, 0x02, 0xAA, 0xBB]).unwrap().as_ref(), &[0xAA, 0xBB]);
        assert_eq!(unframe(&[0x00]).unwrap().as_ref(), &[] as &[u8]);
    }

    #[test]
    fn unframe_rejects_truncation_and_trailing_bytes() {
        assert_eq!(unframe(&[0x01, 0x03, 0xAA]).unwrap_err().code, DATA_INVALID);
        assert_eq!(unframe(&[0x00, 0xFF]).unwrap_err().code, DATA_INVALID);
    }
}
