use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use tagwire::Schema;

use crate::exit::{compile_error, CliResult};
use crate::output::OutputFormat;

pub mod check;
pub mod decode;
pub mod encode;
pub mod fmt;
pub mod ids;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse and validate a schema file.
    Check(SchemaArgs),
    /// List the identifier assigned to every type.
    Ids(SchemaArgs),
    /// Print a schema in canonical form.
    Fmt(FmtArgs),
    /// Encode a JSON value as a type from the schema.
    Encode(EncodeArgs),
    /// Decode bytes as a type from the schema.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Check(args) => check::run(args, format),
        Command::Ids(args) => ids::run(args, format),
        Command::Fmt(args) => fmt::run(args),
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

pub(crate) fn load_schema(path: &Path) -> CliResult<Schema> {
    tagwire::compile_file(path)
        .map_err(|err| compile_error(&format!("invalid schema {}", path.display()), err))
}

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Schema file.
    pub schema: PathBuf,
}

#[derive(Args, Debug)]
pub struct FmtArgs {
    /// Schema file.
    pub schema: PathBuf,
    /// Exit with status 1 instead of printing when the file is not canonical.
    #[arg(long)]
    pub check: bool,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Schema file.
    pub schema: PathBuf,
    /// Type to encode the value as.
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub type_name: String,
    /// JSON value.
    #[arg(long, conflicts_with = "value_file")]
    pub value: Option<String>,
    /// Read the JSON value from a file.
    #[arg(long, value_name = "FILE", conflicts_with = "value")]
    pub value_file: Option<PathBuf>,
    /// Wrap the encoding in a length-framed message.
    #[arg(long)]
    pub framed: bool,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Schema file.
    pub schema: PathBuf,
    /// Type to decode the bytes as.
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub type_name: String,
    /// Hex-encoded input. Raw bytes are read from stdin when omitted.
    pub hex: Option<String>,
    /// Input is a length-framed message.
    #[arg(long)]
    pub framed: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
