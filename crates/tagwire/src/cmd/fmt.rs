use std::fs;

use crate::cmd::{load_schema, FmtArgs};
use crate::exit::{io_error, CliResult, FAILURE, SUCCESS};

pub fn run(args: FmtArgs) -> CliResult<i32> {
    let schema = load_schema(&args.schema)?;
    let canonical = schema.render();

    if args.check {
        let current = fs::read_to_string(&args.schema)
            .map_err(|err| io_error(&format!("failed reading {}", args.schema.display()), err))?;
        if current != canonical {
            eprintln!("{}: not in canonical form", args.schema.display());
            return Ok(FAILURE);
        }
        return Ok(SUCCESS);
    }

    print!("{canonical}");
    Ok(SUCCESS)
}
