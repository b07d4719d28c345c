use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    println!("tagwire {}", env!("CARGO_PKG_VERSION"));
    if !args.extended {
        return Ok(SUCCESS);
    }

    println!(
        "target: {}",
        option_env!("TAGWIRE_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "first_user_identifier: {}",
        tagwire::schema::FIRST_USER_IDENTIFIER
    );
    println!(
        "max_message_payload: {}",
        tagwire::frame::DEFAULT_MAX_PAYLOAD
    );

    Ok(SUCCESS)
}
