//! Version command

use crate::cli::VersionArgs;
use crate::output;
use crate::version::VersionInfo;
use anyhow::Result;

pub fn run(args: VersionArgs) -> Result<()> {
    let info = VersionInfo::current();

    if args.json {
        match serde_json::to_string_pretty(&info) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                output::error(&format!("Failed to serialize version info: {}", e));
                return Err(e.into());
            }
        }
    } else {
        println!("{}", info.display());
        if let Some(target) = &info.target {
            println!("Target: {}", target);
        }
    }

    Ok(())
}
