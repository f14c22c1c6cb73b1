//! `studyhub config ...`

use super::CommandResult;
use crate::args::ConfigAction;
use std::path::Path;
use studyhub_core::config::AppConfig;

pub fn run(action: ConfigAction, config: &AppConfig, file: Option<&Path>) -> CommandResult {
    match action {
        ConfigAction::Show => {
            let file = file.map_or_else(AppConfig::default_path, Path::to_path_buf);
            println!("# config file: {}", file.display());
            println!("# database: {}", config.database_path().display());
            println!("# log dir: {}", config.log_dir().display());
            print!("{}", config.to_toml()?);
        }
    }
    Ok(())
}
