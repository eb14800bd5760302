use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::config::ConfigLogic;
use crate::errors::AppResult;

/// Handle `config`. Without flags the active configuration is printed.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Config {
        print_config,
        edit_config,
        editor,
    } = cmd
    else {
        return Ok(());
    };

    if *edit_config {
        ConfigLogic::edit(&Config::config_file(), editor)?;
    }
    if *print_config || !*edit_config {
        ConfigLogic::print(cfg)?;
    }
    Ok(())
}
