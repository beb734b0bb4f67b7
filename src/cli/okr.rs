use crate::cli::GlobalArgs;
use crate::error::OkrError;
use crate::output;
use crate::snapshot::load_cycle;
use crate::vault::Vault;

pub fn run(global: &GlobalArgs) -> i32 {
    crate::cli::finish(run_inner(global), global.json)
}

fn run_inner(global: &GlobalArgs) -> Result<i32, OkrError> {
    let config = global.load_config()?;
    let vault = Vault::open(config.vault_root()?)?;
    let cycle = load_cycle(&vault, &config)?;

    if global.json {
        output::json::print(&output::json::success(output::json::cycle_json(&cycle)));
    } else {
        output::text::print_cycle(&cycle);
    }
    Ok(0)
}
