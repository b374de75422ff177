//! `parkwatch status`: one fetch, printed in the selected format.

use parkwatch_core::{DisplayTarget, PollerConfig, fetch_once};

use crate::cli::{GlobalOpts, StatusArgs, TargetArg};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    config: &PollerConfig,
    args: StatusArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let snapshot = fetch_once(config)
        .await
        .map_err(|e| CliError::from_core(e, config.base_url.as_str()))?;

    let out = match args.target {
        Some(target) => DisplayTarget::from(target).text_of(&snapshot),
        None => output::render_status(global.output, &snapshot)?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

impl From<TargetArg> for DisplayTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Occupied => Self::Occupied,
            TargetArg::Available => Self::Available,
            TargetArg::LastUpdated => Self::LastUpdated,
        }
    }
}
