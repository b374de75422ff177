//! `parkwatch watch`: run the poller and print each change until Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use parkwatch_core::{BoardState, DisplayBoard, PollerConfig, StalePolicy, StatusPoller};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

/// Shown in every target until the first successful poll.
const PLACEHOLDER: &str = "-";

pub async fn handle(
    mut config: PollerConfig,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Some(ms) = args.interval_ms {
        config = config.with_poll_interval(Duration::from_millis(ms));
    }
    if args.discard_stale {
        config = config.with_stale_policy(StalePolicy::DiscardStale);
    }
    let url = config.base_url.to_string();

    let board = Arc::new(DisplayBoard::with_state(BoardState::placeholder(
        PLACEHOLDER,
    )));
    let poller =
        StatusPoller::new(config, board.clone()).map_err(|e| CliError::from_core(e, &url))?;

    let mut updates = board.subscribe();
    let color = output::should_color(global.color);
    let handle = poller.start();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut shown: u64 = 0;
    let result = loop {
        tokio::select! {
            res = &mut ctrl_c => {
                if let Err(e) = res {
                    warn!(error = %e, "failed to listen for Ctrl-C");
                }
                break Ok(());
            }
            state = updates.changed() => {
                let Some(state) = state else { break Ok(()) };
                match output::render_update(global.output, &state, color) {
                    Ok(line) => output::print_output(&line, global.quiet),
                    Err(e) => break Err(e),
                }
                shown += 1;
                if args.count.is_some_and(|n| shown >= n) {
                    break Ok(());
                }
            }
        }
    };

    handle.stop().await;

    let stats = poller.stats();
    info!(?stats, shown, "watch finished");
    if !global.quiet {
        eprintln!(
            "stopped after {} polls ({} rendered, {} failed, {} discarded)",
            stats.attempts, stats.rendered, stats.failed, stats.discarded
        );
    }
    result
}
