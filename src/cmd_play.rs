//! `play` and `duel` commands: drive live sessions in Chrome.

use std::sync::Arc;

use snakeshot_browser::{BrowserGameUi, BrowserManager, CdpPushChannel, GameUiConfig};
use snakeshot_config::{Config, PlayerConfig};
use snakeshot_core::{SessionConfig, SessionController, SessionOutcome};
use tracing::{Instrument, error, info, info_span};

use crate::adapters::{self, BoxError};

/// Play one session as the named player.
pub(crate) async fn handle_play_command(config: Arc<Config>, player: &str) -> Result<(), BoxError> {
    let player = config.player(player)?.clone();
    let outcome = run_player(config, player, 0).await?;
    print_outcome(&outcome);
    Ok(())
}

/// Play the first two configured players at the same time.
///
/// Each player gets its own Chrome. Both sessions run to completion even if
/// one of them fails.
pub(crate) async fn handle_duel_command(config: Arc<Config>) -> Result<(), BoxError> {
    let players = match config.players.as_slice() {
        [first, second, ..] => [first.clone(), second.clone()],
        _ => return Err("A duel needs two configured players".into()),
    };

    let handles = players.into_iter().zip(0u16..).map(|(player, index)| {
        let name = player.name.clone();
        let task = tokio::spawn(run_player(config.clone(), player, index));
        async move { (name, task.await) }
    });

    let mut failed = 0;
    for (name, joined) in futures::future::join_all(handles).await {
        match joined {
            Ok(Ok(outcome)) => print_outcome(&outcome),
            Ok(Err(e)) => {
                error!("Session for {} failed: {}", name, e);
                failed += 1;
            }
            Err(e) => {
                error!("Session task for {} panicked: {}", name, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(format!("{} of 2 sessions failed", failed).into());
    }
    Ok(())
}

async fn run_player(
    config: Arc<Config>,
    player: PlayerConfig,
    index: u16,
) -> Result<SessionOutcome, BoxError> {
    let session_config = adapters::session_config(&config)?;
    let ui_config = adapters::game_ui_config(&config)?;
    let manager = BrowserManager::new(adapters::browser_config(&config, index)?);
    let span = info_span!("player", name = %player.name);

    manager
        .run_scoped(
            adapters::teardown_grace(&config),
            play_session(&manager, &config, &player, session_config, ui_config),
        )
        .instrument(span)
        .await
}

async fn play_session(
    manager: &BrowserManager,
    config: &Config,
    player: &PlayerConfig,
    session_config: SessionConfig,
    ui_config: GameUiConfig,
) -> Result<SessionOutcome, BoxError> {
    manager.connect().await?;
    let page = manager.open_page(&config.game.url).await?;

    // Subscribed from here on; whatever arrives before matchmaking is
    // discarded when the match is requested.
    let push = CdpPushChannel::new(&page);
    let ui = BrowserGameUi::new(page, ui_config);

    let mut controller = SessionController::new(
        session_config,
        adapters::credentials(player),
        Arc::new(ui),
        Box::new(push),
    );
    let outcome = controller.run().await?;
    info!(
        "Session finished: {} as {}, {} steps ({:?})",
        outcome.player_id, outcome.role, outcome.steps_played, outcome.end
    );
    Ok(outcome)
}

fn print_outcome(outcome: &SessionOutcome) {
    println!(
        "{} ({}): {} steps, moves {}, frames in {}",
        outcome.player_id,
        outcome.role,
        outcome.steps_played,
        outcome.moves,
        outcome.frames_dir.display()
    );
}
