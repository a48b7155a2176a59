//! Per-player session state machine.
//!
//! One controller drives one player through a single match:
//!
//! 1. `authenticate`: log in and learn our own id.
//! 2. `matchmake`: request a match, wait for `start-matching`, decide our
//!    role and create the frame directory.
//! 3. `plan`: pick the move sequence for our role.
//! 4. `play`: per step, capture, dispatch, advance, then wait for the
//!    next push until the moves run out or a `result` arrives.
//!
//! Every wait on the page or the server is bounded; a failure in any phase
//! leaves the controller in [`SessionState::Failed`].

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use snakeshot_protocols::{
    Credentials, GameUi, GridMap, MoveSequence, PlayerId, PushChannel, Role, UiError,
};

use super::config::SessionConfig;
use super::error::{SessionError, SessionResult};
use super::frames::FrameStore;
use super::state::SessionState;
use crate::planner::PathPlanner;

/// Why play stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The server announced the game result.
    ResultReceived,
    /// Every planned move was played.
    MovesExhausted,
}

/// Summary of a finished session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub player_id: PlayerId,
    pub role: Role,
    pub frames_dir: PathBuf,
    pub steps_played: usize,
    pub moves: MoveSequence,
    pub end: EndReason,
}

/// Contents of `session.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub player_id: PlayerId,
    pub role: Role,
    pub a_id: PlayerId,
    pub b_id: PlayerId,
    pub moves: MoveSequence,
    pub steps_played: usize,
    pub end: EndReason,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

/// State of one match once pairing is done.
#[derive(Debug)]
pub struct GameSession {
    pub player_id: PlayerId,
    pub role: Role,
    pub a_id: PlayerId,
    pub b_id: PlayerId,
    pub map: GridMap,
    pub moves: Option<MoveSequence>,
    pub current_step: usize,
    pub started_at: DateTime<Local>,
    frames: FrameStore,
}

impl GameSession {
    pub fn frames(&self) -> &FrameStore {
        &self.frames
    }
}

/// Drives one player through authenticate, matchmake, plan and play.
pub struct SessionController {
    config: SessionConfig,
    credentials: Credentials,
    ui: Arc<dyn GameUi>,
    push: Box<dyn PushChannel>,
    state: SessionState,
    identity: Option<PlayerId>,
    game: Option<GameSession>,
}

impl SessionController {
    pub fn new(
        config: SessionConfig,
        credentials: Credentials,
        ui: Arc<dyn GameUi>,
        push: Box<dyn PushChannel>,
    ) -> Self {
        Self {
            config,
            credentials,
            ui,
            push,
            state: SessionState::Idle,
            identity: None,
            game: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Our own id, once authenticated.
    pub fn identity(&self) -> Option<&PlayerId> {
        self.identity.as_ref()
    }

    /// The current match, once matchmaking has completed.
    pub fn game(&self) -> Option<&GameSession> {
        self.game.as_ref()
    }

    /// Run every phase in order.
    pub async fn run(&mut self) -> SessionResult<SessionOutcome> {
        self.authenticate().await?;
        self.matchmake().await?;
        self.plan()?;
        self.play().await
    }

    /// Log in and record our id from the identity response.
    pub async fn authenticate(&mut self) -> SessionResult<PlayerId> {
        self.enter(SessionState::Authenticating)?;
        let result = self.do_authenticate().await;
        self.settle(result)
    }

    /// Request a match and wait for the server to pair us.
    pub async fn matchmake(&mut self) -> SessionResult<Role> {
        self.enter(SessionState::Matchmaking)?;
        let result = self.do_matchmake().await;
        self.settle(result)
    }

    /// Choose the move sequence for our role.
    pub fn plan(&mut self) -> SessionResult<MoveSequence> {
        self.enter(SessionState::Planning)?;
        let result = self.do_plan();
        self.settle(result)
    }

    /// Play the planned moves, capturing a frame before each one.
    pub async fn play(&mut self) -> SessionResult<SessionOutcome> {
        self.enter(SessionState::Playing)?;
        let result = self.do_play().await;
        let outcome = self.settle(result)?;
        self.enter(SessionState::Finished)?;
        info!(
            "Session finished for player {}: {} steps, {:?}",
            outcome.player_id, outcome.steps_played, outcome.end
        );
        Ok(outcome)
    }

    async fn do_authenticate(&mut self) -> SessionResult<PlayerId> {
        info!("Authenticating as {}", self.credentials.name);
        let ui = Arc::clone(&self.ui);
        let credentials = self.credentials.clone();
        let response = bounded(
            "identity response",
            self.config.response_timeout,
            async move { ui.submit_credentials(&credentials).await },
        )
        .await?;

        let id = response.player_id()?;
        info!("Authenticated as player {}", id);
        self.identity = Some(id.clone());
        Ok(id)
    }

    async fn do_matchmake(&mut self) -> SessionResult<Role> {
        let identity = self
            .identity
            .clone()
            .ok_or_else(|| SessionError::Precondition("matchmaking before authentication".to_string()))?;

        let stale = self.push.discard_pending();
        if stale > 0 {
            debug!("Discarded {} push message(s) received before matchmaking", stale);
        }

        let ui = Arc::clone(&self.ui);
        bounded("match request", self.config.response_timeout, async move {
            ui.request_match().await
        })
        .await?;
        info!("Match requested, waiting for pairing");

        let message = bounded(
            "start-matching push",
            self.config.push_timeout,
            self.push.next_message(),
        )
        .await?;
        let start = message.match_start(self.config.bounds)?;

        let role = if start.a_id == identity {
            Role::PlayerA
        } else {
            if start.b_id != identity {
                warn!(
                    "Identity {} matches neither a_id {} nor b_id {}; playing as {}",
                    identity,
                    start.a_id,
                    start.b_id,
                    Role::PlayerB
                );
            }
            Role::PlayerB
        };

        let started_at = Local::now();
        let frames = FrameStore::create(
            &self.config.frames_root,
            &start.a_id,
            &start.b_id,
            &identity,
            started_at,
        )
        .await?;
        info!(
            "Matched: a={} b={} role={} frames={}",
            start.a_id,
            start.b_id,
            role,
            frames.dir().display()
        );

        self.game = Some(GameSession {
            player_id: identity,
            role,
            a_id: start.a_id,
            b_id: start.b_id,
            map: start.map,
            moves: None,
            current_step: 0,
            started_at,
            frames,
        });
        Ok(role)
    }

    fn do_plan(&mut self) -> SessionResult<MoveSequence> {
        let planner = PathPlanner::with_max_len(self.config.max_moves);
        let game = self
            .game
            .as_mut()
            .ok_or_else(|| SessionError::Precondition("planning without a map".to_string()))?;

        let moves = planner.plan(&game.map, self.config.candidates(game.role));
        info!("Planned {} moves as {}: {}", moves.len(), game.role, moves);
        game.moves = Some(moves.clone());
        Ok(moves)
    }

    async fn do_play(&mut self) -> SessionResult<SessionOutcome> {
        let game = self
            .game
            .as_mut()
            .ok_or_else(|| SessionError::Precondition("no output directory".to_string()))?;
        let moves = game
            .moves
            .clone()
            .ok_or_else(|| SessionError::Precondition("playing without a plan".to_string()))?;

        let mut end = EndReason::MovesExhausted;
        while let Some(direction) = moves.get(game.current_step) {
            tokio::time::sleep(self.config.step_settle).await;

            let ui = Arc::clone(&self.ui);
            let png = bounded("frame capture", self.config.capture_timeout, async move {
                ui.capture_frame().await
            })
            .await?;
            let path = game.frames.write_frame(game.current_step, &png).await?;
            info!("Step {}: captured {}", game.current_step, path.display());

            let ui = Arc::clone(&self.ui);
            bounded("input dispatch", self.config.response_timeout, async move {
                ui.dispatch_input(direction).await
            })
            .await?;
            debug!("Step {}: dispatched {}", game.current_step, direction);

            game.current_step += 1;

            let message = bounded(
                "step push",
                self.config.push_timeout,
                self.push.next_message(),
            )
            .await?;
            if message.is_result() {
                info!("Result received after step {}", game.current_step);
                end = EndReason::ResultReceived;
                break;
            }
            debug!("Push after step {}: {}", game.current_step, message.event);
        }

        let record = SessionRecord {
            player_id: game.player_id.clone(),
            role: game.role,
            a_id: game.a_id.clone(),
            b_id: game.b_id.clone(),
            moves: moves.clone(),
            steps_played: game.current_step,
            end,
            started_at: game.started_at,
            finished_at: Local::now(),
        };
        game.frames.write_metadata(&record).await?;

        Ok(SessionOutcome {
            player_id: game.player_id.clone(),
            role: game.role,
            frames_dir: game.frames.dir().to_path_buf(),
            steps_played: game.current_step,
            moves,
            end,
        })
    }

    fn enter(&mut self, next: SessionState) -> SessionResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        debug!("Session state {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Move to `Failed` if the phase failed.
    fn settle<T>(&mut self, result: SessionResult<T>) -> SessionResult<T> {
        if let Err(e) = &result {
            error!("Session failed while {}: {}", self.state, e);
            self.state = SessionState::Failed;
        }
        result
    }
}

/// Bound a collaborator call, mapping expiry to [`SessionError::Timeout`].
async fn bounded<T, F>(operation: &'static str, after: Duration, fut: F) -> SessionResult<T>
where
    F: Future<Output = Result<T, UiError>>,
{
    match tokio::time::timeout(after, fut).await {
        Ok(result) => result.map_err(SessionError::from),
        Err(_) => Err(SessionError::Timeout { operation, after }),
    }
}
