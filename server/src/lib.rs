//! HTTP surface for King's Cup.
//!
//! Every request loads the caller's session, rebuilds the game from its snapshot,
//! applies one action and writes the snapshot back.

pub mod config;
pub mod error;
pub mod session;

use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use engine::{GameResult, GameState, RuleSet, Snapshot, TableView, TurnDisplay, TurnOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::session::{Session, SessionStore};

#[derive(Clone)]
pub struct AppState
{
    pub rules: Arc<RuleSet>,
    pub sessions: SessionStore,
}

impl AppState
{
    pub fn new(rules: Arc<RuleSet>, session_ttl: Duration) -> Self
    {
        Self { rules, sessions: SessionStore::new(session_ttl) }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewGameRequest
{
    /// Comma separated player names.
    #[serde(default)]
    pub players: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action
{
    AddPlayer,
    RemovePlayer,
    DrawCard,
    AddRule,
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest
{
    pub action: Action,
    #[serde(default)]
    pub payload: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRuleRequest
{
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct GameResponse
{
    pub session_id: String,
    pub table: TableView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn: Option<TurnOutcome>,
}

pub fn create_app(state: AppState, card_dir: impl AsRef<std::path::Path>) -> Router
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/games", post(begin_game))
        .route("/games/:id", get(get_game))
        .route("/games/:id/turn", post(next_turn))
        .route("/games/:id/actions", post(submit_action))
        .route("/games/:id/rules", delete(delete_rule))
        .with_state(state);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api", api)
        .nest_service("/cards", ServeDir::new(card_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn begin_game(State(state): State<AppState>, Json(req): Json<NewGameRequest>) -> Json<GameResponse>
{
    let game = GameState::from_roster(&req.players, state.rules.clone());

    let mut session = Session::new();
    game.serialize().write_to(&mut session);
    let session_id = state.sessions.create(session);
    tracing::info!(session = %session_id, players = game.players().len(), "game started");

    Json(GameResponse {
        session_id,
        table: TableView::new(&game, &TurnDisplay::default()),
        turn: None,
    })
}

async fn get_game(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<GameResponse>, ApiError>
{
    run(&state, &id, |_| Ok(None)).map(Json)
}

async fn next_turn(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<GameResponse>, ApiError>
{
    run(&state, &id, |game| game.take_turn().map(Some)).map(Json)
}

async fn submit_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ActionRequest>,
) -> Result<Json<GameResponse>, ApiError>
{
    tracing::debug!(session = %id, action = ?req.action, "action submitted");
    run(&state, &id, |game| {
        match req.action {
            Action::AddPlayer => game.add_player(&req.payload)?,
            Action::RemovePlayer => game.remove_player(&req.payload)?,
            Action::AddRule => game.add_custom_rule(&req.payload)?,
            Action::DrawCard => return game.take_turn().map(Some),
        }
        Ok(None)
    })
    .map(Json)
}

async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<DeleteRuleRequest>>,
) -> Result<Json<GameResponse>, ApiError>
{
    let text = body.map(|Json(req)| req.text).unwrap_or_default();
    run(&state, &id, |game| game.delete_custom_rule(&text).map(|_| None)).map(Json)
}

/// Loads the session, applies `action` to the restored game and saves the result.
/// Nothing is written back when the action fails.
fn run<F>(state: &AppState, id: &str, action: F) -> Result<GameResponse, ApiError>
where
    F: FnOnce(&mut GameState) -> GameResult<Option<TurnOutcome>>,
{
    let mut session = state.sessions.load(id).ok_or_else(|| ApiError::SessionNotFound(id.to_string()))?;
    let mut game = GameState::deserialize(&Snapshot::read_from(&session)?, state.rules.clone())?;

    let turn = action(&mut game)?;

    let display = match &turn {
        Some(outcome) => {
            let display = TurnDisplay::from(outcome);
            display.write_to(&mut session);
            display
        }
        None => TurnDisplay::read_from(&session),
    };

    game.serialize().write_to(&mut session);
    state.sessions.save(id, session);

    Ok(GameResponse {
        session_id: id.to_string(),
        table: TableView::new(&game, &display),
        turn,
    })
}
