//! HTTP API handlers.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use rps_core::{
    Commitment, CommitmentScheme, ErrorKind, Game, GameId, GameRegistry, GameResult, GameStatus,
    LedgerError, Move, RegistryError, RegistryEvent, Salt, Slot,
};
use rps_ledger::{Address, Ledger, Payout};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::state::AppState;

/// Header carrying the caller's address
pub const CALLER_HEADER: &str = "X-Caller";

// ============ Errors ============

/// Application error type
#[derive(Debug)]
pub enum AppError {
    MissingCaller,
    /// Caller holds neither seat of the game
    NotAPlayer,
    BadRequest(String),
    Registry(RegistryError),
}

impl From<RegistryError> for AppError {
    fn from(e: RegistryError) -> Self {
        AppError::Registry(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::MissingCaller => (
                StatusCode::UNAUTHORIZED,
                format!("Missing or invalid {} header", CALLER_HEADER),
            ),
            AppError::NotAPlayer => (
                StatusCode::FORBIDDEN,
                "Caller is not a player in this game".to_string(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Registry(e) => {
                let status = match (&e, e.kind()) {
                    (RegistryError::GameNotFound(_), _) => StatusCode::NOT_FOUND,
                    (RegistryError::InvalidStatus { .. }, _)
                    | (RegistryError::AlreadyRevealed(_), _) => StatusCode::CONFLICT,
                    (RegistryError::Unauthorized(_), _) => StatusCode::FORBIDDEN,
                    (_, ErrorKind::Integrity) => StatusCode::UNPROCESSABLE_ENTITY,
                    (_, ErrorKind::Timing) => StatusCode::CONFLICT,
                    (RegistryError::Ledger(LedgerError::InsufficientFunds { .. }), _) => {
                        StatusCode::PAYMENT_REQUIRED
                    }
                    (_, ErrorKind::Ledger) => StatusCode::INTERNAL_SERVER_ERROR,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, e.to_string())
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

// ============ Request/Response types ============

#[derive(Serialize)]
pub struct ConfigResponse {
    pub entry_fee: u64,
    pub refund_timeout_secs: u64,
    pub commitment_scheme: CommitmentScheme,
    pub simulated_clock: bool,
    pub now: u64,
}

#[derive(Deserialize)]
pub struct CommitmentRequest {
    /// Defaults to the caller header
    pub address: Option<Address>,
    #[serde(rename = "move")]
    pub move_code: u8,
    pub salt: Salt,
}

#[derive(Serialize)]
pub struct CommitmentResponse {
    pub commitment: Commitment,
}

#[derive(Deserialize)]
pub struct StakeRequest {
    pub commitment: Commitment,
    pub stake: u64,
}

#[derive(Deserialize)]
pub struct RevealRequest {
    /// Inferred from the caller when omitted
    pub slot: Option<Slot>,
    #[serde(rename = "move")]
    pub move_code: u8,
    pub salt: Salt,
}

#[derive(Deserialize)]
pub struct ListGamesQuery {
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct GameResponse {
    #[serde(flatten)]
    pub game: Game,
    pub status_code: u8,
}

impl From<&Game> for GameResponse {
    fn from(game: &Game) -> Self {
        Self {
            status_code: game.status.as_u8(),
            game: game.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct CreateGameResponse {
    pub game_id: GameId,
    pub game: GameResponse,
}

#[derive(Serialize)]
pub struct RevealResponse {
    pub result: Option<GameResult>,
    pub game: GameResponse,
}

#[derive(Serialize)]
pub struct RefundResponse {
    pub payouts: Vec<Payout>,
    pub game: GameResponse,
}

#[derive(Serialize)]
pub struct AccountResponse {
    pub address: Address,
    pub balance: u64,
}

#[derive(Deserialize)]
pub struct FundRequest {
    pub amount: u64,
}

#[derive(Deserialize)]
pub struct TickRequest {
    pub seconds: u64,
}

#[derive(Serialize)]
pub struct TickResponse {
    pub now: u64,
}

// ============ Helpers ============

fn caller_from_headers(headers: &HeaderMap) -> Result<Address, AppError> {
    headers
        .get(CALLER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .ok_or(AppError::MissingCaller)
}

fn parse_address(raw: &str) -> Result<Address, AppError> {
    raw.parse()
        .map_err(|e| AppError::BadRequest(format!("Invalid address: {}", e)))
}

/// Look up a game that an operation just touched
fn game_response(registry: &GameRegistry, id: GameId) -> Result<GameResponse, AppError> {
    registry
        .game(id)
        .map(GameResponse::from)
        .ok_or(AppError::Registry(RegistryError::GameNotFound(id)))
}

// ============ Registry handlers ============

pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let registry = state.registry();
    let config = registry.config();
    Json(ConfigResponse {
        entry_fee: config.entry_fee,
        refund_timeout_secs: config.refund_timeout_secs,
        commitment_scheme: config.commitment_scheme,
        simulated_clock: state.is_simulated(),
        now: state.now(),
    })
}

/// Convenience for local clients. Sending a move here discloses it to the
/// service, so real players compute commitments themselves.
pub async fn compute_commitment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CommitmentRequest>,
) -> Result<Json<CommitmentResponse>, AppError> {
    let address = match req.address {
        Some(a) => a,
        None => caller_from_headers(&headers)?,
    };
    let m = Move::try_from(req.move_code)?;
    let scheme = state.registry().config().commitment_scheme;
    Ok(Json(CommitmentResponse {
        commitment: m.commit(scheme, &req.salt, &address),
    }))
}

pub async fn create_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<StakeRequest>,
) -> Result<Json<CreateGameResponse>, AppError> {
    let caller = caller_from_headers(&headers)?;
    let mut registry = state.registry();
    let game_id = registry.create_game(caller, req.commitment, req.stake)?;
    let game = game_response(&registry, game_id)?;
    Ok(Json(CreateGameResponse { game_id, game }))
}

pub async fn list_games(
    State(state): State<AppState>,
    Query(query): Query<ListGamesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = query
        .status
        .map(|s| s.parse::<GameStatus>())
        .transpose()
        .map_err(AppError::BadRequest)?;

    let registry = state.registry();
    let games: Vec<GameResponse> = registry
        .games()
        .filter(|g| filter.map_or(true, |s| g.status == s))
        .map(GameResponse::from)
        .collect();
    Ok(Json(serde_json::json!({ "games": games })))
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<GameId>,
) -> Result<Json<GameResponse>, AppError> {
    game_response(&state.registry(), game_id).map(Json)
}

pub async fn join_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(game_id): Path<GameId>,
    Json(req): Json<StakeRequest>,
) -> Result<Json<GameResponse>, AppError> {
    let caller = caller_from_headers(&headers)?;
    let mut registry = state.registry();
    registry.join_game(caller, game_id, req.commitment, req.stake)?;
    game_response(&registry, game_id).map(Json)
}

pub async fn reveal_move(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(game_id): Path<GameId>,
    Json(req): Json<RevealRequest>,
) -> Result<Json<RevealResponse>, AppError> {
    let caller = caller_from_headers(&headers)?;
    let m = Move::try_from(req.move_code)?;
    let mut registry = state.registry();
    let slot = match req.slot {
        Some(slot) => slot,
        None => registry
            .game(game_id)
            .ok_or(RegistryError::GameNotFound(game_id))?
            .slot_of(&caller)
            .ok_or(AppError::NotAPlayer)?,
    };
    let result = registry.reveal_move(caller, game_id, slot, m, &req.salt)?;
    if let Some(result) = result {
        info!(game_id = %game_id, %result, "settled via API");
    }
    let game = game_response(&registry, game_id)?;
    Ok(Json(RevealResponse { result, game }))
}

pub async fn refund_game(
    State(state): State<AppState>,
    Path(game_id): Path<GameId>,
) -> Result<Json<RefundResponse>, AppError> {
    let mut registry = state.registry();
    let payouts = registry.refund(game_id)?;
    let game = game_response(&registry, game_id)?;
    Ok(Json(RefundResponse { payouts, game }))
}

pub async fn list_events(State(state): State<AppState>) -> impl IntoResponse {
    let events: Vec<RegistryEvent> = state.registry().events().to_vec();
    Json(serde_json::json!({ "events": events }))
}

// ============ Ledger handlers ============

pub async fn get_account(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<AccountResponse>, AppError> {
    let address = parse_address(&address)?;
    Ok(Json(AccountResponse {
        address,
        balance: state.ledger().balance(&address),
    }))
}

/// Faucet for the in-memory ledger
pub async fn fund_account(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Json(req): Json<FundRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    let address = parse_address(&address)?;
    let balance = state
        .ledger()
        .fund(&address, req.amount)
        .map_err(|e| AppError::Registry(e.into()))?;
    info!(%address, amount = req.amount, balance, "account funded");
    Ok(Json(AccountResponse { address, balance }))
}

// ============ System handlers ============

pub async fn tick(
    State(state): State<AppState>,
    Json(req): Json<TickRequest>,
) -> Result<Json<TickResponse>, AppError> {
    match state.advance_time(req.seconds) {
        Some(now) => {
            info!(seconds = req.seconds, now, "advanced simulated clock");
            Ok(Json(TickResponse { now }))
        }
        None => {
            warn!("tick requested on a real clock");
            Err(AppError::BadRequest(
                "Service is running on the system clock".to_string(),
            ))
        }
    }
}

pub async fn health() -> &'static str {
    "ok"
}
