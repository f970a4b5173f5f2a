//! REST API over [`TournamentService`]. There is no authentication layer here: the
//! acting user's id travels in the request body.

use crate::models::{
    MatchId, MatchOutcome, NewTournament, ParticipantId, TournamentDetails, TournamentError,
    TournamentId, UserId,
};
use crate::service::{ServiceError, TournamentService};
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path},
    HttpResponse, Responder,
};
use serde::{Deserialize, Serialize};

pub type AppState = Data<TournamentService>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct UpdateTournamentBody {
    actor_id: UserId,
    #[serde(flatten)]
    details: TournamentDetails,
}

/// Body for organizer actions that carry nothing but the acting user.
#[derive(Deserialize)]
struct ActorBody {
    actor_id: UserId,
}

#[derive(Deserialize)]
struct CompleteBody {
    actor_id: UserId,
    #[serde(default)]
    force: bool,
}

#[derive(Deserialize)]
struct RegisterBody {
    user_id: UserId,
}

#[derive(Deserialize)]
struct ReportBody {
    reporter_id: UserId,
    #[serde(flatten)]
    outcome: MatchOutcome,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct TournamentUserPath {
    id: TournamentId,
    user_id: UserId,
}

#[derive(Deserialize)]
struct TournamentParticipantPath {
    id: TournamentId,
    participant_id: ParticipantId,
}

#[derive(Deserialize)]
struct MatchPath {
    match_id: MatchId,
}

/// Map a failed action to an HTTP response: rules -> 4xx, storage -> 503.
pub fn error_response(e: &ServiceError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string(), "retryable": e.is_retryable() });
    match e {
        ServiceError::Storage(err) => {
            log::error!("Storage failure: {}", err);
            HttpResponse::ServiceUnavailable().json(body)
        }
        ServiceError::Rejected(rejection) => match rejection {
            TournamentError::TournamentNotFound(_)
            | TournamentError::MatchNotFound(_)
            | TournamentError::ParticipantNotFound(_) => HttpResponse::NotFound().json(body),
            TournamentError::UnauthorizedReporter | TournamentError::NotOrganizer => {
                HttpResponse::Forbidden().json(body)
            }
            TournamentError::RoundAlreadyGenerated(_)
            | TournamentError::MatchAlreadyCompleted(_)
            | TournamentError::AlreadyRegistered
            | TournamentError::TournamentFull { .. }
            | TournamentError::TournamentAlreadyStarted
            | TournamentError::TournamentClosed => HttpResponse::Conflict().json(body),
            _ => HttpResponse::BadRequest().json(body),
        },
    }
}

fn respond<T: Serialize>(result: Result<T, ServiceError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "swiss-tournament-web",
    })
}

#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    respond(state.list_tournaments())
}

/// Create a new tournament in registration (returns it with id).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<NewTournament>) -> HttpResponse {
    respond(state.create_tournament(body.into_inner()))
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.tournament(path.id))
}

/// Edit name, format, date or capacity (organizer, registration only).
#[put("/api/tournaments/{id}")]
async fn api_update_tournament(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<UpdateTournamentBody>,
) -> HttpResponse {
    let body = body.into_inner();
    respond(state.update_details(path.id, body.details, body.actor_id))
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<ActorBody>,
) -> HttpResponse {
    match state.delete_tournament(path.id, body.actor_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

#[post("/api/tournaments/{id}/participants")]
async fn api_register(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<RegisterBody>,
) -> HttpResponse {
    respond(state.register(path.id, body.user_id))
}

#[delete("/api/tournaments/{id}/participants/{user_id}")]
async fn api_withdraw(state: AppState, path: Path<TournamentUserPath>) -> HttpResponse {
    respond(state.withdraw(path.id, path.user_id))
}

#[post("/api/tournaments/{id}/participants/{participant_id}/drop")]
async fn api_drop_participant(
    state: AppState,
    path: Path<TournamentParticipantPath>,
    body: Json<ActorBody>,
) -> HttpResponse {
    respond(state.drop_participant(path.id, path.participant_id, body.actor_id))
}

#[post("/api/tournaments/{id}/participants/{participant_id}/disqualify")]
async fn api_disqualify_participant(
    state: AppState,
    path: Path<TournamentParticipantPath>,
    body: Json<ActorBody>,
) -> HttpResponse {
    respond(state.disqualify_participant(path.id, path.participant_id, body.actor_id))
}

/// Start the tournament (registration -> in progress) and pair round 1.
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<ActorBody>,
) -> HttpResponse {
    respond(state.start_tournament(path.id, body.actor_id))
}

/// Pair the next round.
#[post("/api/tournaments/{id}/rounds")]
async fn api_generate_round(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<ActorBody>,
) -> HttpResponse {
    respond(state.generate_next_round(path.id, body.actor_id))
}

#[post("/api/tournaments/{id}/complete")]
async fn api_complete_tournament(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<CompleteBody>,
) -> HttpResponse {
    respond(state.complete_tournament(path.id, body.actor_id, body.force))
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.standings(path.id))
}

#[get("/api/tournaments/{id}/rounds")]
async fn api_rounds(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.rounds(path.id))
}

/// Report a match result; responds with the refreshed standings.
#[post("/api/matches/{match_id}/report")]
async fn api_report_result(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<ReportBody>,
) -> HttpResponse {
    respond(state.report_result(path.match_id, body.outcome, body.reporter_id))
}

#[post("/api/matches/{match_id}/begin")]
async fn api_begin_match(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<ActorBody>,
) -> HttpResponse {
    respond(state.begin_match(path.match_id, body.actor_id))
}

/// Register every route. The service itself is supplied via `App::app_data`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_list_tournaments)
        .service(api_create_tournament)
        .service(api_get_tournament)
        .service(api_update_tournament)
        .service(api_delete_tournament)
        .service(api_register)
        .service(api_withdraw)
        .service(api_drop_participant)
        .service(api_disqualify_participant)
        .service(api_start_tournament)
        .service(api_generate_round)
        .service(api_complete_tournament)
        .service(api_standings)
        .service(api_rounds)
        .service(api_report_result)
        .service(api_begin_match);
}
