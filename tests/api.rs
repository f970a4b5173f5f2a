//! HTTP tests: the REST API end to end against an in-memory store.

use actix_web::{http::StatusCode, test, web::Data, App};
use serde_json::{json, Value};
use std::sync::Arc;
use swiss_tournament_web::{api, MemoryStore, ScoringConfig, TournamentService};
use uuid::Uuid;

fn state() -> Data<TournamentService> {
    Data::new(TournamentService::new(
        Arc::new(MemoryStore::new()),
        ScoringConfig::default(),
    ))
}

fn post(uri: &str, body: Value) -> test::TestRequest {
    test::TestRequest::post().uri(uri).set_json(body)
}

fn get(uri: &str) -> test::TestRequest {
    test::TestRequest::get().uri(uri)
}

fn create_body(organizer: Uuid) -> Value {
    json!({
        "name": "Friday Night Magic",
        "format": "Draft",
        "date": "2026-10-23",
        "max_players": 8,
        "max_rounds": 3,
        "organizer_id": organizer,
    })
}

#[actix_web::test]
async fn health_reports_ok() {
    let app = test::init_service(App::new().app_data(state()).configure(api::configure)).await;
    let resp = test::call_service(&app, get("/api/health").to_request()).await;
    assert!(resp.status().is_success());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["ok"], true);
}

#[actix_web::test]
async fn full_round_trip_through_the_api() {
    let app = test::init_service(App::new().app_data(state()).configure(api::configure)).await;
    let organizer = Uuid::new_v4();

    let req = post("/api/tournaments", create_body(organizer)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let t: Value = test::read_body_json(resp).await;
    assert_eq!(t["status"], "registration");
    let id = t["id"].as_str().unwrap().to_string();

    for _ in 0..5 {
        let req = post(
            &format!("/api/tournaments/{id}/participants"),
            json!({ "user_id": Uuid::new_v4() }),
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let rounds_uri = format!("/api/tournaments/{id}/rounds");
    let req = post(&rounds_uri, json!({ "actor_id": organizer })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = post(
        &format!("/api/tournaments/{id}/start"),
        json!({ "actor_id": organizer }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let t: Value = test::read_body_json(resp).await;
    assert_eq!(t["status"], "in_progress");
    assert_eq!(t["current_round"], 1);

    let resp = test::call_service(&app, get(&rounds_uri).to_request()).await;
    let rounds: Value = test::read_body_json(resp).await;
    let matches = rounds[0]["matches"].as_array().unwrap().clone();
    assert_eq!(matches.len(), 2);
    assert!(rounds[0]["bye"].is_string());

    for (m, (a, b)) in matches.iter().zip([(2, 0), (2, 1)]) {
        let match_id = m["id"].as_str().unwrap();
        let req = post(
            &format!("/api/matches/{match_id}/report"),
            json!({ "reporter_id": organizer, "player1_wins": a, "player2_wins": b }),
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = get(&format!("/api/tournaments/{id}/standings")).to_request();
    let resp = test::call_service(&app, req).await;
    let standings: Value = test::read_body_json(resp).await;
    let rows = standings.as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["rank"], 1);
    assert_eq!(rows[0]["points"], 3);
    assert_eq!(rows[4]["points"], 0);

    let req = post(&rounds_uri, json!({ "actor_id": organizer })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let round: Value = test::read_body_json(resp).await;
    assert_eq!(round["round"], 2);

    let req = post(&rounds_uri, json!({ "actor_id": organizer })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn errors_map_to_status_codes() {
    let app = test::init_service(App::new().app_data(state()).configure(api::configure)).await;
    let organizer = Uuid::new_v4();

    let req = get(&format!("/api/tournaments/{}", Uuid::new_v4())).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = post("/api/tournaments", create_body(organizer)).to_request();
    let t: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let id = t["id"].as_str().unwrap().to_string();
    for _ in 0..2 {
        let req = post(
            &format!("/api/tournaments/{id}/participants"),
            json!({ "user_id": Uuid::new_v4() }),
        )
        .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());
    }

    let start_uri = format!("/api/tournaments/{id}/start");
    let req = post(&start_uri, json!({ "actor_id": Uuid::new_v4() })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = post(&start_uri, json!({ "actor_id": organizer })).to_request();
    assert!(test::call_service(&app, req).await.status().is_success());
    let req = post(&start_uri, json!({ "actor_id": organizer })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Tournament has already started");

    let req = get(&format!("/api/tournaments/{id}/rounds")).to_request();
    let rounds: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let match_id = rounds[0]["matches"][0]["id"].as_str().unwrap().to_string();
    let report_uri = format!("/api/matches/{match_id}/report");

    let req = post(
        &report_uri,
        json!({ "reporter_id": Uuid::new_v4(), "player1_wins": 2, "player2_wins": 0 }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = post(
        &report_uri,
        json!({ "reporter_id": organizer, "player1_wins": 0, "player2_wins": 0 }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["retryable"], false);

    let req = post(
        &report_uri,
        json!({ "reporter_id": organizer, "player1_wins": u32::MAX, "player2_wins": 1 }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let first = post(
        &report_uri,
        json!({ "reporter_id": organizer, "player1_wins": 2, "player2_wins": 1 }),
    )
    .to_request();
    let second = post(
        &report_uri,
        json!({ "reporter_id": organizer, "player1_wins": 1, "player2_wins": 2 }),
    )
    .to_request();
    let (first, second) = tokio::join!(
        test::call_service(&app, first),
        test::call_service(&app, second)
    );
    let mut statuses = vec![first.status().as_u16(), second.status().as_u16()];
    statuses.sort();
    assert_eq!(statuses, vec![200, 409]);
}

#[actix_web::test]
async fn registration_can_be_withdrawn_and_edited() {
    let app = test::init_service(App::new().app_data(state()).configure(api::configure)).await;
    let organizer = Uuid::new_v4();
    let req = post("/api/tournaments", create_body(organizer)).to_request();
    let t: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let id = t["id"].as_str().unwrap().to_string();

    let user = Uuid::new_v4();
    let participants_uri = format!("/api/tournaments/{id}/participants");
    let req = post(&participants_uri, json!({ "user_id": user })).to_request();
    assert!(test::call_service(&app, req).await.status().is_success());
    let req = post(&participants_uri, json!({ "user_id": user })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::delete()
        .uri(&format!("{participants_uri}/{user}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let t: Value = test::read_body_json(resp).await;
    assert_eq!(t["participants"].as_array().unwrap().len(), 0);

    let req = test::TestRequest::put()
        .uri(&format!("/api/tournaments/{id}"))
        .set_json(json!({
            "actor_id": organizer,
            "name": "Friday Night Magic: Sealed",
            "format": "Sealed",
            "date": "2026-10-30",
            "max_players": 12,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let t: Value = test::read_body_json(resp).await;
    assert_eq!(t["format"], "Sealed");
    assert_eq!(t["max_players"], 12);

    let resp = test::call_service(&app, get("/api/tournaments").to_request()).await;
    let list: Value = test::read_body_json(resp).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}
