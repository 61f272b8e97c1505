use actix_web::{http::StatusCode, test, web::Data, App};
use beach_tournament_web::logic::{PaymentSimulator, PixSettings, SvgQrRenderer};
use beach_tournament_web::{configure, AppState, Stores};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};

fn state() -> Data<AppState> {
    let payments = PaymentSimulator::new(
        PixSettings {
            key: "pix@example.com".into(),
            receiver_name: "ASSESP".into(),
            receiver_city: "Santos".into(),
        },
        Box::new(SvgQrRenderer),
    );
    Data::new(AppState::new(Stores::in_memory(), payments, StdRng::seed_from_u64(7)))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(App::new().app_data($state.clone()).configure(configure)).await
    };
}

fn tournament_body() -> Value {
    json!({
        "name": "Santos Open",
        "location": "Praia do Gonzaga",
        "startDate": "2026-11-07",
        "endDate": "2026-11-08",
        "registrationDeadline": "2026-11-01",
        "categories": [{ "name": "Open", "entryFee": 120.0, "slots": 16 }]
    })
}

fn player_body(i: usize) -> Value {
    json!({
        "fullName": format!("Player {i}"),
        "email": format!("player{i}@example.com"),
        "birthDate": "1994-03-15",
        "skillLevel": "B",
        "gender": "M"
    })
}

#[actix_web::test]
async fn health() {
    let state = state();
    let app = app!(state);
    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["ok"], true);
}

#[actix_web::test]
async fn draw_advance_and_champion_over_http() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/tournaments")
        .set_json(tournament_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let tournament: Value = test::read_body_json(resp).await;
    let tid = tournament["id"].as_str().unwrap().to_string();
    assert_eq!(tournament["status"], "registration_open");

    for i in 0..3 {
        let req = test::TestRequest::post()
            .uri("/api/players")
            .set_json(player_body(i))
            .to_request();
        let player: Value = test::call_and_read_body_json(&app, req).await;
        let req = test::TestRequest::post()
            .uri("/api/registrations")
            .set_json(json!({
                "tournamentId": tid,
                "playerId": player["id"],
                "categoryName": "Open",
                "paymentStatus": "confirmed"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let category = format!("/api/tournaments/{tid}/categories/Open");
    let req = test::TestRequest::post().uri(&format!("{category}/draw")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let summary: Value = test::read_body_json(resp).await;
    assert_eq!(summary["totalPlayers"], 3);
    assert_eq!(summary["byesAssigned"], 1);
    assert_eq!(summary["drawSize"], 4);
    assert_eq!(summary["firstRoundMatchesCount"], 2);

    let req = test::TestRequest::post().uri(&format!("{category}/advance")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri(&format!("{category}/matches")).to_request();
    let matches: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(matches.len(), 2);
    let open = matches.iter().find(|m| m["status"] == "scheduled").unwrap();
    let req = test::TestRequest::put()
        .uri(&format!("/api/matches/{}/result", open["id"].as_str().unwrap()))
        .set_json(json!({ "winnerId": open["player1"]["id"], "score": "6-2" }))
        .to_request();
    let played: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(played["status"], "finished");
    assert_eq!(played["winnerId"], open["player1"]["id"]);

    let req = test::TestRequest::post().uri(&format!("{category}/advance")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let round: Value = test::read_body_json(resp).await;
    assert_eq!(round["round"], "Final (2 participants)");
    assert_eq!(round["matchesCount"], 1);

    let final_id = round["matchIds"][0].as_str().unwrap().to_string();
    let req = test::TestRequest::get().uri(&format!("/api/matches/{final_id}")).to_request();
    let final_match: Value = test::call_and_read_body_json(&app, req).await;
    let req = test::TestRequest::put()
        .uri(&format!("/api/matches/{final_id}/result"))
        .set_json(json!({ "winnerId": final_match["player2"]["id"] }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri(&format!("{category}/champion")).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["champion"], final_match["player2"]);
}

#[actix_web::test]
async fn errors_are_json_with_matching_status() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/players/not-a-uuid")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());

    let req = test::TestRequest::get()
        .uri("/api/tournaments/00000000-0000-0000-0000-000000000000")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/players")
        .set_json(player_body(1))
        .to_request();
    test::call_service(&app, req).await;
    let req = test::TestRequest::post()
        .uri("/api/players")
        .set_json(player_body(1))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/tournaments")
        .set_json(json!({ "name": "Missing fields" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn empty_category_draw_is_rejected() {
    let state = state();
    let app = app!(state);
    let req = test::TestRequest::post()
        .uri("/api/tournaments")
        .set_json(tournament_body())
        .to_request();
    let tournament: Value = test::call_and_read_body_json(&app, req).await;
    let tid = tournament["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/tournaments/{tid}/categories/Open/draw"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri(&format!("/api/tournaments/{tid}/categories/Seniors/draw"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn pix_and_payment_status() {
    let state = state();
    let app = app!(state);
    let req = test::TestRequest::post()
        .uri("/api/tournaments")
        .set_json(tournament_body())
        .to_request();
    let tournament: Value = test::call_and_read_body_json(&app, req).await;
    let req = test::TestRequest::post()
        .uri("/api/players")
        .set_json(player_body(9))
        .to_request();
    let player: Value = test::call_and_read_body_json(&app, req).await;
    let req = test::TestRequest::post()
        .uri("/api/registrations")
        .set_json(json!({
            "tournamentId": tournament["id"],
            "playerId": player["id"],
            "categoryName": "Open"
        }))
        .to_request();
    let registration: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(registration["paymentStatus"], "pending");
    let rid = registration["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/registrations/{rid}/pix"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["pixDetails"]["amount"], 120.0);
    assert!(body["pixDetails"]["copyPaste"]
        .as_str()
        .unwrap()
        .starts_with("000201"));

    let req = test::TestRequest::put()
        .uri(&format!("/api/registrations/{rid}/status"))
        .set_json(json!({ "paymentStatus": "confirmed" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "registration updated");
    assert_eq!(body["registration"]["paymentStatus"], "confirmed");
    assert!(body["registration"]["pix"].is_object());
}
