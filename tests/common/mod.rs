#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use tempfile::TempDir;

use wortschatz_trainer::config::Config;
use wortschatz_trainer::engine::{Difficulty, Item, ItemContent};
use wortschatz_trainer::state::AppState;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn content(id: u64) -> ItemContent {
    ItemContent {
        id,
        term: format!("Wort{id}"),
        article: Some("das".to_string()),
        plural: Some(format!("Wörter{id}")),
        en: vec![format!("word{id}")],
        pt: vec![format!("palavra{id}")],
        example: format!("Das ist Wort{id}."),
        example_pt: format!("Isto é palavra{id}."),
        level: Some("A1".to_string()),
        difficulty: match id % 3 {
            0 => Difficulty::Hard,
            1 => Difficulty::Medium,
            _ => Difficulty::Easy,
        },
        false_friend: id % 5 == 0,
        warning: (id % 5 == 0).then(|| "false friend".to_string()),
    }
}

pub fn items(count: u64) -> Vec<Item> {
    (1..=count).map(|id| Item::new(content(id))).collect()
}

pub struct TestApp {
    pub dir: TempDir,
    pub state: AppState,
    pub router: Router,
}

pub async fn create_test_app() -> TestApp {
    let dir = TempDir::new().expect("temp dir");
    let config = Config::with_data_dir(dir.path());
    let state = wortschatz_trainer::create_state(&config)
        .await
        .expect("deck storage");
    let router = wortschatz_trainer::create_app(state.clone());
    TestApp { dir, state, router }
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
