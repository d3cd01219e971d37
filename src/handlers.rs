//! API handlers for the oracle server

use axum::Json;
use serde::Serialize;

pub const API_MESSAGE: &str = "An API for use with your Dapp!";

#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub message: &'static str,
}

pub async fn api_message() -> Json<ApiMessage> {
    Json(ApiMessage {
        message: API_MESSAGE,
    })
}
