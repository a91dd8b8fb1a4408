use actix_web::{get, web, HttpResponse, Responder};
use log::error;
use serde::{Deserialize, Serialize};

use next_word_core::{ModelInfo, Predictor};

/// Returned when the text field is blank.
const EMPTY_TEXT: &str = "Please enter some text to predict the next word.";

/// Query parameters of the `/v1/predict` endpoint
#[derive(Deserialize)]
struct PredictParams {
	text: Option<String>,
}

/// Body of a `/v1/predict` response.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct PredictResponse {
	/// Text as sent by the client.
	pub input: String,
	/// Predicted word or diagnostic message.
	pub prediction: String,
	/// Predicted word, absent for diagnostics.
	pub next_word: Option<String>,
	/// `input` as sent, a space, then the predicted word.
	pub sequence: Option<String>,
	/// False when `prediction` is a diagnostic.
	pub recognized: bool,
}

/// HTTP GET endpoint `/v1/predict`
///
/// Predicts the word following `text`. Diagnostics ("no tokens recognized",
/// ...) are successful responses with `recognized` set to false.
#[get("/v1/predict")]
async fn get_prediction(predictor: web::Data<Predictor>, query: web::Query<PredictParams>) -> impl Responder {
	let text = match &query.text {
		Some(s) if !s.trim().is_empty() => s.clone(),
		_ => return HttpResponse::BadRequest().body(EMPTY_TEXT),
	};

	let prediction = match predictor.predict(&text) {
		Ok(p) => p,
		Err(e) => {
			error!("Error during prediction: {e}");
			return HttpResponse::InternalServerError().body(format!("Error during prediction: {e}"));
		}
	};

	let next_word = prediction.word().map(str::to_owned);
	let sequence = next_word.as_ref().map(|word| format!("{text} {word}"));
	HttpResponse::Ok().json(PredictResponse {
		recognized: prediction.is_word(),
		prediction: prediction.to_string(),
		input: text,
		next_word,
		sequence,
	})
}

/// HTTP GET endpoint `/v1/model`, details about the loaded model.
#[get("/v1/model")]
async fn get_model(info: web::Data<ModelInfo>) -> impl Responder {
	HttpResponse::Ok().json(info.get_ref())
}

#[get("/v1/health")]
async fn get_health() -> impl Responder {
	HttpResponse::Ok().body("ok")
}

/// Registers every endpoint.
pub fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(get_prediction).service(get_model).service(get_health);
}
