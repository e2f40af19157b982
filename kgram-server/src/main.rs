use std::env;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, middleware, put, web, App, HttpResponse, HttpServer, Responder};

use serde::{Deserialize, Serialize};

use kgram_core::io::{list_files, read_file};
use kgram_core::model::language_model::LanguageModel;

const CORPUS_DIR: &str = "./data";
const DEFAULT_K: usize = 3;

/// Query parameters for the `/v1/generate` endpoint.
#[derive(Deserialize)]
struct GenerateParams {
	length: usize,
}

/// Response body for the `/v1/stats` endpoint.
#[derive(Serialize)]
struct StatsResponse {
	k: usize,
	kgrams: usize,
}

/// One shared model behind a mutex.
///
/// The model is single-threaded by design, so the server serializes all
/// access around the whole instance.
struct SharedData {
	model: LanguageModel,
}

/// HTTP GET endpoint `/v1/generate?length=N`
///
/// Generates at least `length` characters from the shared model (the full
/// seed k-gram is always emitted, so the response can be up to k characters
/// longer than requested).
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	if query.length < 1 {
		return HttpResponse::BadRequest().body("length must be >= 1");
	}

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match shared_data.model.generate_text(query.length) {
		Ok(text) => HttpResponse::Ok().body(text),
		Err(e) => HttpResponse::Conflict().body(e.to_string()),
	}
}

/// HTTP PUT endpoint `/v1/train`
///
/// Feeds the request body to the shared model as additional training text.
/// Training is cumulative; there is no reset.
#[put("/v1/train")]
async fn put_train(data: web::Data<Mutex<SharedData>>, body: String) -> impl Responder {
	if body.is_empty() {
		return HttpResponse::BadRequest().body("Empty training text");
	}

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	shared_data.model.train(&body);
	HttpResponse::Ok().body(format!(
		"{} distinct k-grams known",
		shared_data.model.stats().kgram_count()
	))
}

/// HTTP GET endpoint `/v1/stats`
///
/// Reports the model order and the number of distinct k-grams recorded.
#[get("/v1/stats")]
async fn get_stats(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	HttpResponse::Ok().json(StatsResponse {
		k: shared_data.model.k(),
		kgrams: shared_data.model.stats().kgram_count(),
	})
}

/// Reads the model order from the `KGRAM_K` environment variable.
fn configured_k() -> usize {
	env::var("KGRAM_K")
		.ok()
		.and_then(|v| v.parse().ok())
		.unwrap_or(DEFAULT_K)
}

/// Main entry point for the server.
///
/// Trains one model from every `.txt` file under `./data`, wraps it in a
/// `Mutex`, and starts an Actix-web HTTP server.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - The model order is taken from `KGRAM_K` (default 3).
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let k = configured_k();
	let mut model = LanguageModel::new(k)
		.map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

	for path in list_files(CORPUS_DIR, "txt").unwrap_or_default() {
		match read_file(&path) {
			Ok(text) => {
				model.train(&text);
				log::info!("trained on {}", path.display());
			}
			Err(e) => log::warn!("skipping {}: {e}", path.display()),
		}
	}
	log::info!("serving k={k} model, {} distinct k-grams", model.stats().kgram_count());

	let shared_model = web::Data::new(Mutex::new(SharedData { model }));

	HttpServer::new(move || {
		App::new()
			.app_data(shared_model.clone())
			.wrap(Cors::permissive())
			.wrap(middleware::Logger::default())
			.service(get_generated)
			.service(put_train)
			.service(get_stats)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
