use std::path::PathBuf;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use log::{error, info};

use next_word_core::Artifacts;

mod routes;

/// Command-line and environment configuration of the server.
#[derive(Parser, Debug)]
#[command(name = "next-word-server")]
#[command(about = "HTTP service predicting the next word of a text prefix")]
struct Config {
	/// Path to the model artifact
	#[arg(long, env = "NEXT_WORD_MODEL", default_value = "./data/next_word_lstm.bin")]
	model: PathBuf,

	/// Path to the vocabulary artifact
	#[arg(long, env = "NEXT_WORD_VOCABULARY", default_value = "./data/tokenizer.json")]
	vocabulary: PathBuf,

	/// Address to bind
	#[arg(long, env = "NEXT_WORD_HOST", default_value = "127.0.0.1")]
	host: String,

	/// Port to bind
	#[arg(long, env = "NEXT_WORD_PORT", default_value_t = 5000)]
	port: u16,

	/// Number of worker threads, defaults to the number of CPUs
	#[arg(long, env = "NEXT_WORD_WORKERS")]
	workers: Option<usize>,
}

/// Main entry point for the server.
///
/// Loads the model and vocabulary once, then shares them read-only
/// between every worker.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000 unless configured otherwise.
/// - A missing or invalid artifact stops the server before it binds.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let config = Config::parse();

	let artifacts = match Artifacts::load(&config.model, &config.vocabulary) {
		Ok(artifacts) => artifacts,
		Err(e) => {
			error!("Error loading artifacts: {e}");
			error!(
				"Make sure the model file '{}' and vocabulary file '{}' exist",
				config.model.display(),
				config.vocabulary.display()
			);
			return Err(std::io::Error::new(std::io::ErrorKind::NotFound, e));
		}
	};

	let predictor = web::Data::new(artifacts.predictor());
	let info = web::Data::new(artifacts.info());
	let workers = config.workers.unwrap_or_else(num_cpus::get);

	info!("Listening on {}:{} with {} worker(s)", config.host, config.port, workers);

	HttpServer::new(move || {
		App::new()
			.wrap(middleware::Logger::default())
			.wrap(Cors::permissive())
			.app_data(predictor.clone())
			.app_data(info.clone())
			.configure(routes::configure)
	})
		.workers(workers)
		.bind((config.host.as_str(), config.port))?
		.run()
		.await
}
