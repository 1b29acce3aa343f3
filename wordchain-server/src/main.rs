use std::io;
use std::path::PathBuf;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};

use clap::Parser;
use serde::{Deserialize, Serialize};
use wordchain_core::Error;
use wordchain_core::io::load_chain;
use wordchain_core::model::chain::{Chain, ChainBuilder};
use wordchain_core::model::generation_input::{DEFAULT_STEPS, GenerationInput, StartWord};
use wordchain_core::model::generator::Generator;

/// Upper bound on `steps` for a single request.
const MAX_STEPS: usize = 10_000;

/// Serves random word sequences generated from one corpus.
#[derive(Parser, Debug)]
#[command(name = "wordchain-server")]
#[command(version, about, long_about = None)]
struct Args {
	/// Path of the corpus text file
	#[arg(value_name = "CORPUS")]
	corpus: PathBuf,

	/// Address to bind
	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	/// Port to bind
	#[arg(long, default_value_t = 5000)]
	port: u16,

	/// Build the chain on every CPU
	#[arg(long)]
	parallel: bool,
}

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	steps: Option<usize>,
	start: Option<String>, // first, random or custom:<word>
	seed: Option<u64>,
	strict: Option<bool>,
}

impl GenerateParams {
	fn generation_input(&self) -> Result<GenerationInput, String> {
		let steps = self.steps.unwrap_or(DEFAULT_STEPS);
		if steps > MAX_STEPS {
			return Err(format!("steps must be at most {}", MAX_STEPS));
		}
		let start = match &self.start {
			Some(s) => s.parse::<StartWord>()?,
			None => StartWord::First,
		};
		Ok(GenerationInput {
			steps,
			start,
			strict: self.strict.unwrap_or(false),
			seed: self.seed,
		})
	}
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Stats {
	corpus_size: usize,
	keys: usize,
	transitions: usize,
}

/// Read-only state shared by every worker.
///
/// The chain is never mutated after startup, so no lock is needed.
struct SharedData {
	corpus_size: usize,
	chain: Chain,
}

/// HTTP GET endpoint `/v1/generate`
///
/// Walks the chain according to the query parameters and returns the
/// generated words, space-separated, as the response body.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<SharedData>, query: web::Query<GenerateParams>) -> impl Responder {
	let input = match query.generation_input() {
		Ok(input) => input,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	match Generator::new(&data.chain).run(&input) {
		Ok(words) => {
			let line: Vec<&str> = words.iter().map(|w| w.as_str()).collect();
			HttpResponse::Ok().body(line.join(" "))
		}
		Err(e @ (Error::UnknownStartWord(_) | Error::InvalidWord(_))) => HttpResponse::BadRequest().body(e.to_string()),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

#[get("/v1/stats")]
async fn get_stats(data: web::Data<SharedData>) -> impl Responder {
	HttpResponse::Ok().json(Stats {
		corpus_size: data.corpus_size,
		keys: data.chain.len(),
		transitions: data.chain.transitions(),
	})
}

#[get("/v1/words/{word}")]
async fn get_word(data: web::Data<SharedData>, word: web::Path<String>) -> impl Responder {
	match data.chain.lookup(&word) {
		Some(entry) => HttpResponse::Ok().json(entry),
		None => HttpResponse::NotFound().body(format!("'{}' is not a key of the chain", word)),
	}
}

fn routes(cfg: &mut web::ServiceConfig) {
	cfg.service(get_generated).service(get_stats).service(get_word);
}

/// Main entry point for the server.
///
/// Builds the chain once, shares it read-only across workers and starts an
/// Actix-web HTTP server.
#[actix_web::main]
async fn main() -> io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	let builder = if args.parallel { ChainBuilder::parallel() } else { ChainBuilder::new() };
	let (corpus_size, chain) = match load_chain(&args.corpus, &builder) {
		Ok(loaded) => loaded,
		Err(e) => {
			log::error!("failed to load {}: {}", args.corpus.display(), e);
			return Err(io::Error::other(e.to_string()));
		}
	};
	log::info!("Source size {}, {} keys", corpus_size, chain.len());

	let shared_data = web::Data::new(SharedData { corpus_size, chain });

	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::default().allow_any_origin().allowed_methods(vec!["GET"]))
			.app_data(shared_data.clone())
			.configure(routes)
	})
		.bind((args.host.as_str(), args.port))?
		.run()
		.await
}
