// src/main.rs

use axum::{
    routing::{get, post},
    Router,
};
use gaia_ankr_agent::{
    agent::{Agent, TurnReply},
    api::{chat::chat_handler, health::health_handler, models::list_models_handler},
    config::Config,
    AppState,
};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// --- HTTP Server Logic ---
async fn run_http_server(state: AppState) {
    let api_router = Router::new()
        .route("/health", get(health_handler))
        .route("/models", get(list_models_handler))
        .route("/chat", post(chat_handler));

    let app = Router::new()
        .nest("/api", api_router)
        .with_state(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([127, 0, 0, 1], state.config.port));
    info!("🚀 HTTP Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

// --- Interactive REPL Logic ---
async fn run_repl(state: AppState) {
    info!(
        "🚀 Starting chat session (model: {})...",
        state.config.gaia_model_name
    );
    println!("Ask about blockchain data (balances, NFTs, transactions). Type 'exit' to quit.");

    let agent = state.agent.clone();
    let mut history = agent.seed_history();

    let mut stdin = io::BufReader::new(io::stdin());
    let mut stdout = io::stdout();

    loop {
        if stdout.write_all(b"You: ").await.is_err() {
            break;
        }
        let _ = stdout.flush().await;

        let mut line = String::new();
        match stdin.read_line(&mut line).await {
            Ok(0) => {
                info!("EOF received, ending chat session");
                break;
            }
            Ok(_) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                if input.eq_ignore_ascii_case("exit") {
                    println!("Exiting chat.");
                    break;
                }

                let result = agent.run_turn(std::mem::take(&mut history), input).await;
                history = result.history;

                for note in &result.interim {
                    println!("🤖 Gaia: {}", note);
                }
                match result.reply {
                    TurnReply::Answer(answer) => println!("🤖 Gaia: {}", answer),
                    TurnReply::NoResponse => {
                        println!("🤖 Gaia: (no response from the model for this turn)")
                    }
                    TurnReply::Transient(detail) => {
                        error!("turn failed: {}", detail);
                        println!("🤖 Gaia: I encountered an error or got an empty response. Please try again.");
                    }
                    TurnReply::ToolLoopExceeded(rounds) => {
                        println!(
                            "🤖 Gaia: Tool loop exceeded {} rounds without a final answer. Please rephrase your question.",
                            rounds
                        );
                    }
                }
            }
            Err(e) => {
                error!("Failed to read from stdin: {}", e);
                break;
            }
        }
    }

    info!("chat session ended");
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gaia_ankr_agent=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("❌ Failed to load configuration: {:#}", e);
            return;
        }
    };

    // Create app state
    let app_state = AppState {
        agent: Arc::new(Agent::new(&config)),
        config,
    };

    // Check if running in HTTP server mode or interactive REPL mode
    let args: Vec<String> = env::args().collect();
    if args.contains(&"--serve".to_string()) || env::var("HTTP_MODE").is_ok() {
        run_http_server(app_state).await;
    } else {
        run_repl(app_state).await;
    }
}
