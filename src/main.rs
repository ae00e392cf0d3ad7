//! Docent HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use docent::agent::{AgentResponse, ConfidenceRouter, RoutingPolicy};
use docent::cache::InMemoryResponseCache;
use docent::config::Config;
use docent::constants::DEFAULT_WEB_TIMEOUT_SECS;
use docent::evaluation::{EvaluationLog, JudgeEvaluator};
use docent::gateway::{HandlerState, check_health, create_router_with_state};
use docent::llm::{AnswerGenerator, GenaiGenerator, GenerationOptions, OfflineGenerator};
use docent::retrieval::{CorpusRetriever, InMemoryPassageIndex};
use docent::scoring::LexicalRanker;
use docent::websearch::TavilyWebSearch;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
██████╗  ██████╗  ██████╗███████╗███╗   ██╗████████╗
██╔══██╗██╔═══██╗██╔════╝██╔════╝████╗  ██║╚══██╔══╝
██║  ██║██║   ██║██║     █████╗  ██╔██╗ ██║   ██║
██║  ██║██║   ██║██║     ██╔══╝  ██║╚██╗██║   ██║
██████╔╝╚██████╔╝╚██████╗███████╗██║ ╚████║   ██║
╚═════╝  ╚═════╝  ╚═════╝╚══════╝╚═╝  ╚═══╝   ╚═╝

        READ. WEIGH. ANSWER.
                                        AGPL-3.0
"#
    );

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        threshold = config.confidence_threshold,
        "Docent starting"
    );

    let index = Arc::new(InMemoryPassageIndex::new(
        config.chunk_size,
        config.chunk_overlap,
    ));
    let files = index.load_dir(&config.data_dir).await?;
    tracing::info!(files, data_dir = %config.data_dir.display(), "Corpus loaded");

    let generator: Arc<dyn AnswerGenerator> = if config.mock_provider {
        tracing::warn!("DOCENT_MOCK_PROVIDER set, answering with the offline generator");
        Arc::new(OfflineGenerator)
    } else {
        Arc::new(GenaiGenerator::new(
            config.llm_model.clone(),
            GenerationOptions {
                temperature: config.llm_temperature,
                max_tokens: config.llm_max_tokens,
            },
        ))
    };

    let retriever = CorpusRetriever::new(index.clone(), generator.clone())
        .with_ranker(LexicalRanker::new(config.rerank_top_k))
        .with_search_k(config.search_k);

    let web = TavilyWebSearch::new(config.tavily_api_key.clone(), generator.clone())
        .with_max_results(config.web_max_results)
        .with_timeout(Duration::from_secs(DEFAULT_WEB_TIMEOUT_SECS));
    if !web.has_api_key() {
        tracing::warn!("No Tavily API key configured, web fallback will answer with a placeholder");
    }

    let mut evaluator = JudgeEvaluator::new()
        .with_passages(index.clone(), config.search_k)
        .with_log(EvaluationLog::new(config.evaluation_dir.clone()));
    if !config.mock_provider {
        evaluator = evaluator.with_judge(generator.clone());
    }

    let cache: Arc<InMemoryResponseCache<AgentResponse>> = Arc::new(
        InMemoryResponseCache::with_capacity(config.cache_ttl(), config.cache_capacity),
    );

    let router = ConfidenceRouter::new(
        Arc::new(retriever),
        Arc::new(web),
        Arc::new(evaluator),
        cache,
        RoutingPolicy::new(config.confidence_threshold)?,
    );

    let state = HandlerState::new(Arc::new(router), index)
        .with_request_timeout(config.request_timeout());
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Docent shutdown complete");
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = std::env::var("DOCENT_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8000);

    if check_health(port).await { 0 } else { 1 }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
