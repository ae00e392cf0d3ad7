//! Spawns a real docent server on an ephemeral port.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use docent::agent::{AgentResponse, ConfidenceRouter, RoutingPolicy};
use docent::cache::InMemoryResponseCache;
use docent::evaluation::{EvaluationLog, JudgeEvaluator};
use docent::gateway::{HandlerState, create_router_with_state};
use docent::llm::OfflineGenerator;
use docent::retrieval::{CorpusRetriever, InMemoryPassageIndex};
use docent::websearch::{MockWebSearch, WebAnswer};

pub struct TestServerConfig {
    pub threshold: f32,
    pub documents: Vec<(String, String)>,
    pub web_answer: WebAnswer,
    pub evaluation_dir: Option<PathBuf>,
    pub request_timeout: Duration,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            documents: Vec::new(),
            web_answer: WebAnswer::placeholder(),
            evaluation_dir: None,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl TestServerConfig {
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn document(mut self, source: &str, text: &str) -> Self {
        self.documents.push((source.to_string(), text.to_string()));
        self
    }

    pub fn web_answer(mut self, answer: WebAnswer) -> Self {
        self.web_answer = answer;
        self
    }

    pub fn evaluation_dir(mut self, dir: PathBuf) -> Self {
        self.evaluation_dir = Some(dir);
        self
    }
}

pub struct TestServer {
    addr: SocketAddr,
    pub index: Arc<InMemoryPassageIndex>,
    pub web: Arc<MockWebSearch>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_test_server(config: TestServerConfig) -> anyhow::Result<TestServer> {
    let index = Arc::new(InMemoryPassageIndex::default());
    for (source, text) in &config.documents {
        index.add_document(source, text)?;
    }

    let generator = Arc::new(OfflineGenerator);
    let retriever = CorpusRetriever::new(index.clone(), generator);
    let web = Arc::new(MockWebSearch::answering(config.web_answer.clone()));

    let mut evaluator = JudgeEvaluator::new().with_passages(index.clone(), 5);
    if let Some(dir) = &config.evaluation_dir {
        evaluator = evaluator.with_log(EvaluationLog::new(dir.clone()));
    }

    let cache: Arc<InMemoryResponseCache<AgentResponse>> =
        Arc::new(InMemoryResponseCache::new(Duration::from_secs(60)));

    let router = ConfidenceRouter::new(
        Arc::new(retriever),
        web.clone(),
        Arc::new(evaluator),
        cache,
        RoutingPolicy::new(config.threshold)?,
    );

    let state = HandlerState::new(Arc::new(router), index.clone())
        .with_request_timeout(config.request_timeout);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestServer {
        addr,
        index,
        web,
        handle,
    })
}
