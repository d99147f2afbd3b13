use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::PortfolioConfig;
use crate::model::{ModelGateway, providers};
use crate::profile::{self, ProfileDocument};
use crate::store::{ConversationStore, MemoryStore, StoreError};
use crate::topics::extract_topics;
use crate::types::{ChatRequest, ChatResponse, Role};

pub struct AppState {
    pub store: RwLock<Box<dyn ConversationStore>>,
    pub profile: ProfileDocument,
    pub model: ModelGateway,
    pub welcome: String,
    /// Per-session locks so concurrent requests for one session id cannot
    /// interleave appends. Unrelated sessions never contend.
    session_locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl AppState {
    pub fn new(
        store: Box<dyn ConversationStore>,
        profile: ProfileDocument,
        model: ModelGateway,
    ) -> Self {
        let welcome = profile.welcome_message();
        Self {
            store: RwLock::new(store),
            profile,
            model,
            welcome,
            session_locks: RwLock::new(HashMap::new()),
        }
    }

    /// Evict idle conversations and drop the turn locks of sessions that no
    /// longer exist. Pruning happens under the store guard, so a lock entry
    /// is only dropped while its session is verifiably gone. Returns the
    /// number of conversations removed.
    pub async fn sweep_stale(
        &self,
        now: chrono::DateTime<chrono::Utc>,
        timeout: chrono::Duration,
    ) -> usize {
        let mut store = self.store.write().await;
        let removed = store.evict_stale(now, timeout);
        let mut locks = self.session_locks.write().await;
        locks.retain(|id, _| store.contains(id));
        removed
    }

    pub async fn session_lock_count(&self) -> usize {
        self.session_locks.read().await.len()
    }

    pub async fn session_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        {
            let locks = self.session_locks.read().await;
            if let Some(lock) = locks.get(session_id) {
                return Arc::clone(lock);
            }
        }

        let mut locks = self.session_locks.write().await;
        Arc::clone(
            locks
                .entry(session_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }
}

pub async fn run(config: PortfolioConfig) -> anyhow::Result<()> {
    let profile = profile::load(&config.profile.path);
    let provider = providers::from_config(&config.model)?;
    let model = ModelGateway::new(provider, config.chat.history_limit);

    let state = Arc::new(AppState::new(
        Box::new(MemoryStore::new()),
        profile,
        model,
    ));

    spawn_eviction_sweep(
        Arc::clone(&state),
        config.chat.session_timeout_minutes,
        config.chat.sweep_interval_secs,
    );

    let addr = format!("{}:{}", config.gateway.bind, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("portfolio-chat gateway listening on {addr}");

    axum::serve(listener, app(state)).await?;
    Ok(())
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Periodic stale-conversation sweep. Runs on its own interval, not per
/// request, so prompt removal of idle sessions is not guaranteed. The sweep
/// also prunes the per-session lock map, which would otherwise grow by one
/// entry per visitor for the life of the process.
fn spawn_eviction_sweep(state: Arc<AppState>, timeout_minutes: u64, interval_secs: u64) {
    let timeout = chrono::Duration::minutes(timeout_minutes as i64);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval_secs));
        ticker.tick().await; // first tick fires immediately
        loop {
            ticker.tick().await;
            let removed = state.sweep_stale(chrono::Utc::now(), timeout).await;
            if removed > 0 {
                info!(removed, "evicted stale conversations");
            }
        }
    });
}

async fn health() -> &'static str {
    "ok"
}

/// Handle one chat turn.
///
/// 1. Resolve the session (creating and seeding a new one if needed)
/// 2. Append the user turn before the model call so it survives failures
/// 3. Accumulate topics found in the message
/// 4. Call the model gateway with the prior history
/// 5. Append the assistant turn (the apology included, never lost)
///
/// Model failures still produce HTTP 200 with the apology body; the only
/// error path here is an append to a session this handler just resolved
/// within the same store guard, which is an invariant bug and fails loudly.
async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    let requested = request.session_id.as_deref().filter(|s| !s.is_empty());

    let resolved = {
        let mut store = state.store.write().await;
        store.start(requested, &state.welcome)
    };

    let lock = state.session_lock(&resolved).await;
    let _guard = lock.lock().await;

    // Re-resolve and append under a single store guard. The eviction sweep
    // takes the same write lock, so it cannot drop the session between the
    // two calls; if it already evicted the session while we waited on the
    // turn lock, start() seeds a replacement conversation here.
    let session_id = {
        let mut store = state.store.write().await;
        let session_id = store.start(Some(&resolved), &state.welcome);
        store
            .append(&session_id, Role::User, &request.message)
            .map_err(internal_error)?;
        session_id
    };

    let topics = extract_topics(&request.message);
    let accumulated = {
        let mut store = state.store.write().await;
        if !topics.is_empty() {
            store.add_topics(&session_id, &topics);
        }
        store.topics(&session_id)
    };

    // The user message rides separately as the final turn of the request,
    // so drop it from the translated history.
    let history = {
        let store = state.store.read().await;
        let mut history = store.history(&session_id);
        history.pop();
        history
    };

    let reply = state
        .model
        .respond(&request.message, &history, &state.profile, &accumulated)
        .await;

    {
        let mut store = state.store.write().await;
        store
            .append(&session_id, Role::Assistant, &reply.text)
            .map_err(internal_error)?;
    }

    Ok(Json(ChatResponse {
        response: reply.text,
        session_id,
        sentiment: reply.sentiment,
    }))
}

fn internal_error(e: StoreError) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
