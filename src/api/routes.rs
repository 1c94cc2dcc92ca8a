use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::{
    handlers::{
        create_game, delete_game, get_game, get_stats, health_check, list_games, make_move,
        restart_game, AppState,
    },
    middleware::{cors, logging},
};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/games", post(create_game).get(list_games))
        .route("/api/games/:id", get(get_game).delete(delete_game))
        .route("/api/games/:id/move", post(make_move))
        .route("/api/games/:id/restart", post(restart_game))
        .route("/api/stats", get(get_stats))
        .route("/health", get(health_check))
        .with_state(state)
}

/// 設定に応じてCORSとリクエストログのミドルウェアを付与する
pub fn create_app(state: AppState, enable_cors: bool, enable_logging: bool) -> Router {
    let mut router = create_router(state);

    if enable_cors {
        router = router.layer(middleware::from_fn(cors));
    }
    if enable_logging {
        router = router.layer(middleware::from_fn(logging));
    }

    router
}
