//! 三目並べAPIサーバーのエントリポイント
//! ログ初期化、設定読み込み、セッションのクリーンアップタスク、HTTPサーバー起動を行う。

use std::time::Duration;

use tictactoe::{
    api::{handlers::AppState, routes::create_app},
    config::Config,
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tictactoe=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// 一定間隔で非アクティブなセッションを削除する
fn spawn_cleanup_task(state: AppState, interval_minutes: u64) {
    let interval = Duration::from_secs(interval_minutes.max(1).saturating_mul(60));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // 最初のtickは即座に完了する
        ticker.tick().await;
        loop {
            ticker.tick().await;
            state.sessions.cleanup_inactive_sessions().await;
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Ctrl+Cハンドラの登録に失敗しました");
        return;
    }
    info!("終了シグナルを受信しました");
}

#[tokio::main]
async fn main() {
    init_tracing();

    if std::env::args().any(|arg| arg == "--generate-config") {
        match Config::default().save_to_file("config.json") {
            Ok(()) => info!("config.json を生成しました"),
            Err(e) => {
                error!(error = %e, "設定ファイルの生成に失敗しました");
                std::process::exit(1);
            }
        }
        return;
    }

    let config = Config::load();
    if let Err(e) = config.validate() {
        error!(error = %e, "設定エラー");
        error!("デフォルト設定を生成: cargo run -- --generate-config");
        std::process::exit(1);
    }

    info!(
        bind = %config.bind_address(),
        opponent_delay_ms = config.game.opponent_delay.as_millis() as u64,
        rng_seed = ?config.game.rng_seed,
        max_sessions = config.sessions.max_sessions,
        "設定読み込み完了"
    );

    let state = AppState::from_config(&config);

    if config.sessions.enable_session_cleanup {
        spawn_cleanup_task(state.clone(), config.sessions.cleanup_interval_minutes);
    } else {
        warn!("セッションのクリーンアップは無効です");
    }

    let app = create_app(state, config.server.enable_cors, config.server.enable_logging);

    let bind_address = config.bind_address();
    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(address = %bind_address, error = %e, "アドレスバインド失敗");
            std::process::exit(1);
        }
    };

    info!(address = %bind_address, "三目並べAPIサーバー開始");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "サーバーが異常終了しました");
        std::process::exit(1);
    }
}
