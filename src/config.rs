//! アプリケーション設定管理モジュール
//! サーバー、対局(相手の思考時間・乱数シード・表示記号)、セッションの設定を
//! 設定ファイルと環境変数から読み込んで管理する。

use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, str::FromStr, time::Duration};
use tracing::{debug, warn};

/// Duration型をJSONでシリアライズするためのモジュール
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    /// Durationを(secs, nanos)のタプルとしてシリアライズ
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_secs(), duration.subsec_nanos()).serialize(serializer)
    }

    /// (secs, nanos)のタプルからDurationをデシリアライズ
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (secs, nanos) = <(u64, u32)>::deserialize(deserializer)?;
        Ok(Duration::new(secs, nanos))
    }
}

/// 設定ファイルの探索順
const CONFIG_PATHS: [&str; 3] = [
    "config.json",
    "config/app.json",
    "/etc/tictactoe/config.json",
];

/// セッションタイムアウトの上限 (7日)
pub const MAX_SESSION_TIMEOUT_MINUTES: i64 = 7 * 24 * 60;

/// クリーンアップ間隔の上限 (1日)
pub const MAX_CLEANUP_INTERVAL_MINUTES: u64 = 24 * 60;

/// サーバーの設定を管理する構造体
/// ポート番号、ホスト名、CORS設定などを含む
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub enable_cors: bool,
    pub enable_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
            enable_cors: true,
            enable_logging: true,
        }
    }
}

/// 対局の設定を管理する構造体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// 人間の着手から相手の着手までの待ち時間
    #[serde(with = "duration_serde")]
    pub opponent_delay: Duration,
    /// 相手の乱数シード (未指定ならセッション毎にランダム)
    pub rng_seed: Option<u64>,
    /// 人間の印の表示記号
    pub human_symbol: String,
    /// 相手の印の表示記号
    pub opponent_symbol: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            opponent_delay: Duration::from_millis(500),
            rng_seed: None,
            human_symbol: "🐰".to_string(),
            opponent_symbol: "🥕".to_string(),
        }
    }
}

/// セッション管理の設定を管理する構造体
/// セッション数制限、タイムアウト、クリーンアップ設定など
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub max_sessions: usize,
    pub session_timeout_minutes: i64,
    pub enable_session_cleanup: bool,
    pub cleanup_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: 100,
            session_timeout_minutes: 30,
            enable_session_cleanup: true,
            cleanup_interval_minutes: 5,
        }
    }
}

/// アプリケーションの全設定を統合するメイン設定構造体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub game: GameConfig,
    pub sessions: SessionConfig,
}

/// 設定関連のエラーを表すenum
/// ファイル読み込み、パース、検証エラーなどを含む
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("設定ファイル読み込みエラー: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("設定ファイル解析エラー: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("環境変数エラー: {name} = {value}")]
    EnvVarError { name: String, value: String },

    #[error("設定値が無効です: {field} = {value}")]
    InvalidValue { field: String, value: String },
}

/// 環境変数を読み、設定されていればパースして返す
fn env_override<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarError {
                name: name.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}

impl Config {
    /// 指定したファイルパスから設定を読み込む
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 環境変数で設定を上書きする
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(host) = env_override::<String>("SERVER_HOST")? {
            self.server.host = host;
        }
        if let Some(port) = env_override("SERVER_PORT")? {
            self.server.port = port;
        }
        if let Some(delay_ms) = env_override("OPPONENT_DELAY_MS")? {
            self.game.opponent_delay = Duration::from_millis(delay_ms);
        }
        if let Some(seed) = env_override("OPPONENT_RNG_SEED")? {
            self.game.rng_seed = Some(seed);
        }
        if let Some(max_sessions) = env_override("MAX_SESSIONS")? {
            self.sessions.max_sessions = max_sessions;
        }
        if let Some(timeout) = env_override("SESSION_TIMEOUT_MINUTES")? {
            self.sessions.session_timeout_minutes = timeout;
        }
        Ok(())
    }

    /// 環境変数で上書きした設定を新しく作る
    /// 1つでも不正な環境変数があればエラーを返し、元の設定は変わらない
    pub fn with_env_overrides(&self) -> Result<Self, ConfigError> {
        let mut config = self.clone();
        config.apply_env()?;
        Ok(config)
    }

    /// 環境変数から設定を読み込む
    /// デフォルト値をベースに環境変数で上書きする
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// 設定ファイルと環境変数を結合して設定を読み込む
    /// 設定ファイルがなくてもデフォルト値で動作する
    pub fn load() -> Self {
        let config = CONFIG_PATHS
            .iter()
            .find_map(|path| match Self::from_file(path) {
                Ok(config) => {
                    debug!(path = %path, "設定ファイルを読み込みました");
                    Some(config)
                }
                Err(ConfigError::FileReadError(_)) => None,
                Err(e) => {
                    warn!(path = %path, error = %e, "設定ファイルを無視します");
                    None
                }
            })
            .unwrap_or_default();

        match config.with_env_overrides() {
            Ok(overridden) => overridden,
            Err(e) => {
                warn!(error = %e, "環境変数の設定をすべて無視します");
                config
            }
        }
    }

    /// 現在の設定を指定したファイルに保存する
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 設定値の妥当性をチェックする
    /// 不正な値がある場合はConfigErrorを返す
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                value: self.server.port.to_string(),
            });
        }

        if self.sessions.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sessions.max_sessions".to_string(),
                value: self.sessions.max_sessions.to_string(),
            });
        }

        if !(1..=MAX_SESSION_TIMEOUT_MINUTES).contains(&self.sessions.session_timeout_minutes) {
            return Err(ConfigError::InvalidValue {
                field: "sessions.session_timeout_minutes".to_string(),
                value: self.sessions.session_timeout_minutes.to_string(),
            });
        }

        if !(1..=MAX_CLEANUP_INTERVAL_MINUTES).contains(&self.sessions.cleanup_interval_minutes) {
            return Err(ConfigError::InvalidValue {
                field: "sessions.cleanup_interval_minutes".to_string(),
                value: self.sessions.cleanup_interval_minutes.to_string(),
            });
        }

        if self.game.opponent_delay.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "game.opponent_delay".to_string(),
                value: format!("{:?}", self.game.opponent_delay),
            });
        }

        for (field, symbol) in [
            ("game.human_symbol", &self.game.human_symbol),
            ("game.opponent_symbol", &self.game.opponent_symbol),
        ] {
            if symbol.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: symbol.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
