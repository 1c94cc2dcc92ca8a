pub mod scheduler;
pub mod game_session;
pub mod manager;

pub use scheduler::MoveScheduler;
pub use game_session::{GameSession, SessionOptions, SessionSnapshot, SharedSession};
pub use manager::{SessionManager, SessionStats};
