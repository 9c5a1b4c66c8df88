// Handler variants. Command handlers are bound to triggers in the registry;
// the membership handlers are wired straight into the dispatch engine.

pub mod bot_information;
pub mod formatting;
pub mod leaderboard;
pub mod level;
pub mod level_up;
pub mod membership;
pub mod ping;

pub use bot_information::{BotInformationHandler, LatencyProbe, ProbeError};
pub use leaderboard::LeaderboardHandler;
pub use level::LevelHandler;
pub use membership::{LeaveHandler, WelcomeHandler};
pub use ping::PingHandler;
