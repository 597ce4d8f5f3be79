pub mod countdown_handler;
pub mod home_handler;
pub mod leaderboard_handler;
pub mod results_handler;
pub mod schedule_handler;
