pub mod bus;
pub mod leaderboard;
