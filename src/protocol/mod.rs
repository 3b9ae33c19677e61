//! Line-oriented wire format: one command per line from the client, one or
//! more lines back from the server.

pub mod client2server;
pub mod server2client;
pub use client2server::Client2Server;
pub use server2client::Server2Client;
