mod detect;
mod handlers;
mod models;
mod shutdown;
mod state;

pub use handlers::{router, run_server};
pub use state::ServerState;
