mod handler;
pub use handler::EventHandler;
