pub mod aggregate;
pub mod answer;
pub mod chunking;
pub mod config;
pub mod document;
pub mod error;
pub mod fanout;
pub mod gemini;
pub mod model;
pub mod qa;
pub mod server;
