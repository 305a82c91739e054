pub mod credential;
pub mod engine;
pub mod export;
pub mod extract;
pub mod hashcat;
pub mod io;
pub mod pot;
pub mod prompt;
pub mod report;

pub mod prelude {
    pub use crate::credential::Credential;
    pub use crate::engine::{Engine, EngineConfig, NOT_FOUND, Row};
}
