//! Gestell collection search and prompt, exposed as agent tools.

pub mod config;
pub mod error;
pub mod gestell;

pub use config::GestellConfig;
pub use error::{GestellError, Operation};
pub use gestell::{GestellPromptTool, GestellSearchTool};

// ユニットテストの実行前に .env を読み込む
#[cfg(test)]
#[ctor::ctor]
fn load_dotenv_for_tests() {
    let _ = dotenvy::dotenv();
}
