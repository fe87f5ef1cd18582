// src/hunt/mod.rs

pub mod questions;
pub mod session;
pub mod store;
pub mod view;

pub use questions::QuestionBank;
pub use session::{AnswerOutcome, HuntError, HuntPhase, HuntSession};
pub use store::SessionStore;
pub use view::{Screen, ViewModel};
