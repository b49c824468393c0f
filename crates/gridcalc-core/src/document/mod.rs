mod eval;
mod state;

pub use eval::{Evaluation, evaluate};
pub use state::Document;
