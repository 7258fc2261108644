mod cors;
pub mod dto;
mod formulas;
mod paypal;
pub mod response;
mod router;
mod sessions;
mod tokens;
pub mod validation;

pub use router::{AppState, create_router};
