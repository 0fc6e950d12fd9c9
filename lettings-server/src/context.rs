use std::sync::Arc;

use axum::extract::State;
use lettings_core::Lettings;

#[derive(Clone)]
pub struct ServerContext {
    pub lettings: Arc<Lettings>,
}

pub type Context = State<ServerContext>;
