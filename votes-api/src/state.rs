use std::sync::Arc;
use votes_app::AppContext;

use crate::templates::Templates;

#[derive(Clone)]
pub struct AppState {
    pub ctx: AppContext,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn new(ctx: AppContext) -> Result<Self, tera::Error> {
        Ok(Self {
            ctx,
            templates: Arc::new(Templates::load()?),
        })
    }
}
