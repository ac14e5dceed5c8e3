use crate::config::Config;
use crate::store::DynQuizStore;
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub store: DynQuizStore,
    pub config: Config,
}

impl FromRef<AppState> for DynQuizStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}
