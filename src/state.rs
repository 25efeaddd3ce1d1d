use std::sync::Arc;

use axum::extract::FromRef;
use gatehouse_auth::{IssueError, TokenAuthorizer, TokenIssuer};
use gatehouse_config::AppConfig;

#[derive(Clone, Debug)]
pub struct AppState {
    pub issuer: TokenIssuer,
    pub authorizer: TokenAuthorizer,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, IssueError> {
        Ok(Self {
            issuer: TokenIssuer::from_config(&config.jwt)?,
            authorizer: TokenAuthorizer::from_config(&config.jwt),
            config: Arc::new(config),
        })
    }
}

impl FromRef<AppState> for TokenAuthorizer {
    fn from_ref(state: &AppState) -> Self {
        state.authorizer.clone()
    }
}

pub fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env()?;
    Ok(AppState::new(config)?)
}
