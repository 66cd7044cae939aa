use crate::config::Config;
use crate::domain::ports::MemberRepository;
use crate::domain::services::auth_service::AuthService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub member_repo: Arc<dyn MemberRepository>,
    pub auth_service: Arc<AuthService>,
}
