pub mod auth;
pub mod webhooks;

pub use auth::AuthCommands;
pub use webhooks::WebhookCommands;
