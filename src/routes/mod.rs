mod health_check;
mod subscriptions;

pub use health_check::check_health;
pub use subscriptions::subscribe;
