use waitlist::configuration::get_configuration;
use waitlist::startup::Application;
use waitlist::telemetry::{get_subscriber, initialize_subscriber};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let configuration = get_configuration().expect("Failed to read configuration");

    let subscriber = get_subscriber(
        configuration.telemetry.name.clone(),
        configuration.telemetry.level.clone(),
        std::io::stdout,
    );
    initialize_subscriber(subscriber);

    let application = Application::build(&configuration).await?;
    application.run_until_stopped().await
}
