use std::io;
use std::time::Duration;

use labas::{Credentials, LabasClient};
use tracing_subscriber::EnvFilter;

fn required_var(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("labas=debug")),
        )
        .init();

    let username = required_var("LABAS_USERNAME")?;
    let password = required_var("LABAS_PASSWORD")?;
    let recipient = required_var("LABAS_RECIPIENT")?;
    let message =
        std::env::var("LABAS_MESSAGE").unwrap_or_else(|_| "Hello from the labas example.".to_owned());

    let client = LabasClient::builder(Credentials::new(username, password)?)
        .timeout(Duration::from_secs(30))
        .build()?;

    client.send_sms(&recipient, &message).await?;
    client
        .send_sms_with_timeout(&recipient, format!("{message} (2)"), Duration::from_secs(60))
        .await?;
    println!("sent 2 messages to {recipient}");

    Ok(())
}
