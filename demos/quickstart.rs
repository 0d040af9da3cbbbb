use schooladmin_client::{ApiClient, Config, Resource};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional: enable basic logging for the example
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    // SCHOOLADMIN_API_URL / SCHOOLADMIN_SESSION_PATH pick the server and token file
    let cfg = Config::from_env()?;
    let client = ApiClient::from_config(cfg)?;

    if client.session().access.is_none() {
        let user = std::env::var("SCHOOLADMIN_USER")?;
        let password = std::env::var("SCHOOLADMIN_PASSWORD")?;
        client.login(&user, &password).await?;
    }

    let students: serde_json::Value = client
        .resource(Resource::Students)
        .list(&[("page", "1")])
        .await?;
    println!("{}", serde_json::to_string_pretty(&students)?);
    Ok(())
}
