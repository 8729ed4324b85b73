use pcos_assistant::config::Config;
use pcos_assistant::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;
    pcos_assistant::run(config).await
}
