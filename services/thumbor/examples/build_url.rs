use thurl_core::{Context, OsEnv};
use thurl_thumbor::{Adjustments, Builder, Config};

fn main() -> anyhow::Result<()> {
    // Initialize logger with debug level to see the string to sign
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    // Load THUMBOR_ENDPOINT and THUMBOR_SECURITY_KEY from the process env
    let ctx = Context::new().with_env(OsEnv);
    let config = Config::default().from_env(&ctx);
    println!("Loaded config: {:?}", config);

    let builder = Builder::try_from_config(&config)?;

    // Adjustments usually come from an api request as json
    let adjustments: Adjustments = serde_json::from_str(
        r#"{"fit": "fit-in", "width": 300, "height": 200, "smart": true, "quality": 80}"#,
    )?;

    let url = builder.try_build("path/to/image.jpg", Some(&adjustments))?;
    println!("\n{url}");

    Ok(())
}
