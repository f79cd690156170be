use anyhow::Context;
use clap::Parser;
use factory_labels::config::{Command, GenerateArgs};
use factory_labels::core::{ConfigProvider, Storage};
use factory_labels::utils::error::{FieldViolation, LabelError};
use factory_labels::utils::logger;
use factory_labels::utils::validation::{validate_file_extension, Validate, Violations};
use factory_labels::{Cli, LabelEngine, LabelPipeline, LocalStorage, TomlConfig};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config().context("failed to load configuration")?;

    // 初始化日誌
    if config.logging.json {
        logger::init_json_logger(config.logging.verbose);
    } else {
        logger::init_cli_logger(config.logging.verbose);
    }
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    match cli.command {
        Command::Serve(_) => factory_labels::server::serve(config).await,
        Command::Generate(args) => match generate(&config, &args).await {
            Ok(archive) => {
                println!("✅ Labels generated");
                println!("📁 Archive saved to: {}", archive);
                Ok(())
            }
            Err(e) => {
                tracing::error!("❌ Label generation failed: {} ({:?})", e, e.category());
                eprintln!("❌ {}", e);
                if let LabelError::ValidationError { violations } = &e {
                    for FieldViolation { field, reason } in violations {
                        eprintln!("   - {}: {}", field, reason);
                    }
                }
                std::process::exit(2);
            }
        },
    }
}

async fn generate(config: &TomlConfig, args: &GenerateArgs) -> factory_labels::Result<String> {
    let file_name = args
        .spreadsheet
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();

    let mut violations = Violations::new();
    let order = args
        .order_form()
        .validate_into(config.label_defaults(), &mut violations);
    violations.record(validate_file_extension(
        "spreadsheet",
        &file_name,
        config.allowed_extensions(),
    ));
    violations.into_result()?;
    let order = order.ok_or_else(|| LabelError::ProcessingError {
        message: "order validation produced no order".to_string(),
    })?;

    let bytes = tokio::fs::read(&args.spreadsheet).await?;
    let storage = LocalStorage::new(config.output_root());
    let upload_path = format!("uploads/{}", file_name);
    storage.write_file(&upload_path, &bytes).await?;

    let pipeline = LabelPipeline::new(storage.clone(), config.clone(), order, upload_path);
    let archive = LabelEngine::new(pipeline).run().await?;

    Ok(Path::new(config.output_root())
        .join(archive)
        .display()
        .to_string())
}
