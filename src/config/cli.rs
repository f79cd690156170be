use crate::config::TomlConfig;
use crate::domain::model::LabelField;
use crate::domain::order::OrderForm;
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "factory-labels")]
#[command(about = "Turns a factory/product spreadsheet into per-factory label documents")]
pub struct Cli {
    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve the upload form over HTTP
    Serve(ServeArgs),
    /// Generate the label archive for a local spreadsheet
    Generate(GenerateArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long)]
    pub output_root: Option<String>,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    #[arg(long)]
    pub spreadsheet: PathBuf,

    #[arg(long)]
    pub order_number: String,

    #[arg(long)]
    pub customer_name: String,

    #[arg(long, default_value = "")]
    pub customer_info: String,

    #[arg(long)]
    pub made_in: Option<String>,

    #[arg(long)]
    pub name_font_size: Option<String>,

    #[arg(long)]
    pub product_info_font_size: Option<String>,

    #[arg(long)]
    pub product_quantity_font_size: Option<String>,

    #[arg(long)]
    pub made_in_font_size: Option<String>,

    #[arg(long)]
    pub customer_info_font_size: Option<String>,

    #[arg(long)]
    pub output_root: Option<String>,
}

impl Cli {
    /// Loads the TOML file if one was given and applies command-line overrides.
    pub fn load_config(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if self.verbose {
            config.logging.verbose = true;
        }

        match &self.command {
            Command::Serve(args) => {
                if let Some(host) = &args.host {
                    config.server.host = host.clone();
                }
                if let Some(port) = args.port {
                    config.server.port = port;
                }
                if let Some(root) = &args.output_root {
                    config.storage.output_root = root.clone();
                }
                if args.json_logs {
                    config.logging.json = true;
                }
            }
            Command::Generate(args) => {
                if let Some(root) = &args.output_root {
                    config.storage.output_root = root.clone();
                }
            }
        }

        Ok(config)
    }
}

impl GenerateArgs {
    pub fn order_form(&self) -> OrderForm {
        let mut form = OrderForm {
            order_number: Some(self.order_number.clone()),
            customer_name: Some(self.customer_name.clone()),
            customer_info: Some(self.customer_info.clone()),
            made_in: self.made_in.clone(),
            ..OrderForm::default()
        };

        let sizes = [
            (LabelField::CustomerName, &self.name_font_size),
            (LabelField::ProductInfo, &self.product_info_font_size),
            (LabelField::ProductQuantity, &self.product_quantity_font_size),
            (LabelField::MadeIn, &self.made_in_font_size),
            (LabelField::CustomerInfo, &self.customer_info_font_size),
        ];
        for (field, size) in sizes {
            if let Some(size) = size {
                form.font_sizes.insert(field, size.clone());
            }
        }
        form
    }
}
