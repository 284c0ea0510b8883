use crate::config::toml_config::TomlConfig;
use crate::core::request::RequestForm;
use crate::domain::model::SampleRequestType;
use crate::utils::error::Result;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "ice-samples")]
#[command(about = "Manage registry samples on plate grids")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Registry base URL, overrides `server.endpoint`
    #[arg(long)]
    pub api_endpoint: Option<String>,

    /// Session id sent with every request, overrides `server.session_id`
    #[arg(long)]
    pub session_id: Option<String>,

    /// Plate rows, overrides `plate.rows`
    #[arg(long)]
    pub rows: Option<usize>,

    /// Plate columns, overrides `plate.cols`
    #[arg(long)]
    pub cols: Option<usize>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the samples of an entry
    List {
        entry_id: i64,
        /// Write the plate map as CSV to this path
        #[arg(long)]
        csv: Option<String>,
    },
    /// Show the plate grid for a well (and tube) without saving anything
    Preview {
        /// Well name such as D06
        #[arg(long)]
        well: String,
        #[arg(long)]
        barcode: Option<String>,
    },
    /// Create a sample in a well, optionally in a scanned tube, or at AddGene
    Add {
        entry_id: i64,
        #[arg(long, conflicts_with = "addgene")]
        well: Option<String>,
        #[arg(long, requires = "well")]
        barcode: Option<String>,
        #[arg(long)]
        addgene: Option<String>,
        #[arg(long)]
        label: Option<String>,
        /// Depositor account email
        #[arg(long)]
        depositor: String,
        #[arg(long)]
        depositor_id: Option<i64>,
    },
    /// Delete a sample of an entry
    Delete { entry_id: i64, sample_id: i64 },
    /// Put a sample request in the cart
    Request {
        part_id: i64,
        #[arg(long, value_enum)]
        kind: RequestKind,
        #[arg(long, default_value_t = 30)]
        temperature: u8,
        #[arg(long, default_value = "LB")]
        plate: String,
        /// Free-text description when --plate is Other
        #[arg(long)]
        plate_text: Option<String>,
    },
    /// Print the AddGene page of an entry, if it has one
    AddgeneLink { entry_id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RequestKind {
    LiquidCulture,
    StreakOnAgarPlate,
}

impl From<RequestKind> for SampleRequestType {
    fn from(kind: RequestKind) -> Self {
        match kind {
            RequestKind::LiquidCulture => SampleRequestType::LiquidCulture,
            RequestKind::StreakOnAgarPlate => SampleRequestType::StreakOnAgarPlate,
        }
    }
}

impl CliConfig {
    /// Loads the configuration file, if any, and applies command line overrides.
    pub fn load_settings(&self) -> Result<TomlConfig> {
        let mut settings = match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        if let Some(endpoint) = &self.api_endpoint {
            settings.server.endpoint = endpoint.clone();
        }
        if let Some(session_id) = &self.session_id {
            settings.server.session_id = Some(session_id.clone());
        }
        if let Some(rows) = self.rows {
            settings.plate.rows = rows;
        }
        if let Some(cols) = self.cols {
            settings.plate.cols = cols;
        }
        Ok(settings)
    }
}

impl Command {
    pub fn request_form(&self) -> Option<RequestForm> {
        match self {
            Command::Request {
                kind,
                temperature,
                plate,
                plate_text,
                ..
            } => Some(RequestForm {
                request_type: Some((*kind).into()),
                growth_temperature: *temperature,
                plate_description: Some(plate.clone()),
                plate_description_text: plate_text.clone(),
            }),
            _ => None,
        }
    }
}
