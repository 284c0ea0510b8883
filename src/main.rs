use clap::Parser;
use ice_samples::config::Command;
use ice_samples::core::export::write_plate_map;
use ice_samples::core::samples::{addgene_url, is_addgene_sample};
use ice_samples::domain::model::Depositor;
use ice_samples::domain::ports::ConfigProvider;
use ice_samples::utils::error::{ErrorSeverity, IceError};
use ice_samples::utils::{logger, validation::Validate};
use ice_samples::{CliConfig, PlateSession, RestSampleRepository, SampleService, TomlConfig};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let settings = match cli.load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if settings.json_logging() {
        logger::init_json_logger(settings.log_level());
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(&cli.command, &settings).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(command: &Command, settings: &TomlConfig) -> Result<(), IceError> {
    let geometry = settings.plate_geometry();
    let service = SampleService::new(RestSampleRepository::from_config(settings)?);

    match command {
        Command::Preview { well, barcode } => {
            let mut session = PlateSession::new(geometry, Depositor::default());
            place_in_well(&mut session, well, barcode.as_deref())?;
            print!("{}", session.render_grid());
        }
        Command::List { entry_id, csv } => {
            let samples = service.list(*entry_id).await?;
            for sample in &samples {
                let chain: Vec<String> = sample
                    .chain()
                    .map(|node| format!("{}:{}", node.kind, node.display))
                    .collect();
                println!(
                    "{}\t{}\t{}\t{}",
                    sample.id.map(|id| id.to_string()).unwrap_or_default(),
                    sample.label,
                    chain.join(" > "),
                    sample.depositor.email
                );
            }
            if let Some(path) = csv {
                let file = std::fs::File::create(path)?;
                write_plate_map(file, &samples, geometry)?;
                println!("📁 Plate map saved to: {}", path);
            }
        }
        Command::Add {
            entry_id,
            well,
            barcode,
            addgene,
            label,
            depositor,
            depositor_id,
        } => {
            let mut session = PlateSession::new(
                geometry,
                Depositor {
                    id: *depositor_id,
                    email: depositor.clone(),
                },
            );
            if let Some(label) = label {
                session.set_label(label.clone());
            }
            if let Some(well) = well {
                place_in_well(&mut session, well, barcode.as_deref())?;
            } else if let Some(addgene) = addgene {
                session.record_addgene(addgene)?;
            }

            let samples = service.create(*entry_id, &mut session).await?;
            println!("✅ Sample saved; entry {} now has {} samples", entry_id, samples.len());
        }
        Command::Delete { entry_id, sample_id } => {
            let mut samples = service.list(*entry_id).await?;
            service.delete(*entry_id, &mut samples, *sample_id).await?;
            println!("✅ Deleted sample {}; {} remain", sample_id, samples.len());
        }
        Command::Request { part_id, .. } => {
            let form = command.request_form().unwrap_or_default();
            let request = service.request(*part_id, &form).await?;
            println!(
                "✅ Requested part {} ({})",
                part_id, request.plate_description
            );
        }
        Command::AddgeneLink { entry_id } => {
            let samples = service.list(*entry_id).await?;
            if !is_addgene_sample(&samples) {
                println!("Entry {} is not distributed through AddGene", entry_id);
            } else if let Some(url) = addgene_url(settings.addgene_base_url(), &samples)? {
                println!("{}", url);
            }
        }
    }

    Ok(())
}

/// Opens the named well, scans the barcode into it and records the location.
fn place_in_well(session: &mut PlateSession, well: &str, barcode: Option<&str>) -> Result<(), IceError> {
    let coordinate = session.geometry().parse_well_name(well)?;
    session.open_popover_for(coordinate.row(), coordinate.col())?;
    if let Some(barcode) = barcode {
        session.set_pending_barcode(barcode)?;
    }
    session.submit_open()?;
    Ok(())
}
