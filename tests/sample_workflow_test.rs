use anyhow::Result;
use ice_samples::config::TomlConfig;
use ice_samples::core::export::write_plate_map;
use ice_samples::core::samples::{addgene_link, addgene_url, is_addgene_sample};
use ice_samples::domain::model::Depositor;
use ice_samples::domain::ports::ConfigProvider;
use ice_samples::utils::validation::Validate;
use ice_samples::{InMemorySampleRepository, PlateSession, SampleService};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn depositor() -> Depositor {
    Depositor {
        id: Some(4),
        email: "bench@example.org".to_string(),
    }
}

/// Fills a plate from a config file, exports the map and resolves the AddGene link.
#[tokio::test]
async fn test_plate_workflow_from_config() -> Result<()> {
    let mut config_file = NamedTempFile::new()?;
    config_file.write_all(
        br#"
[server]
endpoint = "http://localhost:8080/ice"

[plate]
rows = 16
cols = 24

[addgene]
base_url = "https://www.addgene.org/"
"#,
    )?;
    let config = TomlConfig::from_file(config_file.path())?;
    config.validate()?;

    let geometry = config.plate_geometry();
    let service = SampleService::new(InMemorySampleRepository::new());
    let mut session = PlateSession::new(geometry, depositor());

    // 384-well plates reach row P, column 24
    let corner = geometry.parse_well_name("P24")?;
    session.open_popover_for(corner.row(), corner.col())?;
    session.set_pending_barcode("TB-384")?;
    session.submit_open()?;
    assert!(session.has_tube(15, 23)?);
    let samples = service.create(1, &mut session).await?;
    assert_eq!(samples.len(), 1);

    session.record_addgene("50005")?;
    let samples = service.create(1, &mut session).await?;
    assert_eq!(samples.len(), 2);

    assert!(is_addgene_sample(&samples));
    assert_eq!(addgene_link(&samples), Some("50005"));
    let url = addgene_url(config.addgene_base_url(), &samples)?.unwrap();
    assert_eq!(url.as_str(), "https://www.addgene.org/50005");

    let out_dir = TempDir::new()?;
    let path = out_dir.path().join("plate.csv");
    write_plate_map(std::fs::File::create(&path)?, &samples, geometry)?;

    let csv = std::fs::read_to_string(&path)?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains(",1523,P24,TB-384,,bench@example.org"));
    assert!(lines[2].ends_with(",,,,50005,bench@example.org"));
    Ok(())
}

#[tokio::test]
async fn test_popover_edits_are_abandoned_on_switch() -> Result<()> {
    let service = SampleService::new(InMemorySampleRepository::new());
    let mut session = PlateSession::new(Default::default(), depositor());

    session.open_popover_for(0, 0)?;
    session.set_pending_barcode("LOST")?;
    session.open_popover_for(1, 1)?;
    session.submit_open()?;

    assert!(session.has_well(1, 1)?);
    assert!(!session.has_tube(1, 1)?);
    assert!(!session.has_content(0, 0)?);

    let samples = service.create(9, &mut session).await?;
    assert_eq!(samples[0].chain().count(), 1);
    Ok(())
}
