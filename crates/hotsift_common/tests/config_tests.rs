//! Loading the TOML config from disk.

use std::fs;

use anyhow::Result;
use hotsift_common::{Granularity, TriageConfig, TriageError};
use tempfile::TempDir;

#[test]
fn missing_file_gives_defaults() -> Result<()> {
    let dir = TempDir::new()?;
    let config = TriageConfig::load(&dir.path().join("config.toml"))?;
    assert_eq!(config, TriageConfig::default());
    Ok(())
}

#[test]
fn configured_checks_and_priorities_drive_the_report() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[aggregation]
granularity = "minute"

[priorities]
"launchpad-bug" = 0
"memory-warning" = 1

[[checks]]
name = "lp1927868"
pattern = 'VRRP_Instance\(\S+\) Entering BACKUP STATE'
message = "keepalived flapped {count} time(s)"
tracker = "launchpad"
bug_id = "1927868"
"#,
    )?;

    let config = TriageConfig::load(&path)?;
    assert_eq!(config.aggregation.granularity, Granularity::Minute);

    let lines = [
        "Keepalived_vrrp[1]: VRRP_Instance(VR_1) Entering BACKUP STATE",
        "kernel: Out of memory: Killed process 99 (java)",
        "Keepalived_vrrp[1]: VRRP_Instance(VR_1) Entering BACKUP STATE",
    ];
    let mut collector = config.collector();
    assert_eq!(config.check_set()?.scan(lines, &mut collector), 2);

    let report = collector.finalize().expect("findings were added");
    let order: Vec<&str> = report.groups().iter().map(|g| g.category.as_str()).collect();
    assert_eq!(order, ["launchpad-bug", "memory-warning"]);
    assert_eq!(
        report.groups()[0].entries[0].message,
        "keepalived flapped 2 time(s)"
    );
    Ok(())
}

#[test]
fn invalid_file_is_an_error() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("config.toml");

    fs::write(&path, "[priorities]\n\"not-a-category\" = 1\n")?;
    assert!(matches!(
        TriageConfig::load(&path),
        Err(TriageError::UnknownCategory(_))
    ));

    fs::write(&path, "[[checks]]\nname = \"x\"\npattern = \"(\"\nmessage = \"m\"\ncategory = \"kernel-error\"\n")?;
    assert!(matches!(TriageConfig::load(&path), Err(TriageError::Pattern(_))));

    fs::write(&path, "this is not toml")?;
    assert!(matches!(TriageConfig::load(&path), Err(TriageError::Toml(_))));
    Ok(())
}

#[test]
fn saved_config_loads_back() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("config.toml");

    let mut config = TriageConfig::default();
    config.logging.level = "debug".to_string();
    config.priorities.insert("ceph-osd-error".to_string(), 2);
    fs::write(&path, config.to_toml_string()?)?;

    assert_eq!(TriageConfig::load(&path)?, config);
    Ok(())
}
