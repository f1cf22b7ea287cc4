use colored::Colorize;
use std::path::Path;

pub fn handle(project_dir: &Path) -> anyhow::Result<()> {
    let store = shipflow_config::open(project_dir);
    println!(
        "{} {}",
        "Settings file:".bold(),
        store.path().display().to_string().cyan()
    );

    if !store.path().exists() {
        println!("{}", "No settings saved yet.".yellow());
        return Ok(());
    }

    let settings = store.load()?;
    match &settings.aws {
        Some(_) => println!("{}", "Existing deployment (next deploy updates it)".green()),
        None => println!("{}", "No deployment recorded yet".yellow()),
    }
    println!();
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
