use anyhow::Context;

/// Load `.env` from the working directory (if any), then the layered config.
pub fn load_config() -> anyhow::Result<tally_config::TallyConfig> {
    load_dotenv()?;
    tally_config::TallyConfig::load().context("failed to load tally configuration")
}

fn load_dotenv() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let env_path = cwd.join(".env");
    if env_path.is_file() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}
