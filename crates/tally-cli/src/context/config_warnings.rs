use tally_config::TallyConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &TallyConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &TallyConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let mut warnings = Vec::new();

    if config.auth.token().is_none() && has_single_underscore_key(&env_keys, "TALLY_AUTH") {
        warnings.push(
            "No auth token configured while TALLY_AUTH_* env vars exist. Use double underscores (example: TALLY_AUTH__TOKEN)."
                .to_string(),
        );
    }

    if has_single_underscore_key(&env_keys, "TALLY_SYNC") {
        warnings.push(
            "TALLY_SYNC_* env vars are ignored. Use double underscores (example: TALLY_SYNC__DEBOUNCE_MS)."
                .to_string(),
        );
    }

    if config.storage.data_dir.trim().is_empty()
        && has_single_underscore_key(&env_keys, "TALLY_STORAGE")
    {
        warnings.push(
            "Data directory appears default while TALLY_STORAGE_* env vars exist. Use double underscores (example: TALLY_STORAGE__DATA_DIR)."
                .to_string(),
        );
    }

    warnings
}

/// `TALLY_AUTH_TOKEN` matches, `TALLY_AUTH__TOKEN` does not.
fn has_single_underscore_key(keys: &[String], section: &str) -> bool {
    keys.iter().any(|key| {
        key.strip_prefix(section)
            .is_some_and(|rest| rest.starts_with('_') && !rest.starts_with("__"))
    })
}
