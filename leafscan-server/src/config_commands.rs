use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use leafscan_core::modules::config::{default_config_path, load_config, save_config};
use leafscan_types::LeafscanConfig;

pub fn show_config(path: Option<&Path>, json: bool) -> Result<()> {
    let mut config = load_config(path)?;
    config.generator.api_key = mask_key(&config.generator.api_key);

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Server:".cyan().bold());
    println!("  Listen: {}:{}", config.server.host, config.server.port);
    println!("  Audio Dir: {}", config.server.audio_dir);
    println!("  Request Timeout: {}s", config.server.request_timeout_secs);
    println!("  Max Upload: {} bytes", config.server.max_upload_bytes);

    println!("{}", "Classifier:".cyan().bold());
    println!("  Input Size: {}px", config.classifier.input_size);
    println!("  Potato: {}", config.classifier.models.potato);
    println!("  Tomato: {}", config.classifier.models.tomato);
    println!("  Pepper: {}", config.classifier.models.pepper);

    println!("{}", "Generator:".cyan().bold());
    println!("  Base URL: {}", config.generator.base_url);
    println!("  Model: {}", config.generator.model);
    let key = if config.generator.api_key.is_empty() {
        "(not set)".yellow().to_string()
    } else {
        config.generator.api_key.clone()
    };
    println!("  API Key: {}", key);

    println!("{}", "Speech:".cyan().bold());
    println!("  Base URL: {}", config.speech.base_url);
    println!("  Language: {}", config.speech.language);

    println!("{}", "Tools:".cyan().bold());
    println!("  Backend URL: {}", config.tools.backend_url);
    Ok(())
}

pub fn init_config(path: Option<&Path>, force: bool) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    save_config(&LeafscanConfig::default(), &path)?;
    println!("{} Wrote default configuration to {}", "✓".green(), path.display());
    Ok(())
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key(""), "");
        assert_eq!(mask_key("short"), "*****");
        assert_eq!(mask_key("gsk_1234567890abcd"), "gsk_...abcd");
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("leafscan.json");

        init_config(Some(&path), false).unwrap();
        assert!(path.exists());
        assert!(init_config(Some(&path), false).is_err());
        init_config(Some(&path), true).unwrap();
    }

    #[test]
    fn test_show_missing_explicit_path_fails() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(show_config(Some(&tmp.path().join("absent.json")), true).is_err());
    }
}
