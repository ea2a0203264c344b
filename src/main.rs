use anyhow::Context;
use log::LevelFilter;

use upload_queue::config;
use upload_queue::{FileRef, QueueConfig, UploadQueueStore};

/// Level to apply once the config is known, unless RUST_LOG already decided
fn configured_level(rust_log: Option<&str>, queue_config: &QueueConfig) -> Option<LevelFilter> {
    match rust_log {
        Some(filter) if !filter.trim().is_empty() => None,
        _ => Some(queue_config.level_filter()),
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging before the config so its warnings are visible
    let rust_log = std::env::var("RUST_LOG").ok();
    env_logger::Builder::new()
        .filter_level(LevelFilter::Trace)
        .parse_default_env()
        .init();
    if configured_level(rust_log.as_deref(), &QueueConfig::default()).is_some() {
        log::set_max_level(LevelFilter::Info);
    }

    let queue_config = match config::load_config() {
        Ok(queue_config) => queue_config,
        Err(e) => {
            log::warn!("Failed to load configuration, using defaults: {}", e);
            QueueConfig::default()
        }
    };

    if let Some(level) = configured_level(rust_log.as_deref(), &queue_config) {
        log::set_max_level(level);
    }

    log::info!("Starting upload queue (batch size {})", queue_config.batch_size);

    let files = std::env::args()
        .skip(1)
        .map(|path| {
            FileRef::from_path(&path).with_context(|| format!("Cannot queue {}", path))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let store = UploadQueueStore::new(&queue_config)?;
    let id = store.fill_queue(files)?;
    log::debug!("Filled queue with container {}", id);

    println!("{}", store.to_json()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_level_applies_without_rust_log() {
        let queue_config = QueueConfig {
            log_level: "debug".to_string(),
            ..QueueConfig::default()
        };

        assert_eq!(
            configured_level(None, &queue_config),
            Some(LevelFilter::Debug)
        );
        assert_eq!(
            configured_level(Some("  "), &queue_config),
            Some(LevelFilter::Debug)
        );
    }

    #[test]
    fn test_rust_log_overrides_config_level() {
        assert_eq!(configured_level(Some("trace"), &QueueConfig::default()), None);
    }
}
