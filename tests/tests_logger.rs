use ramsim::state::{Logger, MemoryStore};

#[cfg(test)]
mod tests {
    use std::fs;

    use log::Log;

    use super::*;

    // The `log` backend can be installed once per process, so this file holds a single test
    #[test]
    fn test_installed_logger_writes_records_to_file() {
        let path = std::env::temp_dir().join(format!("ramsim_log_{}.txt", std::process::id()));
        let path_str = path.to_str().expect("temp path is valid UTF-8");

        let logger = Logger::new(path_str)
            .expect("Failed to create logger")
            .with_level(log::LevelFilter::Debug);
        logger.install().expect("Failed to install logger");

        log::info!("replay started");
        log::trace!("below the configured level");
        let mut store = MemoryStore::new();
        store.write(0x100, 42);
        log::logger().flush();

        let contents = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert!(contents.contains("[INFO]"), "{}", contents);
        assert!(contents.contains("replay started"), "{}", contents);
        assert!(contents.contains("RAM write 0x100 <- 42"), "{}", contents);
        assert!(!contents.contains("below the configured level"), "{}", contents);
    }
}
