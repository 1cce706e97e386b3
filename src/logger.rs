use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

/// Initializes the logging system.
///
/// With a path, loads a log4rs YAML config from it. Otherwise installs a
/// stderr console appender at info level; stdout is reserved for progress
/// markers and reports.
pub fn init(config_path: Option<&std::path::Path>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = config_path {
        log4rs::init_file(path, log4rs::config::Deserializers::default())?;
        return Ok(());
    }
    let encoder = PatternEncoder::new("{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}");
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(encoder))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Info))?;
    log4rs::init_config(config)?;
    Ok(())
}
