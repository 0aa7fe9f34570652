use argbind::commandline::{make_command_line_parser, ConfigData};
use std::env;
use tracing_subscriber::EnvFilter;

/// Logging is off unless `ARGBIND_LOG` holds a filter, e.g. `ARGBIND_LOG=argbind=trace`.
fn init_tracing() {
    let Ok(filter) = env::var("ARGBIND_LOG") else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn main() {
    init_tracing();
    let mut config = ConfigData::default();
    make_command_line_parser().parse_env_or_exit(&mut config);
    println!("{:#?}", config);
}
