use azure_rm_modules::ansible::failure;
use azure_rm_modules::config::LOG_CONFIG_FILE;
use azure_rm_modules::modules::module_names;
use azure_rm_modules::{is_failed, parse_command, run_from_file, Command, USAGE};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use std::error::Error;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    init_logging();
    dotenv::dotenv().ok();
    log::info!("#Start main()");

    let args: Vec<String> = std::env::args().collect();
    let (module, args_file) = match parse_command(&args) {
        Command::Run { module, args_file } => (module, args_file),
        Command::List => {
            for name in module_names() {
                println!("{name}");
            }
            return Ok(());
        }
        Command::Usage => {
            println!("{}", serde_json::to_string(&failure(USAGE))?);
            std::process::exit(1);
        }
    };

    let result = run_from_file(&module, &args_file).await;
    println!("{}", serde_json::to_string(&result)?);
    if is_failed(&result) {
        std::process::exit(1);
    }
    Ok(())
}

/// stdout carries the module result, so logs go to stderr or files only.
fn init_logging() {
    if Path::new(LOG_CONFIG_FILE).exists() {
        match log4rs::init_file(LOG_CONFIG_FILE, Default::default()) {
            Ok(()) => return,
            Err(e) => eprintln!("Error initializing log4rs from {LOG_CONFIG_FILE}: {e}"),
        }
    }
    let stderr = ConsoleAppender::builder().target(Target::Stderr).build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn));
    match config {
        Ok(config) => {
            if let Err(e) = log4rs::init_config(config) {
                eprintln!("Error initializing logging: {e}");
            }
        }
        Err(e) => eprintln!("Error building logging config: {e}"),
    }
}
