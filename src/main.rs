use leadboard::cli::{internal_error, run};

fn init_logging() {
    let env = env_logger::Env::new().filter_or("LEADBOARD_LOG", "warn");
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();
}

fn main() {
    init_logging();

    #[cfg(windows)]
    let _ = enable_ansi_support::enable_ansi_support();

    if let Err(e) = run() {
        // Database and I/O failures are internal; everything else is the user's input
        let error_str = format!("{:#}", e);
        if error_str.contains("database") || error_str.contains("constraint") ||
           error_str.contains("SQLite") || error_str.contains("Failed to") {
            let mut message = e.to_string();
            let mut source = e.source();
            if source.is_some() {
                message.push_str("\n\nCaused by:");
                let mut indent = 1;
                while let Some(err) = source {
                    message.push_str(&format!("\n{:indent$}  {}", "", err));
                    source = err.source();
                    indent += 1;
                }
            }
            internal_error(&message);
        } else {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
