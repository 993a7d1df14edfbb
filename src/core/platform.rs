//! Platform-specific functionality and error handling.

/// Initialize panic handling.
///
/// Panics are reported through the log as well as stderr so they end up in
/// the log file when `--log-file` is set.
pub fn init_panic_handling() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        bevy::log::error!("{info}");
        default_hook(info);
    }));
}

/// Handle application errors: print to stderr and exit with code 1
pub fn handle_error(error: anyhow::Error) {
    eprintln!();
    eprintln!("Error running sprite-editor:");
    eprintln!("{error:#}");
    eprintln!();
    eprintln!("Try running with --help for usage information.");
    std::process::exit(1);
}

/// Parse and validate the command line
pub fn get_cli_args() -> anyhow::Result<crate::core::cli::CliArgs> {
    use clap::Parser;
    let args = crate::core::cli::CliArgs::parse();
    args.validate().map_err(anyhow::Error::msg)?;
    Ok(args)
}
