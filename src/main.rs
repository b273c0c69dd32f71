use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr so that JSON reports on stdout stay machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = trifold::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
