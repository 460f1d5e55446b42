fn main() {
    if let Err(error) = proman_cli::run() {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}
