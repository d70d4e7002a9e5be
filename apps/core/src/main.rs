use clap::Parser;

fn main() {
    let cli = kapetayo_core::runtime::Cli::parse();

    if let Err(error) = kapetayo_core::runtime::run(cli) {
        eprintln!("[kapetayo-core] {error}");
        std::process::exit(1);
    }
}
