use std::process;

fn main() {
    billbook::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = billbook::cli::run_cli(&args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
