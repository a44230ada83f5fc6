// bluum - a few minutes of reflection a day

use bluum::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("error: {e:?}");
        std::process::exit(1);
    }
}
