//! rTimesplit main entrypoint.

use rtimesplit::run;
use rtimesplit::ui::messages::error;

#[tokio::main]
async fn main() {
    println!();
    if let Err(e) = run().await {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
