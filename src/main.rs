#[tokio::main]
async fn main() {
    if let Err(e) = spotbook_lib::run().await {
        eprintln!("spotbook: {}", e);
        std::process::exit(1);
    }
}
