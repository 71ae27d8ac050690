use smart_graama_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("smart-graama error: {err}");
        std::process::exit(1);
    }
}
