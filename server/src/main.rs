#[tokio::main]
async fn main() {
    lacteos_server::start_server().await;
}
