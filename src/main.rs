#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    diary_backend::run().await;
}
