#[tokio::main]
async fn main() {
    member_portal_backend::run().await;
}
