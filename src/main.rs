#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vibecheck::run().await
}
