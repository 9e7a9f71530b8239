//! `joblens` binary entry point.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    joblens_cli::run().await
}
