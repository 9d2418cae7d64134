#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = unigrade::run_worker().await {
        eprintln!("unigrade-worker fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
