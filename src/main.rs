#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = examsync_rust::run_worker().await {
        eprintln!("examsync fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
