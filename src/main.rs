#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = quizdesk::run().await {
        eprintln!("quizdesk fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
