fn main() -> anyhow::Result<()> {
    xenvault::cli::run()
}
