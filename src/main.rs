fn main() -> anyhow::Result<()> {
    teamsite_core::cli::run()
}
