use anyhow::Result;

fn main() -> Result<()> {
    showcase::cli::run()
}
