use anyhow::Result;

fn main() -> Result<()> {
    sttctl::cli::run(sttctl::cli::CliMode::Launch)
}
