use anyhow::Result;
use vergen::EmitBuilder;

fn main() -> Result<()> {
    // Commit SHA shown by `transcriber --version`
    EmitBuilder::builder().git_sha(true).emit()?;
    Ok(())
}
