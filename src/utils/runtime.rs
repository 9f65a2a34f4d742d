use anyhow::Result;

/// Runtime driving the binary. Layout work never leaves the calling thread.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
