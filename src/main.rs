fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up logging; RUST_LOG controls verbosity
    env_logger::init();

    // Server calls and file dialogs are spawned onto this runtime from the UI thread
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    // Run the layer canvas application
    layer_canvas::run_app()?;
    Ok(())
}
