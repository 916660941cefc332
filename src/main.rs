#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use topology_viewport::{Topology, ViewportConfig};

    // Set up logging for development
    env_logger::init();

    // Usage: topology_viewport [config.json] [topology.json]
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => ViewportConfig::load(path)?,
        None => ViewportConfig::default(),
    };
    let topology = args.next().map(Topology::load).transpose()?;

    // Run the viewer
    topology_viewport::run_app(config, topology)?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
