use std::io;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    wuki::print_engine_info();
    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    wuki::Engine::new(&mut input, &mut output).run()
}
