use anyhow::Result;

use loomcheck::{boot, cli};

fn main() -> Result<()> {
    boot::init_logging();
    let matches = cli::parse_args();

    // A current-thread runtime keeps every engine task cooperative on one
    // thread, which serializes all access to the shared expander bus.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(cli::dispatch(&matches))
}
