use log::info;

use ghutils::{Args, Repository, StdResult, run};

#[tokio::main(flavor = "current_thread")]
async fn main() -> StdResult<()> {
    env_logger::init();
    let args = Args::parse_for("ghlist", "List the repositories of GitHub users");
    info!("Starting repositories listing");

    run::<Repository>(args).await
}
