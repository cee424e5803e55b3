use log::info;

use ghutils::{Args, Gist, StdResult, run};

#[tokio::main(flavor = "current_thread")]
async fn main() -> StdResult<()> {
    env_logger::init();
    let args = Args::parse_for("gistlist", "List the gists of GitHub users");
    info!("Starting gists listing");

    run::<Gist>(args).await
}
