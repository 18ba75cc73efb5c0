pub mod args;
pub mod client;
mod setup;

pub use args::AppArgs;

use anyhow::Result;

pub async fn launch() -> Result<()> {
    launch_with_args(AppArgs::from_cli()).await
}

pub async fn launch_with_args(args: AppArgs) -> Result<()> {
    let setup::PreparedApp { args, config, db } = setup::prepare(args)?;
    client::run(&args, &config, db).await
}
