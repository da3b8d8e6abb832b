//! `dogie deploy <nft>`
//!
//! Plans are built before connecting, so configuration errors surface
//! before any transaction is sent.

use dogie_deploy::modules::{basic_nft_module, dynamic_svg_nft_module, random_ipfs_nft_module};
use dogie_deploy::{execute_plan, DeploymentPlan, DeploymentRecord, EthersDeployer, VariantImages};
use dogie_types::TokenUriList;

use super::Context;

pub async fn basic(ctx: &Context) -> anyhow::Result<()> {
    deploy(ctx, basic_nft_module()).await
}

pub async fn random_ipfs(ctx: &Context) -> anyhow::Result<()> {
    let token_uris = TokenUriList::load(&ctx.config.tool.token_uris_path)?;
    let plan = random_ipfs_nft_module(&ctx.network, &token_uris)?;
    deploy(ctx, plan).await
}

pub async fn dynamic_svg(ctx: &Context) -> anyhow::Result<()> {
    let images = VariantImages::load(&ctx.config.tool.dynamic_images_dir)?;
    let plan = dynamic_svg_nft_module(&ctx.network, &images)?;
    deploy(ctx, plan).await
}

async fn deploy(ctx: &Context, plan: DeploymentPlan) -> anyhow::Result<()> {
    tracing::info!(
        module = %plan.module,
        contracts = ?plan.contracts(),
        network = ctx.network.name(),
        "deploying"
    );
    let client = ctx.connect().await?;
    let deployer = EthersDeployer::new(client, ctx.artifacts(), ctx.tx_settings());
    let outcome = execute_plan(&plan, &deployer).await?;

    let deployments_dir = &ctx.config.tool.deployments_dir;
    let mut record = DeploymentRecord::load(deployments_dir, ctx.network.chain_id())?;
    record.merge(&outcome);
    let path = record.save(deployments_dir, ctx.network.chain_id())?;

    for (key, address) in &outcome.addresses {
        println!("{key}: {address:?}");
    }
    for (key, id) in &outcome.subscriptions {
        println!("{key}: {id}");
    }
    println!("addresses recorded in {}", path.display());
    Ok(())
}
