use anyhow::Context;

use billdesk_desk::{BillingDesk, DeskConfig};

fn main() -> anyhow::Result<()> {
    billdesk_observability::init();

    let config = DeskConfig::from_env()?;
    let desk = BillingDesk::from_config(&config).context("failed to seed billing desk")?;

    let json = desk
        .snapshot()
        .to_json()
        .context("failed to serialize desk snapshot")?;
    println!("{json}");

    tracing::info!(products = desk.products().len(), "snapshot written");
    Ok(())
}
