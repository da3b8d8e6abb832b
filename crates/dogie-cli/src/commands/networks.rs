//! `dogie networks`

use dogie_config::network::is_development;
use dogie_config::NetworkTable;

fn show<T: std::fmt::Debug>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| format!("{v:?}"))
        .unwrap_or_else(|| "-".to_string())
}

pub fn run(table: &NetworkTable, default: &str) {
    for profile in table.iter() {
        let mut tags = Vec::new();
        if profile.name == default {
            tags.push("default");
        }
        if is_development(&profile.name) {
            tags.push("development");
        }
        println!("{} ({}) {}", profile.name, profile.chain_id, tags.join(", "));
        println!("  vrf_coordinator:    {}", show(&profile.vrf_coordinator));
        println!("  key_hash:           {}", show(&profile.key_hash));
        println!(
            "  subscription_id:    {}",
            profile
                .subscription_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
        println!("  callback_gas_limit: {}", show(&profile.callback_gas_limit));
        println!(
            "  mint_fee:           {}",
            profile
                .mint_fee
                .map(|fee| format!("{fee} wei"))
                .unwrap_or_else(|| "-".to_string())
        );
        println!("  eth_usd_price_feed: {}", show(&profile.eth_usd_price_feed));
    }
}
